use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatStore;
use crate::domain::models::Identity;
use crate::domain::services::format_chat;
use crate::domain::services::help_text;
use crate::infrastructure::persistence::GraphQLStore;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn print_chats_list() -> Result<()> {
    let identity = Identity::from_config();
    let chats = GraphQLStore::default()
        .list_chats(&identity.id)
        .await?
        .iter()
        .enumerate()
        .map(|(idx, chat)| {
            return format_chat(idx + 1, chat, false);
        })
        .collect::<Vec<String>>();

    if chats.is_empty() {
        println!("You have no conversations yet. Start one with `parley chat`!");
    } else {
        println!("{}", chats.join("\n"));
    }

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn load_config(matches: Vec<&ArgMatches>) -> Result<()> {
    Config::load(matches).await?;

    if Config::get(ConfigKey::UserId).is_empty() {
        bail!(format!(
            "No user is signed in. Set {} in {} or PARLEY_USER_ID.",
            ConfigKey::UserId,
            Config::get(ConfigKey::ConfigFile)
        ));
    }

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn arg_config(key: ConfigKey, env: &str, help: String) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env.to_string())
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return format!("CHAT {line}").underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("parley")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start chatting. This is the default when no subcommand is given."))
        .subcommand(Command::new("chats").about("List your conversations, newest first."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .arg(
            arg_config(
                ConfigKey::ConfigFile,
                "PARLEY_CONFIG_FILE",
                format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)),
            )
            .short('c'),
        )
        .arg(arg_config(
            ConfigKey::GraphqlUrl,
            "PARLEY_GRAPHQL_URL",
            format!("GraphQL endpoint storing chats and messages. [default: {}]", Config::default(ConfigKey::GraphqlUrl)),
        ))
        .arg(arg_config(
            ConfigKey::WebhookUrl,
            "PARLEY_WEBHOOK_URL",
            format!("Webhook that replies to messages. [default: {}]", Config::default(ConfigKey::WebhookUrl)),
        ))
        .arg(arg_config(
            ConfigKey::AccessToken,
            "PARLEY_ACCESS_TOKEN",
            "Access token of the signed in user, sent to the GraphQL backend as a bearer token.".to_string(),
        ))
        .arg(arg_config(
            ConfigKey::AdminSecret,
            "PARLEY_ADMIN_SECRET",
            "Hasura admin secret, used when no access token is set.".to_string(),
        ))
        .arg(
            arg_config(
                ConfigKey::UserId,
                "PARLEY_USER_ID",
                "Identifier of the signed in user.".to_string(),
            )
            .short('u'),
        )
        .arg(arg_config(
            ConfigKey::UserEmail,
            "PARLEY_USER_EMAIL",
            "Email of the signed in user.".to_string(),
        ))
        .arg(arg_config(
            ConfigKey::DisplayName,
            "PARLEY_DISPLAY_NAME",
            "Name shown next to your messages. Defaults to the part of your email before the @.".to_string(),
        ));
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            load_config(vec![&matches, subcmd_matches]).await?;
        }
        Some(("chats", subcmd_matches)) => {
            load_config(vec![&matches, subcmd_matches]).await?;
            print_chats_list().await?;
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            load_config(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
