#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    AccessToken,
    AdminSecret,
    ConfigFile,
    DisplayName,
    GraphqlUrl,
    UserEmail,
    UserId,
    WebhookUrl,
}

impl ConfigKey {
    fn is_url(&self) -> bool {
        return *self == ConfigKey::GraphqlUrl || *self == ConfigKey::WebhookUrl;
    }

    fn is_secret(&self) -> bool {
        return *self == ConfigKey::AccessToken || *self == ConfigKey::AdminSecret;
    }
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        #[cfg(not(target_os = "macos"))]
        let config_path = dirs::config_dir()
            .unwrap_or_default()
            .join("parley/config.toml");
        #[cfg(target_os = "macos")]
        let config_path = path::PathBuf::from(std::env::var("HOME").unwrap_or_default())
            .join(".config/parley/config.toml");

        let res = match key {
            ConfigKey::GraphqlUrl => "http://localhost:8080/v1/graphql".to_string(),
            ConfigKey::WebhookUrl => "http://localhost:5678/webhook/sendMessage".to_string(),
            ConfigKey::ConfigFile => config_path.to_string_lossy().to_string(),

            // Supplied by the authentication provider.
            ConfigKey::AccessToken => "".to_string(),
            ConfigKey::AdminSecret => "".to_string(),
            ConfigKey::DisplayName => "".to_string(),
            ConfigKey::UserEmail => "".to_string(),
            ConfigKey::UserId => "".to_string(),
        };

        return res;
    }

    fn validate(key: ConfigKey, val: &str) -> Result<()> {
        if key.is_url() && !val.starts_with("http://") && !val.starts_with("https://") {
            bail!(format!(
                "Invalid value for '{key}': {val}\nExpected an http:// or https:// URL"
            ));
        }

        return Ok(());
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        Config::validate(key, val_str)?;
                        Config::set(key, val_str);
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::validate(key, val)?;
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            user_id = %Config::get(ConfigKey::UserId),
            graphql_url = %Config::get(ConfigKey::GraphqlUrl),
            webhook_url = %Config::get(ConfigKey::WebhookUrl),
            has_access_token = !Config::get(ConfigKey::AccessToken).is_empty(),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let description = arg
                    .get_help()
                    .map(|e| return e.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.is_empty() || key.is_secret() {
                    val = format!("# {key} = \"\"");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
