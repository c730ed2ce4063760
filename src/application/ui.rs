use std::io::IsTerminal;

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::io;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Identity;
use crate::domain::services::AppState;

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    mut rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(Identity::from_config());
    app_state.colors = std::io::stdout().is_terminal();

    let intro = "Type a message and press enter. /help lists the commands.";
    if app_state.colors {
        println!("{}", intro.dimmed());
    } else {
        println!("{intro}");
    }

    tx.send(Action::LoadHistory())?;

    let mut lines = io::BufReader::new(io::stdin()).lines();
    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(event) => print_lines(app_state.handle_event(event)),
                    None => return Ok(()),
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };

                let (should_exit, output) = app_state.handle_input(&line, &tx)?;
                print_lines(output);
                if should_exit {
                    return Ok(());
                }
            }
        }
    }
}
