#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::ChatSession;
use crate::domain::models::Action;

pub struct ActionsService {}

impl ActionsService {
    /// Runs UI intents against the session one at a time until the UI hangs
    /// up, then waits for outstanding message saves.
    pub async fn start(
        mut session: ChatSession,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            match action {
                Action::LoadHistory() => {
                    session.load_history().await;
                }
                Action::NewChat() => {
                    session.start_new_chat();
                }
                Action::OpenChat(chat) => {
                    session.load_chat(chat).await;
                }
                Action::Send(text) => {
                    let outcome = session.send_message(&text).await;
                    let state = session.state();
                    tracing::debug!(
                        outcome = ?outcome,
                        messages = state.messages.len(),
                        unsaved = state.messages.iter().filter(|e| return !e.is_saved()).count(),
                        "send finished"
                    );
                }
            }
        }

        session.settle_persistence().await;

        return Ok(());
    }
}
