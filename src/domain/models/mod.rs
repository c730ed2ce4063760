mod action;
mod chat;
mod event;
mod identity;
mod message;
mod reply;
mod session;
mod slash_commands;
mod store;

pub use action::*;
pub use chat::*;
pub use event::*;
pub use identity::*;
pub use message::*;
pub use reply::*;
pub use session::*;
pub use slash_commands::*;
pub use store::*;
