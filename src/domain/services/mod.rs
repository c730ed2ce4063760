pub mod actions;
mod app_state;
mod authorship;
mod chat_session;

pub use app_state::*;
pub use authorship::*;
pub use chat_session::*;

#[cfg(test)]
mod fakes;
