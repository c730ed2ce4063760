use super::Chat;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    LoadHistory(),
    NewChat(),
    OpenChat(Chat),
    Send(String),
}
