#[cfg(test)]
#[path = "authorship_test.rs"]
mod tests;

use crate::domain::models::Sender;

/// Phrases typical of assistant replies.
const ASSISTANT_PHRASES: [&str; 12] = [
    "i am",
    "i'm",
    "as an ai",
    "here is",
    "here's",
    "i apologize",
    "i'm sorry",
    "i can help",
    "i'd be happy",
    "certainly",
    "of course",
    "let me know",
];

/// Phrases typical of user questions and requests.
const REQUEST_PHRASES: [&str; 10] = [
    "help me",
    "can you",
    "could you",
    "please",
    "tell me",
    "what is",
    "how do i",
    "how to",
    "explain",
    "i need",
];

/// Decides who wrote a stored message. An explicit role always wins. Without
/// one, turns are assumed to alternate starting with the user, unless the
/// text reads like an assistant reply or like a user request.
///
/// This is a best guess for chats stored before the backend had a role
/// column, not a classifier.
pub fn infer_sender(index: usize, text: &str, explicit_role: Option<&str>) -> Sender {
    if let Some(role) = explicit_role {
        return Sender::from_role(role);
    }

    let lowered = text.to_lowercase();
    if ASSISTANT_PHRASES
        .iter()
        .any(|phrase| return lowered.contains(phrase))
    {
        return Sender::Bot;
    }

    if REQUEST_PHRASES
        .iter()
        .any(|phrase| return lowered.contains(phrase))
    {
        return Sender::User;
    }

    if index % 2 == 0 {
        return Sender::User;
    }

    return Sender::Bot;
}
