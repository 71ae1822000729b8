//! `/login <username> <password>` parsing.

use lazy_regex::{regex_captures, regex_is_match};
use std::fmt;

/// Credentials carried by a login command, taken verbatim from the text
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

impl LoginCommand {
    /// Parses `/login (.+) (.+)` anywhere in the text. The group-chat form
    /// `/login@BotName` is accepted too.
    ///
    /// The first group is greedy, so with more than two words everything up to
    /// the last space is the username: `/login a b c` gives `("a b", "c")`.
    pub fn parse(text: &str) -> Option<Self> {
        let (_, username, password) = regex_captures!(r"/login(?:@\w+)? (.+) (.+)", text)?;
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

// Passwords must never reach the logs.
impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// True for texts meant as a login, well-formed or not.
///
/// `/login` must be a whole word: `/loginfoo` is some other command.
pub fn is_login_attempt(text: &str) -> bool {
    regex_is_match!(r"^\s*/login(?:@\w+)?(?:\s|$)", text) || LoginCommand::parse(text).is_some()
}
