//! Best-effort parsing of the free-text profile message

use crate::roster::RosterEntry;

/// Game id recorded when the user sent only a nickname.
pub const UNSPECIFIED_ID: &str = "unspecified";

/// Split profile text into a roster entry.
///
/// The message has no strict schema. Tokens are separated by whitespace or
/// commas; the last token is taken as the game id and the remaining tokens,
/// joined, as the nickname. A single token becomes the nickname with an
/// "unspecified" id. Returns `None` for empty input.
pub fn parse_profile(text: &str) -> Option<RosterEntry> {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.as_slice() {
        [] => None,
        [nickname] => Some(RosterEntry::new(*nickname, UNSPECIFIED_ID)),
        [nickname @ .., id] => Some(RosterEntry::new(nickname.join(" "), *id)),
    }
}
