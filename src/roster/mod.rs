//! Durable participant roster

pub mod store;

// Re-exports for convenience
pub use store::{create_pool, RosterConnection, RosterPool, SqliteRoster};

use async_trait::async_trait;

use crate::core::error::AppResult;

/// One accepted participant.
///
/// Rows are append-only: the bot never updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Player nickname (may contain spaces)
    pub nickname: String,
    /// In-game id, or the "unspecified" sentinel when the user sent only a nickname
    pub game_id: String,
}

impl RosterEntry {
    pub fn new(nickname: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            game_id: game_id.into(),
        }
    }
}

/// Append-only participant table.
///
/// The store owns durability; the workflow only appends. `read_all` backs
/// the results listing and nothing else.
#[async_trait]
pub trait Roster: Send + Sync + 'static {
    async fn append(&self, entry: &RosterEntry) -> AppResult<()>;
    async fn read_all(&self) -> AppResult<Vec<RosterEntry>>;
}
