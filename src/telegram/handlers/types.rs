//! Handler types, dependencies, and message helpers

use std::sync::Arc;

use teloxide::types::Message;

use crate::registration::{Applicant, CheckFile, RegistrationWorkflow};
use crate::roster::SqliteRoster;
use crate::telegram::gateway::TelegramGateway;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The concrete workflow wired to the Telegram gateway and SQLite roster.
pub type BotWorkflow = RegistrationWorkflow<TelegramGateway, SqliteRoster>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub workflow: Arc<BotWorkflow>,
    pub roster: Arc<SqliteRoster>,
}

impl HandlerDeps {
    pub fn new(workflow: Arc<BotWorkflow>, roster: Arc<SqliteRoster>) -> Self {
        Self { workflow, roster }
    }
}

/// User id behind a message: the sender when known, the chat otherwise.
/// The two coincide in private chats, which is where the wizard runs.
pub fn sender_id(msg: &Message) -> i64 {
    msg.from
        .as_ref()
        .and_then(|u| i64::try_from(u.id.0).ok())
        .unwrap_or(msg.chat.id.0)
}

/// Applicant details shown to the admin next to a relayed check.
pub fn applicant_of(msg: &Message) -> Applicant {
    Applicant {
        user_id: sender_id(msg),
        full_name: msg
            .from
            .as_ref()
            .map(|u| u.full_name())
            .unwrap_or_else(|| "unknown".to_string()),
        username: msg.from.as_ref().and_then(|u| u.username.clone()),
    }
}

/// Extract the submitted check attachment; photos are taken at the largest
/// available size.
pub fn check_file_of(msg: &Message) -> Option<CheckFile> {
    if let Some(sizes) = msg.photo() {
        if let Some(best) = sizes.last() {
            return Some(CheckFile::Photo(best.file.id.0.clone()));
        }
    }
    msg.document().map(|d| CheckFile::Document(d.file.id.0.clone()))
}
