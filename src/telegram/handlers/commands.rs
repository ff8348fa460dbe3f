//! Command handlers

use teloxide::prelude::*;

use super::types::HandlerDeps;
use crate::roster::Roster;

/// Handle /results: list registered participants from the roster.
pub async fn handle_results_command(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps) {
    let rows = match deps.roster.read_all().await {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Failed to read roster: {}", e);
            let _ = bot
                .send_message(chat_id, "⚠️ Failed to load the participant list.")
                .await;
            return;
        }
    };

    if rows.is_empty() {
        let _ = bot.send_message(chat_id, "📊 No participants registered yet.").await;
        return;
    }

    let mut text = format!("📊 Participants ({}):\n", rows.len());
    for (i, entry) in rows.iter().enumerate() {
        text.push_str(&format!("\n{}. {} | {}", i + 1, entry.nickname, entry.game_id));
    }

    let _ = bot.send_message(chat_id, text).await;
}
