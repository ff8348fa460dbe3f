//! Admin notifications outside the registration flow

use teloxide::prelude::*;

use crate::core::config;

/// Notify the primary admin that the bot (re)started.
pub async fn notify_admin_startup(bot: &Bot, bot_username: Option<&str>) {
    let admin_id = *config::admin::ADMIN_USER_ID;
    if admin_id == 0 {
        log::warn!("ADMIN_USER_ID not set; startup notification skipped");
        return;
    }

    let text = match bot_username {
        Some(username) => format!("🤖 Bot @{} started", username),
        None => "🤖 Bot started".to_string(),
    };

    if let Err(e) = bot.send_message(ChatId(admin_id), text).await {
        log::warn!("Failed to send startup notification to admin: {}", e);
    }
}
