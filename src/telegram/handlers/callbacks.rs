//! Callback-query routing
//!
//! Payloads are colon-separated: bare menu actions (`register`, `results`,
//! `check_subscription`, `contact_admin`) and admin verdicts carrying the
//! target user id (`approve:<id>` / `reject:<id>`).

use teloxide::prelude::*;

use super::commands::handle_results_command;
use super::types::HandlerDeps;
use crate::core::config;
use crate::registration::{Decision, DecisionOutcome};

/// Route a callback query to the matching action. Unknown payloads are
/// acknowledged and dropped.
pub async fn handle_callback(bot: &Bot, q: CallbackQuery, deps: &HandlerDeps) {
    let data = match q.data.as_deref() {
        Some(d) => d,
        None => return,
    };
    let actor_id = match i64::try_from(q.from.id.0) {
        Ok(id) => id,
        Err(_) => return,
    };

    match data.split(':').collect::<Vec<_>>().as_slice() {
        ["register"] => {
            let _ = bot.answer_callback_query(q.id.clone()).await;
            // The follow-up handle is dropped on purpose: early user
            // progress just races the timer and wins harmlessly.
            let _ = deps.workflow.begin_registration(actor_id).await;
        }
        ["check_subscription"] => {
            let _ = bot.answer_callback_query(q.id.clone()).await;
            deps.workflow.recheck_subscription(actor_id).await;
        }
        ["results"] => {
            let _ = bot.answer_callback_query(q.id.clone()).await;
            if let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) {
                handle_results_command(bot, chat_id, deps).await;
            }
        }
        ["contact_admin"] => {
            let _ = bot.answer_callback_query(q.id.clone()).await;
            if let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) {
                let contact = config::admin::ADMIN_CONTACT.as_str();
                let text = if contact.is_empty() {
                    "📮 The admin contact is not configured yet.".to_string()
                } else {
                    format!("📮 Write to the admin: {}", contact)
                };
                let _ = bot.send_message(chat_id, text).await;
            }
        }
        ["approve", target] => handle_decision(bot, &q, deps, target, Decision::Approve).await,
        ["reject", target] => handle_decision(bot, &q, deps, target, Decision::Reject).await,
        _ => {
            let _ = bot.answer_callback_query(q.id.clone()).await;
        }
    }
}

/// Apply an admin verdict and report the outcome through the decision UI.
async fn handle_decision(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps, target: &str, decision: Decision) {
    let actor_id = match i64::try_from(q.from.id.0) {
        Ok(id) => id,
        Err(_) => return,
    };
    let target_id = match target.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            log::warn!("Malformed decision payload: {:?}", q.data);
            let _ = bot.answer_callback_query(q.id.clone()).await;
            return;
        }
    };

    match deps.workflow.decide(actor_id, target_id, decision).await {
        DecisionOutcome::NotAdmin => {
            let _ = bot
                .answer_callback_query(q.id.clone())
                .text("You are not an admin.")
                .show_alert(true)
                .await;
        }
        DecisionOutcome::Stale => {
            let _ = bot.answer_callback_query(q.id.clone()).text("Already handled.").await;
        }
        DecisionOutcome::Approved => {
            clear_controls(bot, q).await;
            let _ = bot.answer_callback_query(q.id.clone()).text("✅ Approved").await;
        }
        DecisionOutcome::Rejected => {
            clear_controls(bot, q).await;
            let _ = bot.answer_callback_query(q.id.clone()).text("❌ Rejected").await;
        }
        DecisionOutcome::NotifyFailed => {
            let _ = bot
                .answer_callback_query(q.id.clone())
                .text("Failed to reach the user. Try again later.")
                .show_alert(true)
                .await;
        }
    }
}

/// Remove the approve/reject buttons from the decided message.
async fn clear_controls(bot: &Bot, q: &CallbackQuery) {
    if let Some(message) = q.message.as_ref() {
        let _ = bot.edit_message_reply_markup(message.chat().id, message.id()).await;
    }
}
