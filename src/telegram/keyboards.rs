//! Inline keyboards and callback payloads
//!
//! Decision controls encode `approve:<user_id>` / `reject:<user_id>`; the
//! callback router correlates the verdict back to the applicant through
//! that payload alone.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::config;

/// Shorthand for a callback button.
pub fn cb(text: impl Into<String>, data: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), data.into())
}

/// Main menu shown to subscribed users.
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb("✅ Register", "register"), cb("📊 Results", "results")],
        vec![cb("📮 Contact admin", "contact_admin")],
    ])
}

/// Gate prompt: channel link plus a re-check button.
pub fn gate_menu() -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    if let Ok(invite) = url::Url::parse(&config::channel::INVITE_URL) {
        rows.push(vec![InlineKeyboardButton::url("▶️ Open channel", invite)]);
    }
    rows.push(vec![cb("✅ Check subscription", "check_subscription")]);
    InlineKeyboardMarkup::new(rows)
}

/// Approve/reject controls attached to a relayed check.
pub fn decision_controls(user_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        cb("✅ Approve", format!("approve:{user_id}")),
        cb("❌ Reject", format!("reject:{user_id}")),
    ]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_controls_carry_user_id() {
        let keyboard = decision_controls(42);
        let row = &keyboard.inline_keyboard[0];
        assert_eq!(row.len(), 2);

        let payloads: Vec<String> = row
            .iter()
            .filter_map(|b| match &b.kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(payloads, vec!["approve:42".to_string(), "reject:42".to_string()]);
    }
}
