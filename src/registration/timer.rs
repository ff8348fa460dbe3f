//! Delayed follow-up for the payment-instructions message

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::gateway::{Gateway, MessageRef};

/// Cancel handle for a scheduled follow-up.
///
/// Dropping the handle does NOT cancel the task; call
/// [`FollowupHandle::cancel`] for that. The production flow never cancels
/// (early user progress simply races the timer and wins harmlessly), but
/// the handle is exposed for callers that want stricter behavior.
#[derive(Debug)]
pub struct FollowupHandle {
    token: CancellationToken,
}

impl FollowupHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Schedule removal of the instructions message after `delay`, followed by
/// the check prompt.
///
/// Runs on its own task so event processing is never held up. Deletion
/// failures are silently ignored (the message may already be gone); a
/// failed check prompt is only logged since the user can still submit a
/// check - the wizard already advanced.
pub fn schedule_followup<G: Gateway>(
    gateway: Arc<G>,
    user_id: i64,
    message: MessageRef,
    delay: Duration,
) -> FollowupHandle {
    let token = CancellationToken::new();
    let task_token = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = task_token.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        if let Err(e) = gateway.delete_message(user_id, message).await {
            log::debug!("Instructions cleanup for user {} failed: {}", user_id, e);
        }
        if let Err(e) = gateway.send_check_prompt(user_id).await {
            log::error!("Failed to send check prompt to user {}: {}", user_id, e);
        }
    });

    FollowupHandle { token }
}
