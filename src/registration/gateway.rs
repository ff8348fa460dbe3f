//! The messaging seam between the workflow and the chat platform

use async_trait::async_trait;

use crate::core::error::AppResult;
use crate::roster::RosterEntry;

/// Reference to a message previously sent through the gateway, used for
/// later deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef(pub i32);

/// Who submitted a payment check, as shown to the admin.
#[derive(Debug, Clone)]
pub struct Applicant {
    pub user_id: i64,
    pub full_name: String,
    pub username: Option<String>,
}

/// The submitted payment check attachment, by platform file id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFile {
    Photo(String),
    Document(String),
}

/// An admin verdict on a submitted check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Outbound side of the chat platform, plus the membership lookup.
///
/// The workflow never touches the transport or message copy directly;
/// everything user-visible goes through here so tests can substitute a
/// fake. The only production implementation is
/// [`crate::telegram::TelegramGateway`].
#[async_trait]
pub trait Gateway: Send + Sync + 'static {
    /// Channel membership gate. Statuses member/administrator/owner count
    /// as subscribed; anything else, including a failed lookup, does not.
    async fn is_subscribed(&self, user_id: i64) -> bool;

    /// Welcome message with the full menu, for subscribed users.
    async fn send_welcome(&self, user_id: i64) -> AppResult<()>;

    /// Prompt asking the user to subscribe to the required channel.
    async fn send_gate_prompt(&self, user_id: i64) -> AppResult<()>;

    /// Feedback for the subscription re-check button.
    async fn confirm_subscription(&self, user_id: i64, subscribed: bool) -> AppResult<()>;

    /// Payment instructions (card number). Returns a reference so the
    /// message can be removed after its TTL.
    async fn send_payment_instructions(&self, user_id: i64) -> AppResult<MessageRef>;

    /// Prompt asking for the check attachment, sent once the instructions
    /// are gone.
    async fn send_check_prompt(&self, user_id: i64) -> AppResult<()>;

    /// Delete a previously sent message. Best effort; callers ignore
    /// failures.
    async fn delete_message(&self, user_id: i64, message: MessageRef) -> AppResult<()>;

    /// Tell the user their check is with the admin.
    async fn notify_under_review(&self, user_id: i64) -> AppResult<()>;

    /// Forward the check to the admin together with approve/reject controls
    /// carrying the applicant's user id.
    async fn relay_check(&self, applicant: &Applicant, file: &CheckFile) -> AppResult<()>;

    /// Tell the user their check was approved and ask for the profile info.
    async fn notify_approved(&self, user_id: i64) -> AppResult<()>;

    /// Tell the user their check was rejected.
    async fn notify_rejected(&self, user_id: i64) -> AppResult<()>;

    /// Tell the user their roster entry was saved.
    async fn notify_registered(&self, user_id: i64) -> AppResult<()>;

    /// Tell the user the roster append failed.
    async fn notify_save_failed(&self, user_id: i64) -> AppResult<()>;

    /// Ask the user to resend the profile info in a usable format.
    async fn notify_bad_profile(&self, user_id: i64) -> AppResult<()>;

    /// Generic mid-flow apology when a send or relay blew up.
    async fn notify_flow_aborted(&self, user_id: i64) -> AppResult<()>;

    /// Tell the admin a new entrant landed in the roster.
    async fn announce_entrant(&self, entry: &RosterEntry) -> AppResult<()>;
}
