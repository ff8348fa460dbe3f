//! The registration state machine
//!
//! Drives a user from first contact through the subscription gate, payment
//! check submission, admin verdict, and profile capture. All transitions
//! live here; the Telegram layer only routes events in and renders what
//! the [`Gateway`] is asked to send.

use std::sync::Arc;
use std::time::Duration;

use super::gateway::{Applicant, CheckFile, Decision, Gateway};
use super::profile::parse_profile;
use super::session::{SessionStore, Stage};
use super::timer::{schedule_followup, FollowupHandle};
use crate::roster::Roster;

/// Authorization predicate for approve/reject decisions.
///
/// Injected into the workflow instead of read from ambient config so tests
/// can substitute an arbitrary admin set.
#[derive(Debug, Clone, Default)]
pub struct Admins {
    ids: Vec<i64>,
}

impl Admins {
    pub fn new(ids: Vec<i64>) -> Self {
        Self { ids }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }
}

/// What happened to an approve/reject button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Actor is not a configured admin; nothing changed.
    NotAdmin,
    /// Target is no longer awaiting approval - e.g. a second click on the
    /// same control. Nothing changed.
    Stale,
    Approved,
    Rejected,
    /// The user could not be notified. The verdict did not take effect and
    /// the target's state is untouched; the admin sees the failure through
    /// the decision UI.
    NotifyFailed,
}

/// The registration wizard over an injected session store, gateway, roster,
/// and admin set.
pub struct RegistrationWorkflow<G, R> {
    sessions: Arc<SessionStore>,
    gateway: Arc<G>,
    roster: Arc<R>,
    admins: Admins,
    instructions_ttl: Duration,
}

impl<G: Gateway, R: Roster> RegistrationWorkflow<G, R> {
    pub fn new(
        sessions: Arc<SessionStore>,
        gateway: Arc<G>,
        roster: Arc<R>,
        admins: Admins,
        instructions_ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            gateway,
            roster,
            admins,
            instructions_ttl,
        }
    }

    /// Current wizard stage for a user.
    pub fn stage_of(&self, user_id: i64) -> Stage {
        self.sessions.get(user_id)
    }

    /// First contact (`/start`). Shows the full menu to subscribed users
    /// and the gate prompt to everyone else. No transition.
    pub async fn start(&self, user_id: i64) {
        let result = if self.gateway.is_subscribed(user_id).await {
            self.gateway.send_welcome(user_id).await
        } else {
            self.gateway.send_gate_prompt(user_id).await
        };
        if let Err(e) = result {
            log::error!("Failed to greet user {}: {}", user_id, e);
        }
    }

    /// The subscription re-check button. No transition.
    pub async fn recheck_subscription(&self, user_id: i64) {
        let subscribed = self.gateway.is_subscribed(user_id).await;
        if let Err(e) = self.gateway.confirm_subscription(user_id, subscribed).await {
            log::error!("Failed to confirm subscription for user {}: {}", user_id, e);
        }
    }

    /// The register button: Idle -> AwaitingCheck, gated on subscription.
    ///
    /// Sends the payment instructions and schedules their removal plus the
    /// check prompt after the configured TTL. The wizard advances
    /// immediately; the follow-up runs on its own timer. The returned
    /// handle can cancel the follow-up; the production caller drops it.
    pub async fn begin_registration(&self, user_id: i64) -> Option<FollowupHandle> {
        if !self.gateway.is_subscribed(user_id).await {
            if let Err(e) = self.gateway.send_gate_prompt(user_id).await {
                log::error!("Failed to send gate prompt to user {}: {}", user_id, e);
            }
            return None;
        }

        let message = match self.gateway.send_payment_instructions(user_id).await {
            Ok(m) => m,
            Err(e) => {
                log::error!("Failed to send payment instructions to user {}: {}", user_id, e);
                let _ = self.gateway.notify_flow_aborted(user_id).await;
                self.sessions.clear(user_id);
                return None;
            }
        };

        self.sessions.set(user_id, Stage::AwaitingCheck);
        Some(schedule_followup(
            Arc::clone(&self.gateway),
            user_id,
            message,
            self.instructions_ttl,
        ))
    }

    /// A photo/document attachment: AwaitingCheck -> AwaitingApproval.
    /// Attachments in any other stage are ignored.
    pub async fn submit_check(&self, applicant: &Applicant, file: &CheckFile) {
        let user_id = applicant.user_id;
        if self.sessions.get(user_id) != Stage::AwaitingCheck {
            return;
        }

        if let Err(e) = self.gateway.notify_under_review(user_id).await {
            log::error!("Failed to send review notice to user {}: {}", user_id, e);
        }

        if let Err(e) = self.gateway.relay_check(applicant, file).await {
            log::error!("Failed to relay check from user {} to admin: {}", user_id, e);
            let _ = self.gateway.notify_flow_aborted(user_id).await;
            self.sessions.clear(user_id);
            return;
        }

        self.sessions.set(user_id, Stage::AwaitingApproval);
    }

    /// An admin verdict on a submitted check.
    ///
    /// Only configured admins may decide; a decision whose target is no
    /// longer AwaitingApproval is reported as stale, which makes repeated
    /// clicks on the same control no-ops. A failed user notification
    /// leaves the target's state untouched so the admin can retry.
    pub async fn decide(&self, actor_id: i64, target_id: i64, decision: Decision) -> DecisionOutcome {
        if !self.admins.is_admin(actor_id) {
            log::warn!(
                "Decision from non-admin {} for user {} rejected",
                actor_id,
                target_id
            );
            return DecisionOutcome::NotAdmin;
        }

        if self.sessions.get(target_id) != Stage::AwaitingApproval {
            return DecisionOutcome::Stale;
        }

        match decision {
            Decision::Approve => match self.gateway.notify_approved(target_id).await {
                Ok(()) => {
                    self.sessions.set(target_id, Stage::AwaitingProfile);
                    log::info!("Check of user {} approved by admin {}", target_id, actor_id);
                    DecisionOutcome::Approved
                }
                Err(e) => {
                    log::error!("Failed to notify user {} about approval: {}", target_id, e);
                    DecisionOutcome::NotifyFailed
                }
            },
            Decision::Reject => match self.gateway.notify_rejected(target_id).await {
                Ok(()) => {
                    self.sessions.clear(target_id);
                    log::info!("Check of user {} rejected by admin {}", target_id, actor_id);
                    DecisionOutcome::Rejected
                }
                Err(e) => {
                    log::error!("Failed to notify user {} about rejection: {}", target_id, e);
                    DecisionOutcome::NotifyFailed
                }
            },
        }
    }

    /// A free-text message: AwaitingProfile -> Idle on a parseable profile.
    /// Text in any other stage is ignored; empty text re-prompts and keeps
    /// the stage.
    pub async fn submit_profile(&self, user_id: i64, text: &str) {
        if self.sessions.get(user_id) != Stage::AwaitingProfile {
            return;
        }

        let entry = match parse_profile(text) {
            Some(entry) => entry,
            None => {
                if let Err(e) = self.gateway.notify_bad_profile(user_id).await {
                    log::error!("Failed to send format notice to user {}: {}", user_id, e);
                }
                return;
            }
        };

        match self.roster.append(&entry).await {
            Ok(()) => {
                if let Err(e) = self.gateway.notify_registered(user_id).await {
                    log::error!("Failed to send success notice to user {}: {}", user_id, e);
                }
                if let Err(e) = self.gateway.announce_entrant(&entry).await {
                    log::error!("Failed to announce entrant to admin: {}", e);
                }
            }
            Err(e) => {
                log::error!("Roster append failed for user {}: {}", user_id, e);
                if let Err(e) = self.gateway.notify_save_failed(user_id).await {
                    log::error!("Failed to send failure notice to user {}: {}", user_id, e);
                }
            }
        }

        self.sessions.clear(user_id);
    }
}
