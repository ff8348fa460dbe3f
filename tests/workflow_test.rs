//! Integration tests for the registration workflow
//!
//! Runs the state machine against a fake gateway and roster; no Telegram
//! transport involved.
//!
//! Run with: cargo test --test workflow_test

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use turnirbot::core::AppResult;
use turnirbot::registration::{
    Admins, Applicant, CheckFile, Decision, DecisionOutcome, Gateway, MessageRef, RegistrationWorkflow, SessionStore,
    Stage,
};
use turnirbot::roster::{Roster, RosterEntry};

const ADMIN_ID: i64 = 777;
const USER_ID: i64 = 42;

/// Everything the workflow asked the gateway to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Sent {
    Welcome(i64),
    GatePrompt(i64),
    SubscriptionConfirmed(i64, bool),
    PaymentInstructions(i64),
    CheckPrompt(i64),
    Deleted(i64, MessageRef),
    UnderReview(i64),
    RelayedCheck(i64, CheckFile),
    Approved(i64),
    Rejected(i64),
    Registered(i64),
    SaveFailed(i64),
    BadProfile(i64),
    FlowAborted(i64),
    EntrantAnnounced(RosterEntry),
}

#[derive(Default)]
struct FakeGateway {
    subscribed: AtomicBool,
    fail_relay: AtomicBool,
    fail_approved_notice: AtomicBool,
    sent: Mutex<Vec<Sent>>,
}

impl FakeGateway {
    fn record(&self, event: Sent) {
        self.sent.lock().unwrap().push(event);
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn count(&self, event: &Sent) -> usize {
        self.sent().iter().filter(|s| *s == event).count()
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn is_subscribed(&self, _user_id: i64) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    async fn send_welcome(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::Welcome(user_id));
        Ok(())
    }

    async fn send_gate_prompt(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::GatePrompt(user_id));
        Ok(())
    }

    async fn confirm_subscription(&self, user_id: i64, subscribed: bool) -> AppResult<()> {
        self.record(Sent::SubscriptionConfirmed(user_id, subscribed));
        Ok(())
    }

    async fn send_payment_instructions(&self, user_id: i64) -> AppResult<MessageRef> {
        self.record(Sent::PaymentInstructions(user_id));
        Ok(MessageRef(1))
    }

    async fn send_check_prompt(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::CheckPrompt(user_id));
        Ok(())
    }

    async fn delete_message(&self, user_id: i64, message: MessageRef) -> AppResult<()> {
        self.record(Sent::Deleted(user_id, message));
        Ok(())
    }

    async fn notify_under_review(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::UnderReview(user_id));
        Ok(())
    }

    async fn relay_check(&self, applicant: &Applicant, file: &CheckFile) -> AppResult<()> {
        if self.fail_relay.load(Ordering::SeqCst) {
            return Err("simulated relay failure".into());
        }
        self.record(Sent::RelayedCheck(applicant.user_id, file.clone()));
        Ok(())
    }

    async fn notify_approved(&self, user_id: i64) -> AppResult<()> {
        if self.fail_approved_notice.load(Ordering::SeqCst) {
            return Err("simulated send failure".into());
        }
        self.record(Sent::Approved(user_id));
        Ok(())
    }

    async fn notify_rejected(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::Rejected(user_id));
        Ok(())
    }

    async fn notify_registered(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::Registered(user_id));
        Ok(())
    }

    async fn notify_save_failed(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::SaveFailed(user_id));
        Ok(())
    }

    async fn notify_bad_profile(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::BadProfile(user_id));
        Ok(())
    }

    async fn notify_flow_aborted(&self, user_id: i64) -> AppResult<()> {
        self.record(Sent::FlowAborted(user_id));
        Ok(())
    }

    async fn announce_entrant(&self, entry: &RosterEntry) -> AppResult<()> {
        self.record(Sent::EntrantAnnounced(entry.clone()));
        Ok(())
    }
}

#[derive(Default)]
struct FakeRoster {
    fail_append: AtomicBool,
    rows: Mutex<Vec<RosterEntry>>,
}

#[async_trait]
impl Roster for FakeRoster {
    async fn append(&self, entry: &RosterEntry) -> AppResult<()> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err("simulated append failure".into());
        }
        self.rows.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn read_all(&self) -> AppResult<Vec<RosterEntry>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

struct Harness {
    sessions: Arc<SessionStore>,
    gateway: Arc<FakeGateway>,
    roster: Arc<FakeRoster>,
    workflow: RegistrationWorkflow<FakeGateway, FakeRoster>,
}

fn harness(subscribed: bool) -> Harness {
    let sessions = Arc::new(SessionStore::new());
    let gateway = Arc::new(FakeGateway::default());
    gateway.subscribed.store(subscribed, Ordering::SeqCst);
    let roster = Arc::new(FakeRoster::default());
    let workflow = RegistrationWorkflow::new(
        Arc::clone(&sessions),
        Arc::clone(&gateway),
        Arc::clone(&roster),
        Admins::new(vec![ADMIN_ID]),
        Duration::from_millis(20),
    );
    Harness {
        sessions,
        gateway,
        roster,
        workflow,
    }
}

fn applicant() -> Applicant {
    Applicant {
        user_id: USER_ID,
        full_name: "Pro Gamer".to_string(),
        username: Some("progamer".to_string()),
    }
}

/// Drive a harness user up to the given stage through real transitions.
async fn advance_to(h: &Harness, stage: Stage) {
    h.gateway.subscribed.store(true, Ordering::SeqCst);
    let _ = h.workflow.begin_registration(USER_ID).await;
    if stage == Stage::AwaitingCheck {
        return;
    }
    h.workflow
        .submit_check(&applicant(), &CheckFile::Photo("file-1".to_string()))
        .await;
    if stage == Stage::AwaitingApproval {
        return;
    }
    let outcome = h.workflow.decide(ADMIN_ID, USER_ID, Decision::Approve).await;
    assert_eq!(outcome, DecisionOutcome::Approved);
}

// ============================================================================
// Subscription gate
// ============================================================================

#[tokio::test]
async fn unsubscribed_registration_never_reaches_awaiting_check() {
    let h = harness(false);

    let handle = h.workflow.begin_registration(USER_ID).await;

    assert!(handle.is_none());
    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
    assert_eq!(h.gateway.sent(), vec![Sent::GatePrompt(USER_ID)]);
}

#[tokio::test]
async fn start_shows_gate_or_menu_without_transition() {
    let h = harness(false);

    h.workflow.start(USER_ID).await;
    assert_eq!(h.gateway.sent(), vec![Sent::GatePrompt(USER_ID)]);
    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);

    h.gateway.subscribed.store(true, Ordering::SeqCst);
    h.workflow.start(USER_ID).await;
    assert_eq!(h.gateway.sent().last(), Some(&Sent::Welcome(USER_ID)));
    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
}

#[tokio::test]
async fn recheck_reports_current_membership() {
    let h = harness(true);

    h.workflow.recheck_subscription(USER_ID).await;

    assert_eq!(h.gateway.sent(), vec![Sent::SubscriptionConfirmed(USER_ID, true)]);
}

// ============================================================================
// Check submission
// ============================================================================

#[tokio::test]
async fn attachment_outside_awaiting_check_is_a_no_op() {
    let h = harness(true);

    h.workflow
        .submit_check(&applicant(), &CheckFile::Photo("file-1".to_string()))
        .await;

    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
    assert!(h.gateway.sent().is_empty());
}

#[tokio::test]
async fn check_submission_relays_to_admin_and_advances() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingCheck).await;

    h.workflow
        .submit_check(&applicant(), &CheckFile::Document("file-9".to_string()))
        .await;

    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingApproval);
    let sent = h.gateway.sent();
    assert!(sent.contains(&Sent::UnderReview(USER_ID)));
    assert!(sent.contains(&Sent::RelayedCheck(USER_ID, CheckFile::Document("file-9".to_string()))));
}

#[tokio::test]
async fn relay_failure_apologizes_and_clears_session() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingCheck).await;
    h.gateway.fail_relay.store(true, Ordering::SeqCst);

    h.workflow
        .submit_check(&applicant(), &CheckFile::Photo("file-1".to_string()))
        .await;

    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
    assert_eq!(h.gateway.count(&Sent::FlowAborted(USER_ID)), 1);
}

// ============================================================================
// Admin decisions
// ============================================================================

#[tokio::test]
async fn non_admin_decision_is_rejected_without_state_change() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingApproval).await;

    let outcome = h.workflow.decide(999, USER_ID, Decision::Approve).await;

    assert_eq!(outcome, DecisionOutcome::NotAdmin);
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingApproval);
    assert_eq!(h.gateway.count(&Sent::Approved(USER_ID)), 0);
}

#[tokio::test]
async fn approve_moves_user_to_profile_capture() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingApproval).await;

    let outcome = h.workflow.decide(ADMIN_ID, USER_ID, Decision::Approve).await;

    assert_eq!(outcome, DecisionOutcome::Approved);
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingProfile);
    assert_eq!(h.gateway.count(&Sent::Approved(USER_ID)), 1);
}

#[tokio::test]
async fn second_click_on_same_control_is_stale() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingApproval).await;

    assert_eq!(
        h.workflow.decide(ADMIN_ID, USER_ID, Decision::Approve).await,
        DecisionOutcome::Approved
    );
    assert_eq!(
        h.workflow.decide(ADMIN_ID, USER_ID, Decision::Approve).await,
        DecisionOutcome::Stale
    );
    assert_eq!(
        h.workflow.decide(ADMIN_ID, USER_ID, Decision::Reject).await,
        DecisionOutcome::Stale
    );

    // The user heard about the approval exactly once and kept their stage
    assert_eq!(h.gateway.count(&Sent::Approved(USER_ID)), 1);
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingProfile);
}

#[tokio::test]
async fn reject_notifies_and_clears_session() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingApproval).await;

    let outcome = h.workflow.decide(ADMIN_ID, USER_ID, Decision::Reject).await;

    assert_eq!(outcome, DecisionOutcome::Rejected);
    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
    assert_eq!(h.gateway.count(&Sent::Rejected(USER_ID)), 1);
}

#[tokio::test]
async fn failed_approval_notice_leaves_target_state_untouched() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingApproval).await;
    h.gateway.fail_approved_notice.store(true, Ordering::SeqCst);

    let outcome = h.workflow.decide(ADMIN_ID, USER_ID, Decision::Approve).await;

    assert_eq!(outcome, DecisionOutcome::NotifyFailed);
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingApproval);

    // The admin can retry once the transport recovers
    h.gateway.fail_approved_notice.store(false, Ordering::SeqCst);
    assert_eq!(
        h.workflow.decide(ADMIN_ID, USER_ID, Decision::Approve).await,
        DecisionOutcome::Approved
    );
}

// ============================================================================
// Profile capture
// ============================================================================

#[tokio::test]
async fn profile_text_outside_awaiting_profile_is_a_no_op() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingCheck).await;
    let before = h.gateway.sent().len();

    h.workflow.submit_profile(USER_ID, "Alice 12345").await;

    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingCheck);
    assert_eq!(h.gateway.sent().len(), before);
    assert!(h.roster.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_is_split_into_nickname_and_id() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingProfile).await;

    h.workflow.submit_profile(USER_ID, "Bob Smith 999").await;

    assert_eq!(
        h.roster.read_all().await.unwrap(),
        vec![RosterEntry::new("Bob Smith", "999")]
    );
    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
    assert_eq!(h.gateway.count(&Sent::Registered(USER_ID)), 1);
    assert_eq!(
        h.gateway.count(&Sent::EntrantAnnounced(RosterEntry::new("Bob Smith", "999"))),
        1
    );
}

#[tokio::test]
async fn single_token_profile_gets_unspecified_id() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingProfile).await;

    h.workflow.submit_profile(USER_ID, "Alice").await;

    assert_eq!(
        h.roster.read_all().await.unwrap(),
        vec![RosterEntry::new("Alice", "unspecified")]
    );
}

#[tokio::test]
async fn empty_profile_reprompts_and_keeps_stage() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingProfile).await;

    h.workflow.submit_profile(USER_ID, "   ").await;

    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingProfile);
    assert_eq!(h.gateway.count(&Sent::BadProfile(USER_ID)), 1);
    assert!(h.roster.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn append_failure_clears_session_with_single_notice() {
    let h = harness(true);
    advance_to(&h, Stage::AwaitingProfile).await;
    h.roster.fail_append.store(true, Ordering::SeqCst);

    h.workflow.submit_profile(USER_ID, "Alice 12345").await;

    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
    assert_eq!(h.gateway.count(&Sent::SaveFailed(USER_ID)), 1);
    assert_eq!(h.gateway.count(&Sent::Registered(USER_ID)), 0);
    assert_eq!(
        h.gateway
            .sent()
            .iter()
            .filter(|s| matches!(s, Sent::EntrantAnnounced(_)))
            .count(),
        0
    );
    assert!(h.roster.read_all().await.unwrap().is_empty());
}

// ============================================================================
// Delayed instructions cleanup
// ============================================================================

#[tokio::test]
async fn instructions_are_deleted_then_check_prompt_follows() {
    let h = harness(true);

    let handle = h.workflow.begin_registration(USER_ID).await;
    assert!(handle.is_some());
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingCheck);

    // Nothing happens before the TTL elapses
    assert_eq!(h.gateway.sent(), vec![Sent::PaymentInstructions(USER_ID)]);

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(
        h.gateway.sent(),
        vec![
            Sent::PaymentInstructions(USER_ID),
            Sent::Deleted(USER_ID, MessageRef(1)),
            Sent::CheckPrompt(USER_ID),
        ]
    );
}

#[tokio::test]
async fn cancelled_followup_never_fires() {
    let h = harness(true);

    let handle = h.workflow.begin_registration(USER_ID).await.unwrap();
    handle.cancel();

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(h.gateway.sent(), vec![Sent::PaymentInstructions(USER_ID)]);
    // The wizard still advanced; cancellation only affects the cleanup
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingCheck);
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[tokio::test]
async fn full_registration_scenario() {
    let h = harness(false);

    // Ineligible first contact gets the gate prompt
    h.workflow.start(USER_ID).await;
    assert_eq!(h.gateway.sent(), vec![Sent::GatePrompt(USER_ID)]);

    // User subscribes and registers
    h.gateway.subscribed.store(true, Ordering::SeqCst);
    let _ = h.workflow.begin_registration(USER_ID).await;
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingCheck);

    tokio::time::sleep(Duration::from_millis(80)).await;
    let sent = h.gateway.sent();
    let deleted_at = sent
        .iter()
        .position(|s| matches!(s, Sent::Deleted(_, _)))
        .expect("instructions deleted");
    let prompt_at = sent
        .iter()
        .position(|s| matches!(s, Sent::CheckPrompt(_)))
        .expect("check prompt sent");
    assert!(deleted_at < prompt_at);

    // Check goes to the admin
    h.workflow
        .submit_check(&applicant(), &CheckFile::Photo("check-photo".to_string()))
        .await;
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingApproval);
    assert_eq!(
        h.gateway.count(&Sent::RelayedCheck(USER_ID, CheckFile::Photo("check-photo".to_string()))),
        1
    );

    // Admin approves
    assert_eq!(
        h.workflow.decide(ADMIN_ID, USER_ID, Decision::Approve).await,
        DecisionOutcome::Approved
    );
    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingProfile);

    // Profile lands in the roster and the session closes
    h.workflow.submit_profile(USER_ID, "ProGamer 77").await;
    assert_eq!(
        h.roster.read_all().await.unwrap(),
        vec![RosterEntry::new("ProGamer", "77")]
    );
    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
}

// ============================================================================
// Cross-user independence
// ============================================================================

#[tokio::test]
async fn concurrent_users_do_not_interfere() {
    let h = harness(true);
    let other = 43;

    let _ = h.workflow.begin_registration(USER_ID).await;
    let _ = h.workflow.begin_registration(other).await;

    h.workflow
        .submit_check(&applicant(), &CheckFile::Photo("a".to_string()))
        .await;

    assert_eq!(h.sessions.get(USER_ID), Stage::AwaitingApproval);
    assert_eq!(h.sessions.get(other), Stage::AwaitingCheck);

    // Rejecting one user leaves the other where they were
    assert_eq!(
        h.workflow.decide(ADMIN_ID, USER_ID, Decision::Reject).await,
        DecisionOutcome::Rejected
    );
    assert_eq!(h.sessions.get(USER_ID), Stage::Idle);
    assert_eq!(h.sessions.get(other), Stage::AwaitingCheck);
}
