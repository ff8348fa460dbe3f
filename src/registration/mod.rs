//! Registration wizard: session state, profile parsing, and the workflow
//! driving users from the subscription gate to the roster

pub mod gateway;
pub mod profile;
pub mod session;
pub mod timer;
pub mod workflow;

// Re-exports for convenience
pub use gateway::{Applicant, CheckFile, Decision, Gateway, MessageRef};
pub use session::{SessionStore, Stage};
pub use timer::FollowupHandle;
pub use workflow::{Admins, DecisionOutcome, RegistrationWorkflow};
