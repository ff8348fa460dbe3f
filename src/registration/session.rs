//! Per-user wizard state

use dashmap::DashMap;

/// Where a user currently is in the registration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Not in the wizard. Users without a session entry are `Idle`.
    Idle,
    /// Payment instructions were sent; waiting for the check attachment.
    AwaitingCheck,
    /// Check relayed to the admin; waiting for the verdict.
    AwaitingApproval,
    /// Approved; waiting for the nickname/id message.
    AwaitingProfile,
}

/// Session store keyed by Telegram user id.
///
/// Exactly one stage per user. Entries live for the process lifetime;
/// cardinality equals active participants, so there is no eviction.
/// Different users never contend; a single user's events are dispatched
/// in order by the update stream.
#[derive(Debug, Default)]
pub struct SessionStore {
    stages: DashMap<i64, Stage>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage for a user; absent entry reads as `Idle`.
    pub fn get(&self, user_id: i64) -> Stage {
        self.stages.get(&user_id).map(|s| *s).unwrap_or(Stage::Idle)
    }

    /// Move a user to `stage`. Setting `Idle` removes the entry.
    pub fn set(&self, user_id: i64, stage: Stage) {
        if stage == Stage::Idle {
            self.stages.remove(&user_id);
        } else {
            self.stages.insert(user_id, stage);
        }
    }

    /// Drop the user's session, returning them to `Idle`.
    pub fn clear(&self, user_id: i64) {
        self.stages.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_entry_is_idle() {
        let store = SessionStore::new();
        assert_eq!(store.get(42), Stage::Idle);
    }

    #[test]
    fn test_set_get_clear() {
        let store = SessionStore::new();
        store.set(42, Stage::AwaitingCheck);
        assert_eq!(store.get(42), Stage::AwaitingCheck);

        store.set(42, Stage::AwaitingApproval);
        assert_eq!(store.get(42), Stage::AwaitingApproval);

        store.clear(42);
        assert_eq!(store.get(42), Stage::Idle);
    }

    #[test]
    fn test_setting_idle_removes_entry() {
        let store = SessionStore::new();
        store.set(7, Stage::AwaitingProfile);
        store.set(7, Stage::Idle);
        assert_eq!(store.get(7), Stage::Idle);
        assert!(store.stages.is_empty());
    }

    #[test]
    fn test_users_are_independent() {
        let store = SessionStore::new();
        store.set(1, Stage::AwaitingCheck);
        store.set(2, Stage::AwaitingProfile);

        store.clear(1);
        assert_eq!(store.get(1), Stage::Idle);
        assert_eq!(store.get(2), Stage::AwaitingProfile);
    }
}
