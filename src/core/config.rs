use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Admin configuration
pub mod admin {
    use super::{env, Lazy};

    /// Admin user ids allowed to approve or reject payment checks
    /// Read from ADMIN_IDS environment variable (comma-separated)
    pub static ADMIN_IDS: Lazy<Vec<i64>> = Lazy::new(|| {
        env::var("ADMIN_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<i64>().ok())
            .collect()
    });

    /// Primary admin chat id used for notifications and relayed checks
    /// Read from ADMIN_USER_ID, falls back to the first ADMIN_IDS entry
    pub static ADMIN_USER_ID: Lazy<i64> = Lazy::new(|| {
        env::var("ADMIN_USER_ID")
            .ok()
            .and_then(|s| s.parse().ok())
            .or_else(|| ADMIN_IDS.first().copied())
            .unwrap_or(0)
    });

    /// Contact handle shown by the contact-admin button
    /// Read from ADMIN_CONTACT environment variable (e.g. "@organizer")
    pub static ADMIN_CONTACT: Lazy<String> =
        Lazy::new(|| env::var("ADMIN_CONTACT").unwrap_or_else(|_| String::new()));

    /// All ids that may decide on submitted checks, primary admin included.
    pub fn decision_makers() -> Vec<i64> {
        let mut ids = ADMIN_IDS.clone();
        let primary = *ADMIN_USER_ID;
        if primary != 0 && !ids.contains(&primary) {
            ids.push(primary);
        }
        ids
    }
}

/// Required-channel configuration
pub mod channel {
    use super::{env, Lazy};

    /// Channel whose membership gates registration
    /// Read from REQUIRED_CHANNEL environment variable ("@name" or numeric id)
    pub static REQUIRED_CHANNEL: Lazy<String> =
        Lazy::new(|| env::var("REQUIRED_CHANNEL").unwrap_or_else(|_| String::new()));

    /// Invite link shown in the gate prompt
    /// Read from CHANNEL_INVITE_URL, derived from REQUIRED_CHANNEL when unset
    pub static INVITE_URL: Lazy<String> = Lazy::new(|| {
        env::var("CHANNEL_INVITE_URL").unwrap_or_else(|_| {
            REQUIRED_CHANNEL
                .strip_prefix('@')
                .map(|name| format!("https://t.me/{name}"))
                .unwrap_or_default()
        })
    });
}

/// Payment instructions configuration
pub mod payment {
    use super::{env, Duration, Lazy};

    /// Card number shown in the payment instructions
    /// Read from PAYMENT_CARD environment variable
    pub static CARD_NUMBER: Lazy<String> =
        Lazy::new(|| env::var("PAYMENT_CARD").unwrap_or_else(|_| String::new()));

    /// Entry fee text shown in the welcome message
    /// Read from ENTRY_FEE environment variable
    pub static ENTRY_FEE: Lazy<String> =
        Lazy::new(|| env::var("ENTRY_FEE").unwrap_or_else(|_| "10 000".to_string()));

    /// Seconds the card number stays visible before the message is removed
    pub const INSTRUCTIONS_TTL_SECS: u64 = 5;

    /// Instructions lifetime duration
    pub fn instructions_ttl() -> Duration {
        Duration::from_secs(INSTRUCTIONS_TTL_SECS)
    }
}

/// Roster storage configuration
pub mod roster {
    use super::{env, Lazy};

    /// Roster database file path
    /// Read from ROSTER_DB_PATH environment variable
    /// Default: roster.sqlite
    pub static ROSTER_DB_PATH: Lazy<String> =
        Lazy::new(|| env::var("ROSTER_DB_PATH").unwrap_or_else(|_| "roster.sqlite".to_string()));
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Telegram API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds)
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Dispatcher retry delay duration
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }

    /// Base for exponential backoff calculation
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;
}
