//! Turnirbot - Telegram bot for paid tournament signup
//!
//! This library provides the registration workflow for the bot: a channel
//! subscription gate, payment-check collection with manual admin review,
//! and a durable participant roster.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, and logging setup
//! - `registration`: session state, profile parsing, and the wizard workflow
//! - `roster`: the append-only participant table
//! - `telegram`: Telegram transport, keyboards, and handlers

pub mod core;
pub mod registration;
pub mod roster;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::registration::{Admins, DecisionOutcome, RegistrationWorkflow, SessionStore, Stage};
pub use crate::roster::{Roster, RosterEntry, SqliteRoster};
pub use crate::telegram::{create_bot, schema, HandlerDeps, TelegramGateway};
