//! Dispatcher schema and event handlers

pub mod callbacks;
pub mod commands;
pub mod schema;
pub mod types;

// Re-exports for convenience
pub use schema::schema;
pub use types::{BotWorkflow, HandlerDeps, HandlerError};
