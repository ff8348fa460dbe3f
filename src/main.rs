use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use tokio::time::sleep;

use turnirbot::core::{config, init_logger};
use turnirbot::registration::{Admins, RegistrationWorkflow, SessionStore};
use turnirbot::roster::{create_pool, SqliteRoster};
use turnirbot::telegram::{
    create_bot, notify_admin_startup, schema, setup_bot_commands, HandlerDeps, TelegramGateway,
};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (logging, roster storage, bot
/// creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present, before any config
    // static is touched
    let _ = dotenv();

    // Set up a global panic handler so a panic in the dispatcher is logged
    // and the process keeps its retry loop instead of dying silently
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    run_bot().await
}

/// Run the Telegram bot
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    if config::channel::REQUIRED_CHANNEL.is_empty() {
        log::warn!("REQUIRED_CHANNEL not set; every subscription check will fail closed");
    }

    let admin_ids = config::admin::decision_makers();
    if admin_ids.is_empty() {
        log::warn!("No admin ids configured (ADMIN_IDS / ADMIN_USER_ID); checks cannot be approved");
    }

    // Create bot instance
    let bot = create_bot()?;

    let bot_info = bot.get_me().await?;
    let bot_username = bot_info.username.as_deref();
    log::info!("Bot username: {:?}, Bot ID: {}", bot_username, bot_info.id);

    // Set up bot commands in the Telegram UI
    setup_bot_commands(&bot).await?;

    // Roster storage
    let roster_pool =
        create_pool(&config::roster::ROSTER_DB_PATH).map_err(|e| anyhow::anyhow!("Failed to create roster pool: {}", e))?;
    let roster = Arc::new(SqliteRoster::new(roster_pool));

    // Wire the workflow: injected session store, gateway, roster, and
    // admin predicate
    let sessions = Arc::new(SessionStore::new());
    let gateway = Arc::new(TelegramGateway::new(
        bot.clone(),
        config::channel::REQUIRED_CHANNEL.clone(),
        ChatId(*config::admin::ADMIN_USER_ID),
        config::admin::ADMIN_CONTACT.clone(),
        config::payment::CARD_NUMBER.clone(),
        config::payment::ENTRY_FEE.clone(),
    ));
    let workflow = Arc::new(RegistrationWorkflow::new(
        sessions,
        gateway,
        Arc::clone(&roster),
        Admins::new(admin_ids),
        config::payment::instructions_ttl(),
    ));

    // Notify admin about bot startup/restart
    notify_admin_startup(&bot, bot_username).await;

    let handler = schema(HandlerDeps::new(workflow, roster));

    log::info!("Starting bot in long polling mode");

    // Run the dispatcher with retry logic; a panicked dispatcher task is
    // isolated and reconnected with exponential backoff
    let mut retry_count = 0;
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        let handle = tokio::spawn(async move {
            use teloxide::update_listeners::Polling;

            // Drop updates that queued up while the bot was down
            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(DependencyMap::new())
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) => {
                if join_err.is_panic() {
                    log::error!("Dispatcher panicked: {}", join_err);

                    if retry_count < max_retries {
                        retry_count += 1;
                        log::info!(
                            "Retrying dispatcher connection after panic (attempt {}/{})...",
                            retry_count,
                            max_retries
                        );
                        exponential_backoff(retry_count).await;
                    } else {
                        log::error!("Max retries reached after panic. Exiting...");
                        break;
                    }
                } else {
                    log::warn!("Dispatcher task was cancelled: {}", join_err);
                    break;
                }
            }
        }

        if retry_count > 0 {
            sleep(config::retry::dispatcher_delay()).await;
        }
    }

    Ok(())
}

/// Exponential backoff delay for retries
async fn exponential_backoff(retry_count: u32) {
    let delay = Duration::from_secs(config::retry::EXPONENTIAL_BACKOFF_BASE.pow(retry_count));
    sleep(delay).await;
}
