//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::callbacks::handle_callback;
use super::commands::handle_results_command;
use super::types::{applicant_of, check_file_of, sender_id, HandlerDeps, HandlerError};
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the bot.
///
/// Returns a handler tree usable with teloxide's Dispatcher; the same
/// schema serves production and integration tests. Events no branch wants
/// fall through and are dropped, which is what makes unlisted events
/// no-ops.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_attachments = deps.clone();
    let deps_text = deps.clone();
    let deps_callbacks = deps;

    dptree::entry()
        // Command handler must come before the free-text handler
        .branch(command_handler(deps_commands))
        // Photo/document attachments feed the check-submission step
        .branch(attachment_handler(deps_attachments))
        // Remaining text feeds the profile-capture step
        .branch(text_handler(deps_text))
        // Inline keyboard presses (menu + admin decisions)
        .branch(callback_handler(deps_callbacks))
}

/// Handler for bot commands (/start, /results)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);
                match cmd {
                    Command::Start => deps.workflow.start(sender_id(&msg)).await,
                    Command::Results => handle_results_command(&bot, msg.chat.id, &deps).await,
                }
                Ok(())
            }
        },
    ))
}

/// Handler for photo/document attachments (payment checks)
fn attachment_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.photo().is_some() || msg.document().is_some())
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                if let Some(file) = check_file_of(&msg) {
                    let applicant = applicant_of(&msg);
                    deps.workflow.submit_check(&applicant, &file).await;
                }
                Ok(())
            }
        })
}

/// Handler for free-form text (profile capture)
fn text_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                let text = msg.text().unwrap_or_default();
                deps.workflow.submit_profile(sender_id(&msg), text).await;
                Ok(())
            }
        })
}

/// Handler for callback queries (inline keyboard buttons)
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            handle_callback(&bot, q, &deps).await;
            Ok(())
        }
    })
}
