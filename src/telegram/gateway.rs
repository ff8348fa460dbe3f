//! Telegram implementation of the workflow gateway

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, MessageId, Recipient, UserId};

use crate::core::error::AppResult;
use crate::registration::{Applicant, CheckFile, Gateway, MessageRef};
use crate::roster::RosterEntry;
use crate::telegram::keyboards;

/// The production [`Gateway`]: message copy, keyboards, and the channel
/// membership lookup over a teloxide [`Bot`].
pub struct TelegramGateway {
    bot: Bot,
    required_channel: String,
    admin_chat: ChatId,
    admin_contact: String,
    card_number: String,
    entry_fee: String,
}

impl TelegramGateway {
    pub fn new(
        bot: Bot,
        required_channel: String,
        admin_chat: ChatId,
        admin_contact: String,
        card_number: String,
        entry_fee: String,
    ) -> Self {
        Self {
            bot,
            required_channel,
            admin_chat,
            admin_contact,
            card_number,
            entry_fee,
        }
    }

    /// The gated channel as a Telegram recipient: "@username" or a raw id.
    fn channel(&self) -> Recipient {
        match self.required_channel.parse::<i64>() {
            Ok(id) => Recipient::Id(ChatId(id)),
            Err(_) => Recipient::ChannelUsername(self.required_channel.clone()),
        }
    }

    fn check_caption(&self, applicant: &Applicant, kind: &str) -> String {
        format!(
            "🧾 New check{}:\n👤 {}\n🆔 {}\n📌 @{}",
            kind,
            applicant.full_name,
            applicant.user_id,
            applicant.username.as_deref().unwrap_or("no username"),
        )
    }
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn is_subscribed(&self, user_id: i64) -> bool {
        let user_id = match u64::try_from(user_id) {
            Ok(id) => UserId(id),
            Err(_) => return false,
        };

        match self.bot.get_chat_member(self.channel(), user_id).await {
            Ok(member) => member.kind.is_privileged() || member.kind.is_member(),
            Err(e) => {
                log::warn!("Subscription check failed for user {}: {}", user_id, e);
                false
            }
        }
    }

    async fn send_welcome(&self, user_id: i64) -> AppResult<()> {
        let text = format!(
            "👋 Welcome to the tournament bot!\n\n\
             You can sign up for the tournament here.\n\
             ⚠️ Participation is paid.\n\n\
             💸 Entry fee: {}",
            self.entry_fee,
        );
        self.bot
            .send_message(ChatId(user_id), text)
            .reply_markup(keyboards::main_menu())
            .await?;
        Ok(())
    }

    async fn send_gate_prompt(&self, user_id: i64) -> AppResult<()> {
        let text = "👋 Hello!\n\
                    To use this bot, subscribe to our channel first, then press the check button below 👇";
        self.bot
            .send_message(ChatId(user_id), text)
            .reply_markup(keyboards::gate_menu())
            .await?;
        Ok(())
    }

    async fn confirm_subscription(&self, user_id: i64, subscribed: bool) -> AppResult<()> {
        if subscribed {
            self.bot
                .send_message(ChatId(user_id), "✅ Subscription confirmed. The bot is all yours.")
                .reply_markup(keyboards::main_menu())
                .await?;
        } else {
            self.bot
                .send_message(
                    ChatId(user_id),
                    "❌ You are not subscribed yet. Please join the channel:",
                )
                .reply_markup(keyboards::gate_menu())
                .await?;
        }
        Ok(())
    }

    async fn send_payment_instructions(&self, user_id: i64) -> AppResult<MessageRef> {
        let text = format!(
            "💳 Card number: {}\n\n\
             📌 Make the payment and send the receipt (screenshot).\n\
             ⏳ You have a few seconds to copy the number - this message will disappear.",
            self.card_number,
        );
        let msg = self.bot.send_message(ChatId(user_id), text).await?;
        Ok(MessageRef(msg.id.0))
    }

    async fn send_check_prompt(&self, user_id: i64) -> AppResult<()> {
        self.bot
            .send_message(
                ChatId(user_id),
                "✅ Once the payment is done, send the check (photo or file):",
            )
            .await?;
        Ok(())
    }

    async fn delete_message(&self, user_id: i64, message: MessageRef) -> AppResult<()> {
        self.bot.delete_message(ChatId(user_id), MessageId(message.0)).await?;
        Ok(())
    }

    async fn notify_under_review(&self, user_id: i64) -> AppResult<()> {
        self.bot
            .send_message(ChatId(user_id), "🕔 Your check is being reviewed by the admin.")
            .await?;
        Ok(())
    }

    async fn relay_check(&self, applicant: &Applicant, file: &CheckFile) -> AppResult<()> {
        let controls = keyboards::decision_controls(applicant.user_id);
        match file {
            CheckFile::Photo(file_id) => {
                self.bot
                    .send_photo(self.admin_chat, InputFile::file_id(FileId(file_id.clone())))
                    .caption(self.check_caption(applicant, ""))
                    .reply_markup(controls)
                    .await?;
            }
            CheckFile::Document(file_id) => {
                self.bot
                    .send_document(self.admin_chat, InputFile::file_id(FileId(file_id.clone())))
                    .caption(self.check_caption(applicant, " (file)"))
                    .reply_markup(controls)
                    .await?;
            }
        }
        Ok(())
    }

    async fn notify_approved(&self, user_id: i64) -> AppResult<()> {
        self.bot
            .send_message(
                ChatId(user_id),
                "✅ Your check was approved. Now send your nickname and game ID.",
            )
            .await?;
        Ok(())
    }

    async fn notify_rejected(&self, user_id: i64) -> AppResult<()> {
        self.bot
            .send_message(ChatId(user_id), "❌ Your check was not approved. Please try again.")
            .await?;
        Ok(())
    }

    async fn notify_registered(&self, user_id: i64) -> AppResult<()> {
        self.bot
            .send_message(
                ChatId(user_id),
                "✅ Your details are saved. You have joined the tournament!",
            )
            .await?;
        Ok(())
    }

    async fn notify_save_failed(&self, user_id: i64) -> AppResult<()> {
        let text = format!(
            "⚠️ Failed to save your details. Please contact the admin{}.",
            if self.admin_contact.is_empty() {
                String::new()
            } else {
                format!(" ({})", self.admin_contact)
            },
        );
        self.bot.send_message(ChatId(user_id), text).await?;
        Ok(())
    }

    async fn notify_bad_profile(&self, user_id: i64) -> AppResult<()> {
        self.bot
            .send_message(
                ChatId(user_id),
                "❌ Please send your nickname and ID in one message, e.g. \"ProGamer 77\".",
            )
            .await?;
        Ok(())
    }

    async fn notify_flow_aborted(&self, user_id: i64) -> AppResult<()> {
        self.bot
            .send_message(
                ChatId(user_id),
                "⚠️ Something went wrong on our side. Please try again later.",
            )
            .await?;
        Ok(())
    }

    async fn announce_entrant(&self, entry: &RosterEntry) -> AppResult<()> {
        self.bot
            .send_message(
                self.admin_chat,
                format!("🏆 New entrant: {} | {}", entry.nickname, entry.game_id),
            )
            .await?;
        Ok(())
    }
}
