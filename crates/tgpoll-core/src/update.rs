//! Telegram Bot API wire types for `getUpdates`.
//!
//! Field names match the Bot API exactly. Docs: <https://core.telegram.org/bots/api#update>

use crate::error::PollError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Response envelope shared by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

impl<T> ApiResponse<T> {
    /// Convert an `ok: false` envelope into a [`PollError::Api`].
    ///
    /// A group-to-supergroup migration hint is folded into the description.
    pub fn into_api_error(self) -> PollError {
        let mut description = self
            .description
            .unwrap_or_else(|| "no description".to_string());
        let parameters = self.parameters.unwrap_or_default();
        if let Some(chat_id) = parameters.migrate_to_chat_id {
            description.push_str(&format!(" (migrated to chat {chat_id})"));
        }
        PollError::Api {
            error_code: self.error_code,
            description,
            retry_after: parameters.retry_after,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
    pub migrate_to_chat_id: Option<i64>,
}

/// One incoming update. At most one of the optional payloads is present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub edited_message: Option<Message>,
    pub channel_post: Option<Message>,
    pub edited_channel_post: Option<Message>,
}

impl Update {
    /// The kind of payload this update carries, if it is one we decode.
    pub fn kind(&self) -> Option<UpdateType> {
        if self.message.is_some() {
            Some(UpdateType::Message)
        } else if self.edited_message.is_some() {
            Some(UpdateType::EditedMessage)
        } else if self.channel_post.is_some() {
            Some(UpdateType::ChannelPost)
        } else if self.edited_channel_post.is_some() {
            Some(UpdateType::EditedChannelPost)
        } else {
            None
        }
    }

    /// The message-like payload, whichever field carries it.
    pub fn any_message(&self) -> Option<&Message> {
        self.message
            .as_ref()
            .or(self.edited_message.as_ref())
            .or(self.channel_post.as_ref())
            .or(self.edited_channel_post.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub message_id: i64,
    /// Absent for channel posts.
    pub from: Option<User>,
    pub chat: Chat,
    /// Unix timestamp.
    pub date: i64,
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Message {
    /// Text covered by an entity. Offsets and lengths are in UTF-16 code units.
    pub fn entity_text(&self, entity: &Entity) -> Option<String> {
        let text = self.text.as_deref()?;
        let units: Vec<u16> = text.encode_utf16().collect();
        let start = usize::try_from(entity.offset).ok()?;
        let end = start.checked_add(usize::try_from(entity.length).ok()?)?;
        let span = units.get(start..end)?;
        String::from_utf16(span).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    /// `@username` when set, otherwise the full name.
    pub fn display_name(&self) -> String {
        if let Some(ref un) = self.username {
            format!("@{un}")
        } else if let Some(ref ln) = self.last_name {
            format!("{} {ln}", self.first_name)
        } else {
            self.first_name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
    /// Groups and channels carry a title instead of a name.
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// A span annotation over `Message::text` (mention, hashtag, bot_command, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entity {
    pub offset: i64,
    pub length: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Update types accepted by `allowed_updates`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    BusinessConnection,
    BusinessMessage,
    EditedBusinessMessage,
    DeletedBusinessMessages,
    MessageReaction,
    MessageReactionCount,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    ShippingQuery,
    PreCheckoutQuery,
    PurchasedPaidMedia,
    Poll,
    PollAnswer,
    MyChatMember,
    ChatMember,
    ChatJoinRequest,
    ChatBoost,
    RemovedChatBoost,
}

impl UpdateType {
    pub const ALL: [UpdateType; 23] = [
        Self::Message,
        Self::EditedMessage,
        Self::ChannelPost,
        Self::EditedChannelPost,
        Self::BusinessConnection,
        Self::BusinessMessage,
        Self::EditedBusinessMessage,
        Self::DeletedBusinessMessages,
        Self::MessageReaction,
        Self::MessageReactionCount,
        Self::InlineQuery,
        Self::ChosenInlineResult,
        Self::CallbackQuery,
        Self::ShippingQuery,
        Self::PreCheckoutQuery,
        Self::PurchasedPaidMedia,
        Self::Poll,
        Self::PollAnswer,
        Self::MyChatMember,
        Self::ChatMember,
        Self::ChatJoinRequest,
        Self::ChatBoost,
        Self::RemovedChatBoost,
    ];

    /// Wire name, as sent in `allowed_updates`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::EditedMessage => "edited_message",
            Self::ChannelPost => "channel_post",
            Self::EditedChannelPost => "edited_channel_post",
            Self::BusinessConnection => "business_connection",
            Self::BusinessMessage => "business_message",
            Self::EditedBusinessMessage => "edited_business_message",
            Self::DeletedBusinessMessages => "deleted_business_messages",
            Self::MessageReaction => "message_reaction",
            Self::MessageReactionCount => "message_reaction_count",
            Self::InlineQuery => "inline_query",
            Self::ChosenInlineResult => "chosen_inline_result",
            Self::CallbackQuery => "callback_query",
            Self::ShippingQuery => "shipping_query",
            Self::PreCheckoutQuery => "pre_checkout_query",
            Self::PurchasedPaidMedia => "purchased_paid_media",
            Self::Poll => "poll",
            Self::PollAnswer => "poll_answer",
            Self::MyChatMember => "my_chat_member",
            Self::ChatMember => "chat_member",
            Self::ChatJoinRequest => "chat_join_request",
            Self::ChatBoost => "chat_boost",
            Self::RemovedChatBoost => "removed_chat_boost",
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateType {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| PollError::UnknownUpdateType(name.to_string()))
    }
}
