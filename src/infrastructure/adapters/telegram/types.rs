//! Serde types for the Telegram Bot API.
//!
//! Only the fields the bot reads are deserialized; unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{InlineKeyboard, User as DomainUser};

/// Envelope wrapping every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl From<&User> for DomainUser {
    fn from(user: &User) -> Self {
        let mut domain = DomainUser::new(user.id.to_string());
        domain.username = user.username.clone();
        domain.first_name = user.first_name.clone();
        domain
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Result of getMe
#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

/// Result of sendMessage (only the id is needed)
#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest<'a> {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct SetMyCommandsRequest {
    pub commands: Vec<BotCommandPayload>,
}

#[derive(Debug, Serialize)]
pub struct BotCommandPayload {
    pub command: String,
    pub description: String,
}

/// Inline keyboard markup for message buttons
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// Inline button that opens a mini-app
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub web_app: WebAppInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebAppInfo {
    pub url: String,
}

impl From<&InlineKeyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &InlineKeyboard) -> Self {
        let inline_keyboard = keyboard
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|btn| InlineKeyboardButton {
                        text: btn.label.clone(),
                        web_app: WebAppInfo {
                            url: btn.target_url.clone(),
                        },
                    })
                    .collect()
            })
            .collect();

        Self { inline_keyboard }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MenuButton;
    use serde_json::json;

    #[test]
    fn keyboard_serializes_as_web_app_rows() {
        let keyboard = InlineKeyboard::new()
            .row(MenuButton::new("Open", "https://example.org/app/"))
            .row(MenuButton::new("Play", "https://example.org/app/?game=minesweeper"));

        let markup = InlineKeyboardMarkup::from(&keyboard);
        assert_eq!(
            serde_json::to_value(markup).unwrap(),
            json!({
                "inline_keyboard": [
                    [{"text": "Open", "web_app": {"url": "https://example.org/app/"}}],
                    [{"text": "Play", "web_app": {"url": "https://example.org/app/?game=minesweeper"}}]
                ]
            })
        );
    }

    #[test]
    fn send_request_omits_missing_markup() {
        let request = SendMessageRequest {
            chat_id: "42",
            text: "hi",
            parse_mode: Some("HTML"),
            reply_markup: None,
        };
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value, json!({"chat_id": "42", "text": "hi", "parse_mode": "HTML"}));
    }

    #[test]
    fn update_ignores_unknown_fields() {
        let raw = json!({
            "update_id": 7,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "from": {"id": 42, "is_bot": false, "first_name": "Ada", "language_code": "en"},
                "chat": {"id": 42, "type": "private"},
                "text": "/start"
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(DomainUser::from(message.from.as_ref().unwrap()).id, "42");
    }

    #[test]
    fn photo_message_keeps_caption() {
        let raw = json!({
            "message_id": 2,
            "chat": {"id": 42},
            "photo": [{"file_id": "abc", "width": 90, "height": 90}],
            "caption": "/start"
        });
        let message: Message = serde_json::from_value(raw).unwrap();
        assert!(message.text.is_none());
        assert_eq!(message.caption.as_deref(), Some("/start"));
    }

    #[test]
    fn error_envelope_carries_retry_after() {
        let raw = json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 5",
            "parameters": {"retry_after": 5}
        });
        let resp: ApiResponse<SentMessage> = serde_json::from_value(raw).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.parameters.and_then(|p| p.retry_after), Some(5));
    }
}
