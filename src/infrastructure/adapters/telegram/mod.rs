//! Telegram adapter
//!
//! Thin Bot API client over reqwest. Every call posts JSON to
//! `{api_base}/bot{token}/{method}` and unwraps the `{ ok, result }` envelope.

pub mod poller;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::application::errors::BotError;
use crate::domain::entities::CommandResponse;
use crate::domain::traits::{Bot, BotCommand, BotInfo};
use types::{
    ApiResponse, BotCommandPayload, BotUser, GetUpdatesRequest, InlineKeyboardMarkup,
    SendMessageRequest, SentMessage, SetMyCommandsRequest, Update,
};

pub use poller::Poller;

/// Telegram API base URL
pub const API_BASE: &str = "https://api.telegram.org";

/// Timeout for every call except long polls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra time a long poll may take beyond its server-side timeout
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Only message updates are routed
const ALLOWED_UPDATES: &[&str] = &["message"];

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: SecretString,
    api_base: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: &SecretString) -> Self {
        Self::with_api_base(token, API_BASE)
    }

    /// Point the adapter at another Bot API server (local server, tests)
    pub fn with_api_base(token: &SecretString, api_base: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.expose_secret().to_string()),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "offline-games-bot".to_string(),
                username: "unknown".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token.expose_secret(), method)
    }

    async fn call<B, R>(&self, method: &str, body: &B, timeout: Duration) -> Result<R, BotError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        // reqwest errors may embed the request URL, which carries the token
        let response = self
            .client
            .post(self.api_url(method))
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| BotError::Network(format!("{} request failed: {}", method, e.without_url())))?;

        let status = response.status();
        let data: ApiResponse<R> = match response.json().await {
            Ok(data) => data,
            Err(e) if status.is_success() => {
                return Err(BotError::Parse(format!("{}: {}", method, e.without_url())));
            }
            Err(_) => {
                return Err(BotError::Network(format!("Telegram API error: {}", status)));
            }
        };

        if !data.ok {
            return Err(BotError::Api {
                code: data.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: data.description.unwrap_or_default(),
                retry_after: data.parameters.and_then(|p| p.retry_after),
            });
        }

        data.result
            .ok_or_else(|| BotError::Parse(format!("{}: response has no result", method)))
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<BotInfo, BotError> {
        let me: BotUser = self.call("getMe", &serde_json::json!({}), REQUEST_TIMEOUT).await?;

        self.info = BotInfo {
            id: me.id.to_string(),
            name: me.first_name,
            username: me.username.unwrap_or_default(),
        };

        Ok(self.info.clone())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: ALLOWED_UPDATES,
        };

        self.call("getUpdates", &request, Duration::from_secs(timeout).saturating_add(POLL_GRACE))
            .await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> Option<i64> {
        updates.iter().map(|u| u.update_id + 1).max()
    }

    async fn send(&self, request: &SendMessageRequest<'_>) -> Result<String, BotError> {
        let sent: SentMessage = self.call("sendMessage", request, REQUEST_TIMEOUT).await?;
        Ok(sent.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self, commands: &[BotCommand]) -> Result<(), BotError> {
        let request = SetMyCommandsRequest {
            commands: commands
                .iter()
                .map(|c| BotCommandPayload {
                    command: c.command.clone(),
                    description: c.description.clone(),
                })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request, REQUEST_TIMEOUT).await?;

        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }

    /// Release the HTTP session
    pub fn close(self) {
        tracing::info!("Closing Telegram session for @{}", self.info.username);
        drop(self.client);
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot @{}", self.info.username);
        Ok(())
    }

    async fn send_response(&self, chat_id: &str, response: &CommandResponse) -> Result<String, BotError> {
        tracing::debug!(
            "Sending response to {} ({} keyboard rows)",
            chat_id,
            response.keyboard.as_ref().map_or(0, |k| k.rows.len())
        );

        self.send(&SendMessageRequest {
            chat_id,
            text: &response.body_text,
            parse_mode: Some(response.parse_mode.as_str()),
            reply_markup: response.keyboard.as_ref().map(InlineKeyboardMarkup::from),
        })
        .await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
