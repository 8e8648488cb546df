//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::application::errors::BotError;
use crate::domain::entities::CommandResponse;
use crate::domain::traits::{Bot, BotInfo};

/// Chat id used for every console message
pub const CONSOLE_CHAT_ID: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "offline-games-bot".to_string(),
                username: "console".to_string(),
            },
        }
    }

    /// Render a response the way a chat client would lay it out
    pub fn render(response: &CommandResponse) -> String {
        let mut out = format!("[BOT] {}", response.body_text);
        if let Some(keyboard) = &response.keyboard {
            for row in &keyboard.rows {
                let buttons: Vec<String> = row
                    .iter()
                    .map(|b| format!("{} -> {}", b.label, b.target_url))
                    .collect();
                out.push_str(&format!("\n  [Buttons] {}", buttons.join(" | ")));
            }
        }
        out
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_response(&self, _chat_id: &str, response: &CommandResponse) -> Result<String, BotError> {
        println!("{}", Self::render(response));
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Line reader over stdin
pub struct ConsoleInput {
    lines: tokio::io::Lines<BufReader<Stdin>>,
}

impl ConsoleInput {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next line, or `None` at end of input
    pub async fn next_line(&mut self) -> Result<Option<String>, BotError> {
        Ok(self.lines.next_line().await?)
    }
}
