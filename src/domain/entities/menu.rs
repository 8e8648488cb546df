//! Outbound menu content: buttons, keyboards and prepared responses

use url::{form_urlencoded, Url};

use crate::application::errors::ConfigError;

/// Rich-text mode the platform should use to render a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
        }
    }
}

/// Button that launches the mini-app at `target_url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub target_url: String,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target_url: target_url.into(),
        }
    }
}

/// Ordered rows of buttons attached below a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<MenuButton>>,
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row holding a single full-width button.
    pub fn row(mut self, button: MenuButton) -> Self {
        self.rows.push(vec![button]);
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &MenuButton> {
        self.rows.iter().flatten()
    }
}

/// A prepared reply: body text plus an optional keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub body_text: String,
    pub parse_mode: ParseMode,
    pub keyboard: Option<InlineKeyboard>,
}

impl CommandResponse {
    pub fn html(body_text: impl Into<String>) -> Self {
        Self {
            body_text: body_text.into(),
            parse_mode: ParseMode::Html,
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Base URL of the hosted mini-app.
///
/// Keeps the configured string untouched for the main-menu button and the
/// parsed form for deriving per-game launch URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniAppUrl {
    raw: String,
    parsed: Url,
}

impl MiniAppUrl {
    /// Query parameter the mini-app reads to open a game directly
    pub const GAME_PARAM: &'static str = "game";

    /// Parses and validates a base URL. Telegram only launches mini-apps over https.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into().trim().to_string();
        let parsed = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidValue(format!("mini-app URL '{}': {}", raw, e)))?;

        if parsed.scheme() != "https" {
            return Err(ConfigError::InvalidValue(format!(
                "mini-app URL '{}' must use https",
                raw
            )));
        }

        Ok(Self { raw, parsed })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// URL that opens `game` directly.
    ///
    /// Appends `game=<game>` to the query (`?` when there is none, `&`
    /// otherwise) and replaces any `game` pair already present. Every other
    /// query segment is kept as written.
    pub fn with_game(&self, game: &str) -> String {
        let mut url = self.parsed.clone();
        let mut segments: Vec<String> = url
            .query()
            .unwrap_or("")
            .split('&')
            .filter(|segment| !segment.is_empty())
            .filter(|segment| segment.split('=').next() != Some(Self::GAME_PARAM))
            .map(str::to_string)
            .collect();

        let value: String = form_urlencoded::byte_serialize(game.as_bytes()).collect();
        segments.push(format!("{}={}", Self::GAME_PARAM, value));
        url.set_query(Some(&segments.join("&")));

        url.to_string()
    }
}

impl std::fmt::Display for MiniAppUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
