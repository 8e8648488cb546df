//! Menu responses for the Offline Games mini-app
//!
//! The three replies are built once from the configured mini-app URL and
//! shared by every message that routes to them.

use std::sync::Arc;

use super::CommandService;
use crate::domain::entities::{Command, CommandResponse, InlineKeyboard, MenuButton, MiniAppUrl};

pub const GAME_CENTER_LABEL: &str = "🎮 Open Game Center";
pub const MINESWEEPER_LABEL: &str = "💣 Play Minesweeper";
pub const MINESWEEPER_GAME: &str = "minesweeper";

const WELCOME_TEXT: &str = "👾 <b>Welcome to Offline Games!</b>\n\n\
    🎮 Enjoy our collection of games right inside Telegram.\n\n\
    Click a button below to get started:";

const GAME_MENU_TEXT: &str = "🎮 <b>Choose Your Game</b>\n\n\
    Select a game to launch:";

const HELP_TEXT: &str = "❓ <b>Unknown Command</b>\n\n\
    Available commands:\n\
    • /start - Launch the bot and view games\n\
    • /game - View available games\n\
    • /help - Show this message\n\n\
    Tap the buttons to open games in Telegram!";

/// Launch keyboard: the game center on the first row, Minesweeper on the second.
pub fn game_keyboard(base_url: &MiniAppUrl) -> InlineKeyboard {
    InlineKeyboard::new()
        .row(MenuButton::new(GAME_CENTER_LABEL, base_url.as_str()))
        .row(MenuButton::new(MINESWEEPER_LABEL, base_url.with_game(MINESWEEPER_GAME)))
}

/// Prepared responses for `/start`, `/game` and everything else
#[derive(Debug, Clone)]
pub struct MenuService {
    welcome: Arc<CommandResponse>,
    game_menu: Arc<CommandResponse>,
    help: Arc<CommandResponse>,
}

impl MenuService {
    pub fn new(base_url: &MiniAppUrl) -> Self {
        let keyboard = game_keyboard(base_url);

        Self {
            welcome: Arc::new(CommandResponse::html(WELCOME_TEXT).with_keyboard(keyboard.clone())),
            game_menu: Arc::new(CommandResponse::html(GAME_MENU_TEXT).with_keyboard(keyboard)),
            help: Arc::new(CommandResponse::html(HELP_TEXT)),
        }
    }

    pub fn handle_start(&self, sender_id: &str) -> Arc<CommandResponse> {
        tracing::info!("User {} started the bot", sender_id);
        Arc::clone(&self.welcome)
    }

    pub fn handle_game(&self, sender_id: &str) -> Arc<CommandResponse> {
        tracing::info!("User {} requested /game command", sender_id);
        Arc::clone(&self.game_menu)
    }

    pub fn handle_unrecognized(&self, sender_id: &str) -> Arc<CommandResponse> {
        tracing::debug!("User {} sent an unrecognized message", sender_id);
        Arc::clone(&self.help)
    }

    /// Wire the menu into a command table: `/start`, `/game`, and the help
    /// fallback. `/help` is registered for the command menu only and is
    /// answered by the fallback.
    pub fn register(self: &Arc<Self>, commands: &mut CommandService) {
        let menu = Arc::clone(self);
        commands.register(
            Command::new("start")
                .with_description("Launch the bot and view games")
                .with_handler(move |msg| Ok(menu.handle_start(msg.sender_id()))),
        );

        let menu = Arc::clone(self);
        commands.register(
            Command::new("game")
                .with_description("View available games")
                .with_handler(move |msg| Ok(menu.handle_game(msg.sender_id()))),
        );

        commands.register(Command::new("help").with_description("Show help message"));

        let menu = Arc::clone(self);
        commands.set_fallback(move |msg| Ok(menu.handle_unrecognized(msg.sender_id())));
    }
}
