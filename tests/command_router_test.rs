//! Command routing integration tests
//! Run with: cargo test --test command_router_test

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use offline_games_bot::application::messaging::{MessageDispatcher, MessageParser};
use offline_games_bot::application::services::{CommandService, MenuService};
use offline_games_bot::domain::entities::{CommandResponse, MenuButton, MiniAppUrl, ParseMode, User};
use offline_games_bot::domain::traits::{Bot, BotInfo};
use offline_games_bot::BotError;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Bot double that records every response it is asked to send
#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<(String, CommandResponse)>>,
    fail_next: Mutex<bool>,
}

impl RecordingBot {
    fn failing_once() -> Self {
        let bot = Self::default();
        *bot.fail_next.lock().unwrap() = true;
        bot
    }

    fn sent(&self) -> Vec<(String, CommandResponse)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_response(&self, chat_id: &str, response: &CommandResponse) -> Result<String, BotError> {
        {
            let mut fail = self.fail_next.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(BotError::Network("connection reset".to_string()));
            }
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push((chat_id.to_string(), response.clone()));
        Ok(sent.len().to_string())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "1".to_string(),
            name: "Offline Games".to_string(),
            username: "OfflineGamesBot".to_string(),
        }
    }
}

fn dispatcher(base_url: &str) -> MessageDispatcher {
    let url = MiniAppUrl::parse(base_url).unwrap();
    let menu = Arc::new(MenuService::new(&url));
    let mut commands = CommandService::new();
    menu.register(&mut commands);

    MessageDispatcher::new(commands).with_parser(MessageParser::new().with_bot_username("OfflineGamesBot"))
}

async fn send(dispatcher: &MessageDispatcher, bot: &RecordingBot, text: &str) -> CommandResponse {
    dispatcher
        .dispatch_text(bot, "42", Some(text), Some(User::new("42")))
        .await
        .unwrap();
    bot.sent().pop().unwrap().1
}

fn targets(response: &CommandResponse) -> Vec<Vec<(String, String)>> {
    response
        .keyboard
        .as_ref()
        .unwrap()
        .rows
        .iter()
        .map(|row| row.iter().map(|b| (b.label.clone(), b.target_url.clone())).collect())
        .collect()
}

#[tokio::test]
async fn start_sends_welcome_with_keyboard() {
    ensure_init();
    let dispatcher = dispatcher("https://example.org/app/");
    let bot = RecordingBot::default();

    let response = send(&dispatcher, &bot, "/start").await;

    assert!(response.body_text.contains("Welcome to Offline Games"));
    assert_eq!(response.parse_mode, ParseMode::Html);

    let rows = targets(&response);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.len() == 1));
    assert!(rows[0][0].0.contains("Open Game Center"));
    assert_eq!(rows[0][0].1, "https://example.org/app/");
    assert!(rows[1][0].0.contains("Play Minesweeper"));
    assert_eq!(rows[1][0].1, "https://example.org/app/?game=minesweeper");

    assert_eq!(bot.sent()[0].0, "42");
}

#[tokio::test]
async fn game_sends_menu_with_same_keyboard() {
    ensure_init();
    let dispatcher = dispatcher("https://example.org/app/");
    let bot = RecordingBot::default();

    let start = send(&dispatcher, &bot, "/start").await;
    let game = send(&dispatcher, &bot, "/game").await;

    assert!(game.body_text.contains("Choose Your Game"));
    assert_eq!(start.keyboard, game.keyboard);
}

#[tokio::test]
async fn unrecognized_input_gets_help_without_keyboard() {
    ensure_init();
    let dispatcher = dispatcher("https://example.org/app/");
    let bot = RecordingBot::default();

    for text in ["/foobar", "/help", "hello there", "/start@SomeOtherBot", "/START", "/Game"] {
        let response = send(&dispatcher, &bot, text).await;
        assert!(response.keyboard.is_none(), "{} should not get a keyboard", text);
        for cmd in ["/start", "/game", "/help"] {
            assert!(response.body_text.contains(cmd));
        }
    }

    dispatcher
        .dispatch_text(&bot, "42", None, Some(User::new("42")))
        .await
        .unwrap();
    assert!(bot.sent().last().unwrap().1.keyboard.is_none());
}

#[tokio::test]
async fn commands_addressed_to_this_bot_are_routed() {
    ensure_init();
    let dispatcher = dispatcher("https://example.org/app/");
    let bot = RecordingBot::default();

    let response = send(&dispatcher, &bot, "/game@OfflineGamesBot").await;
    assert!(response.body_text.contains("Choose Your Game"));

    let response = send(&dispatcher, &bot, "/start deep-link").await;
    assert!(response.body_text.contains("Welcome"));
}

#[tokio::test]
async fn keyboard_follows_base_url() {
    ensure_init();
    let bot = RecordingBot::default();

    let response = send(&dispatcher("https://games.example/play?lang=en"), &bot, "/start").await;
    assert_eq!(
        response.keyboard.unwrap().rows,
        vec![
            vec![MenuButton::new("🎮 Open Game Center", "https://games.example/play?lang=en")],
            vec![MenuButton::new("💣 Play Minesweeper", "https://games.example/play?lang=en&game=minesweeper")],
        ]
    );
}

#[tokio::test]
async fn failed_send_is_logged_and_next_message_still_handled() {
    ensure_init();
    let dispatcher = dispatcher("https://example.org/app/");
    let bot = RecordingBot::failing_once();
    let parser = MessageParser::new();

    let first = parser.parse("42", Some("/start"), Some(User::new("42")));
    let second = parser.parse("42", Some("/game"), Some(User::new("42")));

    assert!(!dispatcher.handle(&bot, &first).await);
    assert!(dispatcher.handle(&bot, &second).await);

    let sent = bot.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.body_text.contains("Choose Your Game"));
}
