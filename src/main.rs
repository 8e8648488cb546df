use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use offline_games_bot::application::messaging::{MessageDispatcher, MessageParser};
use offline_games_bot::application::services::menu_service::MINESWEEPER_GAME;
use offline_games_bot::application::services::{CommandService, MenuService};
use offline_games_bot::domain::entities::{MiniAppUrl, User};
use offline_games_bot::domain::traits::Bot;
use offline_games_bot::infrastructure::adapters::console::{ConsoleInput, CONSOLE_CHAT_ID};
use offline_games_bot::infrastructure::adapters::telegram::Poller;
use offline_games_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use offline_games_bot::infrastructure::config::Config;
use offline_games_bot::BotError;

#[derive(Parser)]
#[command(name = "offline-games-bot")]
#[command(about = "Telegram launcher for the Offline Games mini-app", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides BOT_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Chat with the bot from the terminal (no token needed)
    Console,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Console => run_console(&cli.config),
        Commands::Version => {
            println!("offline-games-bot v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::InitConfig => init_config(),
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> ExitCode {
    let config = match Config::load_or_default(config_path) {
        Ok(config) => config.with_token(token_override),
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("Refusing to start: {}", e);
        return ExitCode::FAILURE;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_telegram_bot(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Bot stopped with error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Build the command table for the configured mini-app
fn build_commands(url: &MiniAppUrl) -> CommandService {
    tracing::info!("Game Center URL: {}", url);
    tracing::info!("Minesweeper URL: {}", url.with_game(MINESWEEPER_GAME));

    let menu = Arc::new(MenuService::new(url));
    let mut commands = CommandService::new();
    menu.register(&mut commands);
    commands
}

async fn run_telegram_bot(config: Config) -> Result<(), BotError> {
    let url = config.mini_app_url()?;
    let mut bot = TelegramAdapter::with_api_base(config.token()?, config.telegram.api_base.as_str());

    tracing::info!("Bot is starting...");
    let info = bot.fetch_bot_info().await?;
    tracing::info!("Bot started: @{}", info.username);

    let commands = build_commands(&url);

    // Register bot commands with Telegram
    if let Err(e) = bot.register_commands(&commands.bot_commands()).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let mut parser = MessageParser::new();
    if !info.username.is_empty() {
        parser = parser.with_bot_username(info.username.as_str());
    }
    let dispatcher = MessageDispatcher::new(commands).with_parser(parser);

    bot.start().await?;
    let result = Poller::new(&bot, &dispatcher, &config.polling)
        .run(shutdown_signal())
        .await;

    bot.close();
    tracing::info!("Bot stopped");
    result
}

fn run_console(config_path: &str) -> ExitCode {
    let url = match Config::load_or_default(config_path).and_then(|c| c.mini_app_url()) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Refusing to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_console_bot(&url)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Console bot failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_console_bot(url: &MiniAppUrl) -> Result<(), BotError> {
    let bot = ConsoleAdapter::new();
    let dispatcher = MessageDispatcher::new(build_commands(url));
    let sender = User::new(CONSOLE_CHAT_ID);
    let mut input = ConsoleInput::stdin();

    bot.start().await?;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            _ = &mut shutdown => break,
            line = input.next_line() => line?,
        };

        let Some(line) = line else {
            break;
        };

        let message = dispatcher
            .parser()
            .parse(CONSOLE_CHAT_ID, Some(&line), Some(sender.clone()));
        dispatcher.handle(&bot, &message).await;
    }

    tracing::info!("Bot stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Bot interrupted");
}

fn init_config() -> ExitCode {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed. Set the token with BOT_TOKEN.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
