use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::time::sleep;

use locket_relay::cli::{Cli, Commands};
use locket_relay::core::config::RelaySettings;
use locket_relay::core::logging::parse_level;
use locket_relay::core::web_server::{self, router};
use locket_relay::core::{config, init_logger, log_startup_configuration};
use locket_relay::relay::{BotNotifier, HttpLocketApi, InMemorySessionStore, SessionRelay, TelegramFileResolver};
use locket_relay::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point
///
/// Parses CLI arguments, loads the environment and dispatches to the
/// requested mode.
///
/// # Errors
/// Returns an error if initialization fails (logging, missing bot token or
/// API base URL, port binding, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics instead of losing them inside the dispatcher task
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    let production = cli.command == Some(Commands::RunProduction);
    let env_file = config::load_env_files(production);

    init_logger(&config::LOG_FILE_PATH, parse_level(&config::LOG_LEVEL))?;

    match env_file {
        Some(file) => log::info!("Loaded environment from {}", file),
        None => log::info!("No environment file found, using process environment"),
    }
    log_startup_configuration();

    match cli.command {
        Some(Commands::Run) => {
            log::info!("Running relay in normal mode");
            run_relay().await
        }
        Some(Commands::RunProduction) => {
            log::info!("Running relay in production mode");
            run_relay().await
        }
        Some(Commands::Serve) => {
            log::info!("Running HTTP listener only");
            run_listener().await
        }
        None => {
            log::info!("No command specified, running relay in default mode");
            run_relay().await
        }
    }
}

/// HTTP listener on its own, until the process stops
async fn run_listener() -> Result<()> {
    let listener = web_server::bind(*config::PORT).await?;
    web_server::start_web_server(listener, router(&config::CORS_ORIGINS)).await?;
    Ok(())
}

/// HTTP listener plus the bot
///
/// The settings check and the port binding both happen before the bot starts,
/// so a misconfigured process exits before receiving any update.
async fn run_relay() -> Result<()> {
    let settings = match config::relay_settings(&config::BOT_TOKEN, config::API_BASE_URL.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}, refusing to start", e);
            return Err(e.into());
        }
    };

    let listener = web_server::bind(*config::PORT).await?;
    let app = router(&config::CORS_ORIGINS);
    tokio::spawn(async move {
        if let Err(e) = web_server::start_web_server(listener, app).await {
            log::error!("HTTP listener stopped: {}", e);
        }
    });

    run_bot(settings).await
}

async fn run_bot(settings: RelaySettings<'_>) -> Result<()> {
    let bot = create_bot(settings.bot_token)?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let relay = Arc::new(SessionRelay::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(HttpLocketApi::new(settings.api_base_url, config::network::timeout())?),
        Arc::new(TelegramFileResolver::new(bot.clone())),
        Arc::new(BotNotifier::new(bot.clone())),
    ));
    let handler = schema(HandlerDeps::new(relay));

    log::info!("Bot started, relaying to {}", settings.api_base_url);

    let mut retry_count = 0;
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // A panicking dispatcher surfaces through the JoinHandle
        let handle = tokio::spawn(async move {
            use teloxide::update_listeners::Polling;

            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(DependencyMap::new())
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);

                if retry_count >= max_retries {
                    log::error!("Max retries reached after panic. Exiting...");
                    break;
                }
                retry_count += 1;
                log::info!(
                    "Retrying dispatcher after panic (attempt {}/{})...",
                    retry_count,
                    max_retries
                );
                exponential_backoff(retry_count).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }

        sleep(config::retry::dispatcher_delay()).await;
    }

    Ok(())
}

/// Exponential backoff delay for retries
async fn exponential_backoff(retry_count: u32) {
    let delay = Duration::from_secs(config::retry::EXPONENTIAL_BACKOFF_BASE.pow(retry_count));
    sleep(delay).await;
}
