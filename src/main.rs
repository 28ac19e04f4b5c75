//! joxtabot - Twitch chat bot for #joxtacy
//!
//! Joins one channel over the Twitch chat gateway, keeps the connection
//! alive, and answers chat with emotes and canned `!command` replies.

use joxtabot::bot;
use joxtabot::config::{self, Config};
use joxtabot::network::{Connection, LifecycleEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {config_path}",
            errors.len()
        ));
    }

    info!(
        channel = %config.twitch.channel,
        nick = %config.twitch.nick,
        url = %config.twitch.url,
        "Starting joxtabot"
    );

    let settings = config.twitch.connection_settings()?;
    let mut connection = Connection::from_url(settings)?;
    bot::install(&mut connection, &config.bot, &config.twitch.nick);

    let chat = connection.handle();

    // Lifecycle watcher
    let mut events = chat.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(LifecycleEvent::StateChanged(state)) => debug!(%state, "Connection state"),
                Ok(LifecycleEvent::ReconnectRequested) => info!("Reconnect requested by server"),
                Ok(LifecycleEvent::Error(reason)) => warn!(%reason, "Connection error"),
                Ok(LifecycleEvent::Closed { reason }) => {
                    info!(%reason, "Connection closed");
                    break;
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Lifecycle watcher lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    bot::spawn_greeting(&chat, &config.bot.greeting);

    // Ctrl-C closes the connection cleanly
    let shutdown_chat = chat.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            if let Err(e) = shutdown_chat.shutdown() {
                debug!(error = %e, "Connection already closed");
            }
        }
    });

    connection.run().await.map_err(|e| {
        error!(error = %e, code = e.error_code(), "Chat connection lost");
        anyhow::Error::from(e)
    })
}
