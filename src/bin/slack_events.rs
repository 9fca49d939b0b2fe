//! Slack Events API receiver.
//! Run with: cargo run --bin slack-events

use content_calendar::{
    config::Config,
    slack::{events, SlackClient},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("content_calendar=debug,slack_events=debug,tower_http=debug");

    let config = Config::load()?;
    if config.slack.signing_secret.trim().is_empty() {
        anyhow::bail!("Missing required environment variables: SLACK_SIGNING_SECRET");
    }
    if config.slack.bot_token.trim().is_empty() {
        tracing::warn!("SLACK_BOT_TOKEN not set; replies to events will fail");
    }

    let state = events::EventsState::new(
        SlackClient::from_config(&config.slack),
        &config.slack.signing_secret,
    );
    let router = events::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Slack event receiver listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
