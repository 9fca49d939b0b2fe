use std::sync::Arc;

use content_calendar::{
    app,
    config::Config,
    db::Database,
    services::{ContentGenerator, Notifier, NotifyOutcome, OpenAiProvider, PostAction, PostNotice},
    telemetry, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    telemetry::init("content_calendar=debug,tower_http=debug");

    // Load configuration
    let config = Config::load()?;
    config.ensure_api_requirements()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connections
    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;

    let generator = ContentGenerator::new(Arc::new(OpenAiProvider::new(&config.openai)));
    let notifier = Notifier::from_config(&config.slack);

    match notifier
        .notify_post(&PostNotice::startup(), PostAction::Test)
        .await
    {
        NotifyOutcome::Failed(reason) => {
            tracing::warn!("Could not send Slack notification: {}", reason)
        }
        outcome => tracing::debug!(?outcome, "startup notification"),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(Arc::new(db), config, generator, notifier);
    let router = app(state);

    // Start server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
