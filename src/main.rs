//! Trip Planner - terminal client for an AI trip planning endpoint
//!
//! Describe a trip in free text and get an itinerary back, either as a
//! one-shot plan or through a lightweight multi-turn chat.

mod chat;
mod client;
mod config;
mod history;
mod itinerary;
mod planning;
mod repl;

use chat::ChatSession;
use client::{HttpTripPlanClient, LoggingClient, TripPlanClient};
use config::PlannerConfig;
use history::HistoryStore;
use planning::PlanningController;
use repl::Repl;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trip_planner=info".into());

    // stdout belongs to the UI
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PlannerConfig::from_env()?;
    init_logging(config.log_json);

    tracing::info!(
        endpoint = %config.endpoint,
        timeout_secs = config.request_timeout.map(|t| t.as_secs()),
        "Starting trip planner"
    );

    let client: Arc<dyn TripPlanClient> =
        Arc::new(LoggingClient::new(HttpTripPlanClient::new(&config)?));

    let controller = PlanningController::new(client.clone(), HistoryStore::new());
    let chat = ChatSession::new(client);

    Repl::new(config, controller, chat).run().await?;
    Ok(())
}
