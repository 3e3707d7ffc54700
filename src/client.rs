//! Planning endpoint client
//!
//! One round trip per call, no retries, no cancellation. Every failure mode is
//! folded into [`PlanResult::Error`] so controllers never see the taxonomy.

mod error;
mod http;
mod types;

#[cfg(test)]
pub mod testing;

pub use error::PlanError;
pub use http::HttpTripPlanClient;
pub use types::{PlanRequest, PlanResult};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for reaching the planning endpoint
#[async_trait]
pub trait TripPlanClient: Send + Sync {
    /// Send one trip description and classify the outcome
    async fn request(&self, request: &PlanRequest) -> PlanResult;

    /// Where requests go (for logging)
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: TripPlanClient + ?Sized> TripPlanClient for Arc<T> {
    async fn request(&self, request: &PlanRequest) -> PlanResult {
        (**self).request(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for planning clients
pub struct LoggingClient<C> {
    inner: C,
}

impl<C: TripPlanClient> LoggingClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: TripPlanClient> TripPlanClient for LoggingClient<C> {
    async fn request(&self, request: &PlanRequest) -> PlanResult {
        let start = std::time::Instant::now();
        let result = self.inner.request(request).await;
        let duration = start.elapsed();

        match &result {
            PlanResult::Success { trip_plan, steps } => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    plan_chars = trip_plan.chars().count(),
                    steps = steps.as_ref().map_or(0, Vec::len),
                    "Planning request completed"
                );
            }
            PlanResult::Error { message } => {
                tracing::warn!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    error = %message,
                    "Planning request returned an error"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
