//! reqwest transport for the planning endpoint

use super::types::{WireDetail, WireRequest, WireResponse};
use super::{PlanError, PlanRequest, PlanResult, TripPlanClient};
use crate::config::PlannerConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Talks to the planning endpoint over HTTP
pub struct HttpTripPlanClient {
    client: Client,
    endpoint: String,
}

impl HttpTripPlanClient {
    pub fn new(config: &PlannerConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl TripPlanClient for HttpTripPlanClient {
    async fn request(&self, request: &PlanRequest) -> PlanResult {
        let response = match self
            .client
            .post(&self.endpoint)
            .json(&WireRequest {
                request: request.as_str(),
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Planning request failed");
                return PlanError::from_reqwest(&e).into();
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "Failed to read response body");
                String::new()
            }
        };

        classify(status, &body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Turn a completed exchange into a [`PlanResult`].
///
/// A body that parses as the planning envelope wins over the HTTP status;
/// the status only matters when the body is unusable.
pub(crate) fn classify(status: StatusCode, body: &str) -> PlanResult {
    if let Ok(envelope) = serde_json::from_str::<WireResponse>(body) {
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Using envelope from failed exchange");
        }
        return envelope.into();
    }

    if status.is_success() {
        return PlanError::Parse.into();
    }

    match serde_json::from_str::<WireDetail>(body) {
        Ok(WireDetail { detail }) => PlanError::TransportDetail {
            status: status.as_u16(),
            detail,
        },
        Err(_) => PlanError::transport(status.as_u16()),
    }
    .into()
}
