//! Stub planning clients for tests

use super::{PlanRequest, PlanResult, TripPlanClient};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

/// Returns queued results in order and records every request
pub struct MockPlanClient {
    results: Mutex<VecDeque<PlanResult>>,
    requests: Mutex<Vec<String>>,
}

impl MockPlanClient {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue(&self, result: PlanResult) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn queue_success(&self, trip_plan: &str) {
        self.queue(PlanResult::success(trip_plan));
    }

    pub fn queue_error(&self, message: &str) {
        self.queue(PlanResult::error(message));
    }

    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next(&self, request: &PlanRequest) -> PlanResult {
        self.requests.lock().unwrap().push(request.as_str().to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| PlanResult::error("No mock result queued"))
    }
}

impl Default for MockPlanClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TripPlanClient for MockPlanClient {
    async fn request(&self, request: &PlanRequest) -> PlanResult {
        self.next(request)
    }

    fn endpoint(&self) -> &str {
        "mock://plan"
    }
}

/// Mock whose calls stay pending until the test releases them
pub struct GatedPlanClient {
    inner: MockPlanClient,
    gate: Semaphore,
    /// Notified once per call as soon as it reaches the client
    pub request_started: Arc<Notify>,
}

impl GatedPlanClient {
    pub fn new() -> Self {
        Self {
            inner: MockPlanClient::new(),
            gate: Semaphore::new(0),
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_success(&self, trip_plan: &str) {
        self.inner.queue_success(trip_plan);
    }

    /// Let one pending call resolve
    pub fn release_one(&self) {
        self.gate.add_permits(1);
    }

    pub fn call_count(&self) -> usize {
        self.inner.call_count()
    }

    pub fn recorded_requests(&self) -> Vec<String> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl TripPlanClient for GatedPlanClient {
    async fn request(&self, request: &PlanRequest) -> PlanResult {
        self.inner
            .requests
            .lock()
            .unwrap()
            .push(request.as_str().to_string());
        self.request_started.notify_one();

        self.gate.acquire().await.unwrap().forget();

        self.inner
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| PlanResult::error("No mock result queued"))
    }

    fn endpoint(&self) -> &str {
        "mock://gated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_mock_returns_queue_then_error() {
        let mock = MockPlanClient::new();
        mock.queue_success("plan");

        let request = PlanRequest::new("Goa").unwrap();
        assert_eq!(mock.request(&request).await, PlanResult::success("plan"));
        assert!(!mock.request(&request).await.is_success());
        assert_eq!(mock.recorded_requests(), vec!["Goa", "Goa"]);
    }

    #[tokio::test]
    async fn test_gated_client_waits_for_release() {
        let client = Arc::new(GatedPlanClient::new());
        client.queue_success("plan");

        let started = client.request_started.clone();
        let task_client = client.clone();
        let handle = tokio::spawn(async move {
            task_client.request(&PlanRequest::new("Goa").unwrap()).await
        });

        started.notified().await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        client.release_one();
        assert_eq!(handle.await.unwrap(), PlanResult::success("plan"));
    }
}
