//! Mock image host for ingestion tests.

use std::time::Duration;

use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer with convenience methods
pub struct MockImageServer {
    pub server: MockServer,
}

impl MockImageServer {
    /// Start a new mock image host
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get URL for a specific path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    /// Serve a PNG at `endpoint`
    pub async fn mock_png(&self, endpoint: &str, png: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(png)
                    .insert_header("content-type", "image/png"),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer `endpoint` with `status` for the first `times` requests only
    pub async fn mock_failures(&self, endpoint: &str, status: u16, times: u64) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(times)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Answer every request to `endpoint` with `status`, expecting exactly
    /// `expected` requests
    pub async fn mock_always_failing(&self, endpoint: &str, status: u16, expected: u64) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status))
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    /// Serve a body that is not an image
    pub async fn mock_garbage(&self, endpoint: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not an image</html>"))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Serve a PNG only after `delay`
    pub async fn mock_slow_png(&self, endpoint: &str, png: Vec<u8>, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received for `endpoint`
    pub async fn request_count(&self, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == endpoint)
            .count()
    }
}
