//! Mock Arc API server for testing
//!
//! A wiremock server answering the `/api/v1/` resources the client talks to.
//! Requests carrying `BAD_TOKEN` get a 401 error document; anything not mocked
//! gets wiremock's default empty 404.

use arc_client::ArcClient;
use serde_json::Value;
use std::time::Duration;
use wiremock::{
    matchers::{body_json, body_string, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use super::test_data::{error_document, BAD_TOKEN, TOKEN};

pub struct MockArcServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockArcServer {
    /// Start a mock server that already rejects `BAD_TOKEN`
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();

        Mock::given(header("x-auth-token", BAD_TOKEN))
            .respond_with(ResponseTemplate::new(401).set_body_json(error_document(
                "Unauthorized",
                401,
                "Not authorized.",
                "(GET) /api/v1/agents",
            )))
            .with_priority(1)
            .mount(&server)
            .await;

        Self { server, base_url }
    }

    pub fn client(&self) -> ArcClient {
        ArcClient::new(&self.base_url).unwrap()
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> ArcClient {
        ArcClient::with_timeout(&self.base_url, Some(timeout)).unwrap()
    }

    /// Mock a GET returning `body` as JSON with pagination headers
    pub async fn mock_listing(&self, resource_path: &str, body: Value, pages: u64, elements: u64) {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .and(header("x-auth-token", TOKEN))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .insert_header("Pagination-Pages", pages.to_string().as_str())
                    .insert_header("Pagination-Elements", elements.to_string().as_str()),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a GET returning `body` as JSON
    pub async fn mock_get_json(&self, resource_path: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .and(header("x-auth-token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a GET returning a raw body with the given content type
    pub async fn mock_get_raw(&self, resource_path: &str, body: &str, content_type: &str) {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .and(header("x-auth-token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), content_type))
            .mount(&self.server)
            .await;
    }

    /// Mock a GET that answers only after `delay`
    pub async fn mock_slow_get(&self, resource_path: &str, body: Value, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Mock a DELETE answering with `status` and an empty body
    pub async fn mock_delete(&self, resource_path: &str, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(resource_path))
            .and(header("x-auth-token", TOKEN))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock tag addition expecting exactly this form body
    pub async fn mock_add_tags(&self, agent_id: &str, form_body: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/api/v1/agents/{}/tags", agent_id)))
            .and(header("x-auth-token", TOKEN))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string(form_body))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock job execution expecting exactly this JSON body
    pub async fn mock_execute_job(&self, expected_body: Value, request_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/jobs"))
            .and(header("x-auth-token", TOKEN))
            .and(body_json(expected_body))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "request_id": request_id })),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock any method on `resource_path` failing with `status` and a JSON body
    pub async fn mock_error(&self, http_method: &str, resource_path: &str, status: u16, body: Value) {
        Mock::given(method(http_method))
            .and(path(resource_path))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock any method on `resource_path` failing with `status` and a plain-text body
    pub async fn mock_text_error(&self, http_method: &str, resource_path: &str, status: u16, body: &str) {
        Mock::given(method(http_method))
            .and(path(resource_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has seen so far
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}
