//! HTTP client helpers for tests.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

/// Status code, status header and JSON body of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub service_status: Option<String>,
    pub body: Value,
}

impl TestResponse {
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_value(self.body.clone()).expect("Response body should match type")
    }
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn into_test_response(resp: reqwest::Response) -> Result<TestResponse, reqwest::Error> {
        let status = resp.status().as_u16();
        let service_status = resp
            .headers()
            .get("x-service-status")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let text = resp.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(TestResponse {
            status,
            service_status,
            body,
        })
    }

    pub async fn get(&self, path: &str) -> Result<TestResponse, reqwest::Error> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::into_test_response(resp).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<TestResponse, reqwest::Error> {
        let resp = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        Self::into_test_response(resp).await
    }

    pub async fn embed(&self, texts: &[&str]) -> Result<TestResponse, reqwest::Error> {
        self.post("/embed", &json!({ "texts": texts })).await
    }

    pub async fn rerank(
        &self,
        query: &str,
        candidates: &[&str],
    ) -> Result<TestResponse, reqwest::Error> {
        self.post("/rerank", &json!({ "query": query, "candidates": candidates }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url_building() {
        let client = TestClient::new("http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
        assert_eq!(client.url("health"), "http://localhost:8000/health");
    }
}
