//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint. When API routes or
//! request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /api/health
    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }

    /// GET /api/stream?id=...
    pub async fn stream_track(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/api/stream", self.base_url))
            .query(&[("id", id)])
            .send()
            .await
            .expect("Stream request failed")
    }

    /// GET /api/stream?id=... with a Range header
    pub async fn stream_track_with_range(&self, id: &str, range: &str) -> Response {
        self.client
            .get(format!("{}/api/stream", self.base_url))
            .query(&[("id", id)])
            .header("Range", range)
            .send()
            .await
            .expect("Ranged stream request failed")
    }

    /// GET /api/stream?path=...
    pub async fn stream_path(&self, path: &str) -> Response {
        self.client
            .get(format!("{}/api/stream", self.base_url))
            .query(&[("path", path)])
            .send()
            .await
            .expect("Stream request failed")
    }

    /// GET /api/stream?url=...
    pub async fn stream_url(&self, url: &str) -> Response {
        self.client
            .get(format!("{}/api/stream", self.base_url))
            .query(&[("url", url)])
            .send()
            .await
            .expect("Stream request failed")
    }

    /// HEAD /api/stream?id=...
    pub async fn head_track(&self, id: &str) -> Response {
        self.client
            .head(format!("{}/api/stream", self.base_url))
            .query(&[("id", id)])
            .send()
            .await
            .expect("Stream HEAD request failed")
    }

    /// GET /api/tracks/search with raw query pairs
    pub async fn search(&self, params: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/api/tracks/search", self.base_url))
            .query(params)
            .send()
            .await
            .expect("Search request failed")
    }

    /// GET /api/tracks/search, parsed as JSON
    pub async fn search_json(&self, params: &[(&str, &str)]) -> Vec<serde_json::Value> {
        let response = self.search(params).await;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            panic!("Search failed ({status}): {body}");
        }
        response.json().await.expect("Search response was not JSON")
    }

    /// GET /api/tracks/{id}
    pub async fn get_track(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/api/tracks/{}", self.base_url, id))
            .send()
            .await
            .expect("Track request failed")
    }
}
