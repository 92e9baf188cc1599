//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per announce endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    token: Option<String>,
}

impl TestClient {
    /// Creates a client that presents no token
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Creates a client that sends `token` as a bearer Authorization header
    pub fn with_token(base_url: String, token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..Self::new(base_url)
        }
    }

    /// Client for the first test user
    pub fn user_1(base_url: String) -> Self {
        Self::with_token(base_url, USER_1_TOKEN)
    }

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    /// GET /announce/sound/{identifier}
    pub async fn get_sound(&self, identifier: &str) -> Response {
        self.client
            .get(format!("{}/announce/sound/{}", self.base_url, identifier))
            .send()
            .await
            .expect("Get sound request failed")
    }

    /// GET /announce/sound/{identifier} with a Range header
    pub async fn get_sound_range(&self, identifier: &str, range: &str) -> Response {
        self.client
            .get(format!("{}/announce/sound/{}", self.base_url, identifier))
            .header("Range", range)
            .send()
            .await
            .expect("Get sound range request failed")
    }

    /// PUT /announce/sound
    pub async fn put_sound(&self, body: Vec<u8>) -> Response {
        let mut request = self
            .client
            .put(format!("{}/announce/sound", self.base_url))
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Put sound request failed")
    }

    /// PUT /announce/sound with the token in the session cookie
    pub async fn put_sound_with_cookie(&self, token: &str, body: Vec<u8>) -> Response {
        self.client
            .put(format!("{}/announce/sound", self.base_url))
            .header("Cookie", format!("session_token={}", token))
            .body(body)
            .send()
            .await
            .expect("Put sound request failed")
    }
}
