//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, USER_1_ID};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_missing_sound() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.get_sound(USER_1_ID).await;
//!     assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! }
//! ```

mod client;
mod constants;
// Same generators the unit tests use.
#[allow(dead_code)]
#[path = "../../src/announce/test_fixtures.rs"]
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{mp3_frames, ogg_opus, truncated_mp3, MP3_FRAME_LEN};
pub use server::TestServer;
