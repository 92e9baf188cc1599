//! Shared constants for end-to-end tests
//!
//! When test tokens or identifiers change, update only this file.

// ============================================================================
// Test Tokens
// ============================================================================

/// Upload token of the first test user
pub const USER_1_TOKEN: &str = "test-token-user-1";

/// Identifier the first test user uploads as
pub const USER_1_ID: &str = "100000000000000001";

/// Upload token of the second test user
pub const USER_2_TOKEN: &str = "test-token-user-2";

/// Identifier the second test user uploads as
pub const USER_2_ID: &str = "100000000000000002";

/// Token nobody was given
pub const UNKNOWN_TOKEN: &str = "not-a-real-token";

// ============================================================================
// Timeouts
// ============================================================================

/// How long to wait for a freshly spawned server to answer `/`
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout applied to every request made by `TestClient`
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Delay between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
