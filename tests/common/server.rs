//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own sounds directory.

use super::constants::*;
use announce_sound_server::{
    make_app, AnnounceStore, IngestionSettings, RequestsLoggingLevel, ServerConfig,
    TokenFileIdentityResolver,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated sounds directory
///
/// When dropped, the server gracefully shuts down and the directory is removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_sounds_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port with default limits
    pub async fn spawn() -> Self {
        Self::spawn_with(IngestionSettings::default()).await
    }

    /// Spawns a new test server on a random port with the given limits
    ///
    /// # Panics
    ///
    /// Panics if the server can't be set up or doesn't become ready in time.
    pub async fn spawn_with(settings: IngestionSettings) -> Self {
        let temp_sounds_dir = TempDir::new().expect("Failed to create sounds dir");

        let store = Arc::new(AnnounceStore::new(temp_sounds_dir.path(), settings));
        store.init().expect("Failed to init announce store");

        let identity = Arc::new(TokenFileIdentityResolver::from_tokens([
            (USER_1_TOKEN, USER_1_ID),
            (USER_2_TOKEN, USER_2_ID),
        ]));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(config, store, identity);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_sounds_dir: temp_sounds_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    pub fn sounds_dir(&self) -> &Path {
        self._temp_sounds_dir.path()
    }

    /// Names of every file in the sounds directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.sounds_dir())
            .expect("Failed to list sounds dir")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn sound_path(&self, file_name: &str) -> PathBuf {
        self.sounds_dir().join(file_name)
    }

    /// Waits for the server to become ready by polling `/`
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
