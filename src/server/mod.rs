mod announce_routes;
pub mod config;
pub mod error;
mod http_layers;
pub mod server;
mod session;
pub mod state;
mod stream_sound;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use session::{COOKIE_SESSION_TOKEN_KEY, HEADER_SESSION_TOKEN_KEY};
