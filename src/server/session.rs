use super::error::ApiError;
use super::state::ServerState;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;

/// Caller of an authenticated route, with the identifier its token maps to.
#[derive(Debug)]
pub struct Caller {
    pub identifier: String,
}

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

const BEARER_PREFIX: &str = "Bearer ";

fn extract_token_from_cookies(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .map(|s| s.to_string())
}

fn extract_token_from_headers(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(HEADER_SESSION_TOKEN_KEY)?;
    let value = String::from_utf8_lossy(value.as_bytes());
    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(&value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn extract_caller_from_request_parts(parts: &Parts, ctx: &ServerState) -> Option<Caller> {
    let token = match extract_token_from_cookies(parts).or_else(|| extract_token_from_headers(parts))
    {
        None => {
            debug!("No token in cookies nor headers.");
            return None;
        }
        Some(x) => x,
    };

    match ctx.identity_resolver.resolve(&token) {
        Some(identifier) => {
            debug!("Token resolved to identifier {}", identifier);
            Some(Caller { identifier })
        }
        None => {
            debug!("Unknown token");
            None
        }
    }
}

impl FromRequestParts<ServerState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_caller_from_request_parts(parts, ctx).ok_or_else(ApiError::forbidden)
    }
}
