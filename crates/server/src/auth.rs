//! Authentication Middleware
//!
//! Shared-secret header check for the honeypot API. The header name and
//! key come from `server.auth`; configured public paths bypass the check.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::atomic::{AtomicBool, Ordering};

use honeypot_config::AuthConfig;

use crate::state::AppState;
use crate::ServerError;

/// Warn about disabled auth once per process
static AUTH_DISABLED_WARNED: AtomicBool = AtomicBool::new(false);

/// What to do with a request after looking at the auth config
enum AuthCheck {
    Disabled,
    PublicPath,
    ConfigError(&'static str),
    CheckKey(String),
}

fn check_auth_config(auth: &AuthConfig, path: &str) -> AuthCheck {
    if !auth.enabled {
        if !AUTH_DISABLED_WARNED.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                "API authentication is DISABLED. Set HONEYPOT__SERVER__AUTH__ENABLED=true for production."
            );
        }
        return AuthCheck::Disabled;
    }

    if auth.public_paths.iter().any(|p| p == path) {
        return AuthCheck::PublicPath;
    }

    match &auth.api_key {
        Some(key) if !key.is_empty() => AuthCheck::CheckKey(key.clone()),
        _ => AuthCheck::ConfigError("Auth is enabled but no API key is configured"),
    }
}

/// Reject requests without a valid API key header
///
/// - 401 when the header is missing or the key does not match
/// - 500 when auth is enabled but no key is configured
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let auth = &state.config.server.auth;

    match check_auth_config(auth, request.uri().path()) {
        AuthCheck::Disabled | AuthCheck::PublicPath => next.run(request).await,
        AuthCheck::ConfigError(msg) => {
            tracing::error!("{}", msg);
            ServerError::Internal("Server authentication not configured".to_string())
                .into_response()
        }
        AuthCheck::CheckKey(expected_key) => {
            let key_matches = request
                .headers()
                .get(auth.header_name.as_str())
                .map(|v| constant_time_compare(v.as_bytes(), expected_key.as_bytes()));

            match key_matches {
                Some(true) => next.run(request).await,
                Some(false) => {
                    tracing::warn!(
                        path = %request.uri().path(),
                        "Invalid API key provided"
                    );
                    ServerError::Auth("Invalid API key".to_string()).into_response()
                }
                None => ServerError::Auth(format!("Missing {} header", auth.header_name))
                    .into_response(),
            }
        }
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
