//! Session principal extraction.
//!
//! Handlers that require a logged-in account take [`CurrentUser`] as an
//! argument; handlers where authentication is optional take
//! `Option<CurrentUser>`.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;

use crate::config::Config;
use crate::constants::SESSION_COOKIE_NAME;
use crate::db::sessions;
use crate::error::{AppError, Result};
use crate::security::{is_well_formed_token, session_key};
use crate::AppState;

/// The account behind the session cookie of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub account_id: u64,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        resolve_session(&parts.headers, state)
            .await?
            .ok_or(AppError::NotAuthenticated)
    }
}

impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Option<Self>, Self::Rejection> {
        resolve_session(&parts.headers, state).await
    }
}

async fn resolve_session(headers: &HeaderMap, state: &AppState) -> Result<Option<CurrentUser>> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    let key = session_key(&token, &state.config.session_secret_key);
    let db = state.db.clone();
    let now = Utc::now().timestamp();

    let record = tokio::task::spawn_blocking(move || sessions::resolve(&db, &key, now)).await??;

    match record {
        Some(record) => Ok(Some(CurrentUser {
            account_id: record.account_id,
        })),
        None => {
            tracing::debug!("Presented session is unknown or expired");
            Ok(None)
        }
    }
}

/// Owner constraint for a mutation of a profile or recipe
///
/// `None` when ownership is not enforced. Otherwise the requester's account
/// id, and an unauthenticated requester is rejected.
pub fn ownership_scope(config: &Config, user: Option<&CurrentUser>) -> Result<Option<u64>> {
    if !config.enforce_ownership {
        return Ok(None);
    }
    user.map(|user| Some(user.account_id))
        .ok_or(AppError::NotAuthenticated)
}

/// Extract the session token from the request's `Cookie` headers
///
/// Tokens that could not have been issued by this server are ignored.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE_NAME && is_well_formed_token(value))
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value carrying a freshly issued session token
pub fn session_cookie(token: &str, config: &Config) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, token, config.session_ttl_secs
    );
    if config.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that makes the client drop its session cookie
pub fn clear_session_cookie(config: &Config) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    );
    if config.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}
