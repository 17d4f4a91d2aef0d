use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{clear_session_cookie, session_cookie, session_token};
use crate::db::{accounts, sessions};
use crate::error::{AppError, Result};
use crate::models::account::normalize_email;
use crate::models::{AccountSummary, SessionRecord};
use crate::routes::validation::{AppJson, password_input};
use crate::security::{generate_session_token, session_key};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials> {
        let email = self
            .email
            .map(|email| normalize_email(&email))
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AppError::InvalidInput("email is required".to_string()))?;
        let password = password_input(self.password)?;
        Ok(Credentials { email, password })
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Log in with email and password
///
/// On success a new session is stored and its token returned in the
/// `sessionid` cookie. A session presented with the request is replaced.
///
/// Returns 401 if the credentials do not match an account.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    let credentials = payload.validate()?;

    let secret = &state.config.session_secret_key;
    let previous = session_token(&headers).map(|token| session_key(&token, secret));
    let token = generate_session_token();
    let key = session_key(&token, secret);
    let ttl = state.config.session_ttl_secs;
    let db = state.db.clone();

    let account = tokio::task::spawn_blocking(move || -> Result<AccountSummary> {
        let (account_id, record) =
            accounts::authenticate(&db, &credentials.email, &credentials.password)?;
        let session = SessionRecord::new(account_id, Utc::now().timestamp(), ttl);
        sessions::start(&db, &key, &session, previous.as_deref())?;
        Ok(record.summary(account_id))
    })
    .await??;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token, &state.config))],
        Json(account),
    ))
}

/// Log out
///
/// Ends the presented session if there is one; always succeeds.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    if let Some(token) = session_token(&headers) {
        let key = session_key(&token, &state.config.session_secret_key);
        let db = state.db.clone();
        let ended = tokio::task::spawn_blocking(move || sessions::end(&db, &key)).await??;
        if ended {
            tracing::info!("Session ended");
        }
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie(&state.config))],
        Json(LogoutResponse { success: true }),
    ))
}
