use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, clear_session_cookie};
use crate::db::accounts;
use crate::error::{AppError, Result};
use crate::models::AccountSummary;
use crate::routes::validation::{AppJson, password_input};
use crate::security::verify_password;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// The logged-in account
pub async fn current_user(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AccountSummary>> {
    let db = state.db.clone();
    let account_id = user.account_id;

    let record = tokio::task::spawn_blocking(move || accounts::get(&db, account_id))
        .await??
        .ok_or(AppError::NotAuthenticated)?;

    Ok(Json(record.summary(account_id)))
}

/// Delete the logged-in account and all associated data
///
/// This endpoint permanently deletes:
/// - Account record and email registration
/// - Profile and all of its recipes
/// - Favorites made by the account, and favorites others made on its recipes
/// - All sessions of the account
///
/// # Security
/// - Requires an active session
/// - Requires the account password again
///
/// # Note
/// This action is irreversible.
pub async fn delete_account(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(payload): AppJson<DeleteAccountRequest>,
) -> Result<impl IntoResponse> {
    let password = password_input(payload.password)?;
    let db = state.db.clone();
    let account_id = user.account_id;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let record = accounts::get(&db, account_id)?.ok_or(AppError::NotAuthenticated)?;

        if !verify_password(&password, &record.password_hash)? {
            tracing::warn!("Account {} delete attempt with wrong password", account_id);
            return Err(AppError::InvalidCredentials);
        }

        accounts::delete(&db, account_id)
    })
    .await??;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie(&state.config))],
        Json(DeleteAccountResponse {
            success: true,
            message: "Account and all associated data permanently deleted".to_string(),
        }),
    ))
}
