use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::constants::{ERR_NOT_IN_FAVORITES, MSG_FAVORITE_REMOVED};
use crate::db::favorites;
use crate::error::{AppError, Result};
use crate::models::{FavoriteOutcome, Recipe};
use crate::routes::validation::AppPath;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub message: String,
}

/// Add a recipe to the requester's favorites
///
/// Idempotent: 201 when the favorite is created, 200 when it already existed.
/// Returns 404 if the recipe does not exist.
pub async fn add_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(recipe_id): AppPath<u64>,
) -> Result<(StatusCode, Json<FavoriteResponse>)> {
    let db = state.db.clone();
    let (_, created) = tokio::task::spawn_blocking(move || {
        favorites::add(&db, user.account_id, recipe_id, Utc::now().timestamp())
    })
    .await??;

    let outcome = FavoriteOutcome::from_created(created);
    Ok((
        outcome.status(),
        Json(FavoriteResponse {
            message: outcome.message().to_string(),
        }),
    ))
}

/// Remove a recipe from the requester's favorites
///
/// Returns 404 if the recipe does not exist. A recipe that was not favorited
/// is also a 404, answered with a `message` body like the other favorite
/// responses.
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(recipe_id): AppPath<u64>,
) -> Result<(StatusCode, Json<FavoriteResponse>)> {
    let db = state.db.clone();
    let removed =
        tokio::task::spawn_blocking(move || favorites::remove(&db, user.account_id, recipe_id))
            .await?;

    let (status, message) = match removed {
        Ok(()) => (StatusCode::OK, MSG_FAVORITE_REMOVED),
        Err(AppError::NotInFavorites) => (StatusCode::NOT_FOUND, ERR_NOT_IN_FAVORITES),
        Err(e) => return Err(e),
    };

    Ok((
        status,
        Json(FavoriteResponse {
            message: message.to_string(),
        }),
    ))
}

/// Recipes the requester has favorited
pub async fn list_favorites(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Recipe>>> {
    let db = state.db.clone();
    let recipes =
        tokio::task::spawn_blocking(move || favorites::list_recipes(&db, user.account_id))
            .await??;
    Ok(Json(recipes))
}
