use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::{CurrentUser, ownership_scope};
use crate::constants::{MAX_RECIPE_TEXT_LENGTH, MAX_TITLE_LENGTH};
use crate::db::recipes;
use crate::error::{AppError, Result};
use crate::models::{NewRecipe, Recipe, RecipeChanges};
use crate::routes::validation::{AppJson, AppPath, required_text, updated_text};
use crate::AppState;

/// Body for recipe create (POST), replace (PUT) and partial update (PATCH)
#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    /// Owning profile; defaults to the requester's own on create
    pub user_profile: Option<u64>,
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub equipment: Option<String>,
    pub ingredients: Option<String>,
}

impl RecipeRequest {
    /// Full recipe content owned by `profile_id`; every text field is required
    pub fn into_new(self, profile_id: u64) -> Result<NewRecipe> {
        Ok(NewRecipe {
            profile_id,
            title: required_text("title", self.title, MAX_TITLE_LENGTH)?,
            instructions: required_text("instructions", self.instructions, MAX_RECIPE_TEXT_LENGTH)?,
            equipment: required_text("equipment", self.equipment, MAX_RECIPE_TEXT_LENGTH)?,
            ingredients: required_text("ingredients", self.ingredients, MAX_RECIPE_TEXT_LENGTH)?,
        })
    }

    /// Full replacement; the owner is kept unless `user_profile` is given
    pub fn into_replacement(self) -> Result<RecipeChanges> {
        let profile_id = self.user_profile;
        let content = self.into_new(0)?;
        Ok(RecipeChanges {
            profile_id,
            ..RecipeChanges::from(content)
        })
    }

    /// Only the fields present in the body
    pub fn into_changes(self) -> Result<RecipeChanges> {
        Ok(RecipeChanges {
            profile_id: self.user_profile,
            title: updated_text("title", self.title, MAX_TITLE_LENGTH)?,
            instructions: updated_text("instructions", self.instructions, MAX_RECIPE_TEXT_LENGTH)?,
            equipment: updated_text("equipment", self.equipment, MAX_RECIPE_TEXT_LENGTH)?,
            ingredients: updated_text("ingredients", self.ingredients, MAX_RECIPE_TEXT_LENGTH)?,
        })
    }
}

/// List all recipes, ordered by id
pub async fn list_recipes(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Recipe>>> {
    let db = state.db.clone();
    let recipes = tokio::task::spawn_blocking(move || recipes::list(&db)).await??;
    Ok(Json(recipes))
}

/// Create a recipe
///
/// Returns 400 if a field is missing or `user_profile` does not exist, and
/// 403 when ownership is enforced and `user_profile` is someone else's.
pub async fn create_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(payload): AppJson<RecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>)> {
    let profile_id = payload.user_profile.unwrap_or(user.account_id);
    if let Some(owner) = ownership_scope(&state.config, Some(&user))?
        && owner != profile_id
    {
        tracing::warn!(
            "Account {} attempted to create a recipe for profile {}",
            owner,
            profile_id
        );
        return Err(AppError::Forbidden);
    }

    let new = payload.into_new(profile_id)?;
    let db = state.db.clone();
    let recipe =
        tokio::task::spawn_blocking(move || recipes::create(&db, new, Utc::now().timestamp()))
            .await??;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn retrieve_recipe(
    State(state): State<AppState>,
    _user: CurrentUser,
    AppPath(recipe_id): AppPath<u64>,
) -> Result<Json<Recipe>> {
    let db = state.db.clone();
    let recipe = tokio::task::spawn_blocking(move || recipes::get(&db, recipe_id)).await??;
    Ok(Json(recipe))
}

/// Replace a recipe (PUT)
pub async fn update_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(recipe_id): AppPath<u64>,
    AppJson(payload): AppJson<RecipeRequest>,
) -> Result<Json<Recipe>> {
    let changes = payload.into_replacement()?;
    save_changes(state, user, recipe_id, changes).await
}

/// Update some fields of a recipe (PATCH)
pub async fn patch_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(recipe_id): AppPath<u64>,
    AppJson(payload): AppJson<RecipeRequest>,
) -> Result<Json<Recipe>> {
    let changes = payload.into_changes()?;
    save_changes(state, user, recipe_id, changes).await
}

async fn save_changes(
    state: AppState,
    user: CurrentUser,
    recipe_id: u64,
    changes: RecipeChanges,
) -> Result<Json<Recipe>> {
    let owner = ownership_scope(&state.config, Some(&user))?;
    let db = state.db.clone();
    let recipe = tokio::task::spawn_blocking(move || {
        recipes::update(&db, recipe_id, changes, owner, Utc::now().timestamp())
    })
    .await??;
    Ok(Json(recipe))
}

/// Delete a recipe and the favorites pointing at it
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(recipe_id): AppPath<u64>,
) -> Result<StatusCode> {
    let owner = ownership_scope(&state.config, Some(&user))?;
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || recipes::delete(&db, recipe_id, owner)).await??;
    Ok(StatusCode::NO_CONTENT)
}
