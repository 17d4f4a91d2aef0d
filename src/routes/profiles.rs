use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::{CurrentUser, ownership_scope};
use crate::constants::{MAX_BIO_LENGTH, MAX_IMAGE_REF_LENGTH, MAX_NAME_LENGTH};
use crate::db::profiles;
use crate::error::Result;
use crate::models::{Profile, ProfileChanges, ProfileRecord};
use crate::routes::validation::{AppJson, AppPath, optional_text, required_text, updated_text};
use crate::AppState;

/// Body for profile create (POST), replace (PUT) and partial update (PATCH)
///
/// An empty `image` removes the image.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl ProfileRequest {
    /// Full profile content; `name` is required
    pub fn into_record(self) -> Result<ProfileRecord> {
        Ok(ProfileRecord {
            name: required_text("name", self.name, MAX_NAME_LENGTH)?,
            bio: optional_text("bio", self.bio, MAX_BIO_LENGTH)?.unwrap_or_default(),
            image: optional_text("image", self.image, MAX_IMAGE_REF_LENGTH)?
                .filter(|image| !image.is_empty()),
        })
    }

    /// Only the fields present in the body
    pub fn into_changes(self) -> Result<ProfileChanges> {
        Ok(ProfileChanges {
            name: updated_text("name", self.name, MAX_NAME_LENGTH)?,
            bio: optional_text("bio", self.bio, MAX_BIO_LENGTH)?,
            image: optional_text("image", self.image, MAX_IMAGE_REF_LENGTH)?
                .map(|image| Some(image).filter(|image| !image.is_empty())),
        })
    }
}

/// List profiles visible to the requester: only their own
pub async fn list_profiles(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Profile>>> {
    let db = state.db.clone();
    let profiles =
        tokio::task::spawn_blocking(move || profiles::list_own(&db, user.account_id)).await??;
    Ok(Json(profiles))
}

/// Create the requester's profile
///
/// Registration already creates one; this only succeeds after the profile
/// was deleted. Returns 400 if the account already has a profile.
pub async fn create_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(payload): AppJson<ProfileRequest>,
) -> Result<(StatusCode, Json<Profile>)> {
    let record = payload.into_record()?;
    let db = state.db.clone();
    let profile =
        tokio::task::spawn_blocking(move || profiles::create(&db, user.account_id, record))
            .await??;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn retrieve_profile(
    State(state): State<AppState>,
    AppPath(profile_id): AppPath<u64>,
) -> Result<Json<Profile>> {
    let db = state.db.clone();
    let profile = tokio::task::spawn_blocking(move || profiles::get(&db, profile_id)).await??;
    Ok(Json(profile))
}

/// Replace a profile (PUT)
pub async fn update_profile(
    State(state): State<AppState>,
    AppPath(profile_id): AppPath<u64>,
    user: Option<CurrentUser>,
    AppJson(payload): AppJson<ProfileRequest>,
) -> Result<Json<Profile>> {
    let owner = ownership_scope(&state.config, user.as_ref())?;
    let record = payload.into_record()?;
    let changes = ProfileChanges {
        name: Some(record.name),
        bio: Some(record.bio),
        image: Some(record.image),
    };
    save_changes(state, profile_id, changes, owner).await
}

/// Update some fields of a profile (PATCH)
pub async fn patch_profile(
    State(state): State<AppState>,
    AppPath(profile_id): AppPath<u64>,
    user: Option<CurrentUser>,
    AppJson(payload): AppJson<ProfileRequest>,
) -> Result<Json<Profile>> {
    let owner = ownership_scope(&state.config, user.as_ref())?;
    let changes = payload.into_changes()?;
    save_changes(state, profile_id, changes, owner).await
}

async fn save_changes(
    state: AppState,
    profile_id: u64,
    changes: ProfileChanges,
    owner: Option<u64>,
) -> Result<Json<Profile>> {
    let db = state.db.clone();
    let profile =
        tokio::task::spawn_blocking(move || profiles::update(&db, profile_id, changes, owner))
            .await??;
    Ok(Json(profile))
}

/// Delete a profile and its recipes; the account remains
pub async fn delete_profile(
    State(state): State<AppState>,
    AppPath(profile_id): AppPath<u64>,
    user: Option<CurrentUser>,
) -> Result<StatusCode> {
    let owner = ownership_scope(&state.config, user.as_ref())?;
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || profiles::delete(&db, profile_id, owner)).await??;
    Ok(StatusCode::NO_CONTENT)
}
