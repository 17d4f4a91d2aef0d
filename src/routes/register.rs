use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Deserialize;

use crate::constants::{MAX_BIO_LENGTH, MAX_IMAGE_REF_LENGTH, MAX_NAME_LENGTH};
use crate::db::accounts;
use crate::error::Result;
use crate::models::{Profile, ProfileRecord};
use crate::routes::validation::{
    AppJson, email_address, optional_text, required_text, validate_password,
};
use crate::security::hash_password;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Registration input that passed validation
#[derive(Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub profile: ProfileRecord,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration> {
        let email = email_address(self.email)?;

        let password = self.password.unwrap_or_default();
        validate_password(&password)?;

        let profile = ProfileRecord {
            name: required_text("name", self.name, MAX_NAME_LENGTH)?,
            bio: optional_text("bio", self.bio, MAX_BIO_LENGTH)?.unwrap_or_default(),
            image: optional_text("image", self.image, MAX_IMAGE_REF_LENGTH)?
                .filter(|image| !image.is_empty()),
        };

        Ok(Registration {
            email,
            password,
            profile,
        })
    }
}

/// Register a new account
///
/// Creates the account and its profile atomically and returns the profile.
///
/// Returns 400 if the email is malformed or already registered, or if the
/// password does not meet the complexity rules.
pub async fn register_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Profile>)> {
    let registration = payload.validate()?;
    let db = state.db.clone();

    let profile = tokio::task::spawn_blocking(move || {
        let password_hash = hash_password(&registration.password)?;
        accounts::create_with_profile(
            &db,
            &registration.email,
            password_hash,
            registration.profile,
            Utc::now().timestamp(),
        )
    })
    .await??;

    Ok((StatusCode::CREATED, Json(profile)))
}
