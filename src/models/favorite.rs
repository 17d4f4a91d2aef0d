use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::constants::{MSG_FAVORITE_ADDED, MSG_FAVORITE_EXISTS};

/// A bookmark of a recipe by an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub account_id: u64,
    pub recipe_id: u64,
    /// When the favorite was created (Unix timestamp)
    pub created_at: i64,
}

/// Result of an idempotent favorite add
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added,
    AlreadyFavorited,
}

impl FavoriteOutcome {
    pub fn from_created(created: bool) -> Self {
        if created {
            FavoriteOutcome::Added
        } else {
            FavoriteOutcome::AlreadyFavorited
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            FavoriteOutcome::Added => StatusCode::CREATED,
            FavoriteOutcome::AlreadyFavorited => StatusCode::OK,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FavoriteOutcome::Added => MSG_FAVORITE_ADDED,
            FavoriteOutcome::AlreadyFavorited => MSG_FAVORITE_EXISTS,
        }
    }
}
