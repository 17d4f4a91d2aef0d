pub mod account;
pub mod favorites;
pub mod health;
pub mod profiles;
pub mod recipes;
pub mod register;
pub mod session;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use account::{current_user, delete_account};
pub use favorites::{add_favorite, list_favorites, remove_favorite};
pub use health::health_check;
pub use profiles::{
    create_profile, delete_profile, list_profiles, patch_profile, retrieve_profile,
    update_profile,
};
pub use recipes::{
    create_recipe, delete_recipe, list_recipes, patch_recipe, retrieve_recipe, update_recipe,
};
pub use register::register_user;
pub use session::{login, logout};

use crate::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register_user))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/user", get(current_user).delete(delete_account))
        .route("/api/profiles", get(list_profiles).post(create_profile))
        .route(
            "/api/profiles/{id}",
            get(retrieve_profile)
                .put(update_profile)
                .patch(patch_profile)
                .delete(delete_profile),
        )
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/{id}",
            get(retrieve_recipe)
                .put(update_recipe)
                .patch(patch_recipe)
                .delete(delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/api/favorites", get(list_favorites))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
