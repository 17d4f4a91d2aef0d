pub mod account;
pub mod favorite;
pub mod profile;
pub mod recipe;
pub mod session;

pub use account::{AccountRecord, AccountSummary};
pub use favorite::{Favorite, FavoriteOutcome};
pub use profile::{Profile, ProfileChanges, ProfileRecord};
pub use recipe::{NewRecipe, Recipe, RecipeChanges, RecipeRecord};
pub use session::SessionRecord;
