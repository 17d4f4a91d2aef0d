use redb::TableDefinition;

/// Accounts table: account_id -> AccountRecord (serialized)
pub const ACCOUNTS: TableDefinition<u64, &[u8]> = TableDefinition::new("accounts");

/// Unique email index: lowercased email -> account_id
pub const ACCOUNT_EMAILS: TableDefinition<&str, u64> = TableDefinition::new("account_emails");

/// Profiles table: profile_id (== account_id) -> ProfileRecord (serialized)
pub const PROFILES: TableDefinition<u64, &[u8]> = TableDefinition::new("profiles");

/// Recipes table: recipe_id -> RecipeRecord (serialized)
pub const RECIPES: TableDefinition<u64, &[u8]> = TableDefinition::new("recipes");

/// Profile recipes index: (profile_id, recipe_id) -> created_at
/// Used for cascade delete when a profile is removed
pub const PROFILE_RECIPES: TableDefinition<(u64, u64), i64> =
    TableDefinition::new("profile_recipes");

/// Favorites: (account_id, recipe_id) -> created_at
/// The composite key is what makes a pair unique
pub const FAVORITES: TableDefinition<(u64, u64), i64> = TableDefinition::new("favorites");

/// Mirror of FAVORITES keyed by recipe first: (recipe_id, account_id) -> created_at
pub const RECIPE_FAVORITES: TableDefinition<(u64, u64), i64> =
    TableDefinition::new("recipe_favorites");

/// Sessions table: session key (peppered token hash) -> SessionRecord (serialized)
pub const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Id sequences: sequence name -> last allocated id
pub const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");
