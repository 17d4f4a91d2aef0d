/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "sessionid";

/// Random bytes in a session token (hex encoded on the wire)
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Upper bound for `SESSION_TTL_SECS` (one year)
pub const MAX_SESSION_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Maximum email length (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Password length bounds
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_IMAGE_REF_LENGTH: usize = 255;
pub const MAX_TITLE_LENGTH: usize = 255;

/// Upper bound for free-text recipe fields (instructions, equipment, ingredients)
pub const MAX_RECIPE_TEXT_LENGTH: usize = 20_000;

// =============================================================================
// Response Messages
// =============================================================================

pub const MSG_FAVORITE_ADDED: &str = "Recipe added to favorites";
pub const MSG_FAVORITE_EXISTS: &str = "Recipe already in favorites";
pub const MSG_FAVORITE_REMOVED: &str = "Recipe removed from favorites";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_EMAIL_TAKEN: &str = "An account with this email already exists";

pub const ERR_INVALID_EMAIL: &str = "Enter a valid email address";

pub const ERR_INVALID_CREDENTIALS: &str = "Invalid email or password";

pub const ERR_NOT_AUTHENTICATED: &str = "Authentication credentials were not provided";

pub const ERR_FORBIDDEN: &str = "You do not have permission to perform this action";

pub const ERR_PROFILE_NOT_FOUND: &str = "Profile not found";

pub const ERR_RECIPE_NOT_FOUND: &str = "Recipe not found";

pub const ERR_NOT_FOUND: &str = "Not found";

pub const ERR_NOT_IN_FAVORITES: &str = "Recipe not in favorites";

pub const ERR_PROFILE_EXISTS: &str = "A profile already exists for this account";

pub const ERR_WEAK_PASSWORD: &str =
    "Password must be 8-128 characters and contain at least one letter and one digit";
