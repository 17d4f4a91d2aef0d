use std::env;

use crate::constants::MAX_SESSION_TTL_SECS;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Server-side pepper mixed into session token hashes
    pub session_secret_key: String,
    pub session_ttl_secs: i64,
    pub secure_cookies: bool,
    /// Restrict profile/recipe mutations to their owner
    pub enforce_ownership: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/recipebox.redb".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let session_secret_key = env::var("SESSION_SECRET_KEY")
            .map_err(|_| "SESSION_SECRET_KEY must be set for session token hashing")?;
        if session_secret_key.len() < 16 {
            return Err("SESSION_SECRET_KEY must be at least 16 characters".to_string());
        }

        // Two weeks, matching common session-cookie defaults
        let session_ttl_secs = parse_session_ttl(
            &env::var("SESSION_TTL_SECS").unwrap_or_else(|_| "1209600".to_string()),
        )?;

        let secure_cookies = parse_flag("SECURE_COOKIES", environment == "production")?;
        let enforce_ownership = parse_flag("ENFORCE_OWNERSHIP", false)?;

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            session_secret_key,
            session_ttl_secs,
            secure_cookies,
            enforce_ownership,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_session_ttl(value: &str) -> Result<i64, String> {
    let ttl: i64 = value
        .trim()
        .parse()
        .map_err(|_| "Invalid SESSION_TTL_SECS")?;
    if !(1..=MAX_SESSION_TTL_SECS).contains(&ttl) {
        return Err(format!(
            "SESSION_TTL_SECS must be between 1 and {MAX_SESSION_TTL_SECS}"
        ));
    }
    Ok(ttl)
}

fn parse_flag(key: &str, default: bool) -> Result<bool, String> {
    match env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("Invalid {key}")),
        },
        Err(_) => Ok(default),
    }
}
