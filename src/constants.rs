//! Central Configuration Constants
//!
//! Single source of truth for configuration defaults.
//! Every value can be overridden through the environment (or `.env`).

/// Default classification service URL
///
/// For development the service runs locally on port 8000.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of records listed by `history`
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Submitter id used when none is configured
pub const DEFAULT_USER_ID: &str = "local";

/// SQLite file name inside the data directory
pub const DB_FILE_NAME: &str = "scans.db";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "PhishGuard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get classification service URL from environment or use default
pub fn get_api_url() -> String {
    std::env::var("PHISHGUARD_API_URL")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get request timeout from environment or use default
pub fn get_timeout_secs() -> u64 {
    std::env::var("PHISHGUARD_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Explicit SQLite path, if set
pub fn get_db_path() -> Option<String> {
    std::env::var("PHISHGUARD_DB_PATH").ok().filter(|s| !s.trim().is_empty())
}

/// Remote record store URL, if set (takes precedence over SQLite)
pub fn get_store_url() -> Option<String> {
    std::env::var("PHISHGUARD_STORE_URL")
        .ok()
        .map(|s| s.trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
}

/// Explicit export directory, if set
pub fn get_export_dir() -> Option<String> {
    std::env::var("PHISHGUARD_EXPORT_DIR").ok().filter(|s| !s.trim().is_empty())
}

/// Get submitter id from environment or use default
pub fn get_user_id() -> String {
    std::env::var("PHISHGUARD_USER_ID")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
}
