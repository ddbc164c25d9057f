//! Configuration module

use std::path::PathBuf;

use crate::constants;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Classification service base URL
    pub api_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Local scan history database
    pub db_path: PathBuf,

    /// Remote record store; when set, SQLite is not used
    pub store_url: Option<String>,

    /// Where exported reports are written
    pub export_dir: PathBuf,

    /// Submitter id for stored scans
    pub user_id: String,
}

impl AppConfig {
    /// Load configuration from `.env` and environment variables
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::info!("Loaded environment from {}", path.display());
        }

        Self {
            api_url: constants::get_api_url(),
            timeout_secs: constants::get_timeout_secs(),
            db_path: constants::get_db_path()
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            store_url: constants::get_store_url(),
            export_dir: constants::get_export_dir()
                .map(PathBuf::from)
                .unwrap_or_else(default_export_dir),
            user_id: constants::get_user_id(),
        }
    }
}

/// `<data dir>/PhishGuard/scans.db`, or the working directory as a fallback
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(constants::APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::DB_FILE_NAME)
}

/// The user's download directory, then home, then the working directory
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert!(default_db_path().ends_with("scans.db"));
        assert!(!default_export_dir().as_os_str().is_empty());
    }
}
