//! Centralized path management
//!
//! This module provides utilities for consistently locating the data
//! directory, cache database, and configuration file across platforms.

use std::path::PathBuf;

/// The name of the application data directory used across all platforms
const APP_DATA_DIR: &str = "glossa";

/// The name of the cache database file
const DATABASE_FILE: &str = "glossa.db";

/// Returns the base data directory for the application
///
/// Uses the platform data directory (`~/.local/share/glossa` on Linux,
/// `%APPDATA%/glossa` on Windows). Falls back to `.glossa` in the current
/// directory when the standard location cannot be determined.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(".glossa"))
}

/// Returns the path to the cache database file
pub fn get_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE)
}

/// Returns the path to the configuration file
///
/// Honors `XDG_CONFIG_HOME` on Unix-like systems before falling back to the
/// platform config directory.
pub fn get_config_path() -> PathBuf {
    #[cfg(not(target_os = "windows"))]
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config).join("glossa/config.toml");
    }

    dirs::config_dir()
        .map(|d| d.join("glossa/config.toml"))
        .unwrap_or_else(|| PathBuf::from(".glossa/config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_is_under_data_dir() {
        let db = get_database_path();
        assert!(db.starts_with(get_data_dir()));
        assert_eq!(db.file_name().unwrap(), DATABASE_FILE);
    }
}
