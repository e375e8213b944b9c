//! Path management for the ledger
//!
//! Provides XDG-compliant path resolution for configuration and the
//! per-year data directories.
//!
//! ## Path Resolution Order
//!
//! 1. `LEDGER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/ledger` or `~/.config/ledger`
//! 3. Windows: `%APPDATA%\ledger`
//!
//! ## Layout
//!
//! ```text
//! <base>/config.json
//! <base>/data/                 (version-controlled)
//! <base>/data/2024/accounts.json
//! <base>/data/2024/verifications/verification_2024-01-10_0.json
//! ```

use std::path::{Path, PathBuf};

use crate::error::LedgerError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "LEDGER_DATA_DIR";

const DEFAULT_ACCOUNTS_FILENAME: &str = "accounts.json";
const DEFAULT_VERIFICATIONS_DIRNAME: &str = "verifications";

/// Manages all paths used by the ledger
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    /// Base directory for config and data
    base_dir: PathBuf,
    accounts_filename: String,
    verifications_dirname: String,
}

impl LedgerPaths {
    /// Create a new LedgerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self::with_base_dir(base_dir))
    }

    /// Create LedgerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            accounts_filename: DEFAULT_ACCOUNTS_FILENAME.to_string(),
            verifications_dirname: DEFAULT_VERIFICATIONS_DIRNAME.to_string(),
        }
    }

    /// Override the per-year file and directory names
    pub fn with_names(
        mut self,
        accounts_filename: impl Into<String>,
        verifications_dirname: impl Into<String>,
    ) -> Self {
        self.accounts_filename = accounts_filename.into();
        self.verifications_dirname = verifications_dirname.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Root of the version-controlled data (one subdirectory per year)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Directory holding one fiscal year
    pub fn year_dir(&self, year: i32) -> PathBuf {
        self.data_dir().join(format!("{:04}", year))
    }

    /// Accounts file of a fiscal year
    pub fn accounts_file(&self, year: i32) -> PathBuf {
        self.year_dir(year).join(&self.accounts_filename)
    }

    /// Verifications directory of a fiscal year
    pub fn verifications_dir(&self, year: i32) -> PathBuf {
        self.year_dir(year).join(&self.verifications_dirname)
    }

    /// Years that have an accounts file on disk, ascending
    pub fn account_years(&self) -> Result<Vec<i32>, LedgerError> {
        self.scan_years(|paths, year| paths.accounts_file(year).is_file())
    }

    /// Years that have a verifications directory on disk, ascending
    pub fn verification_years(&self) -> Result<Vec<i32>, LedgerError> {
        self.scan_years(|paths, year| paths.verifications_dir(year).is_dir())
    }

    fn scan_years<F>(&self, has_data: F) -> Result<Vec<i32>, LedgerError>
    where
        F: Fn(&Self, i32) -> bool,
    {
        let data_dir = self.data_dir();
        if !data_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&data_dir).map_err(|e| {
            LedgerError::Io(format!("Failed to read {}: {}", data_dir.display(), e))
        })?;

        let mut years = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| LedgerError::Io(format!("Failed to read directory entry: {}", e)))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(year) = parse_year_dir(&name) {
                if has_data(self, year) {
                    years.push(year);
                }
            }
        }

        years.sort_unstable();
        Ok(years)
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

/// Year directories are named by exactly four digits
fn parse_year_dir(name: &str) -> Option<i32> {
    if name.len() == 4 && name.chars().all(|c| c.is_ascii_digit()) {
        name.parse().ok()
    } else {
        None
    }
}

/// Resolve the default base directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| LedgerError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("ledger"))
}

/// Resolve the default base directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LedgerError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("ledger"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_ENV, custom_path);
        let paths = LedgerPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());
        env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_year_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(
            paths.accounts_file(2024),
            temp_dir.path().join("data").join("2024").join("accounts.json")
        );
        assert_eq!(
            paths.verifications_dir(2024),
            temp_dir.path().join("data").join("2024").join("verifications")
        );

        let renamed = paths.with_names("kontoplan.json", "ver");
        assert!(renamed.accounts_file(2024).ends_with("2024/kontoplan.json"));
        assert!(renamed.verifications_dir(2024).ends_with("2024/ver"));
    }

    #[test]
    fn test_scan_years() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert!(paths.account_years().unwrap().is_empty());

        std::fs::create_dir_all(paths.verifications_dir(2023)).unwrap();
        std::fs::create_dir_all(paths.verifications_dir(2022)).unwrap();
        std::fs::write(paths.accounts_file(2023), "[]").unwrap();
        std::fs::create_dir_all(paths.data_dir().join("notayear")).unwrap();
        std::fs::create_dir_all(paths.data_dir().join(".git")).unwrap();

        assert_eq!(paths.verification_years().unwrap(), vec![2022, 2023]);
        assert_eq!(paths.account_years().unwrap(), vec![2023]);
    }

    #[test]
    fn test_parse_year_dir() {
        assert_eq!(parse_year_dir("2024"), Some(2024));
        assert_eq!(parse_year_dir("24"), None);
        assert_eq!(parse_year_dir("20245"), None);
        assert_eq!(parse_year_dir("abcd"), None);
    }
}
