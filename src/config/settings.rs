//! User settings for the ledger
//!
//! Manages storage naming, company details shown on reports, commit
//! behaviour and balance policy toggles.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// User settings, stored as `config.json` in the base directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name of the per-year accounts file
    #[serde(default = "default_accounts_filename")]
    pub accounts_filename: String,

    /// Name of the per-year verifications directory
    #[serde(default = "default_verifications_dirname")]
    pub verifications_dirname: String,

    /// Company name printed on reports
    #[serde(default)]
    pub company_name: String,

    /// Company registration number printed on reports
    #[serde(default)]
    pub company_number: String,

    /// Commit the data directory to git after every save
    #[serde(default = "default_true")]
    pub auto_commit: bool,

    /// Count discarded verifications when computing balances
    #[serde(default = "default_true")]
    pub include_discarded: bool,

    /// Skip unreadable verification files with a warning instead of failing
    #[serde(default)]
    pub skip_malformed_verifications: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_accounts_filename() -> String {
    "accounts.json".to_string()
}

fn default_verifications_dirname() -> String {
    "verifications".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            accounts_filename: default_accounts_filename(),
            verifications_dirname: default_verifications_dirname(),
            company_name: String::new(),
            company_number: String::new(),
            auto_commit: true,
            include_discarded: true,
            skip_malformed_verifications: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                LedgerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Paths with this configuration's file names applied
    pub fn apply_to(&self, paths: LedgerPaths) -> LedgerPaths {
        paths.with_names(&self.accounts_filename, &self.verifications_dirname)
    }

    fn validate(&self) -> Result<(), LedgerError> {
        for (key, value) in [
            ("accounts_filename", &self.accounts_filename),
            ("verifications_dirname", &self.verifications_dirname),
        ] {
            if value.trim().is_empty() || value.contains(|c: char| c == '/' || c == '\\') {
                return Err(LedgerError::Config(format!(
                    "Invalid value for {}: '{}'",
                    key, value
                )));
            }
        }
        Ok(())
    }
}
