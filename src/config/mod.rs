//! Configuration module for the ledger
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution and the per-year directory layout
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
