//! Ledger - per-year double-entry bookkeeping
//!
//! This library provides the core of a single-user bookkeeping tool: a chart
//! of accounts and a journal of verifications per fiscal year, balance
//! computation and the yearly carry-forward of closing balances. Data is
//! stored as JSON documents under a version-controlled data directory.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, postings, verifications, money)
//! - `storage`: Per-year JSON stores and the commit hook
//! - `services`: Balance engine, year manager and use-case services
//! - `reports`: Balance and result reports
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `ledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger::config::{LedgerPaths, Settings};
//! use ledger::services::YearManager;
//! use ledger::storage::NoopCommitter;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let years = YearManager::open(paths, &settings, std::rc::Rc::new(NoopCommitter))?;
//! let engine = years.current_balance_engine()?;
//! println!("Bank: {}", engine.balance(1920)?);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
