//! Tally - Terminal-based personal finance tracker
//!
//! This library provides the core functionality for the Tally application:
//! per-user income and expense tracking with search, reports, budget limits,
//! savings goals and recurring transactions.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, transactions, recurring rules, ...)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer and the pure evaluators
//! - `reports`: Dashboard, monthly, category and trend reports
//! - `audit`: Audit logging system
//! - `backup`: Backup and restore
//! - `export`: CSV, JSON and YAML export
//! - `display`, `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_cli::config::{paths::TallyPaths, settings::Settings};
//! use tally_cli::storage::Storage;
//!
//! let paths = TallyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod dates;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TallyError, TallyResult};
