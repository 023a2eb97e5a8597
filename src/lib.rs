//! Finance tracker - personal income/expense ledger with budgets and goals
//!
//! This library provides the core functionality for the `fintrack` command-line
//! application. All data lives in local CSV files: a transaction ledger,
//! savings goals and monthly category budgets.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, goals, budgets, money)
//! - `storage`: CSV file storage layer with a cached ledger
//! - `services`: Business logic layer, including CSV import/merge
//! - `reports`: Aggregations, summaries and the budget overview
//! - `export`: CSV, JSON and YAML export
//! - `audit`: Journal of persisted changes
//! - `backup`: Timestamped backups of the data files
//! - `display`: Terminal formatting helpers
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_tracker::config::{Settings, TrackerPaths};
//! use finance_tracker::storage::Storage;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths, &settings)?;
//! let balance = finance_tracker::reports::total_balance(&storage.ledger.load()?);
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
