//! # lifeos-core
//!
//! Core library for lifeos - a local-first personal analytics engine.
//!
//! This library provides:
//! - Domain types for activities, goals, journal entries, and expenses
//! - SQLite storage layer with per-bucket tables
//! - Cross-module analytics: streaks, correlations, trends
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through two layers:
//! - **Records:** Normalized SQLite tables, one per module bucket
//! - **Analytics:** Pure functions over an in-memory [`StoreSnapshot`],
//!   always recomputed from the records (nothing derived is stored)
//!
//! ## Example
//!
//! ```rust,no_run
//! use lifeos_core::{analytics, Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let snapshot = db.read_snapshot().expect("failed to read records");
//! let report = analytics::comprehensive(&snapshot, chrono::Local::now().naive_local(), &config.analytics);
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{comprehensive, AnalyticsSnapshot, StoreSnapshot};
pub use config::Config;
pub use error::{Error, Result};
pub use store::Database;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod store;
pub mod types;
