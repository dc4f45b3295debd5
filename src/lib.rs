//! Campaign Board - Coordination Dashboard Core
//!
//! A Rust library implementing the data side of a role-based campaign
//! coordination dashboard backed by a spreadsheet-style table store.
//!
//! # Features
//!
//! - Identity resolution against a mutable Users table
//! - Append-only activity logging
//! - Per-target bulletin registry (delete-then-append replace)
//! - Aggregation of events into ranked supervisory summaries
//! - Supervisor/volunteer roster derivation

/// Activity event logging
pub mod activity;
/// Event aggregation and ranking
pub mod aggregate;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Identity resolution
pub mod identity;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Bulletin registry
pub mod registry;
/// Roster derivation
pub mod roster;
/// Table column contract and row parsing
pub mod schema;
/// Dashboard service facade
pub mod service;
/// Table-store adapters
pub mod store;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use error::{BoardError, Result};
pub use models::{
    ActivitySummary, Bulletin, LogEvent, NewUser, Role, Roster, SessionContext, User, Window,
};
pub use service::DashboardService;
pub use store::{CsvFileStore, MemoryStore, TableStore};
