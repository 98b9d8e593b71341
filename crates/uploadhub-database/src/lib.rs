//! # uploadhub-database
//!
//! PostgreSQL connection management, migrations, and the metadata ledger
//! implementations (PostgreSQL and in-memory).

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{InMemoryLedger, UploadRecordRepository, build_ledger};
