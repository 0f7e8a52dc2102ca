//! Per-connection setup.
//!
//! Tables themselves are created by callers through
//! [`RecordStore::create_table`](strata_core::RecordStore::create_table).

/// Run on every connection. SQLite leaves foreign keys off by default, which
/// would silently disable `ON DELETE CASCADE`.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Run only on file-backed connections.
pub const FILE_PRAGMAS: &str = "PRAGMA journal_mode = WAL;";
