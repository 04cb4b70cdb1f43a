//! People Store — person records in SQLite with equality filtering and
//! pagination.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::*;
