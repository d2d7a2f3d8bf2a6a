//! SQLite storage for user records.
//!
//! # Intention
//!
//! - Keep user records in one table of a local SQLite file.
//! - Build every statement from typed operations with bind parameters, so
//!   record values never become part of the SQL text.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - The connection is opened once and passed around; nothing opens a
//!   connection per call.

pub mod error;
pub mod query;
pub mod sqlite;
pub mod store;
pub mod user;

pub use error::{Result, StoreError};
pub use query::{prepare_query, Operation};
pub use sqlite::StoreConfig;
pub use store::UserStore;
pub use user::User;

/// Greeting printed by the demo binary on startup.
pub fn hello_world() -> &'static str {
    "Hello world!"
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_hello_world() {
        assert_eq!(super::hello_world(), "Hello world!");
    }
}
