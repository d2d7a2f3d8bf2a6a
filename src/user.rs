//! The user record and its table layout.

use std::fmt;

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::sqlite::{ColumnConstraint, ColumnDefinition, DataType, TableDefinition};

/// Columns read back by every fetch, in the order `row_to_user` expects them.
pub const SELECTED_COLUMNS: [&str; 3] = ["id", "username", "email"];

/// A stored user. `id` is assigned by the database; `0` means not yet stored.
///
/// `name` and `age` exist in the table for older records but are neither
/// written nor read by the store, so fetched users always carry `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub username: String,
    pub email: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} <{}>", self.id, self.username, self.email)
    }
}

/// Layout of the user table named `name`.
pub fn table_definition(name: &str) -> TableDefinition {
    TableDefinition::new(name)
        .add_column(
            ColumnDefinition::new("id", DataType::Integer)
                .with_constraint(ColumnConstraint::PrimaryKey)
                .with_constraint(ColumnConstraint::AutoIncrement),
        )
        .add_column(ColumnDefinition::new("name", DataType::Text))
        .add_column(ColumnDefinition::new("age", DataType::Integer))
        .add_column(ColumnDefinition::new("email", DataType::Text))
        .add_column(ColumnDefinition::new("username", DataType::Text))
}

/// Convert a SQLite row to a User.
///
/// Expected columns: id, username, email
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        ..User::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_table_statement() {
        assert_eq!(
            table_definition("users").create_statement().unwrap(),
            "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             name TEXT, age INTEGER, email TEXT, username TEXT)"
        );
    }

    #[test]
    fn test_json_field_names() {
        let user = User {
            id: 3,
            ..User::new("alice123", "alice@example.com")
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["username"], "alice123");
        assert_eq!(json["email"], "alice@example.com");
        assert!(json["name"].is_null());
        assert!(json["age"].is_null());
    }

    #[test]
    fn test_display() {
        let user = User {
            id: 7,
            ..User::new("jane_doe", "jane.doe@example.com")
        };
        assert_eq!(user.to_string(), "#7 jane_doe <jane.doe@example.com>");
    }

    #[test]
    fn test_row_to_user_ignores_legacy_columns() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let user = conn
            .query_row("SELECT 5, 'bob', 'bob@example.com'", [], row_to_user)
            .unwrap();
        assert_eq!(
            user,
            User {
                id: 5,
                ..User::new("bob", "bob@example.com")
            }
        );
    }
}
