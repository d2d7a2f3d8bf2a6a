//! Tag-driven query construction for the user table.
//!
//! `prepare_query("update", "users", &user)` yields the statement text and its
//! positional arguments; callers hand both to the connection unchanged.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StoreError};
use crate::sqlite::{
    CreateOperation, CrudOperation, DeleteOperation, Query, ReadOperation, SqlQuery,
    UpdateOperation,
};
use crate::user::{User, SELECTED_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Select,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Select => "select",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Build the operation for `user` against `table`.
    ///
    /// Only the fields the operation needs are read: insert takes username and
    /// email, select and delete take the id, update takes all three.
    pub fn build(self, table: &str, user: &User) -> CrudOperation {
        let by_id = || Query::new().with_condition("id", user.id);
        match self {
            Operation::Insert => CrudOperation::Create(CreateOperation {
                table: table.to_string(),
                data: vec![
                    ("username".to_string(), user.username.as_str().into()),
                    ("email".to_string(), user.email.as_str().into()),
                ],
            }),
            Operation::Select => CrudOperation::Read(ReadOperation {
                table: table.to_string(),
                query: by_id(),
                fields: Some(SELECTED_COLUMNS.iter().map(|c| c.to_string()).collect()),
            }),
            Operation::Update => CrudOperation::Update(UpdateOperation {
                table: table.to_string(),
                query: by_id(),
                updates: vec![
                    ("username".to_string(), user.username.as_str().into()),
                    ("email".to_string(), user.email.as_str().into()),
                ],
            }),
            Operation::Delete => CrudOperation::Delete(DeleteOperation {
                table: table.to_string(),
                query: by_id(),
            }),
        }
    }
}

impl FromStr for Operation {
    type Err = StoreError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "insert" => Ok(Operation::Insert),
            "select" => Ok(Operation::Select),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(StoreError::Build(format!("invalid operation {other:?}"))),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate an operation tag into a parameterized statement for `table`.
pub fn prepare_query(operation: &str, table: &str, user: &User) -> Result<SqlQuery> {
    operation.parse::<Operation>()?.build(table, user).to_sql()
}
