//! User repository over a single SQLite connection.

use rusqlite::{params_from_iter, Connection};

use crate::error::{Result, StoreError};
use crate::query::Operation;
use crate::sqlite::{CrudOperation, Query, ReadOperation, SqlQuery, StoreConfig};
use crate::user::{row_to_user, table_definition, User, SELECTED_COLUMNS};

/// CRUD access to the user table.
///
/// The store owns at most one connection, opened once and reused by every
/// operation. Operations on a store without a connection fail with
/// [`StoreError::Unavailable`].
pub struct UserStore {
    config: StoreConfig,
    connection: Option<Connection>,
}

impl UserStore {
    /// Create a store that is not connected yet.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    /// Open the database file named in `config`, creating it if needed.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let mut store = Self::new(config);
        store.connect()?;
        Ok(store)
    }

    /// Wrap a connection owned by the caller, e.g. an in-memory database.
    pub fn with_connection(config: StoreConfig, connection: Connection) -> Self {
        Self {
            config,
            connection: Some(connection),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Open the configured database, replacing any existing connection.
    pub fn connect(&mut self) -> Result<()> {
        let path = &self.config.db_path;
        let connection = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path, "opened user database");
        self.connection = Some(connection);
        Ok(())
    }

    /// Close the connection. Later operations fail with `Unavailable`.
    pub fn close(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            connection
                .close()
                .map_err(|(_, err)| StoreError::Execute(err))?;
            tracing::info!(path = %self.config.db_path, "closed user database");
        }
        Ok(())
    }

    /// The live connection, for statements the store does not cover.
    pub fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(StoreError::Unavailable)
    }

    /// Create the user table unless it already exists.
    pub fn create_table(&self) -> Result<()> {
        let conn = self.connection()?;
        let statement = table_definition(&self.config.table).create_statement()?;
        tracing::debug!(%statement, "ensuring user table");
        conn.execute(&statement, []).map_err(StoreError::Execute)?;
        tracing::info!(table = %self.config.table, "user table ready");
        Ok(())
    }

    /// Insert `user` and return the identifier the database assigned.
    ///
    /// `user.id` is ignored.
    pub fn insert(&self, user: &User) -> Result<i64> {
        let conn = self.connection()?;
        self.execute(conn, Operation::Insert, user)?;
        Ok(conn.last_insert_rowid())
    }

    pub fn select(&self, id: i64) -> Result<User> {
        let conn = self.connection()?;
        let query = self.prepare(Operation::Select, &User { id, ..User::default() })?;
        conn.query_row(&query.statement, params_from_iter(query.params.iter()), row_to_user)
            .map_err(|err| StoreError::from_fetch(err, id))
    }

    /// Replace username and email of the row with `user.id`.
    ///
    /// Returns the number of rows changed; a missing id is not an error.
    pub fn update(&self, user: &User) -> Result<usize> {
        let conn = self.connection()?;
        self.execute(conn, Operation::Update, user)
    }

    /// Delete the row with `id`. Returns the number of rows removed.
    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.connection()?;
        self.execute(conn, Operation::Delete, &User { id, ..User::default() })
    }

    /// Every user in the order the database returns them.
    pub fn select_all(&self) -> Result<Vec<User>> {
        let conn = self.connection()?;
        let query = CrudOperation::Read(ReadOperation {
            table: self.config.table.clone(),
            query: Query::new(),
            fields: Some(SELECTED_COLUMNS.iter().map(|c| c.to_string()).collect()),
        })
        .to_sql()?;
        tracing::debug!(statement = %query.statement, "selecting all users");

        let mut stmt = conn.prepare(&query.statement).map_err(StoreError::Execute)?;
        let rows = stmt.query_map([], row_to_user).map_err(StoreError::Execute)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row.map_err(StoreError::from_row)?);
        }
        Ok(users)
    }

    fn prepare(&self, operation: Operation, user: &User) -> Result<SqlQuery> {
        let query = operation.build(&self.config.table, user).to_sql()?;
        tracing::debug!(
            %operation,
            statement = %query.statement,
            args = query.params.len(),
            "prepared user query"
        );
        Ok(query)
    }

    fn execute(&self, conn: &Connection, operation: Operation, user: &User) -> Result<usize> {
        let query = self.prepare(operation, user)?;
        let changed = conn
            .execute(&query.statement, params_from_iter(query.params.iter()))
            .map_err(StoreError::Execute)?;
        tracing::debug!(%operation, changed, "executed user query");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> UserStore {
        let conn = Connection::open_in_memory().unwrap();
        UserStore::with_connection(StoreConfig::default(), conn)
    }

    #[test]
    fn test_unconnected_store_is_unavailable() {
        let store = UserStore::new(StoreConfig::default());
        assert!(!store.is_connected());
        assert!(matches!(store.create_table(), Err(StoreError::Unavailable)));
        assert!(matches!(store.select_all(), Err(StoreError::Unavailable)));
    }

    #[test]
    fn test_invalid_table_name_fails_before_execution() {
        let conn = Connection::open_in_memory().unwrap();
        let store = UserStore::with_connection(StoreConfig::new(":memory:", "bad name"), conn);
        assert!(matches!(store.create_table(), Err(StoreError::Build(_))));
        assert!(matches!(store.select(1), Err(StoreError::Build(_))));
    }

    #[test]
    fn test_missing_table_is_an_execution_error() {
        let store = memory_store();
        assert!(matches!(
            store.insert(&User::new("a", "a@example.com")),
            Err(StoreError::Execute(_))
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut store = memory_store();
        store.close().unwrap();
        store.close().unwrap();
        assert!(!store.is_connected());
    }
}
