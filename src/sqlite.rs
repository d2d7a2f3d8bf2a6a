use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use crate::error::{Result, StoreError};

/// Default location of the database file.
pub const DEFAULT_DB_PATH: &str = "users.db";

/// Default name of the user table.
pub const DEFAULT_TABLE: &str = "users";

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Positional parameter bindings for SQL queries, in placeholder order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    pub values: Vec<Value>,
}

impl Params {
    /// Create a new Params object
    pub fn new() -> Self {
        Self::default()
    }
    /// Append a value for the next placeholder
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }
}

/// SQL Query with typed parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub statement: String,
    pub params: Params,
}

impl SqlQuery {
    pub fn new(statement: &str) -> Self {
        Self {
            statement: statement.to_string(),
            params: Params::new(),
        }
    }
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// Conjunction of equality conditions, rendered in insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Query {
    pub conditions: Vec<(String, Value)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_condition(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((field.to_string(), value.into()));
        self
    }

    fn render(&self, statement: &mut String, params: &mut Params) -> Result<()> {
        for (i, (field, value)) in self.conditions.iter().enumerate() {
            statement.push_str(if i == 0 { " WHERE " } else { " AND " });
            statement.push_str(identifier(field)?);
            statement.push_str(" = ?");
            params.values.push(value.clone());
        }
        Ok(())
    }
}

/// CRUD operation types
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOperation {
    pub table: String,
    pub data: Vec<(String, Value)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadOperation {
    pub table: String,
    pub query: Query,
    /// Selected columns; `None` selects every column.
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOperation {
    pub table: String,
    pub query: Query,
    pub updates: Vec<(String, Value)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOperation {
    pub table: String,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CrudOperation {
    Create(CreateOperation),
    Read(ReadOperation),
    Update(UpdateOperation),
    Delete(DeleteOperation),
}

impl CrudOperation {
    /// Render the operation into a statement with `?` placeholders and its
    /// positional arguments. Values never end up in the statement text.
    pub fn to_sql(&self) -> Result<SqlQuery> {
        let mut params = Params::new();
        let statement = match self {
            CrudOperation::Create(op) => {
                if op.data.is_empty() {
                    return Err(StoreError::Build(format!(
                        "insert into {} has no columns",
                        op.table
                    )));
                }
                let columns = op
                    .data
                    .iter()
                    .map(|(column, _)| identifier(column))
                    .collect::<Result<Vec<_>>>()?;
                params.values.extend(op.data.iter().map(|(_, v)| v.clone()));
                format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    identifier(&op.table)?,
                    columns.join(", "),
                    vec!["?"; columns.len()].join(", ")
                )
            }
            CrudOperation::Read(op) => {
                let fields = match &op.fields {
                    Some(fields) if fields.is_empty() => {
                        return Err(StoreError::Build(format!(
                            "select from {} has an empty column list",
                            op.table
                        )))
                    }
                    Some(fields) => fields
                        .iter()
                        .map(|f| identifier(f))
                        .collect::<Result<Vec<_>>>()?
                        .join(", "),
                    None => "*".to_string(),
                };
                let mut statement = format!("SELECT {} FROM {}", fields, identifier(&op.table)?);
                op.query.render(&mut statement, &mut params)?;
                statement
            }
            CrudOperation::Update(op) => {
                if op.updates.is_empty() {
                    return Err(StoreError::Build(format!(
                        "update of {} has no assignments",
                        op.table
                    )));
                }
                let mut assignments = Vec::with_capacity(op.updates.len());
                for (column, value) in &op.updates {
                    assignments.push(format!("{} = ?", identifier(column)?));
                    params.values.push(value.clone());
                }
                let mut statement = format!(
                    "UPDATE {} SET {}",
                    identifier(&op.table)?,
                    assignments.join(", ")
                );
                op.query.render(&mut statement, &mut params)?;
                statement
            }
            CrudOperation::Delete(op) => {
                let mut statement = format!("DELETE FROM {}", identifier(&op.table)?);
                op.query.render(&mut statement, &mut params)?;
                statement
            }
        };
        Ok(SqlQuery::new(&statement).with_params(params))
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`; anything else cannot be spliced into a statement.
fn identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(StoreError::Build(format!("invalid identifier {name:?}")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Idempotent `CREATE TABLE IF NOT EXISTS` statement for this table.
    pub fn create_statement(&self) -> Result<String> {
        if self.columns.is_empty() {
            return Err(StoreError::Build(format!("table {} has no columns", self.name)));
        }
        let columns = self
            .columns
            .iter()
            .map(ColumnDefinition::render)
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            identifier(&self.name)?,
            columns.join(", ")
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn render(&self) -> Result<String> {
        let mut column = format!("{} {}", identifier(&self.name)?, self.data_type.as_sql());
        for constraint in &self.constraints {
            column.push(' ');
            column.push_str(constraint.as_sql());
        }
        Ok(column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConstraint {
    PrimaryKey,
    AutoIncrement,
    NotNull,
}

impl ColumnConstraint {
    fn as_sql(self) -> &'static str {
        match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY",
            ColumnConstraint::AutoIncrement => "AUTOINCREMENT",
            ColumnConstraint::NotNull => "NOT NULL",
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub db_path: String,
    /// Name of the table holding user records
    pub table: String,
}

impl StoreConfig {
    /// Create a new config with path and table name
    pub fn new(db_path: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            table: table.into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH, DEFAULT_TABLE)
    }
}
