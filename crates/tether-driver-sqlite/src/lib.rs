mod value;
pub(crate) use value::Value;

use rusqlite::Connection;
use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};
use tether_core::{
    async_trait,
    driver::{operation::Operation, Driver, Response},
    err, stmt, Error, Result, Schema,
};
use tether_sql::{self as sql, Serializer};
use url::Url;

/// A driver over a single SQLite connection.
///
/// Operations run one at a time; the connection is guarded by a mutex.
#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<Connection>,
}

impl Sqlite {
    /// Open a connection from a `sqlite:` URL.
    ///
    /// `sqlite::memory:` opens an in-memory database, `sqlite:<path>` a
    /// database file.
    pub fn new(url: &str) -> Result<Self> {
        let parsed =
            Url::parse(url).map_err(|e| err!("invalid connection url `{url}`: {e}"))?;

        if parsed.scheme() != "sqlite" {
            return Err(err!(
                "connection url does not have a `sqlite` scheme; url={url}"
            ));
        }

        if parsed.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(parsed.path())
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(Error::storage)?;
        Ok(Self::from_connection(connection))
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).map_err(Error::storage)?;
        Ok(Self::from_connection(connection))
    }

    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| err!("sqlite connection lock poisoned"))
    }

    fn execute_ddl(&self, stmt: &sql::Statement) -> Result<()> {
        let mut params = Vec::<stmt::Value>::new();
        let sql = Serializer::sqlite().serialize(stmt, &stmt::Params::new(), &mut params)?;
        debug_assert!(params.is_empty());

        tracing::trace!(%sql, "sqlite ddl");

        self.connection()?
            .execute_batch(&sql)
            .map_err(Error::storage)
    }
}

#[async_trait]
impl Driver for Sqlite {
    async fn push_schema(&self, schema: &Schema) -> Result<()> {
        for table in schema.tables() {
            self.execute_ddl(&sql::Statement::create_table(table))?;
        }

        Ok(())
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let (stmt, named) = match op {
            Operation::Query(op) => (op.stmt, op.params),
            Operation::Execute(op) => (op.stmt, op.params),
            Operation::Transaction(op) => {
                let sql = Serializer::sqlite().serialize_transaction(op);
                self.connection()?
                    .execute_batch(sql)
                    .map_err(Error::storage)?;
                return Ok(Response::count(0));
            }
        };

        let stmt = sql::Statement::from(stmt);

        let mut params = Vec::<stmt::Value>::new();
        let sql = Serializer::sqlite().serialize(&stmt, &named, &mut params)?;

        tracing::trace!(%sql, params = params.len(), "sqlite exec");

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        let connection = self.connection()?;
        let mut prepared = connection.prepare_cached(&sql).map_err(Error::storage)?;

        if !stmt.returns_rows() {
            let count = prepared
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::storage)?;

            return Ok(Response::count(count as u64));
        }

        let columns: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = prepared
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::storage)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::storage)? {
            let mut record = stmt::Row::new();

            for (index, name) in columns.iter().enumerate() {
                record.insert(name.clone(), Value::from_sql(row, index)?.into_inner());
            }

            ret.push(record);
        }

        Ok(Response::values(ret))
    }

    async fn reset_db(&self, schema: &Schema) -> Result<()> {
        for table in schema.tables() {
            self.execute_ddl(&sql::Statement::drop_table(&table.name))?;
        }

        self.push_schema(schema).await
    }
}
