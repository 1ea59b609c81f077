mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, Result, Schema};

use std::fmt::Debug;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Creates the tables backing the schema, skipping those that already
    /// exist.
    async fn push_schema(&self, schema: &Schema) -> Result<()>;

    /// Execute a database operation
    async fn exec(&self, op: Operation) -> Result<Response>;

    /// Drops every table of the schema and creates them again.
    async fn reset_db(&self, schema: &Schema) -> Result<()> {
        let _ = schema;
        crate::bail!("driver {self:?} does not support resetting the database")
    }
}
