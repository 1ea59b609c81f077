mod builder;
pub use builder::Builder;

mod save;

use crate::{Collection, Model, QueryOptions, Registry, Result};

use std::sync::Arc;
use tether_core::{
    driver::{operation::Transaction, Driver, Operation, Response},
    err,
    schema::{self, ModelId},
    stmt::{Delete, Expr, Params, Projection, Select, Value},
    Error, Schema,
};

/// Shared state between all `Db` clones.
struct Shared {
    schema: Arc<Schema>,
    driver: Box<dyn Driver>,
    registry: Registry,
}

/// A database handle.
///
/// Operations are issued one at a time: every driver call is awaited before
/// the next one is sent. Cloning a `Db` shares the schema and driver.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(schema: Schema, driver: Box<dyn Driver>, registry: Registry) -> Db {
        Db {
            shared: Arc::new(Shared {
                schema: Arc::new(schema),
                driver,
                registry,
            }),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    /// Creates a new, unsaved instance of the named model.
    pub fn create(&self, model: &str) -> Result<Model> {
        let id = self.shared.schema.resolve(model)?.id;
        self.shared.registry.create(&self.shared.schema, id)
    }

    /// Sends one operation to the driver.
    pub(crate) async fn exec(&self, op: Operation) -> Result<Response> {
        tracing::debug!(
            kind = op.kind(),
            table = op.statement().map(|(stmt, _)| stmt.table()),
            "exec"
        );
        self.shared.driver.exec(op).await
    }

    /// Runs a select against the table of model `id` and materializes every
    /// returned row.
    pub(crate) async fn fetch(
        &self,
        id: ModelId,
        select: Select,
        params: Params,
    ) -> Result<Vec<Model>> {
        let rows = self
            .exec(Operation::for_statement(select, params))
            .await?
            .into_values()?;

        rows.into_iter()
            .map(|row| {
                self.shared
                    .registry
                    .materialize(&self.shared.schema, id, row)
            })
            .collect()
    }

    /// Loads the named model by primary key.
    pub async fn find_by_pk(&self, model: &str, pk: impl Into<Value>) -> Result<Option<Model>> {
        let id = self.shared.schema.resolve(model)?.id;
        self.find_by_pk_id(id, pk.into()).await
    }

    pub(crate) async fn find_by_pk_id(&self, id: ModelId, pk: Value) -> Result<Option<Model>> {
        let model = self.shared.schema.model(id);
        let pk = pk.cast(model.primary_key_column().ty)?;

        if pk.is_null() {
            return Ok(None);
        }

        let select = Select::new(model.table_name.as_str())
            .project(Projection::all())
            .filter(Expr::eq(
                Expr::column(&model.primary_key),
                Expr::placeholder("__pk"),
            ))
            .limit(1);

        let mut found = self.fetch(id, select, Params::new().with("__pk", pk)).await?;
        Ok(found.pop())
    }

    /// Loads the first instance whose `column` equals `value`.
    pub async fn find_by_column(
        &self,
        model: &str,
        column: &str,
        value: impl Into<Value>,
        options: &QueryOptions,
    ) -> Result<Option<Model>> {
        let model = self.shared.schema.resolve(model)?;
        let (select, params) = by_column(model, column, value.into(), options)?;

        let found = self.fetch(model.id, select.limit(1), params).await?;
        Ok(found.into_iter().next())
    }

    /// Loads every instance whose `column` equals `value`.
    pub async fn find_all_by_column(
        &self,
        model: &str,
        column: &str,
        value: impl Into<Value>,
        options: &QueryOptions,
    ) -> Result<Collection> {
        let model = self.shared.schema.resolve(model)?;
        let (select, params) = by_column(model, column, value.into(), options)?;

        let found = self.fetch(model.id, select, params).await?;
        Ok(Collection::fetched(found))
    }

    /// Loads every instance of the named model matching `options`.
    pub async fn find_all(&self, model: &str, options: &QueryOptions) -> Result<Collection> {
        let model = self.shared.schema.resolve(model)?;

        let mut select = Select::new(model.table_name.as_str()).project(Projection::all());
        options.apply(&mut select, None);

        let found = self.fetch(model.id, select, options.params.clone()).await?;
        Ok(Collection::fetched(found))
    }

    /// Deletes the row of a persisted instance.
    ///
    /// Related rows are left as they are. The instance becomes new again
    /// without a primary key, and every loaded relation is marked dirty so
    /// that saving it again writes the relations back.
    pub async fn delete(&self, model: &mut Model) -> Result<()> {
        let def = model.model();
        let Some(pk) = model.pk().cloned() else {
            return Err(err!("cannot delete `{}`: it has no primary key", def.name));
        };

        let stmt = Delete::new(def.table_name.as_str()).filter(Expr::eq(
            Expr::column(&def.primary_key),
            Expr::placeholder("__pk"),
        ));

        let count = self
            .exec(Operation::for_statement(stmt, Params::new().with("__pk", pk.clone())))
            .await?
            .into_count()?;

        if count == 0 {
            return Err(Error::record_not_found(format!(
                "`{}` with primary key {pk:?}",
                def.name
            )));
        }

        model.mark_deleted();
        Ok(())
    }

    pub async fn begin(&self) -> Result<()> {
        self.exec(Transaction::Begin.into()).await?;
        Ok(())
    }

    pub async fn commit(&self) -> Result<()> {
        self.exec(Transaction::Commit.into()).await?;
        Ok(())
    }

    pub async fn rollback(&self) -> Result<()> {
        self.exec(Transaction::Rollback.into()).await?;
        Ok(())
    }

    /// Creates the tables of the schema that do not exist yet.
    pub async fn push_schema(&self) -> Result<()> {
        self.shared.driver.push_schema(&self.shared.schema).await
    }

    /// Drops every table of the schema and creates them again.
    pub async fn reset_db(&self) -> Result<()> {
        self.shared.driver.reset_db(&self.shared.schema).await
    }
}

fn by_column(
    model: &schema::Model,
    column: &str,
    value: Value,
    options: &QueryOptions,
) -> Result<(Select, Params)> {
    let Some(def) = model.column(column) else {
        return Err(err!("unknown column `{column}` in model `{}`", model.name));
    };

    let value = value.cast(def.ty)?;
    let mut params = options.params.clone();

    let filter = if value.is_null() {
        Expr::is_null(Expr::column(column))
    } else {
        params.set("__value", value);
        Expr::eq(Expr::column(column), Expr::placeholder("__value"))
    };

    let mut select = Select::new(model.table_name.as_str())
        .project(Projection::all())
        .filter(filter);
    options.apply(&mut select, None);

    Ok((select, params))
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("schema", &self.shared.schema)
            .field("driver", &self.shared.driver)
            .field("registry", &self.shared.registry)
            .finish()
    }
}
