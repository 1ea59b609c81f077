use super::Db;
use crate::{
    driver::{self, Driver},
    registry::Factory,
    Model, Registry, Result,
};

use std::sync::Arc;
use tether_core::schema::{self, ModelDef, Schema};

#[derive(Default)]
pub struct Builder {
    /// Model declarations, built into the schema by `build`
    core: schema::Builder,

    /// A schema built ahead of time. Takes precedence over `core`.
    schema: Option<Schema>,

    /// Custom factories, by model name
    factories: Vec<(String, Factory)>,
}

impl Builder {
    /// Adds every model declared by `models`.
    pub fn register(&mut self, models: schema::Builder) -> &mut Self {
        self.core.merge(models);
        self
    }

    /// Declares a model.
    pub fn model(&mut self, name: &str, f: impl FnOnce(&mut ModelDef)) -> &mut Self {
        self.core.model(name, f);
        self
    }

    /// Uses an already built schema instead of the registered models.
    pub fn schema(&mut self, schema: Schema) -> &mut Self {
        self.schema = Some(schema);
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.core.table_name_prefix(prefix);
        self
    }

    /// Runs `f` on every instance of `model` the database creates, including
    /// instances materialized from stored rows.
    pub fn factory(
        &mut self,
        model: &str,
        f: impl Fn(&mut Model) + Send + Sync + 'static,
    ) -> &mut Self {
        self.factories.push((model.to_string(), Arc::new(f)));
        self
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build_with(driver::connect(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        self.build_with(Box::new(driver)).await
    }

    async fn build_with(&mut self, driver: Box<dyn Driver>) -> Result<Db> {
        let schema = match self.schema.take() {
            Some(schema) => schema,
            None => self.core.build()?,
        };

        let mut registry = Registry::from_schema(&schema);
        for (name, factory) in &self.factories {
            registry.register(schema.resolve(name)?.id, factory.clone());
        }

        driver.push_schema(&schema).await?;

        tracing::debug!(
            models = schema.models().count(),
            tables = schema.tables().len(),
            "database ready"
        );

        Ok(Db::new(schema, driver, registry))
    }
}
