use crate::{Model, Result};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};
use tether_core::{err, schema::ModelId, stmt::Row, Schema};

/// Prepares a freshly created instance, for example to seed default values.
pub type Factory = Arc<dyn Fn(&mut Model) + Send + Sync>;

/// Produces model instances by model id.
///
/// Every model of the schema gets a factory when the registry is built.
/// The default factory leaves the instance blank. Rows loaded from storage
/// go through the same factory before their values are applied.
#[derive(Clone)]
pub struct Registry {
    factories: IndexMap<ModelId, Factory>,
}

impl Registry {
    pub fn from_schema(schema: &Schema) -> Registry {
        let blank: Factory = Arc::new(|_| {});

        Registry {
            factories: schema
                .models()
                .map(|model| (model.id, blank.clone()))
                .collect(),
        }
    }

    /// Replaces the factory of a model.
    pub fn register(&mut self, id: ModelId, factory: Factory) {
        self.factories.insert(id, factory);
    }

    /// Creates a new, unsaved instance.
    pub fn create(&self, schema: &Arc<Schema>, id: ModelId) -> Result<Model> {
        let factory = self
            .factories
            .get(&id)
            .ok_or_else(|| err!("no factory registered for {id:?}"))?;

        let mut model = Model::new(schema.clone(), id);
        factory(&mut model);
        Ok(model)
    }

    /// Creates an instance from a stored row.
    pub fn materialize(&self, schema: &Arc<Schema>, id: ModelId, row: Row) -> Result<Model> {
        let mut model = self.create(schema, id)?;
        model.load_row(row)?;
        Ok(model)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Registry")
            .field("models", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
