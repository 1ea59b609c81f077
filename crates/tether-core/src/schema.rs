mod builder;
pub use builder::{Builder, ModelDef, RelationDef};

mod column;
pub use column::Column;

mod model;
pub use model::{Model, ModelId};

mod name;
pub use name::Name;

mod relation;
pub use relation::{junction_table_name, link_column_name, Junction, Link, Relation, RelationKind};

mod table;
pub use table::Table;

mod verify;

use crate::{err, Result};
use indexmap::IndexMap;

/// The registry of every model definition known to a `Db`.
///
/// A schema is immutable once built. Link columns and junction tables are
/// derived during the build, so every lookup afterwards is a plain read.
#[derive(Debug)]
pub struct Schema {
    models: IndexMap<ModelId, Model>,

    /// Model and junction tables, in creation order
    tables: Vec<Table>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a model by ID
    #[track_caller]
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.values().find(|model| model.name.as_str() == name)
    }

    /// Like [`Schema::model_by_name`], failing when the model is unknown.
    pub fn resolve(&self, name: &str) -> Result<&Model> {
        self.model_by_name(name)
            .ok_or_else(|| err!("unknown model `{name}`"))
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Tables backing the schema: one per model, then one per junction.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}
