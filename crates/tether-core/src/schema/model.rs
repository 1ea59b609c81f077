use super::{Column, Name, Relation, RelationKind};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: Name,

    pub table_name: String,

    /// Name of the primary key column
    pub primary_key: String,

    /// Columns, primary key first. Includes derived link columns.
    pub columns: IndexMap<String, Column>,

    /// Relations, in declaration order
    pub relations: IndexMap<String, Relation>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn primary_key_column(&self) -> &Column {
        &self.columns[&self.primary_key]
    }

    /// Looks up a relation by name.
    pub fn relation(&self, name: &str) -> Result<&Relation> {
        self.relations
            .get(name)
            .ok_or_else(|| Error::unknown_relation(self.name.as_str(), name))
    }

    /// Relations of the given kind, in declaration order.
    pub fn relations_of(&self, kind: RelationKind) -> impl Iterator<Item = &Relation> + '_ {
        self.relations
            .values()
            .filter(move |relation| relation.kind == kind)
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
