use super::{Column, ModelId, Name};

use indexmap::IndexMap;

/// A declared relation between two models.
#[derive(Debug, Clone)]
pub struct Relation {
    /// Name of the relation slot on the owning model
    pub name: String,

    pub kind: RelationKind,

    /// The model declaring the relation
    pub owner: ModelId,

    /// The related model
    pub target: ModelId,

    /// How the two rows are linked in storage
    pub link: Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// The owner row carries the link column
    BelongsTo,

    /// The target row carries the link column; at most one target
    HasOne,

    /// The target rows carry the link column
    HasMany,

    /// Rows are linked through a junction table
    ManyToMany,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    /// Link column. On the owner for belongs-to, on the target otherwise.
    Column(String),

    Junction(Junction),
}

/// A junction table linking two models.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub table: String,

    /// Column referencing the owner's primary key
    pub this: String,

    /// Column referencing the target's primary key
    pub that: String,

    /// Extra columns stored on the junction row
    pub pivots: IndexMap<String, Column>,
}

impl Relation {
    /// The link column of a belongs-to, has-one or has-many relation.
    pub fn link_column(&self) -> Option<&str> {
        match &self.link {
            Link::Column(column) => Some(column),
            Link::Junction(_) => None,
        }
    }

    pub fn junction(&self) -> Option<&Junction> {
        match &self.link {
            Link::Junction(junction) => Some(junction),
            Link::Column(_) => None,
        }
    }

    /// Returns `true` if the relation holds a collection.
    pub fn is_many(&self) -> bool {
        self.kind.is_many()
    }
}

impl RelationKind {
    pub fn is_many(self) -> bool {
        matches!(self, RelationKind::HasMany | RelationKind::ManyToMany)
    }

    /// Returns `true` if the relation is reconciled before the owner row is
    /// written.
    pub fn is_pre_save(self) -> bool {
        matches!(self, RelationKind::BelongsTo)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
            RelationKind::ManyToMany => "many_to_many",
        }
    }
}

impl Junction {
    pub fn has_pivots(&self) -> bool {
        !self.pivots.is_empty()
    }
}

/// Default link column referencing `model`: `__<lowercased name>_id`.
///
/// Belongs-to relations derive it from the target, has-one and has-many
/// from the owner, and many-to-many uses it for both junction columns.
pub fn link_column_name(model: &Name) -> String {
    format!("__{}_id", model.lowercase())
}

/// Default junction table for two tables.
///
/// The lexicographically smaller name comes first, so both sides of a
/// many-to-many pair derive the same table.
pub fn junction_table_name(this_table: &str, that_table: &str) -> String {
    if this_table < that_table {
        format!("{this_table}_to_{that_table}")
    } else {
        format!("{that_table}_to_{this_table}")
    }
}
