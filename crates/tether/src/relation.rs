mod assign;
pub use assign::Assignment;

mod mutate;

mod options;
pub use options::QueryOptions;

mod related;
pub use related::Related;

mod resolve;

mod slot;
pub use slot::Slot;

use crate::Model;

use indexmap::IndexMap;
use tether_core::{
    schema::{self, Relation},
    Result,
};

/// Access to the relations declared for a model.
pub trait RelationAware {
    /// Every declared relation, by name, in declaration order.
    fn relations(&self) -> &IndexMap<String, Relation>;

    /// Looks up a relation, failing with an unknown relation error when it
    /// is not declared.
    fn relation(&self, name: &str) -> Result<&Relation>;
}

impl RelationAware for schema::Model {
    fn relations(&self) -> &IndexMap<String, Relation> {
        &self.relations
    }

    fn relation(&self, name: &str) -> Result<&Relation> {
        schema::Model::relation(self, name)
    }
}

impl RelationAware for Model {
    fn relations(&self) -> &IndexMap<String, Relation> {
        &self.model().relations
    }

    fn relation(&self, name: &str) -> Result<&Relation> {
        self.model().relation(name)
    }
}
