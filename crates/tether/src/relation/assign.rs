use super::{Related, RelationAware};
use crate::{Collection, Db, Model, Result};

use tether_core::{schema::ModelId, stmt::Value, Error};

/// A value accepted by [`Db::set_relation`].
#[derive(Debug, Clone)]
pub enum Assignment {
    /// Clears a one relation or empties a many relation
    Null,

    Model(Model),

    Models(Vec<Model>),

    Collection(Collection),

    /// Primary key of the target
    Key(Value),

    /// Primary keys of the targets
    Keys(Vec<Value>),
}

impl Assignment {
    pub fn key(key: impl Into<Value>) -> Assignment {
        Assignment::Key(key.into())
    }

    pub fn keys<T: Into<Value>>(keys: impl IntoIterator<Item = T>) -> Assignment {
        Assignment::Keys(keys.into_iter().map(Into::into).collect())
    }
}

impl From<Model> for Assignment {
    fn from(value: Model) -> Self {
        Assignment::Model(value)
    }
}

impl From<Option<Model>> for Assignment {
    fn from(value: Option<Model>) -> Self {
        match value {
            Some(model) => Assignment::Model(model),
            None => Assignment::Null,
        }
    }
}

impl From<Vec<Model>> for Assignment {
    fn from(value: Vec<Model>) -> Self {
        Assignment::Models(value)
    }
}

impl From<Collection> for Assignment {
    fn from(value: Collection) -> Self {
        Assignment::Collection(value)
    }
}

impl Db {
    /// Assigns a relation, loading targets given by primary key.
    ///
    /// The slot becomes dirty; nothing is written until the owner is saved.
    /// A key without a stored row fails with a record not found error.
    pub async fn set_relation(
        &self,
        model: &mut Model,
        name: &str,
        assignment: impl Into<Assignment>,
    ) -> Result<()> {
        let target = model.relation(name)?.target;

        let related = match assignment.into() {
            Assignment::Null => Related::Null,
            Assignment::Model(one) => one.into(),
            Assignment::Models(many) => many.into(),
            Assignment::Collection(collection) => collection.into(),
            Assignment::Key(key) => self.load_key(target, key).await?.into(),
            Assignment::Keys(keys) => {
                let mut models = Vec::with_capacity(keys.len());
                for key in keys {
                    models.push(self.load_key(target, key).await?);
                }
                models.into()
            }
        };

        model.assign(name, related)
    }

    async fn load_key(&self, target: ModelId, key: Value) -> Result<Model> {
        match self.find_by_pk_id(target, key.clone()).await? {
            Some(model) => Ok(model),
            None => Err(Error::record_not_found(format!(
                "`{}` with primary key {key:?}",
                self.schema().model(target).name
            ))),
        }
    }
}
