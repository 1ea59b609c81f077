use crate::{Collection, Model};

/// The value of a relation: nothing, one model or a collection.
#[derive(Debug, Clone)]
pub enum Related {
    Null,
    One(Box<Model>),
    Many(Collection),
}

impl Related {
    pub fn is_null(&self) -> bool {
        matches!(self, Related::Null)
    }

    pub fn as_one(&self) -> Option<&Model> {
        match self {
            Related::One(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&Collection> {
        match self {
            Related::Many(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn into_one(self) -> Option<Model> {
        match self {
            Related::One(model) => Some(*model),
            _ => None,
        }
    }

    pub fn into_many(self) -> Option<Collection> {
        match self {
            Related::Many(collection) => Some(collection),
            _ => None,
        }
    }
}

impl From<Model> for Related {
    fn from(value: Model) -> Self {
        Related::One(Box::new(value))
    }
}

impl From<Option<Model>> for Related {
    fn from(value: Option<Model>) -> Self {
        match value {
            Some(model) => model.into(),
            None => Related::Null,
        }
    }
}

impl From<Collection> for Related {
    fn from(value: Collection) -> Self {
        Related::Many(value)
    }
}

impl From<Vec<Model>> for Related {
    fn from(value: Vec<Model>) -> Self {
        Related::Many(value.into())
    }
}
