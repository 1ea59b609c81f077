use super::Operation;

use crate::stmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The statement to execute
    pub stmt: stmt::Statement,

    /// Values bound to the statement's named placeholders
    pub params: stmt::Params,
}

impl From<Query> for Operation {
    fn from(value: Query) -> Self {
        Self::Query(value)
    }
}
