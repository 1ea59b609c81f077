use super::Operation;

use crate::stmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Execute {
    /// The statement to execute
    pub stmt: stmt::Statement,

    /// Values bound to the statement's named placeholders
    pub params: stmt::Params,
}

impl From<Execute> for Operation {
    fn from(value: Execute) -> Self {
        Self::Execute(value)
    }
}
