mod execute;
pub use execute::Execute;

mod query;
pub use query::Query;

mod transaction;
pub use transaction::Transaction;

use crate::stmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Run a statement returning rows
    Query(Query),

    /// Run a statement for its effect. Answers with a row count, or with
    /// rows when the statement has `RETURNING` columns.
    Execute(Execute),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    /// Builds the operation fitting the statement: a query for statements
    /// returning rows, an execute otherwise.
    pub fn for_statement(stmt: impl Into<stmt::Statement>, params: stmt::Params) -> Operation {
        let stmt = stmt.into();

        match stmt {
            stmt::Statement::Select(_) => Query { stmt, params }.into(),
            _ => Execute { stmt, params }.into(),
        }
    }

    /// Name of the operation kind, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Query(_) => "query",
            Operation::Execute(_) => "execute",
            Operation::Transaction(op) => op.as_str(),
        }
    }

    /// The statement and its params, unless this is a transaction op.
    pub fn statement(&self) -> Option<(&stmt::Statement, &stmt::Params)> {
        match self {
            Operation::Query(op) => Some((&op.stmt, &op.params)),
            Operation::Execute(op) => Some((&op.stmt, &op.params)),
            Operation::Transaction(_) => None,
        }
    }

    pub fn is_transaction(&self) -> bool {
        matches!(self, Operation::Transaction(_))
    }
}
