#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column_def;
mod expr;
mod statement;
mod ty;
mod value;

use crate::stmt::{self, Statement};

use tether_core::{driver::operation::Transaction, err, Result};

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store positional parameters
    params: &'a mut T,

    /// Values for the named placeholders of the statement
    named: &'a stmt::Params,

    /// Placeholders referenced by the statement without a bound value
    unbound: Vec<String>,
}

impl Serializer {
    /// Serializes `stmt`, replacing each named placeholder and literal value
    /// with a positional parameter pushed to `params`.
    ///
    /// Fails if the statement references a placeholder `named` does not bind.
    pub fn serialize(
        &self,
        stmt: &Statement,
        named: &stmt::Params,
        params: &mut impl Params,
    ) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            named,
            unbound: vec![],
        };

        stmt.to_sql(&mut fmt);

        if let Some(name) = fmt.unbound.first() {
            return Err(err!("statement references unbound placeholder `:{name}`"));
        }

        ret.push(';');
        Ok(ret)
    }

    /// Serialize a transaction control operation to a SQL string.
    pub fn serialize_transaction(&self, op: Transaction) -> &'static str {
        match op {
            Transaction::Begin if self.is_mysql() => "START TRANSACTION",
            Transaction::Begin => "BEGIN",
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        }
    }
}
