use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,

    /// Column names, parallel to `values`
    pub columns: Vec<String>,

    pub values: Vec<Expr>,

    /// Columns returned for the inserted row. Empty means the statement
    /// only reports an affected-row count.
    pub returning: Vec<String>,
}

impl Insert {
    pub fn new(table: impl Into<String>) -> Insert {
        Insert {
            table: table.into(),
            columns: vec![],
            values: vec![],
            returning: vec![],
        }
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Insert {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn returning(mut self, column: impl Into<String>) -> Insert {
        self.returning.push(column.into());
        self
    }
}
