use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,

    /// `column = expr` pairs, in order
    pub assignments: Vec<(String, Expr)>,

    pub filter: Option<Expr>,
}

impl Update {
    pub fn new(table: impl Into<String>) -> Update {
        Update {
            table: table.into(),
            assignments: vec![],
            filter: None,
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Update {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn filter(mut self, expr: Expr) -> Update {
        self.filter = Some(match self.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr,
        });
        self
    }
}
