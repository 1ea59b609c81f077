use super::{Expr, ExprColumn, Join, OrderByExpr, TableRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Table the rows are read from
    pub source: TableRef,

    /// Projected columns. Empty means `*`.
    pub projection: Vec<Projection>,

    pub joins: Vec<Join>,

    /// WHERE clause
    pub filter: Option<Expr>,

    pub order_by: Vec<OrderByExpr>,

    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Every column of the table with the given alias, `t1.*`
    All(Option<String>),

    /// A single column
    Column(ExprColumn),
}

impl Select {
    pub fn new(source: impl Into<TableRef>) -> Select {
        Select {
            source: source.into(),
            projection: vec![],
            joins: vec![],
            filter: None,
            order_by: vec![],
            limit: None,
        }
    }

    pub fn project(mut self, projection: Projection) -> Select {
        self.projection.push(projection);
        self
    }

    pub fn join(mut self, join: Join) -> Select {
        self.joins.push(join);
        self
    }

    /// ANDs `expr` into the existing filter.
    pub fn filter(mut self, expr: Expr) -> Select {
        self.and_filter(expr);
        self
    }

    pub fn and_filter(&mut self, expr: Expr) {
        self.filter = Some(match self.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr,
        });
    }

    pub fn order_by(mut self, order_by: impl Into<OrderByExpr>) -> Select {
        self.order_by.push(order_by.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Select {
        self.limit = Some(limit);
        self
    }
}

impl Projection {
    pub fn all() -> Projection {
        Projection::All(None)
    }

    pub fn all_of(table: impl Into<String>) -> Projection {
        Projection::All(Some(table.into()))
    }

    pub fn column(table: Option<&str>, name: impl Into<String>) -> Projection {
        Projection::Column(ExprColumn {
            table: table.map(str::to_string),
            name: name.into(),
        })
    }
}
