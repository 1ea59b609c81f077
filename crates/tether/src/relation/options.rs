use tether_core::stmt::{Expr, ExprColumn, OrderByExpr, Params, Select, Value};

/// Extra criteria applied when resolving a has-one, has-many or
/// many-to-many relation.
///
/// Column references in `filter` and `order_by` name columns of the target
/// model. Through a junction, unqualified columns are qualified with the
/// target table; qualify with `j1` to reach pivot columns.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub filter: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,

    /// Values for placeholders used by `filter`
    pub params: Params,
}

impl QueryOptions {
    pub fn new() -> QueryOptions {
        QueryOptions::default()
    }

    /// ANDs `expr` into the filter.
    pub fn filter(mut self, expr: Expr) -> QueryOptions {
        self.filter = Some(match self.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr,
        });
        self
    }

    pub fn order_by(mut self, order_by: impl Into<OrderByExpr>) -> QueryOptions {
        self.order_by.push(order_by.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> QueryOptions {
        self.limit = Some(limit);
        self
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> QueryOptions {
        self.params.set(name, value);
        self
    }

    /// Applies filter, ordering and limit to `select`, qualifying bare
    /// column references with `table` when given.
    pub(crate) fn apply(&self, select: &mut Select, table: Option<&str>) {
        if let Some(filter) = &self.filter {
            select.and_filter(qualify(filter, table));
        }

        for order_by in &self.order_by {
            select.order_by.push(OrderByExpr {
                expr: qualify(&order_by.expr, table),
                direction: order_by.direction,
            });
        }

        if let Some(limit) = self.limit {
            select.limit = Some(limit);
        }
    }
}

fn qualify(expr: &Expr, table: Option<&str>) -> Expr {
    let Some(table) = table else {
        return expr.clone();
    };

    match expr {
        Expr::Column(ExprColumn { table: None, name }) => Expr::qualified(table, name),
        Expr::And(operands) => Expr::And(operands.iter().map(|e| qualify(e, Some(table))).collect()),
        Expr::Or(operands) => Expr::Or(operands.iter().map(|e| qualify(e, Some(table))).collect()),
        Expr::BinaryOp(op) => Expr::binary_op(
            qualify(&op.lhs, Some(table)),
            op.op,
            qualify(&op.rhs, Some(table)),
        ),
        Expr::InList(in_list) => Expr::in_list(
            qualify(&in_list.expr, Some(table)),
            in_list.list.iter().map(|e| qualify(e, Some(table))),
        ),
        Expr::IsNull(inner) => Expr::is_null(qualify(inner, Some(table))),
        Expr::Not(inner) => Expr::not(qualify(inner, Some(table))),
        expr => expr.clone(),
    }
}
