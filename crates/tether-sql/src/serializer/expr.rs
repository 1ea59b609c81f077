use super::{Comma, Delimited, Ident, Params, ToSql};

use crate::stmt;

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            And(operands) => {
                fmt!(f, Delimited(operands.iter().map(Operand), " AND "));
            }
            BinaryOp(expr) => match (expr.op, &*expr.rhs) {
                // `= NULL` never matches
                (stmt::BinaryOp::Eq, Value(stmt::Value::Null)) => {
                    fmt!(f, Operand(&expr.lhs), " IS NULL")
                }
                (stmt::BinaryOp::Ne, Value(stmt::Value::Null)) => {
                    fmt!(f, Operand(&expr.lhs), " IS NOT NULL")
                }
                (op, rhs) => fmt!(f, Operand(&expr.lhs), " ", op, " ", Operand(rhs)),
            },
            Column(column) => column.to_sql(f),
            InList(expr) if expr.list.is_empty() => {
                fmt!(f, "1 = 0");
            }
            InList(expr) => {
                fmt!(f, Operand(&expr.expr), " IN (", Comma(&expr.list), ")");
            }
            IsNull(expr) => {
                fmt!(f, Operand(expr), " IS NULL");
            }
            Not(expr) => {
                fmt!(f, "NOT (", &**expr, ")");
            }
            Or(operands) => {
                fmt!(f, Delimited(operands.iter().map(Operand), " OR "));
            }
            Placeholder(name) => match f.named.get(name).cloned() {
                Some(value) => value.to_sql(f),
                None => {
                    f.unbound.push(name.clone());
                    fmt!(f, "NULL");
                }
            },
            Value(value) => value.to_sql(f),
        }
    }
}

/// An operand of a compound expression, parenthesized when it is itself
/// compound.
struct Operand<'a>(&'a stmt::Expr);

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self.0 {
            stmt::Expr::And(_) | stmt::Expr::Or(_) | stmt::Expr::BinaryOp(_) => {
                fmt!(f, "(", self.0, ")")
            }
            expr => expr.to_sql(f),
        }
    }
}

impl ToSql for &stmt::ExprColumn {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        if let Some(table) = &self.table {
            fmt!(f, Ident(table), ".");
        }
        fmt!(f, Ident(&self.name));
    }
}

impl ToSql for stmt::BinaryOp {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        f.dst.push_str(self.as_str());
    }
}

impl ToSql for &stmt::OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, Operand(&self.expr));

        match self.direction {
            Some(stmt::Direction::Asc) => fmt!(f, " ASC"),
            Some(stmt::Direction::Desc) => fmt!(f, " DESC"),
            None => {}
        }
    }
}
