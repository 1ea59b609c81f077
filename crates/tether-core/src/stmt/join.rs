use super::{Expr, TableRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub on: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl Join {
    pub fn inner(table: impl Into<TableRef>, on: Expr) -> Join {
        Join {
            kind: JoinKind::Inner,
            table: table.into(),
            on,
        }
    }

    pub fn left(table: impl Into<TableRef>, on: Expr) -> Join {
        Join {
            kind: JoinKind::Left,
            table: table.into(),
            on,
        }
    }
}
