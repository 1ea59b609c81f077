use super::Value;

/// A predicate or scalar expression inside a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(Vec<Expr>),

    /// Binary comparison
    BinaryOp(ExprBinaryOp),

    /// Reference to a column, optionally qualified by a table alias
    Column(ExprColumn),

    /// `expr IN (list)`
    InList(ExprInList),

    /// `expr IS NULL`
    IsNull(Box<Expr>),

    /// Negates the inner expression
    Not(Box<Expr>),

    /// OR a set of expressions
    Or(Vec<Expr>),

    /// Named placeholder bound from the statement's `Params`
    Placeholder(String),

    /// Literal value
    Value(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprColumn {
    pub table: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    pub lhs: Box<Expr>,
    pub op: BinaryOp,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Expr {
        Expr::Column(ExprColumn {
            table: None,
            name: name.into(),
        })
    }

    /// Column qualified by a table alias, `t1.title`.
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Expr {
        Expr::Column(ExprColumn {
            table: Some(table.into()),
            name: name.into(),
        })
    }

    pub fn placeholder(name: impl Into<String>) -> Expr {
        let name = name.into();
        let name = name.strip_prefix(':').map(str::to_string).unwrap_or(name);
        Expr::Placeholder(name)
    }

    pub fn value(value: impl Into<Value>) -> Expr {
        Expr::Value(value.into())
    }

    pub fn binary_op(lhs: impl Into<Expr>, op: BinaryOp, rhs: impl Into<Expr>) -> Expr {
        Expr::BinaryOp(ExprBinaryOp {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        })
    }

    pub fn eq(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    pub fn ne(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::binary_op(lhs, BinaryOp::Ne, rhs)
    }

    pub fn lt(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::binary_op(lhs, BinaryOp::Lt, rhs)
    }

    pub fn gt(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::binary_op(lhs, BinaryOp::Gt, rhs)
    }

    pub fn is_null(expr: impl Into<Expr>) -> Expr {
        Expr::IsNull(Box::new(expr.into()))
    }

    pub fn not(expr: impl Into<Expr>) -> Expr {
        Expr::Not(Box::new(expr.into()))
    }

    pub fn in_list(expr: impl Into<Expr>, list: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::InList(ExprInList {
            expr: Box::new(expr.into()),
            list: list.into_iter().collect(),
        })
    }

    /// Joins two expressions with AND, flattening nested conjunctions.
    pub fn and(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        let mut operands = vec![];
        for expr in [lhs.into(), rhs.into()] {
            match expr {
                Expr::And(nested) => operands.extend(nested),
                expr => operands.push(expr),
            }
        }
        Expr::And(operands)
    }

    pub fn or(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        let mut operands = vec![];
        for expr in [lhs.into(), rhs.into()] {
            match expr {
                Expr::Or(nested) => operands.extend(nested),
                expr => operands.push(expr),
            }
        }
        Expr::Or(operands)
    }

    /// Collects the names of every placeholder referenced by the expression.
    pub fn placeholders<'a>(&'a self, dst: &mut Vec<&'a str>) {
        match self {
            Expr::And(operands) | Expr::Or(operands) => {
                for operand in operands {
                    operand.placeholders(dst);
                }
            }
            Expr::BinaryOp(op) => {
                op.lhs.placeholders(dst);
                op.rhs.placeholders(dst);
            }
            Expr::InList(in_list) => {
                in_list.expr.placeholders(dst);
                for item in &in_list.list {
                    item.placeholders(dst);
                }
            }
            Expr::IsNull(expr) | Expr::Not(expr) => expr.placeholders(dst),
            Expr::Placeholder(name) => dst.push(name),
            Expr::Column(_) | Expr::Value(_) => {}
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Expr::Column(value)
    }
}
