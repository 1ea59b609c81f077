mod delete;
pub use delete::Delete;

mod expr;
pub use expr::{BinaryOp, Expr, ExprBinaryOp, ExprColumn, ExprInList};

mod insert;
pub use insert::Insert;

mod join;
pub use join::{Join, JoinKind};

mod order_by;
pub use order_by::{Direction, OrderByExpr};

mod params;
pub use params::Params;

mod row;
pub use row::Row;

mod select;
pub use select::{Projection, Select};

mod statement;
pub use statement::Statement;

mod table_ref;
pub use table_ref::TableRef;

mod ty;
pub use ty::Type;

mod update;
pub use update::Update;

mod value;
pub use value::Value;
