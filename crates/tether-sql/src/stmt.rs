mod column_def;
pub use column_def::ColumnDef;

mod create_table;
pub use create_table::CreateTable;

mod drop_table;
pub use drop_table::DropTable;

pub use tether_core::stmt::*;

/// A statement the serializer can render: the query statements of
/// `tether_core` plus DDL.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    DropTable(DropTable),
    Delete(Delete),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl Statement {
    pub fn is_ddl(&self) -> bool {
        matches!(self, Statement::CreateTable(_) | Statement::DropTable(_))
    }

    /// Returns `true` if executing the statement yields rows.
    pub fn returns_rows(&self) -> bool {
        match self {
            Statement::Select(_) => true,
            Statement::Insert(stmt) => !stmt.returning.is_empty(),
            _ => false,
        }
    }
}

impl From<tether_core::stmt::Statement> for Statement {
    fn from(value: tether_core::stmt::Statement) -> Self {
        match value {
            tether_core::stmt::Statement::Delete(stmt) => Statement::Delete(stmt),
            tether_core::stmt::Statement::Insert(stmt) => Statement::Insert(stmt),
            tether_core::stmt::Statement::Select(stmt) => Statement::Select(stmt),
            tether_core::stmt::Statement::Update(stmt) => Statement::Update(stmt),
        }
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Statement::CreateTable(value)
    }
}

impl From<DropTable> for Statement {
    fn from(value: DropTable) -> Self {
        Statement::DropTable(value)
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Select(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}
