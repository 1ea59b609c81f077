use super::{Delete, Insert, Select, Update};

/// A query description handed to the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// Name of the statement kind, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "select",
            Statement::Insert(_) => "insert",
            Statement::Update(_) => "update",
            Statement::Delete(_) => "delete",
        }
    }

    /// The table the statement targets.
    pub fn table(&self) -> &str {
        match self {
            Statement::Select(stmt) => &stmt.source.name,
            Statement::Insert(stmt) => &stmt.table,
            Statement::Update(stmt) => &stmt.table,
            Statement::Delete(stmt) => &stmt.table,
        }
    }

    /// Returns `true` if executing the statement yields rows.
    pub fn returns_rows(&self) -> bool {
        match self {
            Statement::Select(_) => true,
            Statement::Insert(stmt) => !stmt.returning.is_empty(),
            Statement::Update(_) | Statement::Delete(_) => false,
        }
    }

    pub fn as_select(&self) -> Option<&Select> {
        match self {
            Statement::Select(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_insert(&self) -> Option<&Insert> {
        match self {
            Statement::Insert(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_update(&self) -> Option<&Update> {
        match self {
            Statement::Update(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_delete(&self) -> Option<&Delete> {
        match self {
            Statement::Delete(stmt) => Some(stmt),
            _ => None,
        }
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
