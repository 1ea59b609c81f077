use super::Column;

/// A table as created in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,

    pub columns: Vec<Column>,

    /// Primary key columns. Junction tables are keyed by both link columns.
    pub primary_key: Vec<String>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}
