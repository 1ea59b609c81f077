use super::{ColumnDef, Statement};

use tether_core::schema::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Vec<String>,

    /// Render `IF NOT EXISTS`
    pub if_not_exists: bool,
}

impl Statement {
    /// Creates the given table, unless it already exists.
    pub fn create_table(table: &Table) -> Statement {
        CreateTable {
            name: table.name.clone(),
            columns: table.columns.iter().map(ColumnDef::from).collect(),
            primary_key: table.primary_key.clone(),
            if_not_exists: true,
        }
        .into()
    }
}
