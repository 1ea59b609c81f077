use tether_core::{schema, stmt::Type};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Type,
    pub not_null: bool,
    pub auto_increment: bool,
}

impl From<&schema::Column> for ColumnDef {
    fn from(column: &schema::Column) -> Self {
        ColumnDef {
            name: column.name.clone(),
            ty: column.ty,
            not_null: !column.nullable,
            auto_increment: column.auto_increment,
        }
    }
}
