use super::{Flavor, Ident, Params, ToSql};

use crate::stmt;

/// A column definition inside `CREATE TABLE`.
pub(super) struct ColumnDefinition<'a> {
    pub(super) column: &'a stmt::ColumnDef,

    /// SQLite only auto increments a column declared `INTEGER PRIMARY KEY`
    /// inline, so the key is rendered with the column.
    pub(super) inline_primary_key: bool,
}

impl ToSql for ColumnDefinition<'_> {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let column = self.column;
        let name = Ident(&column.name);

        if self.inline_primary_key {
            fmt!(f, name, " INTEGER PRIMARY KEY AUTOINCREMENT");
            return;
        }

        match f.serializer.flavor {
            Flavor::Postgresql if column.auto_increment => fmt!(f, name, " BIGSERIAL"),
            _ => fmt!(f, name, " ", column.ty),
        }

        if column.not_null {
            fmt!(f, " NOT NULL");
        }

        if column.auto_increment && f.serializer.is_mysql() {
            fmt!(f, " AUTO_INCREMENT");
        }
    }
}
