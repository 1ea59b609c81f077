use super::{Flavor, Params, ToSql};

use crate::stmt;

impl ToSql for stmt::Type {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        use stmt::Type::*;

        let name = match (f.serializer.flavor, self) {
            (_, Bool) => "BOOLEAN",
            (Flavor::Sqlite, I64) => "INTEGER",
            (_, I64) => "BIGINT",
            (Flavor::Mysql, String) => "VARCHAR(255)",
            (_, String) => "TEXT",
            (Flavor::Postgresql, Bytes) => "BYTEA",
            (_, Bytes) => "BLOB",
        };

        fmt!(f, name);
    }
}
