use super::{column_def::ColumnDefinition, Comma, Ident, Params, ToSql};

use crate::stmt::{self, Statement};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let if_not_exists = if self.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        };

        // SQLite needs the PK specified with the auto increment column
        let inline_pk = f.serializer.is_sqlite()
            && self.primary_key.len() == 1
            && self
                .columns
                .iter()
                .any(|column| column.auto_increment && column.name == self.primary_key[0]);

        fmt!(f, "CREATE TABLE ", if_not_exists, Ident(&self.name), " (");

        for (index, column) in self.columns.iter().enumerate() {
            if index > 0 {
                fmt!(f, ",");
            }

            let definition = ColumnDefinition {
                column,
                inline_primary_key: inline_pk && column.name == self.primary_key[0],
            };
            fmt!(f, "\n    ", definition);
        }

        if !inline_pk && !self.primary_key.is_empty() {
            let pk = Comma(self.primary_key.iter().map(Ident));
            fmt!(f, ",\n    PRIMARY KEY (", pk, ")");
        }

        fmt!(f, "\n)");
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        fmt!(f, "DROP TABLE ", if_exists, Ident(&self.name));
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "DELETE FROM ", Ident(&self.table));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "INSERT INTO ", Ident(&self.table));

        if self.columns.is_empty() {
            if f.serializer.is_mysql() {
                fmt!(f, " () VALUES ()");
            } else {
                fmt!(f, " DEFAULT VALUES");
            }
        } else {
            let columns = Comma(self.columns.iter().map(Ident));
            let values = Comma(&self.values);
            fmt!(f, " (", columns, ") VALUES (", values, ")");
        }

        if !self.returning.is_empty() {
            let returning = Comma(self.returning.iter().map(Ident));
            fmt!(f, " RETURNING ", returning);
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "SELECT ");

        if self.projection.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, Comma(&self.projection));
        }

        fmt!(f, " FROM ", &self.source);

        for join in &self.joins {
            fmt!(f, join);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY ", Comma(&self.order_by));
        }

        if let Some(limit) = self.limit {
            fmt!(f, " LIMIT ", limit);
        }
    }
}

impl ToSql for &stmt::Projection {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Projection::All(None) => fmt!(f, "*"),
            stmt::Projection::All(Some(table)) => fmt!(f, Ident(table), ".*"),
            stmt::Projection::Column(column) => column.to_sql(f),
        }
    }
}

impl ToSql for &stmt::TableRef {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, Ident(&self.name));

        if let Some(alias) = &self.alias {
            fmt!(f, " ", Ident(alias));
        }
    }
}

impl ToSql for &stmt::Join {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let kind = match self.kind {
            stmt::JoinKind::Inner => " INNER JOIN ",
            stmt::JoinKind::Left => " LEFT JOIN ",
        };

        fmt!(f, kind, &self.table, " ON ", &self.on);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let assignments = Comma(self.assignments.iter().map(Assignment));
        fmt!(f, "UPDATE ", Ident(&self.table), " SET ", assignments);

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }
    }
}

struct Assignment<'a>(&'a (String, stmt::Expr));

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let (column, value) = self.0;
        fmt!(f, Ident(column), " = ", value);
    }
}
