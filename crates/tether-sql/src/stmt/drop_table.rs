use super::Statement;

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub name: String,

    /// Render `IF EXISTS`
    pub if_exists: bool,
}

impl Statement {
    pub fn drop_table(name: &str) -> Statement {
        DropTable {
            name: name.to_string(),
            if_exists: true,
        }
        .into()
    }
}
