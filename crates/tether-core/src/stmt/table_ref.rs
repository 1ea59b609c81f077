/// A table named in a statement, optionally aliased (`books t1`).
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> TableRef {
        TableRef {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> TableRef {
        TableRef {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

impl From<&str> for TableRef {
    fn from(value: &str) -> Self {
        TableRef::new(value)
    }
}

impl From<String> for TableRef {
    fn from(value: String) -> Self {
        TableRef::new(value)
    }
}
