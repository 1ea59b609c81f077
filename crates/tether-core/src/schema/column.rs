use crate::stmt::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,

    pub ty: Type,

    /// True if the column accepts `NULL`
    pub nullable: bool,

    /// True if storage assigns the value on insert
    pub auto_increment: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: Type) -> Column {
        Column {
            name: name.into(),
            ty,
            nullable: false,
            auto_increment: false,
        }
    }

    pub fn nullable(mut self) -> Column {
        self.nullable = true;
        self
    }

    pub fn auto_increment(mut self) -> Column {
        self.auto_increment = true;
        self
    }
}
