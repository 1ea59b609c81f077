use super::Value;

use indexmap::IndexMap;

/// Values bound to the named placeholders of a statement.
///
/// Placeholder names are stored without the leading `:`; `Expr::Placeholder("id")`
/// is bound by `params.set("id", ..)` and rendered as `:id` for display.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    values: IndexMap<String, Value>,
}

impl Params {
    pub fn new() -> Params {
        Params::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Params {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let name = name.strip_prefix(':').map(str::to_string).unwrap_or(name);
        self.values.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name.strip_prefix(':').unwrap_or(name))
    }

    /// Adds every parameter of `other`, overriding existing names.
    pub fn extend(&mut self, other: Params) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
