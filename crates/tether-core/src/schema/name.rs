use heck::ToSnakeCase;
use std::fmt;

/// The name of a model, as declared (`BlogPost`).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(src: &str) -> Self {
        Self(src.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// All-lowercase form used in derived link column names (`blogpost`).
    pub fn lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn snake_case(&self) -> String {
        self.0.to_snake_case()
    }

    /// Default table name: pluralized snake case (`blog_posts`).
    pub fn table_name(&self) -> String {
        let snake = self.snake_case();
        match snake.rsplit_once('_') {
            Some((head, last)) => format!("{head}_{}", pluralizer::pluralize(last, 2, false)),
            None => pluralizer::pluralize(&snake, 2, false),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
