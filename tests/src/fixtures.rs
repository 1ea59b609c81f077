use tether::{
    schema::{self, RelationDef},
    stmt::Type,
    Schema,
};

/// Authors writing books, books tagged in a ranked order and one profile
/// per author.
///
/// Tables: `authors`, `books`, `profiles`, `tags` and the `books_to_tags`
/// junction with a `position` pivot.
pub fn library() -> schema::Builder {
    let mut builder = Schema::builder();

    builder
        .model("Author", |m| {
            m.column("name", Type::String)
                .has_many("books", "Book")
                .has_one("profile", "Profile");
        })
        .model("Book", |m| {
            m.column("title", Type::String)
                .belongs_to("author", "Author")
                .relation(RelationDef::many_to_many("tags", "Tag").pivot("position", Type::I64));
        })
        .model("Profile", |m| {
            m.column("bio", Type::String).belongs_to("author", "Author");
        })
        .model("Tag", |m| {
            m.column("label", Type::String).many_to_many("books", "Book");
        });

    builder
}

/// Users following each other through the `users_to_users` junction.
pub fn social() -> schema::Builder {
    let mut builder = Schema::builder();

    builder.model("User", |m| {
        m.column("handle", Type::String).relation(
            RelationDef::many_to_many("follows", "User")
                .this("__follower_id")
                .that("__followed_id"),
        );
    });

    builder
}
