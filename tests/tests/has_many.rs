use tests::{fixtures, setup};

use pretty_assertions::assert_eq;
use tether::{
    stmt::{Expr, OrderByExpr, Value},
    Assignment, Db, Model, QueryOptions, Related,
};

fn by_title() -> QueryOptions {
    QueryOptions::new().order_by(OrderByExpr::asc(Expr::column("title")))
}

fn titles(related: Related) -> Vec<String> {
    related
        .into_many()
        .unwrap()
        .iter()
        .map(|book| book.get("title").as_str().unwrap().to_string())
        .collect()
}

async fn author(db: &Db, name: &str) -> Model {
    let mut author = db.create("Author").unwrap();
    author.set("name", name).unwrap();
    db.save(&mut author).await.unwrap();
    author
}

async fn book(db: &Db, id: i64, title: &str, author: Option<&Model>) -> Model {
    let mut book = db.create("Book").unwrap();
    book.set("__id", id).unwrap();
    book.set("title", title).unwrap();
    book.set("__author_id", author.and_then(Model::pk).cloned())
        .unwrap();
    db.save(&mut book).await.unwrap();
    book
}

async fn stored_link(db: &Db, id: i64) -> Value {
    db.find_by_pk("Book", id)
        .await
        .unwrap()
        .unwrap()
        .get("__author_id")
        .clone()
}

#[tokio::test]
async fn assigned_collection_round_trips() {
    let (db, log) = setup(fixtures::library()).await;

    let mut a = db.create("Book").unwrap();
    a.set("title", "A").unwrap();
    let mut b = db.create("Book").unwrap();
    b.set("title", "B").unwrap();

    let mut author = db.create("Author").unwrap();
    author.set("name", "Anonymous").unwrap();
    author.assign("books", vec![a, b]).unwrap();
    db.save(&mut author).await.unwrap();

    // Nothing can be linked to an author that did not exist yet
    assert_eq!(log.selects("books"), 0);
    assert_eq!(log.inserts("books"), 2);

    let reloaded = db
        .find_by_pk("Author", author.pk().cloned().unwrap())
        .await
        .unwrap()
        .unwrap();
    let books = db
        .get_relation_lazy(&reloaded, "books", &by_title())
        .await
        .unwrap();

    assert_eq!(titles(books), ["A", "B"]);
}

#[tokio::test]
async fn reassignment_unlinks_removed_children() {
    let (db, mut log) = setup(fixtures::library()).await;

    let mut author = author(&db, "Author One").await;
    assert_eq!(author.pk(), Some(&Value::I64(1)));

    book(&db, 10, "Ten", Some(&author)).await;
    book(&db, 11, "Eleven", Some(&author)).await;
    book(&db, 12, "Twelve", None).await;

    log.clear();
    db.set_relation(&mut author, "books", Assignment::keys([11, 12]))
        .await
        .unwrap();
    db.save(&mut author).await.unwrap();

    assert_eq!(stored_link(&db, 10).await, Value::Null);
    assert_eq!(stored_link(&db, 11).await, Value::I64(1));
    assert_eq!(stored_link(&db, 12).await, Value::I64(1));

    // One unlink plus one relink per desired child
    assert_eq!(log.updates("books"), 3);
}

#[tokio::test]
async fn null_empties_the_collection() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut author = author(&db, "Prolific").await;
    book(&db, 1, "First", Some(&author)).await;
    book(&db, 2, "Second", Some(&author)).await;

    author.assign("books", Related::Null).unwrap();
    db.save(&mut author).await.unwrap();

    assert_eq!(stored_link(&db, 1).await, Value::Null);
    assert_eq!(stored_link(&db, 2).await, Value::Null);

    let books = db
        .get_relation_lazy(&author, "books", &QueryOptions::default())
        .await
        .unwrap();
    assert!(books.as_many().unwrap().is_empty());
}

#[tokio::test]
async fn options_filter_and_limit() {
    let (db, _log) = setup(fixtures::library()).await;

    let author = author(&db, "Filtered").await;
    book(&db, 1, "Alpha", Some(&author)).await;
    book(&db, 2, "Beta", Some(&author)).await;
    book(&db, 3, "Gamma", Some(&author)).await;

    let options = by_title()
        .filter(Expr::ne(Expr::column("title"), Expr::placeholder("skip")))
        .param("skip", "Beta")
        .limit(1);
    let books = db.get_relation_lazy(&author, "books", &options).await.unwrap();
    assert_eq!(titles(books), ["Alpha"]);

    let options = QueryOptions::new().order_by(OrderByExpr::desc(Expr::column("title")));
    let books = db.get_relation_lazy(&author, "books", &options).await.unwrap();
    assert_eq!(titles(books), ["Gamma", "Beta", "Alpha"]);
}

#[tokio::test]
async fn new_owner_resolves_empty_without_querying() {
    let (db, log) = setup(fixtures::library()).await;

    let author = db.create("Author").unwrap();
    let books = db
        .get_relation_lazy(&author, "books", &QueryOptions::default())
        .await
        .unwrap();

    let books = books.into_many().unwrap();
    assert!(books.is_empty());
    assert!(!books.is_new());
    assert!(log.is_empty());
}

#[tokio::test]
async fn loaded_children_are_saved_with_the_owner() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut author = author(&db, "Editor").await;
    book(&db, 5, "Draft", Some(&author)).await;

    db.load_relation(&mut author, "books").await.unwrap();

    let mut books = author.related("books").unwrap().unwrap().as_many().unwrap().clone();
    books.iter_mut().for_each(|book| book.set("title", "Final").unwrap());
    author.assign("books", books).unwrap();
    db.save(&mut author).await.unwrap();

    let stored = db.find_by_pk("Book", 5).await.unwrap().unwrap();
    assert_eq!(stored.get("title"), &Value::from("Final"));
    assert_eq!(stored.get("__author_id"), author.pk().unwrap());
}
