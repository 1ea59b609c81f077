use tests::{fixtures, setup};

use pretty_assertions::assert_eq;
use tether::{
    stmt::{Expr, OrderByExpr, Value},
    Db, Model, QueryOptions,
};

const JUNCTION: &str = "books_to_tags";

fn tag(db: &Db, label: &str, position: i64) -> Model {
    let mut tag = db.create("Tag").unwrap();
    tag.set("label", label).unwrap();
    tag.set("position", position).unwrap();
    tag
}

fn by_position() -> QueryOptions {
    QueryOptions::new().order_by(OrderByExpr::asc(Expr::qualified("j1", "position")))
}

async fn tags_of(db: &Db, book: &Model) -> Vec<(String, Value)> {
    db.get_relation_lazy(book, "tags", &by_position())
        .await
        .unwrap()
        .into_many()
        .unwrap()
        .iter()
        .map(|tag| {
            (
                tag.get("label").as_str().unwrap().to_string(),
                tag.get("position").clone(),
            )
        })
        .collect()
}

async fn tagged_book(db: &Db, labels: &[&str]) -> Model {
    let mut book = db.create("Book").unwrap();
    book.set("title", "Tagged").unwrap();

    let tags: Vec<_> = labels
        .iter()
        .enumerate()
        .map(|(position, label)| tag(db, label, position as i64))
        .collect();
    book.assign("tags", tags).unwrap();

    db.save(&mut book).await.unwrap();
    book
}

#[tokio::test]
async fn new_targets_are_saved_and_linked() {
    let (db, log) = setup(fixtures::library()).await;

    let book = tagged_book(&db, &["rust", "orm"]).await;

    assert_eq!(log.inserts("tags"), 2);
    assert_eq!(log.inserts(JUNCTION), 2);
    // The book was new, so nothing was linked to it yet
    assert_eq!(log.selects("tags"), 0);

    assert_eq!(
        tags_of(&db, &book).await,
        [
            ("rust".to_string(), Value::I64(0)),
            ("orm".to_string(), Value::I64(1)),
        ]
    );

    let loaded = db
        .get_relation_lazy(&book, "tags", &QueryOptions::default())
        .await
        .unwrap()
        .into_many()
        .unwrap();
    assert!(!loaded.is_new());
}

#[tokio::test]
async fn unchanged_save_is_idempotent() {
    let (db, mut log) = setup(fixtures::library()).await;

    let mut book = tagged_book(&db, &["a", "b"]).await;
    assert!(book.slot("tags").unwrap().is_persisted());

    log.clear();
    db.save(&mut book).await.unwrap();

    assert_eq!(log.deletes(JUNCTION), 0);
    assert_eq!(log.inserts(JUNCTION), 0);
    assert_eq!(tags_of(&db, &book).await.len(), 2);
}

#[tokio::test]
async fn diff_deletes_inserts_then_updates_pivots() {
    let (db, mut log) = setup(fixtures::library()).await;

    let book = tagged_book(&db, &["A", "B", "C"]).await;

    let mut book = db
        .find_by_pk("Book", book.pk().cloned().unwrap())
        .await
        .unwrap()
        .unwrap();
    let current = db
        .get_relation_lazy(&book, "tags", &by_position())
        .await
        .unwrap()
        .into_many()
        .unwrap();

    let mut desired: Vec<Model> = current
        .into_iter()
        .filter(|tag| tag.get("label") != &Value::from("A"))
        .collect();
    for (position, tag) in desired.iter_mut().enumerate() {
        tag.set("position", position as i64).unwrap();
    }
    desired.push(tag(&db, "D", 2));
    book.assign("tags", desired).unwrap();

    log.clear();
    db.save(&mut book).await.unwrap();

    assert_eq!(log.deletes(JUNCTION), 1);
    assert_eq!(log.inserts(JUNCTION), 1);
    assert_eq!(log.updates(JUNCTION), 2);
    assert_eq!(log.inserts("tags"), 1);

    let junction_ops: Vec<_> = log
        .statement_list()
        .into_iter()
        .filter(|stmt| stmt.table() == JUNCTION)
        .map(|stmt| stmt.kind())
        .collect();
    assert_eq!(junction_ops, ["delete", "insert", "update", "update"]);

    assert_eq!(
        tags_of(&db, &book).await,
        [
            ("B".to_string(), Value::I64(0)),
            ("C".to_string(), Value::I64(1)),
            ("D".to_string(), Value::I64(2)),
        ]
    );
}

#[tokio::test]
async fn repeated_targets_are_linked_once() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut tag = tag(&db, "dup", 0);
    db.save(&mut tag).await.unwrap();

    let mut book = db.create("Book").unwrap();
    book.set("title", "Twice").unwrap();
    book.assign("tags", vec![tag.clone(), tag]).unwrap();
    db.save(&mut book).await.unwrap();

    assert_eq!(tags_of(&db, &book).await.len(), 1);
}

#[tokio::test]
async fn both_sides_share_the_junction() {
    let (db, _log) = setup(fixtures::library()).await;

    let book = tagged_book(&db, &["shared"]).await;
    let tag = db
        .find_by_column("Tag", "label", "shared", &QueryOptions::default())
        .await
        .unwrap()
        .unwrap();

    let books = db
        .get_relation_lazy(&tag, "books", &QueryOptions::default())
        .await
        .unwrap()
        .into_many()
        .unwrap();

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].pk(), book.pk());
    assert_eq!(books[0].get("position"), &Value::I64(0));
}

#[tokio::test]
async fn self_referential_direction() {
    let (db, _log) = setup(fixtures::social()).await;

    let user = |handle: &str| {
        let mut user = db.create("User").unwrap();
        user.set("handle", handle).unwrap();
        user
    };

    let mut alice = user("alice");
    alice.assign("follows", vec![user("bob"), user("carol")]).unwrap();
    db.save(&mut alice).await.unwrap();

    let handles = |related: tether::Related| -> Vec<String> {
        related
            .into_many()
            .unwrap()
            .iter()
            .map(|user| user.get("handle").as_str().unwrap().to_string())
            .collect()
    };

    let options = QueryOptions::new().order_by(OrderByExpr::asc(Expr::column("handle")));
    let follows = db.get_relation_lazy(&alice, "follows", &options).await.unwrap();
    assert_eq!(handles(follows), ["bob", "carol"]);

    let bob = db
        .find_by_column("User", "handle", "bob", &QueryOptions::default())
        .await
        .unwrap()
        .unwrap();
    let follows = db.get_relation_lazy(&bob, "follows", &options).await.unwrap();
    assert!(handles(follows).is_empty());
}

#[tokio::test]
async fn pivot_filter_through_junction_alias() {
    let (db, _log) = setup(fixtures::library()).await;

    let book = tagged_book(&db, &["x", "y", "z"]).await;

    let options = by_position()
        .filter(Expr::gt(Expr::qualified("j1", "position"), Expr::placeholder("min")))
        .param("min", 0);
    let labels: Vec<_> = db
        .get_relation_lazy(&book, "tags", &options)
        .await
        .unwrap()
        .into_many()
        .unwrap()
        .iter()
        .map(|tag| tag.get("label").clone())
        .collect();

    assert_eq!(labels, [Value::from("y"), Value::from("z")]);
}

#[tokio::test]
async fn pivot_values_are_cast_to_column_type() {
    let (db, mut log) = setup(fixtures::library()).await;

    let mut book = db.create("Book").unwrap();
    book.set("title", "Cast").unwrap();
    let mut numbered = tag(&db, "numbered", 0);
    numbered.set("position", "3").unwrap();
    book.assign("tags", vec![numbered]).unwrap();
    db.save(&mut book).await.unwrap();

    assert_eq!(
        tags_of(&db, &book).await,
        [("numbered".to_string(), Value::I64(3))]
    );

    let mut book = db.create("Book").unwrap();
    book.set("title", "Uncastable").unwrap();
    let mut named = tag(&db, "named", 0);
    named.set("position", "first").unwrap();
    book.assign("tags", vec![named]).unwrap();

    log.clear();
    let err = db.save(&mut book).await.unwrap_err();
    assert!(err.is_type_conversion());
    assert_eq!(log.inserts(JUNCTION), 0);

    // Nothing unreadable was written
    assert!(tags_of(&db, &book).await.is_empty());
}

#[tokio::test]
async fn failed_statement_stops_reconciliation() {
    let (db, mut log) = setup(fixtures::library()).await;

    let mut book = tagged_book(&db, &["A", "B"]).await;
    let mut current = db
        .get_relation_lazy(&book, "tags", &by_position())
        .await
        .unwrap()
        .into_many()
        .unwrap()
        .into_vec();
    let kept = current.pop().unwrap();
    let removed = current.pop().unwrap();

    // A new tag whose key is already taken fails to insert
    let mut clash = tag(&db, "clash", 1);
    clash.set("__id", removed.pk().cloned().unwrap()).unwrap();
    book.assign("tags", vec![kept, clash]).unwrap();

    log.clear();
    let err = db.save(&mut book).await.unwrap_err();
    assert!(err.is_storage());
    assert!(err.to_string().contains("UNIQUE constraint failed"));

    assert_eq!(log.deletes(JUNCTION), 1);
    assert_eq!(log.inserts(JUNCTION), 0);
    assert_eq!(log.updates(JUNCTION), 0);

    // The junction delete issued before the failure is not rolled back
    assert_eq!(
        tags_of(&db, &book).await,
        [("B".to_string(), Value::I64(1))]
    );
}
