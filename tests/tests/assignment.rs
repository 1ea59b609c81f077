use tests::{fixtures, setup};

use pretty_assertions::assert_eq;
use tether::{stmt::Value, Assignment, QueryOptions, RelationAware};

#[tokio::test]
async fn undeclared_relation() {
    let (db, _log) = setup(fixtures::library()).await;
    let mut book = db.create("Book").unwrap();

    let err = db
        .get_relation_lazy(&book, "publisher", &QueryOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_unknown_relation());
    assert_eq!(
        err.to_string(),
        "no such relation: `publisher` in model `Book`"
    );

    let err = db
        .set_relation(&mut book, "publisher", Assignment::Null)
        .await
        .unwrap_err();
    assert!(err.is_unknown_relation());

    assert!(book.relation("publisher").unwrap_err().is_unknown_relation());
    assert!(db.load_relation(&mut book, "publisher").await.is_err());
}

#[tokio::test]
async fn declared_relations_in_order() {
    let (db, _log) = setup(fixtures::library()).await;
    let author = db.create("Author").unwrap();

    let names: Vec<_> = author.relations().keys().cloned().collect();
    assert_eq!(names, ["books", "profile"]);
}

#[tokio::test]
async fn key_is_loaded_into_target() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut author = db.create("Author").unwrap();
    author.set("name", "Keyed").unwrap();
    db.save(&mut author).await.unwrap();

    let mut book = db.create("Book").unwrap();
    book.set("title", "By key").unwrap();
    db.set_relation(&mut book, "author", Assignment::key(author.pk().cloned()))
        .await
        .unwrap();

    let slot = book.slot("author").unwrap();
    assert!(slot.is_dirty());
    assert_eq!(
        slot.value().unwrap().as_one().unwrap().get("name"),
        &Value::from("Keyed")
    );

    db.save(&mut book).await.unwrap();
    assert_eq!(book.get("__author_id"), author.pk().unwrap());
}

#[tokio::test]
async fn missing_key_is_not_found() {
    let (db, _log) = setup(fixtures::library()).await;
    let mut book = db.create("Book").unwrap();

    let err = db
        .set_relation(&mut book, "author", Assignment::key(404))
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());
    assert_eq!(
        err.to_string(),
        "record not found: `Author` with primary key I64(404)"
    );

    let err = db
        .set_relation(&mut book, "tags", Assignment::keys([1, 2]))
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());
    assert!(book.slot("tags").unwrap().is_unresolved());
}

#[tokio::test]
async fn shape_and_target_are_checked() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut book = db.create("Book").unwrap();
    let author = db.create("Author").unwrap();
    let tag = db.create("Tag").unwrap();

    let err = db
        .set_relation(&mut book, "author", vec![author.clone()])
        .await
        .unwrap_err();
    assert!(err.is_invalid_assignment());

    let err = db
        .set_relation(&mut book, "tags", author.clone())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid assignment to `Book.tags`: expected a collection, got a model"
    );

    let err = db
        .set_relation(&mut book, "author", tag)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid assignment to `Book.author`: expected a `Author`, got a `Tag`"
    );

    db.set_relation(&mut book, "author", author).await.unwrap();
    db.set_relation(&mut book, "author", Assignment::Null)
        .await
        .unwrap();
    assert!(book.related("author").unwrap().unwrap().is_null());
}

#[tokio::test]
async fn many_keys_build_a_collection() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut keys = vec![];
    for label in ["one", "two"] {
        let mut tag = db.create("Tag").unwrap();
        tag.set("label", label).unwrap();
        db.save(&mut tag).await.unwrap();
        keys.push(tag.pk().cloned().unwrap());
    }

    let mut book = db.create("Book").unwrap();
    book.set("title", "Keys").unwrap();
    db.set_relation(&mut book, "tags", Assignment::Keys(keys))
        .await
        .unwrap();
    db.save(&mut book).await.unwrap();

    let tags = db
        .get_relation_lazy(&book, "tags", &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(tags.as_many().unwrap().len(), 2);
}
