use tests::{fixtures, setup};

use pretty_assertions::assert_eq;
use tether::{stmt::Value, Db, Model, QueryOptions, Related};

fn profile(db: &Db, bio: &str) -> Model {
    let mut profile = db.create("Profile").unwrap();
    profile.set("bio", bio).unwrap();
    profile
}

async fn stored_link(db: &Db, profile: &Model) -> Value {
    db.find_by_pk("Profile", profile.pk().cloned().unwrap())
        .await
        .unwrap()
        .unwrap()
        .get("__author_id")
        .clone()
}

#[tokio::test]
async fn replacing_unlinks_previous() {
    let (db, mut log) = setup(fixtures::library()).await;

    let mut author = db.create("Author").unwrap();
    author.set("name", "Octavia Butler").unwrap();
    author.assign("profile", profile(&db, "first")).unwrap();
    db.save(&mut author).await.unwrap();

    let first = author
        .related("profile")
        .unwrap()
        .and_then(Related::as_one)
        .cloned()
        .unwrap();
    assert_eq!(&stored_link(&db, &first).await, author.pk().unwrap());

    log.clear();
    author.assign("profile", profile(&db, "second")).unwrap();
    db.save(&mut author).await.unwrap();

    let second = author
        .related("profile")
        .unwrap()
        .and_then(Related::as_one)
        .cloned()
        .unwrap();

    assert_eq!(stored_link(&db, &first).await, Value::Null);
    assert_eq!(&stored_link(&db, &second).await, author.pk().unwrap());
    assert_eq!(log.inserts("profiles"), 1);
    assert_eq!(log.updates("profiles"), 1);

    let current = db
        .get_relation_lazy(&author, "profile", &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(current.as_one().unwrap().get("bio"), &Value::from("second"));
}

#[tokio::test]
async fn keeping_the_same_target_does_not_unlink() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut author = db.create("Author").unwrap();
    author.set("name", "Ted Chiang").unwrap();
    author.assign("profile", profile(&db, "short stories")).unwrap();
    db.save(&mut author).await.unwrap();

    // The slot is persisted; saving again reconciles the same profile
    db.save(&mut author).await.unwrap();

    let current = db
        .get_relation_lazy(&author, "profile", &QueryOptions::default())
        .await
        .unwrap();
    let current = current.as_one().unwrap();
    assert_eq!(current.get("bio"), &Value::from("short stories"));
    assert_eq!(&stored_link(&db, current).await, author.pk().unwrap());
}

#[tokio::test]
async fn null_unlinks_previous() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut author = db.create("Author").unwrap();
    author.set("name", "Solo").unwrap();
    author.assign("profile", profile(&db, "bio")).unwrap();
    db.save(&mut author).await.unwrap();

    let previous = author
        .related("profile")
        .unwrap()
        .and_then(Related::as_one)
        .cloned()
        .unwrap();

    author.assign("profile", Related::Null).unwrap();
    db.save(&mut author).await.unwrap();

    assert_eq!(stored_link(&db, &previous).await, Value::Null);
    let current = db
        .get_relation_lazy(&author, "profile", &QueryOptions::default())
        .await
        .unwrap();
    assert!(current.is_null());
}

#[tokio::test]
async fn new_owner_resolves_to_nothing() {
    let (db, log) = setup(fixtures::library()).await;

    let author = db.create("Author").unwrap();
    let profile = db
        .get_relation_lazy(&author, "profile", &QueryOptions::default())
        .await
        .unwrap();

    assert!(profile.is_null());
    assert!(log.is_empty());
}
