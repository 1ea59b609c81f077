use tests::{fixtures, setup, LoggingDriver};

use pretty_assertions::assert_eq;
use tether::{
    stmt::{Expr, OrderByExpr, Value},
    Db, QueryOptions,
};

fn assert_sync_send<T: Send>(val: T) -> T {
    val
}

#[tokio::test]
async fn create_unknown_model() {
    let (db, _log) = setup(fixtures::library()).await;

    let err = db.create("Publisher").unwrap_err();
    assert_eq!(err.to_string(), "unknown model `Publisher`");
}

#[tokio::test]
async fn find_by_column_and_all() {
    let (db, _log) = setup(fixtures::library()).await;

    for label in ["b", "a", "c", "a"] {
        let mut tag = db.create("Tag").unwrap();
        tag.set("label", label).unwrap();
        db.save(&mut tag).await.unwrap();
    }

    let found = db
        .find_all_by_column("Tag", "label", "a", &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert!(!found.is_new());

    let first = db
        .find_by_column("Tag", "label", "c", &QueryOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.pk(), Some(&Value::I64(3)));

    let options = QueryOptions::new()
        .order_by(OrderByExpr::desc(Expr::column("label")))
        .limit(2);
    let labels: Vec<_> = db
        .find_all("Tag", &options)
        .await
        .unwrap()
        .iter()
        .map(|tag| tag.get("label").clone())
        .collect();
    assert_eq!(labels, [Value::from("c"), Value::from("b")]);

    let err = db
        .find_by_column("Tag", "name", "a", &QueryOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown column `name` in model `Tag`");
}

#[tokio::test]
async fn find_by_null_column() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut book = db.create("Book").unwrap();
    book.set("title", "Unattributed").unwrap();
    db.save(&mut book).await.unwrap();

    let found = db
        .find_all_by_column("Book", "__author_id", Value::Null, &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn delete_forgets_the_key() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut tag = db.create("Tag").unwrap();
    tag.set("label", "gone").unwrap();
    db.save(&mut tag).await.unwrap();
    let pk = tag.pk().cloned().unwrap();

    db.delete(&mut tag).await.unwrap();
    assert!(tag.is_new());
    assert!(tag.pk().is_none());
    assert!(db.find_by_pk("Tag", pk.clone()).await.unwrap().is_none());

    // Saving again inserts a new row
    db.save(&mut tag).await.unwrap();
    assert_ne!(tag.pk(), Some(&pk));
}

#[tokio::test]
async fn stale_instances_are_not_found() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut tag = db.create("Tag").unwrap();
    tag.set("label", "twice").unwrap();
    db.save(&mut tag).await.unwrap();

    let mut copy = db
        .find_by_pk("Tag", tag.pk().cloned().unwrap())
        .await
        .unwrap()
        .unwrap();
    db.delete(&mut tag).await.unwrap();

    copy.set("label", "edited").unwrap();
    assert!(db.save(&mut copy).await.unwrap_err().is_record_not_found());

    let mut deleted_twice = copy.clone();
    assert!(db
        .delete(&mut deleted_twice)
        .await
        .unwrap_err()
        .is_record_not_found());
}

#[tokio::test]
async fn rollback_discards_a_save() {
    let (db, _log) = setup(fixtures::library()).await;

    db.begin().await.unwrap();
    let mut author = db.create("Author").unwrap();
    author.set("name", "Transient").unwrap();
    db.save(&mut author).await.unwrap();
    db.rollback().await.unwrap();

    let all = db.find_all("Author", &QueryOptions::default()).await.unwrap();
    assert!(all.is_empty());

    db.begin().await.unwrap();
    let mut author = db.create("Author").unwrap();
    author.set("name", "Durable").unwrap();
    db.save(&mut author).await.unwrap();
    db.commit().await.unwrap();

    let all = db.find_all("Author", &QueryOptions::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn factory_seeds_new_instances() {
    tests::init_tracing();

    let db = Db::builder()
        .register(fixtures::library())
        .factory("Book", |book| {
            book.set("title", "Untitled").unwrap();
        })
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let mut book = db.create("Book").unwrap();
    assert_eq!(book.get("title"), &Value::from("Untitled"));

    book.set("title", "Named").unwrap();
    db.save(&mut book).await.unwrap();

    // Stored values win over factory defaults
    let stored = db
        .find_by_pk("Book", book.pk().cloned().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get("title"), &Value::from("Named"));
}

#[tokio::test]
async fn table_name_prefix() {
    tests::init_tracing();

    let driver = LoggingDriver::new(tether::driver::connect("sqlite::memory:").unwrap());
    let log = tests::ExecLog::from(&driver);

    let db = Db::builder()
        .register(fixtures::library())
        .table_name_prefix("lib_")
        .build(driver)
        .await
        .unwrap();

    let mut book = db.create("Book").unwrap();
    book.set("title", "Prefixed").unwrap();
    db.save(&mut book).await.unwrap();

    assert_eq!(log.inserts("lib_books"), 1);
    assert!(db.schema().table("lib_books_to_tags").is_some());
}

#[tokio::test]
async fn reset_db_drops_rows() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut tag = db.create("Tag").unwrap();
    tag.set("label", "temporary").unwrap();
    db.save(&mut tag).await.unwrap();

    db.reset_db().await.unwrap();
    let all = db.find_all("Tag", &QueryOptions::default()).await.unwrap();
    assert!(all.is_empty());

    // Pushing an existing schema is a no-op
    db.push_schema().await.unwrap();
}

#[tokio::test]
async fn save_future_is_send() {
    let (db, _log) = setup(fixtures::library()).await;

    let mut author = db.create("Author").unwrap();
    author.set("name", "Sent").unwrap();

    let task = {
        let db = db.clone();
        tokio::spawn(async move {
            assert_sync_send(db.save(&mut author)).await.unwrap();
            author
        })
    };

    let author = task.await.unwrap();
    assert!(!author.is_new());
}
