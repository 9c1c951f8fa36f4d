use lariat::driver::{Connection, Driver};
use lariat::schema::{
    register_column, register_relation, register_table, ColumnOptions, EntityId, RelationOptions,
    TableOptions,
};
use lariat::stmt::{Op, Value, ValueRecord};
use lariat::{async_trait, scope, Db, Entity, Result};

use std::sync::{Arc, Mutex, Once};

struct User;
impl Entity for User {
    const NAME: &'static str = "User";
}

struct Course;
impl Entity for Course {
    const NAME: &'static str = "Course";
}

fn install_schema() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        register_table::<User>(TableOptions::new().name("users"));
        register_column::<User>("id", ColumnOptions::new().primary());
        register_column::<User>("username", ColumnOptions::new());
        register_relation::<User>("courses", RelationOptions::has_many(EntityId::of::<Course>));

        register_table::<Course>(TableOptions::new().name("courses"));
        register_column::<Course>("id", ColumnOptions::new().primary());
    });
}

/// Backend stub: returns canned rows and records every executed statement.
struct StubDriver {
    rows: Vec<ValueRecord>,
    log: Arc<Mutex<Vec<String>>>,
}

impl StubDriver {
    fn new(rows: Vec<ValueRecord>) -> Self {
        Self {
            rows,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn log(&self) -> Arc<Mutex<Vec<String>>> {
        self.log.clone()
    }
}

#[async_trait]
impl Driver for StubDriver {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(StubConnection {
            rows: self.rows.clone(),
            log: self.log.clone(),
        }))
    }
}

struct StubConnection {
    rows: Vec<ValueRecord>,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Connection for StubConnection {
    async fn query(&self, sql: &str, _params: &[Value]) -> Result<Vec<ValueRecord>> {
        self.log.lock().unwrap().push(sql.to_string());
        Ok(self.rows.clone())
    }
}

fn row(fields: &[(&str, Value)]) -> ValueRecord {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

async fn db_with(rows: Vec<ValueRecord>) -> (Db, Arc<Mutex<Vec<String>>>) {
    install_schema();
    let driver = StubDriver::new(rows);
    let log = driver.log();
    let db = Db::with_driver(driver).await.unwrap();
    (db, log)
}

#[tokio::test]
async fn chain_methods_do_not_mutate_the_receiver() {
    let (db, _log) = db_with(vec![]).await;
    let users = db.collection::<User>();

    let before = users.state().clone();
    let filtered = users.filter("u => u.id > 10");

    assert_eq!(*users.state(), before);
    assert_ne!(*filtered.state(), before);
    assert_eq!(filtered.state().ops.len(), 1);
}

#[tokio::test]
async fn every_chain_method_returns_a_fresh_builder() {
    let (db, _log) = db_with(vec![]).await;
    let users = db.collection::<User>();
    let before = users.state().clone();

    let _ = users.filter("u => u.id > 1");
    let _ = users.map("u => ({ id: u.id })");
    let _ = users.skip(1);
    let _ = users.take(2);
    let _ = users.distinct();
    let _ = users.include("courses");
    let _ = users.order_by("username");
    let _ = users.scope(scope! { foo: 1 });

    assert_eq!(*users.state(), before);
}

#[tokio::test]
async fn operations_accumulate_in_call_order() {
    let (db, _log) = db_with(vec![]).await;
    let chain = db
        .collection::<User>()
        .filter("u => u.id > 1")
        .skip(2)
        .filter("u => u.id < 9");

    let ops = &chain.state().ops;
    assert!(matches!(&ops[0], Op::Filter(src) if src == "u => u.id > 1"));
    assert!(matches!(&ops[1], Op::Skip(2)));
    assert!(matches!(&ops[2], Op::Filter(src) if src == "u => u.id < 9"));
}

#[tokio::test]
async fn order_by_wraps_bare_field_names() {
    let (db, _log) = db_with(vec![]).await;
    let chain = db.collection::<User>().order_by("username");

    assert!(matches!(
        &chain.state().ops[0],
        Op::Order { selector, .. } if selector == "x => x.username"
    ));
}

#[tokio::test]
async fn scope_merges_with_later_calls_winning() {
    let (db, _log) = db_with(vec![]).await;
    let chain = db
        .collection::<User>()
        .scope(scope! { foo: 1, bar: 2 })
        .scope(scope! { bar: 3 });

    let scope = &chain.state().scope;
    assert_eq!(scope.get("foo"), Some(&Value::I64(1)));
    assert_eq!(scope.get("bar"), Some(&Value::I64(3)));
}

#[tokio::test]
async fn to_array_executes_the_compiled_sql() {
    let (db, log) = db_with(vec![row(&[("id", Value::I64(1))])]).await;

    let rows = db
        .collection::<User>()
        .filter("u => u.id > 10")
        .to_array()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let executed = log.lock().unwrap();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].ends_with(r#"WHERE ("___t0"."id" > 10)"#));
}

#[tokio::test]
async fn to_array_rehydrates_dot_aliases() {
    let (db, _log) = db_with(vec![row(&[
        ("id", Value::I64(1)),
        ("c.cid", Value::I64(7)),
    ])])
    .await;

    let rows = db.collection::<User>().to_array().await.unwrap();

    let nested = rows[0].get("c").unwrap().expect_record();
    assert_eq!(nested.get("cid"), Some(&Value::I64(7)));
    assert!(rows[0].get("c.cid").is_none());
}

#[tokio::test]
async fn first_limits_to_one_row_without_mutating_the_chain() {
    let (db, log) = db_with(vec![row(&[("id", Value::I64(1))])]).await;
    let chain = db.collection::<User>().filter("u => u.id > 10");

    let first = chain.first().await.unwrap();
    assert!(first.is_some());
    // `first` appended take(1) to a copy of the operation list
    assert_eq!(chain.state().ops.len(), 1);
    assert!(log.lock().unwrap()[0].ends_with("LIMIT 1"));
}

#[tokio::test]
async fn first_returns_none_on_empty_result() {
    let (db, _log) = db_with(vec![]).await;
    assert!(db.collection::<User>().first().await.unwrap().is_none());
}

#[tokio::test]
async fn count_executes_a_count_wrapper() {
    let (db, log) = db_with(vec![row(&[("count", Value::I64(42))])]).await;

    let count = db.collection::<User>().count().await.unwrap();
    assert_eq!(count, 42);
    assert!(log.lock().unwrap()[0].starts_with(r#"SELECT COUNT(*) AS "count" FROM ("#));
}

#[tokio::test]
async fn translation_errors_surface_before_any_execution() {
    let (db, log) = db_with(vec![]).await;

    let err = db
        .collection::<User>()
        .filter("u => u.nope > 1")
        .to_array()
        .await
        .unwrap_err();

    assert!(err.is_translation());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unregistered_entity_is_a_schema_error() {
    struct Ghost;
    impl Entity for Ghost {
        const NAME: &'static str = "Ghost";
    }

    let (db, _log) = db_with(vec![]).await;
    let err = db.collection::<Ghost>().to_array().await.unwrap_err();
    assert!(err.is_invalid_schema());
}
