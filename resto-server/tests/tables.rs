//! 桌台状态机集成测试 (内存引擎)

use resto_server::db::models::{RegisterRequest, TableCreate, TableStatus};
use resto_server::db::repository::{RepoError, TableRepository, UserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("mem engine");
    db.use_ns("resto").use_db("test").await.expect("ns/db");
    resto_server::db::define_schema(&db).await.expect("schema");
    db
}

async fn seed_table(db: &Surreal<Db>, table_number: i64) -> String {
    let tables = TableRepository::new(db.clone());
    let table = tables
        .create(TableCreate {
            table_number,
            capacity: 4,
        })
        .await
        .expect("create table");
    table.id.unwrap().to_string()
}

async fn seed_user(db: &Surreal<Db>, role: &str) -> String {
    let users = UserRepository::new(db.clone());
    let user = users
        .register(RegisterRequest {
            name: format!("{}-user", role),
            email: format!("{}-{}@example.com", role, rand::random::<u32>()),
            password: "secret123".into(),
            role: Some(role.into()),
        })
        .await
        .expect("register user");
    user.id.unwrap().to_string()
}

#[tokio::test]
async fn duplicate_table_number_rejected() {
    let db = test_db().await;
    seed_table(&db, 1).await;

    let tables = TableRepository::new(db.clone());
    let err = tables
        .create(TableCreate {
            table_number: 1,
            capacity: 2,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn valid_transitions_walk_the_lifecycle() {
    let db = test_db().await;
    let id = seed_table(&db, 2).await;
    let tables = TableRepository::new(db.clone());

    // AVAILABLE → RESERVED → OCCUPIED → CLEANING → AVAILABLE
    let t = tables.set_status(&id, TableStatus::Reserved).await.unwrap();
    assert_eq!(t.status, TableStatus::Reserved);

    let t = tables.set_status(&id, TableStatus::Occupied).await.unwrap();
    assert_eq!(t.status, TableStatus::Occupied);

    let t = tables.set_status(&id, TableStatus::Cleaning).await.unwrap();
    assert_eq!(t.status, TableStatus::Cleaning);
    assert!(t.last_cleaned.is_some());

    let t = tables.set_status(&id, TableStatus::Available).await.unwrap();
    assert_eq!(t.status, TableStatus::Available);
}

#[tokio::test]
async fn invalid_transitions_rejected() {
    let db = test_db().await;
    let id = seed_table(&db, 3).await;
    let tables = TableRepository::new(db.clone());

    // AVAILABLE → CLEANING 不合法
    let err = tables
        .set_status(&id, TableStatus::Cleaning)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Business(_)));

    // CLEANING → OCCUPIED 不合法
    tables.set_status(&id, TableStatus::Occupied).await.unwrap();
    tables.set_status(&id, TableStatus::Cleaning).await.unwrap();
    let err = tables
        .set_status(&id, TableStatus::Occupied)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Business(_)));
}

#[tokio::test]
async fn releasing_clears_waiter_and_order() {
    let db = test_db().await;
    let id = seed_table(&db, 4).await;
    let waiter = seed_user(&db, "waiter").await;
    let tables = TableRepository::new(db.clone());

    let table = tables.find_by_id(&id).await.unwrap().unwrap();
    let occupied = tables
        .occupy(table, waiter.parse().unwrap(), "260830001")
        .await
        .unwrap();
    assert_eq!(occupied.status, TableStatus::Occupied);
    assert_eq!(occupied.current_order.as_deref(), Some("260830001"));

    let released = tables.release(occupied).await.unwrap();
    assert_eq!(released.status, TableStatus::Available);
    assert!(released.current_waiter.is_none());
    assert!(released.current_order.is_none());
}

#[tokio::test]
async fn assign_waiter_requires_waiter_role() {
    let db = test_db().await;
    let id = seed_table(&db, 5).await;
    let waiter = seed_user(&db, "waiter").await;
    let chef = seed_user(&db, "chef").await;
    let tables = TableRepository::new(db.clone());

    let table = tables.assign_waiter(&id, Some(waiter.clone())).await.unwrap();
    assert_eq!(
        table.current_waiter.map(|w| w.to_string()),
        Some(waiter)
    );

    // 厨师不能被分配为服务员
    let err = tables.assign_waiter(&id, Some(chef)).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // 取消分配
    let table = tables.assign_waiter(&id, None).await.unwrap();
    assert!(table.current_waiter.is_none());
}

#[tokio::test]
async fn assigned_waiter_leaves_available_pool() {
    let db = test_db().await;
    let id = seed_table(&db, 6).await;
    let waiter = seed_user(&db, "waiter").await;
    seed_user(&db, "chef").await;

    let users = UserRepository::new(db.clone());
    assert_eq!(users.find_available_waiters().await.unwrap().len(), 1);

    let tables = TableRepository::new(db.clone());
    tables.assign_waiter(&id, Some(waiter)).await.unwrap();

    assert!(users.find_available_waiters().await.unwrap().is_empty());
}
