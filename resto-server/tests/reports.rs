//! 报表集成测试 (内存引擎)
//!
//! 报表只统计已完成订单，这里通过支付接口把订单推进到 completed。

use resto_server::db::models::{
    MenuItemCreate, OrderCreate, OrderItemCreate, PaymentMethod, RegisterRequest, TableCreate,
};
use resto_server::db::repository::{
    MenuItemRepository, OrderRepository, RepoError, ReportRepository, TableRepository,
    UserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("mem engine");
    db.use_ns("resto").use_db("test").await.expect("ns/db");
    resto_server::db::define_schema(&db).await.expect("schema");
    db
}

async fn seed_waiter(db: &Surreal<Db>, name: &str) -> String {
    let users = UserRepository::new(db.clone());
    let user = users
        .register(RegisterRequest {
            name: name.to_string(),
            email: format!("{}-{}@example.com", name, rand::random::<u32>()),
            password: "secret123".into(),
            role: Some("waiter".into()),
        })
        .await
        .expect("register waiter");
    user.id.unwrap().to_string()
}

async fn seed_menu_item(db: &Surreal<Db>, name: &str, category: &str, price: f64) -> String {
    let menu = MenuItemRepository::new(db.clone());
    let item = menu
        .create(MenuItemCreate {
            name: name.to_string(),
            description: None,
            category: category.to_string(),
            price,
            image: None,
            customizations: vec![],
            available: None,
            preparation_time: None,
        })
        .await
        .expect("create menu item");
    item.id.unwrap().to_string()
}

/// 下单并支付，订单进入 completed
async fn completed_order(
    db: &Surreal<Db>,
    waiter: &str,
    table_number: i64,
    items: Vec<(String, i64)>,
) {
    let tables = TableRepository::new(db.clone());
    if tables.find_by_number(table_number).await.unwrap().is_none() {
        tables
            .create(TableCreate {
                table_number,
                capacity: 4,
            })
            .await
            .unwrap();
    }

    let orders = OrderRepository::new(db.clone());
    let order = orders
        .place(
            waiter,
            OrderCreate {
                table: table_number,
                items: items
                    .into_iter()
                    .map(|(menu_item, quantity)| OrderItemCreate {
                        menu_item,
                        quantity,
                        customizations: vec![],
                    })
                    .collect(),
                notes: None,
            },
        )
        .await
        .unwrap();
    orders
        .process_payment(&order.id.unwrap().to_string(), PaymentMethod::Cash)
        .await
        .unwrap();
}

#[tokio::test]
async fn daily_sales_groups_by_category() {
    let db = test_db().await;
    let waiter = seed_waiter(&db, "Maria").await;
    let burger = seed_menu_item(&db, "Burger", "main", 10.0).await;
    let cola = seed_menu_item(&db, "Cola", "beverage", 2.5).await;

    // 2 汉堡 + 2 可乐，一张未完成的单不计入
    completed_order(&db, &waiter, 1, vec![(burger.clone(), 2), (cola.clone(), 2)]).await;

    let tables = TableRepository::new(db.clone());
    tables
        .create(TableCreate {
            table_number: 2,
            capacity: 4,
        })
        .await
        .unwrap();
    let orders = OrderRepository::new(db.clone());
    orders
        .place(
            &waiter,
            OrderCreate {
                table: 2,
                items: vec![OrderItemCreate {
                    menu_item: burger,
                    quantity: 1,
                    customizations: vec![],
                }],
                notes: None,
            },
        )
        .await
        .unwrap();

    let reports = ReportRepository::new(db.clone());
    let report = reports.daily_sales().await.unwrap();

    assert_eq!(report.total_orders, 1);
    // subtotal 25.00 + 10% 税 + 5% 服务费 = 28.75
    assert_eq!(report.total_sales, 28.75);
    assert_eq!(report.sales_by_category["main"], 20.0);
    assert_eq!(report.sales_by_category["beverage"], 5.0);
}

#[tokio::test]
async fn waiter_performance_aggregates_per_waiter() {
    let db = test_db().await;
    let maria = seed_waiter(&db, "Maria").await;
    let carlos = seed_waiter(&db, "Carlos").await;
    let burger = seed_menu_item(&db, "Burger", "main", 10.0).await;

    completed_order(&db, &maria, 1, vec![(burger.clone(), 1)]).await;
    completed_order(&db, &maria, 2, vec![(burger.clone(), 3)]).await;
    completed_order(&db, &carlos, 3, vec![(burger, 2)]).await;

    let reports = ReportRepository::new(db.clone());
    let performance = reports.waiter_performance(0, i64::MAX).await.unwrap();
    assert_eq!(performance.len(), 2);

    let maria_row = performance.iter().find(|p| p.waiter_name == "Maria").unwrap();
    assert_eq!(maria_row.total_orders, 2);
    // (11.50 + 34.50) / 2
    assert_eq!(maria_row.total_sales, 46.0);
    assert_eq!(maria_row.average_order_value, 23.0);

    let carlos_row = performance.iter().find(|p| p.waiter_name == "Carlos").unwrap();
    assert_eq!(carlos_row.total_orders, 1);
    assert_eq!(carlos_row.total_sales, 23.0);
}

#[tokio::test]
async fn monthly_revenue_fills_empty_months_with_zero() {
    let db = test_db().await;
    let waiter = seed_waiter(&db, "Maria").await;
    let burger = seed_menu_item(&db, "Burger", "main", 10.0).await;
    completed_order(&db, &waiter, 1, vec![(burger, 1)]).await;

    let year = chrono::Datelike::year(&chrono::Utc::now());
    let reports = ReportRepository::new(db.clone());
    let months = reports.monthly_revenue(year).await.unwrap();

    assert_eq!(months.len(), 12);
    let with_orders: Vec<_> = months.iter().filter(|m| m.total_orders > 0).collect();
    assert_eq!(with_orders.len(), 1);
    assert_eq!(with_orders[0].total_revenue, 11.5);
    assert!(months.iter().filter(|m| m.total_orders == 0).all(|m| {
        m.total_revenue == 0.0 && m.average_order_value == 0.0
    }));
}

#[tokio::test]
async fn monthly_revenue_rejects_invalid_year() {
    let db = test_db().await;
    let reports = ReportRepository::new(db.clone());
    let err = reports.monthly_revenue(1_000_000).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn inventory_sums_quantity_and_revenue_per_item() {
    let db = test_db().await;
    let waiter = seed_waiter(&db, "Maria").await;
    let burger = seed_menu_item(&db, "Burger", "main", 10.0).await;
    let cola = seed_menu_item(&db, "Cola", "beverage", 2.5).await;

    completed_order(&db, &waiter, 1, vec![(burger.clone(), 2)]).await;
    completed_order(&db, &waiter, 2, vec![(burger, 1), (cola, 4)]).await;

    let reports = ReportRepository::new(db.clone());
    let inventory = reports.inventory(0, i64::MAX).await.unwrap();
    assert_eq!(inventory.len(), 2);

    let burger_row = inventory.iter().find(|e| e.name == "Burger").unwrap();
    assert_eq!(burger_row.quantity_sold, 3);
    assert_eq!(burger_row.revenue, 30.0);

    let cola_row = inventory.iter().find(|e| e.name == "Cola").unwrap();
    assert_eq!(cola_row.quantity_sold, 4);
    assert_eq!(cola_row.revenue, 10.0);
}
