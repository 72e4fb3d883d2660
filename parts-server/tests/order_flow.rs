//! 订单流程集成测试 (内存引擎)

use parts_server::db::models::{
    CategoryCreate, OrderCreate, OrderItemCreate, OrderStatus, OrderUpdate, PartCreate,
    PaymentMethod,
};
use parts_server::db::repository::{
    CategoryRepository, OrderRepository, PartRepository, RepoError,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("mem engine");
    db.use_ns("parts").use_db("test").await.expect("ns/db");
    parts_server::db::define_schema(&db).await.expect("schema");
    db
}

/// 建一个分类和一个配件，返回配件 ID
async fn seed_part(db: &Surreal<Db>, price: f64, quantity: i64) -> String {
    let categories = CategoryRepository::new(db.clone());
    let category = categories
        .create(CategoryCreate {
            name: format!("Brakes-{}", rand::random::<u32>()),
            description: None,
        })
        .await
        .expect("create category");

    let parts = PartRepository::new(db.clone());
    let part = parts
        .create(PartCreate {
            name: "Brake Pad".into(),
            description: Some("Front axle".into()),
            category: category.id.unwrap().to_string(),
            price,
            quantity,
            min_quantity: Some(2),
            manufacturer: Some("Bosch".into()),
            part_number: format!("BP-{}", rand::random::<u32>()),
        })
        .await
        .expect("create part");

    part.id.unwrap().to_string()
}

#[tokio::test]
async fn place_order_snapshots_price_and_decrements_stock() {
    let db = test_db().await;
    let part_id = seed_part(&db, 10.0, 5).await;

    let orders = OrderRepository::new(db.clone());
    let order = orders
        .place(OrderCreate {
            customer_name: Some("Alice".into()),
            customer_phone: None,
            items: vec![OrderItemCreate {
                part: part_id.clone(),
                quantity: 2,
            }],
            payment_method: None,
            notes: None,
        })
        .await
        .expect("place order");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 20.0);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].price, 10.0);
    assert!(order.order_number.starts_with("ORD-"));

    let parts = PartRepository::new(db.clone());
    let part = parts.find_by_id(&part_id).await.unwrap().unwrap();
    assert_eq!(part.quantity, 3);
}

#[tokio::test]
async fn place_order_rejects_empty_items() {
    let db = test_db().await;
    let orders = OrderRepository::new(db.clone());
    let err = orders
        .place(OrderCreate {
            customer_name: None,
            customer_phone: None,
            items: vec![],
            payment_method: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn place_order_rejects_insufficient_stock() {
    let db = test_db().await;
    let part_id = seed_part(&db, 10.0, 1).await;

    let orders = OrderRepository::new(db.clone());
    let err = orders
        .place(OrderCreate {
            customer_name: None,
            customer_phone: None,
            items: vec![OrderItemCreate {
                part: part_id.clone(),
                quantity: 2,
            }],
            payment_method: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // 库存未被扣减
    let parts = PartRepository::new(db.clone());
    assert_eq!(parts.find_by_id(&part_id).await.unwrap().unwrap().quantity, 1);
}

#[tokio::test]
async fn place_order_rejects_unknown_part() {
    let db = test_db().await;
    let orders = OrderRepository::new(db.clone());
    let err = orders
        .place(OrderCreate {
            customer_name: None,
            customer_phone: None,
            items: vec![OrderItemCreate {
                part: "part:does_not_exist".into(),
                quantity: 1,
            }],
            payment_method: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn cancel_restores_stock_exactly_once() {
    let db = test_db().await;
    let part_id = seed_part(&db, 10.0, 5).await;

    let orders = OrderRepository::new(db.clone());
    let order = orders
        .place(OrderCreate {
            customer_name: None,
            customer_phone: None,
            items: vec![OrderItemCreate {
                part: part_id.clone(),
                quantity: 3,
            }],
            payment_method: None,
            notes: None,
        })
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    let parts = PartRepository::new(db.clone());
    assert_eq!(parts.find_by_id(&part_id).await.unwrap().unwrap().quantity, 2);

    let cancelled = orders
        .update(
            &order_id,
            OrderUpdate {
                status: Some(OrderStatus::Cancelled),
                payment_method: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(parts.find_by_id(&part_id).await.unwrap().unwrap().quantity, 5);

    // 再次取消被拒绝，库存不再变化
    let err = orders
        .update(
            &order_id,
            OrderUpdate {
                status: Some(OrderStatus::Cancelled),
                payment_method: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Business(_)));
    assert_eq!(parts.find_by_id(&part_id).await.unwrap().unwrap().quantity, 5);
}

#[tokio::test]
async fn completed_order_cannot_change_status() {
    let db = test_db().await;
    let part_id = seed_part(&db, 5.0, 10).await;

    let orders = OrderRepository::new(db.clone());
    let order = orders
        .place(OrderCreate {
            customer_name: None,
            customer_phone: None,
            items: vec![OrderItemCreate {
                part: part_id,
                quantity: 1,
            }],
            payment_method: Some(PaymentMethod::Cash),
            notes: None,
        })
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    orders
        .update(
            &order_id,
            OrderUpdate {
                status: Some(OrderStatus::Completed),
                payment_method: None,
            },
        )
        .await
        .unwrap();

    let err = orders
        .update(
            &order_id,
            OrderUpdate {
                status: Some(OrderStatus::Cancelled),
                payment_method: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Business(_)));
}

#[tokio::test]
async fn sales_report_counts_only_completed_orders() {
    let db = test_db().await;
    let part_id = seed_part(&db, 10.0, 100).await;
    let orders = OrderRepository::new(db.clone());

    // 一个完成 (现金)、一个完成 (未指定支付方式)、一个保持 PENDING
    for (qty, method, complete) in [
        (2, Some(PaymentMethod::Cash), true),
        (1, None, true),
        (4, None, false),
    ] {
        let order = orders
            .place(OrderCreate {
                customer_name: None,
                customer_phone: None,
                items: vec![OrderItemCreate {
                    part: part_id.clone(),
                    quantity: qty,
                }],
                payment_method: method,
                notes: None,
            })
            .await
            .unwrap();
        if complete {
            orders
                .update(
                    &order.id.unwrap().to_string(),
                    OrderUpdate {
                        status: Some(OrderStatus::Completed),
                        payment_method: None,
                    },
                )
                .await
                .unwrap();
        }
    }

    let report = orders.sales_report(0, i64::MAX).await.unwrap();
    assert_eq!(report.orders.len(), 2);
    assert_eq!(report.total_sales, 30.0);
    assert_eq!(report.sales_by_payment_method["CASH"], 20.0);
    assert_eq!(report.sales_by_payment_method["UNPAID"], 10.0);
}
