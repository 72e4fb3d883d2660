//! 分类/配件目录集成测试 (内存引擎)

use parts_server::db::models::{CategoryCreate, CategoryUpdate, PartCreate, PartUpdate};
use parts_server::db::repository::{CategoryRepository, PartRepository, RepoError};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("mem engine");
    db.use_ns("parts").use_db("test").await.expect("ns/db");
    parts_server::db::define_schema(&db).await.expect("schema");
    db
}

fn part_payload(category: &str, part_number: &str) -> PartCreate {
    PartCreate {
        name: "Oil Filter".into(),
        description: Some("Spin-on filter".into()),
        category: category.to_string(),
        price: 12.5,
        quantity: 20,
        min_quantity: None,
        manufacturer: Some("Mann".into()),
        part_number: part_number.to_string(),
    }
}

#[tokio::test]
async fn category_crud_and_duplicate_name() {
    let db = test_db().await;
    let repo = CategoryRepository::new(db);

    let created = repo
        .create(CategoryCreate {
            name: "Filters".into(),
            description: Some("Air, oil, fuel".into()),
        })
        .await
        .unwrap();
    let id = created.id.clone().unwrap().to_string();

    // Duplicate name rejected
    let err = repo
        .create(CategoryCreate {
            name: "Filters".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Update
    let updated = repo
        .update(
            &id,
            CategoryUpdate {
                name: None,
                description: Some("Updated".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Updated"));
    assert_eq!(updated.name, "Filters");

    // Delete then lookup fails
    assert!(repo.delete(&id).await.unwrap());
    assert!(repo.find_by_id(&id).await.unwrap().is_none());
    let err = repo.delete(&id).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn part_requires_existing_category() {
    let db = test_db().await;
    let parts = PartRepository::new(db);

    let err = parts
        .create(part_payload("category:missing", "OF-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn part_number_must_be_unique() {
    let db = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let category = categories
        .create(CategoryCreate {
            name: "Filters".into(),
            description: None,
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let parts = PartRepository::new(db);
    parts.create(part_payload(&cat_id, "OF-1")).await.unwrap();
    let err = parts.create(part_payload(&cat_id, "OF-1")).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn search_matches_name_description_and_number() {
    let db = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let category = categories
        .create(CategoryCreate {
            name: "Filters".into(),
            description: None,
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let parts = PartRepository::new(db);
    parts.create(part_payload(&cat_id, "OF-1")).await.unwrap();
    parts
        .create(PartCreate {
            name: "Spark Plug".into(),
            description: Some("Iridium electrode".into()),
            category: cat_id.clone(),
            price: 8.0,
            quantity: 50,
            min_quantity: None,
            manufacturer: None,
            part_number: "SP-9".into(),
        })
        .await
        .unwrap();

    // Name match, case-insensitive
    let hits = parts.search("oil").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Oil Filter");
    // 分类已解析
    assert_eq!(hits[0].category.as_ref().unwrap().name, "Filters");

    // Description match
    let hits = parts.search("iridium").await.unwrap();
    assert_eq!(hits.len(), 1);

    // Part number match
    let hits = parts.search("sp-9").await.unwrap();
    assert_eq!(hits.len(), 1);

    // No match
    assert!(parts.search("radiator").await.unwrap().is_empty());
}

#[tokio::test]
async fn low_stock_uses_min_quantity_threshold() {
    let db = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let category = categories
        .create(CategoryCreate {
            name: "Filters".into(),
            description: None,
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let parts = PartRepository::new(db);
    let low = parts
        .create(PartCreate {
            name: "Air Filter".into(),
            description: None,
            category: cat_id.clone(),
            price: 15.0,
            quantity: 3,
            min_quantity: Some(5),
            manufacturer: None,
            part_number: "AF-1".into(),
        })
        .await
        .unwrap();
    parts
        .create(PartCreate {
            name: "Cabin Filter".into(),
            description: None,
            category: cat_id,
            price: 18.0,
            quantity: 30,
            min_quantity: Some(5),
            manufacturer: None,
            part_number: "CF-1".into(),
        })
        .await
        .unwrap();

    let hits = parts.find_low_stock().await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, low.id);
}

#[tokio::test]
async fn update_persists_changed_fields() {
    let db = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let category = categories
        .create(CategoryCreate {
            name: "Filters".into(),
            description: None,
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let parts = PartRepository::new(db);
    let part = parts.create(part_payload(&cat_id, "OF-1")).await.unwrap();
    let part_id = part.id.unwrap().to_string();

    let updated = parts
        .update(
            &part_id,
            PartUpdate {
                name: Some("Premium Oil Filter".into()),
                description: None,
                category: None,
                price: Some(14.0),
                quantity: Some(35),
                min_quantity: None,
                manufacturer: None,
                part_number: None,
                is_active: None,
            },
        )
        .await
        .expect("update part");
    assert_eq!(updated.name, "Premium Oil Filter");
    assert_eq!(updated.price, 14.0);
    assert_eq!(updated.quantity, 35);
    assert_eq!(updated.part_number, "OF-1");

    // 变更已落库，分类链接保持不变
    let fetched = parts.find_by_id(&part_id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Premium Oil Filter");
    assert_eq!(fetched.category.to_string(), cat_id);
}

#[tokio::test]
async fn update_rejects_negative_values() {
    let db = test_db().await;
    let categories = CategoryRepository::new(db.clone());
    let category = categories
        .create(CategoryCreate {
            name: "Filters".into(),
            description: None,
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let parts = PartRepository::new(db);
    let part = parts.create(part_payload(&cat_id, "OF-1")).await.unwrap();
    let part_id = part.id.unwrap().to_string();

    let err = parts
        .update(
            &part_id,
            PartUpdate {
                name: None,
                description: None,
                category: None,
                price: Some(-0.01),
                quantity: None,
                min_quantity: None,
                manufacturer: None,
                part_number: None,
                is_active: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
