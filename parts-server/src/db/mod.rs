//! Database Module
//!
//! 嵌入式 SurrealDB (RocksDb 引擎) 初始化与表结构声明。

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use shared::AppError;

const NAMESPACE: &str = "parts";
const DATABASE: &str = "main";

/// 打开数据库并声明索引
pub async fn init_db(path: &Path) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

    define_schema(&db).await?;

    tracing::info!("Database ready at {}", path.display());
    Ok(db)
}

/// 声明唯一索引
///
/// SurrealDB 是 schemaless 的，只需要声明唯一约束。
/// 测试使用内存引擎时也调用本函数，保证约束一致。
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS idx_category_name ON TABLE category COLUMNS name UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_part_number ON TABLE part COLUMNS part_number UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_user_username ON TABLE user COLUMNS username UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_user_email ON TABLE user COLUMNS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_order_number ON TABLE order COLUMNS order_number UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

    Ok(())
}
