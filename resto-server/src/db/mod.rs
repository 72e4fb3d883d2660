//! Database Module
//!
//! 嵌入式 SurrealDB (RocksDb 引擎) 初始化与表结构声明。
//! 桌台存放在 `dining_table` 表 (避开 TABLE 关键字)，API 层仍以 table 暴露。

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use shared::AppError;

const NAMESPACE: &str = "resto";
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
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS idx_menu_item_name ON TABLE menu_item COLUMNS name UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_table_number ON TABLE dining_table COLUMNS table_number UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_user_email ON TABLE user COLUMNS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_order_number ON TABLE order COLUMNS order_number UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

    Ok(())
}
