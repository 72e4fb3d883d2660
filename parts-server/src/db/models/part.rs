//! Part Model

use super::serde_helpers;
use super::{Category, serde_helpers::bool_true};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 汽车配件
///
/// `category` 存储为记录链接，API 返回时由仓储层 join 成 [`PartFull`]。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    /// 单价 (>= 0)
    pub price: f64,
    /// 当前库存
    pub quantity: i64,
    /// 低库存阈值
    #[serde(default = "default_min_quantity")]
    pub min_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// 配件编号 (全局唯一)
    pub part_number: String,
    /// 是否在售
    #[serde(default = "default_true_fn", deserialize_with = "bool_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_min_quantity() -> i64 {
    5
}

fn default_true_fn() -> bool {
    true
}

impl Part {
    /// 库存是否低于阈值
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

/// 配件 + 已解析的分类 (API 响应用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartFull {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: f64,
    pub quantity: i64,
    pub min_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    pub part_number: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PartFull {
    pub fn from_part(part: Part, category: Option<Category>) -> Self {
        Self {
            id: part.id,
            name: part.name,
            description: part.description,
            category,
            price: part.price,
            quantity: part.quantity,
            min_quantity: part.min_quantity,
            manufacturer: part.manufacturer,
            part_number: part.part_number,
            is_active: part.is_active,
            created_at: part.created_at,
            updated_at: part.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PartCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    /// 分类 ID ("category:xxx")
    pub category: String,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "quantity must be non-negative"))]
    pub quantity: i64,
    #[validate(range(min = 0, message = "min_quantity must be non-negative"))]
    pub min_quantity: Option<i64>,
    pub manufacturer: Option<String>,
    #[validate(length(min = 1, message = "part_number is required"))]
    pub part_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 分类 ID ("category:xxx")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_stock_uses_threshold() {
        let part = Part {
            id: None,
            name: "Brake Pad".into(),
            description: None,
            category: "category:brakes".parse().unwrap(),
            price: 29.99,
            quantity: 5,
            min_quantity: 5,
            manufacturer: None,
            part_number: "BP-100".into(),
            is_active: true,
            created_at: 0,
            updated_at: 0,
        };
        assert!(part.is_low_stock());

        let stocked = Part {
            quantity: 6,
            ..part
        };
        assert!(!stocked.is_low_stock());
    }

    #[test]
    fn create_payload_validates_negative_price() {
        use validator::Validate;
        let payload = PartCreate {
            name: "Oil Filter".into(),
            description: None,
            category: "category:filters".into(),
            price: -1.0,
            quantity: 10,
            min_quantity: None,
            manufacturer: None,
            part_number: "OF-200".into(),
        };
        assert!(payload.validate().is_err());
    }
}
