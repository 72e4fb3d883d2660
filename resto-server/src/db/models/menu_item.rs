//! Menu Item Model

use super::serde_helpers::{self, bool_true};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 定制项选项 (如 "加冰 +0.00"、"双份浓缩 +1.50")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub name: String,
    pub price: f64,
}

/// 菜品定制项 (如 "温度"、"加料")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customization {
    pub name: String,
    pub options: Vec<CustomizationOption>,
}

/// 菜品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 菜单分类 (appetizer / main / dessert / beverage ...)
    pub category: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub customizations: Vec<Customization>,
    /// 是否可点
    #[serde(default = "default_true_fn", deserialize_with = "bool_true")]
    pub available: bool,
    /// 备餐时间 (分钟)
    #[serde(default)]
    pub preparation_time: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_true_fn() -> bool {
    true
}

impl MenuItem {
    /// 查找定制项选项的价格，菜单上不存在时返回 None
    pub fn option_price(&self, customization: &str, option: &str) -> Option<f64> {
        self.customizations
            .iter()
            .find(|c| c.name == customization)?
            .options
            .iter()
            .find(|o| o.name == option)
            .map(|o| o.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub price: f64,
    pub image: Option<String>,
    #[serde(default)]
    pub customizations: Vec<Customization>,
    pub available: Option<bool>,
    #[validate(range(min = 0, message = "preparation_time must be non-negative"))]
    pub preparation_time: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Vec<Customization>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_price_lookup() {
        let item = MenuItem {
            id: None,
            name: "Latte".into(),
            description: None,
            category: "beverage".into(),
            price: 4.5,
            image: None,
            customizations: vec![Customization {
                name: "Milk".into(),
                options: vec![
                    CustomizationOption {
                        name: "Oat".into(),
                        price: 0.6,
                    },
                    CustomizationOption {
                        name: "Whole".into(),
                        price: 0.0,
                    },
                ],
            }],
            available: true,
            preparation_time: 5,
            created_at: 0,
            updated_at: 0,
        };

        assert_eq!(item.option_price("Milk", "Oat"), Some(0.6));
        assert_eq!(item.option_price("Milk", "Soy"), None);
        assert_eq!(item.option_price("Size", "Large"), None);
    }
}
