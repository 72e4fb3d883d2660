//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 税率
pub const TAX_RATE: f64 = 0.10;
/// 服务费率
pub const SERVICE_RATE: f64 = 0.05;

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// 终态订单不再接受状态变更
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// 支付方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    DigitalWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::DigitalWallet => "digital_wallet",
        }
    }
}

/// 行项目上已选定的定制 (价格为下单时快照)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCustomization {
    pub name: String,
    pub option: String,
    pub price: f64,
}

/// 订单行项目
///
/// 名称和单价都是下单时从菜单取的快照。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub name: String,
    pub quantity: i64,
    /// 菜品单价快照
    pub price: f64,
    #[serde(default)]
    pub customizations: Vec<ItemCustomization>,
    /// 单价 × 数量 + 定制加价
    pub subtotal: f64,
}

impl OrderItem {
    /// subtotal = price * quantity + Σ customization.price
    pub fn compute_subtotal(price: f64, quantity: i64, customizations: &[ItemCustomization]) -> f64 {
        let base = to_cents(price) * quantity;
        let extras: i64 = customizations.iter().map(|c| to_cents(c.price)).sum();
        from_cents(base + extras)
    }
}

/// 订单金额明细
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub service_charge: f64,
    pub total: f64,
}

impl OrderTotals {
    /// subtotal = Σ item.subtotal; tax = 10%; service = 5%; total = 和
    pub fn compute(items: &[OrderItem]) -> Self {
        let subtotal_cents: i64 = items.iter().map(|i| to_cents(i.subtotal)).sum();
        let tax_cents = (subtotal_cents as f64 * TAX_RATE).round() as i64;
        let service_cents = (subtotal_cents as f64 * SERVICE_RATE).round() as i64;

        Self {
            subtotal: from_cents(subtotal_cents),
            tax: from_cents(tax_cents),
            service_charge: from_cents(service_cents),
            total: from_cents(subtotal_cents + tax_cents + service_cents),
        }
    }
}

fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// 餐厅订单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// "YYMMDDNNN" (当日递增序号)
    pub order_number: String,
    /// 桌号 (TABLE 是 SurrealQL 关键字，存储字段用 table_number)
    #[serde(rename = "table_number", alias = "table")]
    pub table: i64,
    #[serde(with = "serde_helpers::record_id")]
    pub waiter: RecordId,
    /// 服务员姓名快照
    pub waiter_name: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub tax: f64,
    pub service_charge: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// 是否已支付
    #[serde(default)]
    pub payment_status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 下单时的定制选择 (价格由服务端从菜单解析)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationChoice {
    pub name: String,
    pub option: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemCreate {
    /// 菜品 ID ("menu_item:xxx")
    pub menu_item: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i64,
    #[serde(default)]
    pub customizations: Vec<CustomizationChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    /// 桌号
    pub table: i64,
    #[validate(length(min = 1, message = "order must contain at least one item"))]
    #[validate(nested)]
    pub items: Vec<OrderItemCreate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i64, extras: &[f64]) -> OrderItem {
        let customizations: Vec<ItemCustomization> = extras
            .iter()
            .map(|p| ItemCustomization {
                name: "Extra".into(),
                option: "x".into(),
                price: *p,
            })
            .collect();
        let subtotal = OrderItem::compute_subtotal(price, quantity, &customizations);
        OrderItem {
            menu_item: "menu_item:x".parse().unwrap(),
            name: "x".into(),
            quantity,
            price,
            customizations,
            subtotal,
        }
    }

    #[test]
    fn item_subtotal_includes_customizations() {
        let i = item(10.0, 2, &[1.5, 0.5]);
        assert_eq!(i.subtotal, 22.0);
    }

    #[test]
    fn totals_apply_tax_and_service_charge() {
        let items = vec![item(10.0, 2, &[]), item(5.0, 1, &[1.0])];
        let totals = OrderTotals::compute(&items);
        assert_eq!(totals.subtotal, 26.0);
        assert_eq!(totals.tax, 2.6);
        assert_eq!(totals.service_charge, 1.3);
        assert_eq!(totals.total, 29.9);
    }

    #[test]
    fn totals_round_to_cents() {
        // subtotal 0.99 → tax 0.10 (rounded from 0.099), service 0.05
        let items = vec![item(0.33, 3, &[])];
        let totals = OrderTotals::compute(&items);
        assert_eq!(totals.subtotal, 0.99);
        assert_eq!(totals.tax, 0.1);
        assert_eq!(totals.service_charge, 0.05);
        assert_eq!(totals.total, 1.14);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::DigitalWallet).unwrap(),
            "\"digital_wallet\""
        );
    }
}
