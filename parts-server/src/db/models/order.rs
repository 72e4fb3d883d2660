//! Order Model

use std::collections::BTreeMap;

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

/// 支付方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
        }
    }
}

/// 订单行项目
///
/// `price` 是下单时从配件文档取的快照，后续改价不影响历史订单。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub part: RecordId,
    /// 下单时的配件名称快照
    pub part_name: String,
    pub quantity: i64,
    pub price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// 销售订单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// "ORD-YYMMDD-NNNN"
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 订单总额 = Σ 单价 × 数量
pub fn compute_total(items: &[OrderItem]) -> f64 {
    let cents: i64 = items
        .iter()
        .map(|i| (i.price * 100.0).round() as i64 * i.quantity)
        .sum();
    cents as f64 / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemCreate {
    /// 配件 ID ("part:xxx")
    pub part: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    #[validate(length(min = 1, message = "order must contain at least one item"))]
    #[validate(nested)]
    pub items: Vec<OrderItemCreate>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

/// 销售报表 (按时间范围统计已完成订单)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub orders: Vec<Order>,
    pub total_sales: f64,
    /// 键为支付方式 (未支付聚合到 "UNPAID")
    pub sales_by_payment_method: BTreeMap<String, f64>,
}

impl SalesReport {
    /// 汇总已完成订单
    pub fn build(orders: Vec<Order>) -> Self {
        let mut total_sales = 0.0;
        let mut by_method: BTreeMap<String, f64> = BTreeMap::new();

        for order in &orders {
            total_sales += order.total_amount;
            let key = order
                .payment_method
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "UNPAID".to_string());
            *by_method.entry(key).or_insert(0.0) += order.total_amount;
        }

        Self {
            orders,
            total_sales,
            sales_by_payment_method: by_method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i64) -> OrderItem {
        OrderItem {
            part: "part:x".parse().unwrap(),
            part_name: "x".into(),
            quantity,
            price,
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let items = vec![item(10.0, 2), item(3.5, 3)];
        assert_eq!(compute_total(&items), 30.5);
    }

    #[test]
    fn total_avoids_float_drift() {
        let items = vec![item(0.1, 3)];
        assert_eq!(compute_total(&items), 0.3);
    }

    #[test]
    fn report_groups_missing_payment_as_unpaid() {
        let mut o1 = sample_order(20.0);
        o1.payment_method = Some(PaymentMethod::Cash);
        let o2 = sample_order(15.0);

        let report = SalesReport::build(vec![o1, o2]);
        assert_eq!(report.total_sales, 35.0);
        assert_eq!(report.sales_by_payment_method["CASH"], 20.0);
        assert_eq!(report.sales_by_payment_method["UNPAID"], 15.0);
    }

    fn sample_order(total: f64) -> Order {
        Order {
            id: None,
            order_number: "ORD-260830-0001".into(),
            customer_name: None,
            customer_phone: None,
            items: vec![],
            total_amount: total,
            status: OrderStatus::Completed,
            payment_method: None,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"CASH\""
        );
    }
}
