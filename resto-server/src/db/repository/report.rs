//! Report Repository
//!
//! 报表都在已完成订单上做 fetch-then-reduce：一次范围查询拉取订单，
//! 聚合在 Rust 侧完成，避免依赖跨文档事务。

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, Order};
use shared::util::{month_of_millis, today_range_millis, year_range_millis};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// 当日销售报表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySalesReport {
    pub total_sales: f64,
    pub total_orders: i64,
    /// 菜单分类 → 该分类行项目小计之和
    pub sales_by_category: BTreeMap<String, f64>,
}

/// 服务员业绩
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaiterPerformance {
    pub waiter: String,
    pub waiter_name: String,
    pub total_orders: i64,
    pub total_sales: f64,
    pub average_order_value: f64,
}

/// 月度营收 (一年 12 条，无数据的月份补零)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: u32,
    pub total_revenue: f64,
    pub total_orders: i64,
    pub average_order_value: f64,
}

/// 菜品销量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub menu_item: String,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: f64,
}

#[derive(Clone)]
pub struct ReportRepository {
    base: BaseRepository,
}

impl ReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// 今天的已完成订单汇总，按菜单分类拆分
    pub async fn daily_sales(&self) -> RepoResult<DailySalesReport> {
        let (start, end) = today_range_millis();
        let orders = self.completed_orders(start, end).await?;

        // 菜单分类查表 (行项目只存菜品链接)
        let menu_items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item")
            .await?
            .take(0)?;
        let category_of: HashMap<String, String> = menu_items
            .iter()
            .filter_map(|m| m.id.as_ref().map(|id| (id.to_string(), m.category.clone())))
            .collect();

        let mut total_sales = 0.0;
        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        for order in &orders {
            total_sales += order.total;
            for item in &order.items {
                let category = category_of
                    .get(&item.menu_item.to_string())
                    .cloned()
                    .unwrap_or_else(|| "uncategorized".to_string());
                *by_category.entry(category).or_insert(0.0) += item.subtotal;
            }
        }
        for value in by_category.values_mut() {
            *value = round_cents(*value);
        }

        Ok(DailySalesReport {
            total_sales: round_cents(total_sales),
            total_orders: orders.len() as i64,
            sales_by_category: by_category,
        })
    }

    /// 时间范围内按服务员聚合的业绩
    pub async fn waiter_performance(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> RepoResult<Vec<WaiterPerformance>> {
        let orders = self.completed_orders(start_ms, end_ms).await?;

        let mut by_waiter: BTreeMap<String, (String, i64, f64)> = BTreeMap::new();
        for order in &orders {
            let entry = by_waiter
                .entry(order.waiter.to_string())
                .or_insert_with(|| (order.waiter_name.clone(), 0, 0.0));
            entry.1 += 1;
            entry.2 += order.total;
        }

        Ok(by_waiter
            .into_iter()
            .map(|(waiter, (waiter_name, total_orders, total_sales))| WaiterPerformance {
                waiter,
                waiter_name,
                total_orders,
                total_sales: round_cents(total_sales),
                average_order_value: round_cents(total_sales / total_orders as f64),
            })
            .collect())
    }

    /// 某年 12 个月的营收，无订单的月份补零
    pub async fn monthly_revenue(&self, year: i32) -> RepoResult<Vec<MonthlyRevenue>> {
        let (start, end) = year_range_millis(year)
            .ok_or_else(|| RepoError::Validation(format!("Invalid year: {}", year)))?;
        let orders = self.completed_orders(start, end).await?;

        let mut by_month: HashMap<u32, (i64, f64)> = HashMap::new();
        for order in &orders {
            if let Some(month) = month_of_millis(order.created_at) {
                let entry = by_month.entry(month).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += order.total;
            }
        }

        Ok((1..=12)
            .map(|month| {
                let (total_orders, total_revenue) =
                    by_month.get(&month).copied().unwrap_or((0, 0.0));
                let average = if total_orders > 0 {
                    round_cents(total_revenue / total_orders as f64)
                } else {
                    0.0
                };
                MonthlyRevenue {
                    month,
                    total_revenue: round_cents(total_revenue),
                    total_orders,
                    average_order_value: average,
                }
            })
            .collect())
    }

    /// 时间范围内每个菜品的销量和营收
    pub async fn inventory(&self, start_ms: i64, end_ms: i64) -> RepoResult<Vec<InventoryEntry>> {
        let orders = self.completed_orders(start_ms, end_ms).await?;

        let mut by_item: BTreeMap<String, (String, i64, f64)> = BTreeMap::new();
        for order in &orders {
            for item in &order.items {
                let entry = by_item
                    .entry(item.menu_item.to_string())
                    .or_insert_with(|| (item.name.clone(), 0, 0.0));
                entry.1 += item.quantity;
                entry.2 += item.subtotal;
            }
        }

        Ok(by_item
            .into_iter()
            .map(|(menu_item, (name, quantity_sold, revenue))| InventoryEntry {
                menu_item,
                name,
                quantity_sold,
                revenue: round_cents(revenue),
            })
            .collect())
    }

    async fn completed_orders(&self, start_ms: i64, end_ms: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE status = 'completed' AND created_at >= $start AND created_at <= $end \
                 ORDER BY created_at DESC",
            )
            .bind(("start", start_ms))
            .bind(("end", end_ms))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
