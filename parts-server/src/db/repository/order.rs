//! Order Repository
//!
//! 下单、状态流转、销售报表。库存变更与订单写入不在同一事务内，
//! 失败路径依赖唯一索引和有界重试 (见 `place`)。

use rand::Rng;

use super::part::PartRepository;
use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate, Part, SalesReport, compute_total,
};
use shared::util::{now_millis, today_stamp};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

/// 订单号冲突最大重试次数
const ORDER_NUMBER_RETRIES: u32 = 3;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
    parts: PartRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            parts: PartRepository::new(db.clone()),
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find order by order_number
    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_number = $n LIMIT 1")
            .bind(("n", order_number.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// 下单
    ///
    /// 1. 校验每个行项目：配件存在、数量为正、库存充足
    /// 2. 取配件当前单价作为快照，计算总额
    /// 3. 生成订单号 "ORD-YYMMDD-NNNN" (随机后缀，冲突时有界重试)
    /// 4. 创建订单文档 (状态 PENDING)
    /// 5. 订单写入成功后扣减库存
    pub async fn place(&self, data: OrderCreate) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".into(),
            ));
        }

        // 校验并构建行项目
        let mut items: Vec<OrderItem> = Vec::with_capacity(data.items.len());
        for line in &data.items {
            if line.quantity < 1 {
                return Err(RepoError::Validation(
                    "Item quantity must be at least 1".into(),
                ));
            }
            let part: Part = self
                .parts
                .find_by_id(&line.part)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Part {} not found", line.part)))?;
            if part.quantity < line.quantity {
                return Err(RepoError::Validation(format!(
                    "Insufficient stock for part '{}': {} available, {} requested",
                    part.name, part.quantity, line.quantity
                )));
            }
            let part_id = part
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("Part record has no id".into()))?;
            items.push(OrderItem {
                part: part_id,
                part_name: part.name,
                quantity: line.quantity,
                price: part.price,
            });
        }

        let total_amount = compute_total(&items);
        let now = now_millis();

        // 订单号冲突时换一个随机后缀再试
        let mut created: Option<Order> = None;
        for _ in 0..ORDER_NUMBER_RETRIES {
            let order = Order {
                id: None,
                order_number: generate_order_number(),
                customer_name: data.customer_name.clone(),
                customer_phone: data.customer_phone.clone(),
                items: items.clone(),
                total_amount,
                status: OrderStatus::Pending,
                payment_method: data.payment_method,
                notes: data.notes.clone(),
                created_at: now,
                updated_at: now,
            };
            match self.base.db().create(TABLE).content(order).await {
                Ok(result) => {
                    created = result;
                    break;
                }
                Err(e) => {
                    let repo_err = RepoError::from(e);
                    if matches!(repo_err, RepoError::Duplicate(_)) {
                        continue;
                    }
                    return Err(repo_err);
                }
            }
        }
        let order =
            created.ok_or_else(|| RepoError::Database("Failed to allocate order number".into()))?;

        // 扣减库存 (订单已落库)
        for item in &order.items {
            self.parts.adjust_quantity(&item.part, -item.quantity).await?;
        }

        Ok(order)
    }

    /// 更新状态/支付方式
    ///
    /// 转到 CANCELLED 时恢复每个行项目的库存 (只恢复一次，
    /// 重复取消或取消已取消订单都会被拒绝)。
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if let Some(new_status) = data.status {
            match (existing.status, new_status) {
                (OrderStatus::Pending, _) => {}
                (from, to) if from == to => {
                    return Err(RepoError::Business(format!(
                        "Order is already {:?}",
                        from
                    )));
                }
                (from, to) => {
                    return Err(RepoError::Business(format!(
                        "Cannot change order status from {:?} to {:?}",
                        from, to
                    )));
                }
            }
        }

        let status = data.status.unwrap_or(existing.status);
        let payment_method = data.payment_method.or(existing.payment_method);

        self.base
            .db()
            .query("UPDATE $thing SET status = $status, payment_method = $payment_method, updated_at = $now")
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("payment_method", payment_method))
            .bind(("now", now_millis()))
            .await?;

        // 取消订单恢复库存
        if data.status == Some(OrderStatus::Cancelled) {
            for item in &existing.items {
                self.parts.adjust_quantity(&item.part, item.quantity).await?;
            }
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// 销售报表：范围内的已完成订单
    pub async fn sales_report(&self, start_ms: i64, end_ms: i64) -> RepoResult<SalesReport> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE status = 'COMPLETED' AND created_at >= $start AND created_at <= $end \
                 ORDER BY created_at DESC",
            )
            .bind(("start", start_ms))
            .bind(("end", end_ms))
            .await?
            .take(0)?;

        Ok(SalesReport::build(orders))
    }
}

/// "ORD-YYMMDD-NNNN"，NNNN 为随机 4 位数字
fn generate_order_number() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("ORD-{}-{:04}", today_stamp(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_format() {
        let n = generate_order_number();
        // ORD-YYMMDD-NNNN
        assert_eq!(n.len(), 15);
        assert!(n.starts_with("ORD-"));
        let parts: Vec<&str> = n.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
