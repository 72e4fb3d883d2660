//! Order Repository
//!
//! 下单、状态流转、支付。桌台占用/释放与订单状态联动：
//!
//! | 订单事件 | 桌台 |
//! |----------|------|
//! | 创建 | AVAILABLE → OCCUPIED |
//! | 完成/支付 | OCCUPIED → CLEANING |
//! | 取消 | OCCUPIED → AVAILABLE |

use serde::Deserialize;

use super::menu_item::MenuItemRepository;
use super::table::TableRepository;
use super::user::UserRepository;
use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    ItemCustomization, Order, OrderCreate, OrderItem, OrderStatus, OrderTotals, PaymentMethod,
    TableStatus,
};
use shared::util::{now_millis, today_range_millis, today_stamp};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

/// 订单号冲突最大重试次数
const ORDER_NUMBER_RETRIES: u32 = 3;

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
    menu: MenuItemRepository,
    tables: TableRepository,
    users: UserRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            menu: MenuItemRepository::new(db.clone()),
            tables: TableRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
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

    /// Orders for a table, newest first
    pub async fn find_by_table(&self, table_number: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE table_number = $n ORDER BY created_at DESC")
            .bind(("n", table_number))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders taken by a waiter, newest first
    pub async fn find_by_waiter(&self, waiter_id: &str) -> RepoResult<Vec<Order>> {
        let waiter: RecordId = waiter_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid waiter ID: {}", waiter_id)))?;
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE waiter = $waiter ORDER BY created_at DESC")
            .bind(("waiter", waiter))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// 下单
    ///
    /// 1. 桌台必须存在且可用 (AVAILABLE)
    /// 2. 每个菜品必须存在且在售，定制选项必须在菜单上声明
    /// 3. 名称/单价/定制价都取菜单快照，金额按 subtotal/tax/service 计算
    /// 4. 订单号 "YYMMDDNNN" 为当日递增序号
    /// 5. 订单落库后桌台转 OCCUPIED，记录服务员和订单号
    pub async fn place(&self, waiter_id: &str, data: OrderCreate) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".into(),
            ));
        }

        let waiter = self
            .users
            .find_by_id(waiter_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", waiter_id)))?;
        let waiter_record = waiter
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("User record has no id".into()))?;

        let table = self
            .tables
            .find_by_number(data.table)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", data.table)))?;
        if table.status != TableStatus::Available {
            return Err(RepoError::Business(format!(
                "Table {} is not available (status: {:?})",
                data.table, table.status
            )));
        }

        // 校验并构建行项目
        let mut items: Vec<OrderItem> = Vec::with_capacity(data.items.len());
        for line in &data.items {
            if line.quantity < 1 {
                return Err(RepoError::Validation(
                    "Item quantity must be at least 1".into(),
                ));
            }
            let menu_item = self
                .menu
                .find_by_id(&line.menu_item)
                .await?
                .ok_or_else(|| {
                    RepoError::NotFound(format!("Menu item {} not found", line.menu_item))
                })?;
            if !menu_item.available {
                return Err(RepoError::Business(format!(
                    "Menu item '{}' is not available",
                    menu_item.name
                )));
            }

            let mut customizations: Vec<ItemCustomization> = Vec::new();
            for choice in &line.customizations {
                let price = menu_item
                    .option_price(&choice.name, &choice.option)
                    .ok_or_else(|| {
                        RepoError::Validation(format!(
                            "Menu item '{}' has no customization '{}: {}'",
                            menu_item.name, choice.name, choice.option
                        ))
                    })?;
                customizations.push(ItemCustomization {
                    name: choice.name.clone(),
                    option: choice.option.clone(),
                    price,
                });
            }

            let subtotal =
                OrderItem::compute_subtotal(menu_item.price, line.quantity, &customizations);
            let menu_item_id = menu_item
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("Menu item record has no id".into()))?;
            items.push(OrderItem {
                menu_item: menu_item_id,
                name: menu_item.name,
                quantity: line.quantity,
                price: menu_item.price,
                customizations,
                subtotal,
            });
        }

        let totals = OrderTotals::compute(&items);
        let now = now_millis();

        // 当日序号冲突时 (并发下单) 顺延重试
        let mut seq = self.today_order_count().await? + 1;
        let mut created: Option<Order> = None;
        for _ in 0..ORDER_NUMBER_RETRIES {
            let order = Order {
                id: None,
                order_number: format!("{}{:03}", today_stamp(), seq),
                table: data.table,
                waiter: waiter_record.clone(),
                waiter_name: waiter.name.clone(),
                items: items.clone(),
                status: OrderStatus::Pending,
                subtotal: totals.subtotal,
                tax: totals.tax,
                service_charge: totals.service_charge,
                total: totals.total,
                payment_method: None,
                payment_status: false,
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
                        seq += 1;
                        continue;
                    }
                    return Err(repo_err);
                }
            }
        }
        let order =
            created.ok_or_else(|| RepoError::Database("Failed to allocate order number".into()))?;

        // 占用桌台
        self.tables
            .occupy(table, waiter_record, &order.order_number)
            .await?;

        Ok(order)
    }

    /// 更新订单状态
    ///
    /// - 终态订单 (completed/cancelled) 不再接受变更
    /// - 完成未支付的订单被拒绝
    /// - completed → 桌台 CLEANING；cancelled → 桌台 AVAILABLE
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if existing.status.is_terminal() {
            return Err(RepoError::Business(format!(
                "Order {} is already {:?}",
                existing.order_number, existing.status
            )));
        }
        if status == OrderStatus::Completed && !existing.payment_status {
            return Err(RepoError::Business(format!(
                "Order {} has not been paid",
                existing.order_number
            )));
        }

        let order = self.write_status(&existing, status, None, None).await?;

        match status {
            OrderStatus::Completed => self.move_table(&order, TableStatus::Cleaning).await?,
            OrderStatus::Cancelled => self.move_table(&order, TableStatus::Available).await?,
            _ => {}
        }

        Ok(order)
    }

    /// 支付
    ///
    /// 已支付的订单被拒绝；支付成功后订单完成，桌台转入清洁。
    pub async fn process_payment(&self, id: &str, method: PaymentMethod) -> RepoResult<Order> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if existing.payment_status {
            return Err(RepoError::Business(format!(
                "Order {} has already been paid",
                existing.order_number
            )));
        }
        if existing.status == OrderStatus::Cancelled {
            return Err(RepoError::Business(format!(
                "Order {} has been cancelled",
                existing.order_number
            )));
        }

        let order = self
            .write_status(&existing, OrderStatus::Completed, Some(method), Some(true))
            .await?;

        self.move_table(&order, TableStatus::Cleaning).await?;

        Ok(order)
    }

    /// 当日已有订单数 (订单号序号基数)
    async fn today_order_count(&self) -> RepoResult<i64> {
        let (start, end) = today_range_millis();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM order \
                 WHERE created_at >= $start AND created_at <= $end GROUP ALL",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    async fn write_status(
        &self,
        order: &Order,
        status: OrderStatus,
        payment_method: Option<PaymentMethod>,
        payment_status: Option<bool>,
    ) -> RepoResult<Order> {
        let thing = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Order record has no id".into()))?;

        self.base
            .db()
            .query(
                "UPDATE $thing SET status = $status, \
                 payment_method = $payment_method, payment_status = $payment_status, \
                 updated_at = $now",
            )
            .bind(("thing", thing.clone()))
            .bind(("status", status))
            .bind(("payment_method", payment_method.or(order.payment_method)))
            .bind(("payment_status", payment_status.unwrap_or(order.payment_status)))
            .bind(("now", now_millis()))
            .await?;

        self.find_by_id(&thing.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound("Order disappeared during update".into()))
    }

    /// 把订单占用的桌台转到目标状态；桌台已不处于占用态时跳过
    async fn move_table(&self, order: &Order, target: TableStatus) -> RepoResult<()> {
        let Some(table) = self.tables.find_by_number(order.table).await? else {
            return Ok(());
        };
        if table.status != TableStatus::Occupied {
            return Ok(());
        }
        match target {
            TableStatus::Cleaning => {
                self.tables.release_for_cleaning(table).await?;
            }
            TableStatus::Available => {
                self.tables.release(table).await?;
            }
            _ => {}
        }
        Ok(())
    }
}
