//! Dining Table Repository
//!
//! 桌台状态流转规则在 [`TableStatus::can_transition`] 中声明，
//! 订单侧的占用/释放也统一走本仓储。

use std::collections::HashMap;

use super::user::UserRepository;
use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Table, TableCreate, TableFull, TableStatus, UserPublic};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct TableRepository {
    base: BaseRepository,
    users: UserRepository,
}

impl TableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            base: BaseRepository::new(db),
        }
    }

    /// Find all tables ordered by table_number
    pub async fn find_all(&self) -> RepoResult<Vec<Table>> {
        let tables: Vec<Table> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY table_number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find all tables with waiter resolved
    pub async fn find_all_full(&self) -> RepoResult<Vec<TableFull>> {
        let tables = self.find_all().await?;
        self.resolve_waiters(tables).await
    }

    /// Available tables only
    pub async fn find_available(&self) -> RepoResult<Vec<Table>> {
        let tables: Vec<Table> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE status = 'AVAILABLE' ORDER BY table_number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Table>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let table: Option<Table> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find table by table_number
    pub async fn find_by_number(&self, table_number: i64) -> RepoResult<Option<Table>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE table_number = $n LIMIT 1")
            .bind(("n", table_number))
            .await?;
        let tables: Vec<Table> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new table
    pub async fn create(&self, data: TableCreate) -> RepoResult<Table> {
        if self.find_by_number(data.table_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists",
                data.table_number
            )));
        }

        let table = Table {
            id: None,
            table_number: data.table_number,
            capacity: data.capacity,
            status: TableStatus::Available,
            current_waiter: None,
            current_order: None,
            last_cleaned: None,
            created_at: now_millis(),
        };

        let created: Option<Table> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create table".to_string()))
    }

    /// 手动状态流转 (PATCH /tables/:id/status)
    ///
    /// - 非法流转被拒绝
    /// - 转入 CLEANING 时记录 last_cleaned
    /// - 转入 AVAILABLE 时清空服务员/订单
    pub async fn set_status(&self, id: &str, status: TableStatus) -> RepoResult<Table> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        if !existing.status.can_transition(status) {
            return Err(RepoError::Business(format!(
                "Cannot change table status from {:?} to {:?}",
                existing.status, status
            )));
        }

        self.apply_status(existing, status, None, None).await
    }

    /// 订单创建占用桌台 (AVAILABLE → OCCUPIED)
    pub async fn occupy(
        &self,
        table: Table,
        waiter: RecordId,
        order_number: &str,
    ) -> RepoResult<Table> {
        self.apply_status(
            table,
            TableStatus::Occupied,
            Some(waiter),
            Some(order_number.to_string()),
        )
        .await
    }

    /// 订单完成/支付，桌台转入清洁 (OCCUPIED → CLEANING)
    pub async fn release_for_cleaning(&self, table: Table) -> RepoResult<Table> {
        self.apply_status(table, TableStatus::Cleaning, None, None).await
    }

    /// 订单取消，桌台直接可用 (OCCUPIED → AVAILABLE)
    pub async fn release(&self, table: Table) -> RepoResult<Table> {
        self.apply_status(table, TableStatus::Available, None, None).await
    }

    /// 分配/取消分配服务员
    pub async fn assign_waiter(&self, id: &str, waiter: Option<String>) -> RepoResult<Table> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;
        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Table record has no id".into()))?;

        let waiter_id: Option<RecordId> = match waiter {
            Some(w) => {
                let id: RecordId = w
                    .parse()
                    .map_err(|_| RepoError::Validation(format!("Invalid waiter ID: {}", w)))?;
                let user = self
                    .users
                    .find_by_id(&id.to_string())
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;
                if user.role != "waiter" && user.role != "admin" {
                    return Err(RepoError::Validation(format!(
                        "User {} is not a waiter",
                        user.name
                    )));
                }
                Some(id)
            }
            None => None,
        };

        self.base
            .db()
            .query("UPDATE $thing SET current_waiter = $waiter")
            .bind(("thing", thing.clone()))
            .bind(("waiter", waiter_id))
            .await?;

        self.find_by_id(&thing.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Hard delete a table
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Table {} not found", id)));
        }
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// 统一的状态写入：按目标状态维护 waiter/order/last_cleaned 字段
    async fn apply_status(
        &self,
        table: Table,
        status: TableStatus,
        waiter: Option<RecordId>,
        order_number: Option<String>,
    ) -> RepoResult<Table> {
        let thing = table
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Table record has no id".into()))?;

        let (waiter, order_number, last_cleaned) = match status {
            // 占用时写入新的服务员/订单
            TableStatus::Occupied => (waiter, order_number, table.last_cleaned),
            // 清洁时保留占用信息已无意义，清掉并盖时间戳
            TableStatus::Cleaning => (None, None, Some(now_millis())),
            // 可用/预订时清空占用信息
            TableStatus::Available | TableStatus::Reserved => (None, None, table.last_cleaned),
        };

        self.base
            .db()
            .query(
                "UPDATE $thing SET status = $status, current_waiter = $waiter, \
                 current_order = $order_number, last_cleaned = $last_cleaned",
            )
            .bind(("thing", thing.clone()))
            .bind(("status", status))
            .bind(("waiter", waiter))
            .bind(("order_number", order_number))
            .bind(("last_cleaned", last_cleaned))
            .await?;

        self.find_by_id(&thing.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound("Table disappeared during update".into()))
    }

    /// Join waiters in one pass
    async fn resolve_waiters(&self, tables: Vec<Table>) -> RepoResult<Vec<TableFull>> {
        let users = self.users.find_all().await?;
        let by_id: HashMap<String, UserPublic> = users
            .iter()
            .filter_map(|u| u.id.as_ref().map(|id| (id.to_string(), u.to_public())))
            .collect();

        Ok(tables
            .into_iter()
            .map(|t| {
                let waiter = t
                    .current_waiter
                    .as_ref()
                    .and_then(|w| by_id.get(&w.to_string()).cloned());
                TableFull::from_table(t, waiter)
            })
            .collect())
    }
}
