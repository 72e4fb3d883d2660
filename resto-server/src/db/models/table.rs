//! Dining Table Model
//!
//! 桌台状态机：
//!
//! ```text
//! AVAILABLE ──下单──▶ OCCUPIED ──完成/支付──▶ CLEANING ──清洁完──▶ AVAILABLE
//!     │ ▲                │
//!     │ └────订单取消────┘
//!     └──▶ RESERVED ──▶ OCCUPIED / AVAILABLE
//! ```

use super::serde_helpers;
use super::user::UserPublic;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 桌台状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

impl TableStatus {
    /// 状态机允许的流转
    pub fn can_transition(self, to: TableStatus) -> bool {
        use TableStatus::*;
        matches!(
            (self, to),
            (Available, Occupied)
                | (Available, Reserved)
                | (Reserved, Available)
                | (Reserved, Occupied)
                | (Occupied, Cleaning)
                | (Occupied, Available)
                | (Cleaning, Available)
        )
    }
}

/// 桌台
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub table_number: i64,
    pub capacity: i64,
    pub status: TableStatus,
    /// 当前负责的服务员
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub current_waiter: Option<RecordId>,
    /// 当前订单号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order: Option<String>,
    /// 最近清洁时间 (epoch millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_cleaned: Option<i64>,
    pub created_at: i64,
}

/// 桌台 + 已解析的服务员 (API 响应用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFull {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub table_number: i64,
    pub capacity: i64,
    pub status: TableStatus,
    pub current_waiter: Option<UserPublic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_cleaned: Option<i64>,
    pub created_at: i64,
}

impl TableFull {
    pub fn from_table(table: Table, waiter: Option<UserPublic>) -> Self {
        Self {
            id: table.id,
            table_number: table.table_number,
            capacity: table.capacity,
            status: table.status,
            current_waiter: waiter,
            current_order: table.current_order,
            last_cleaned: table.last_cleaned,
            created_at: table.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TableCreate {
    #[validate(range(min = 1, message = "table_number must be at least 1"))]
    pub table_number: i64,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaiterAssignment {
    /// 服务员用户 ID ("user:xxx")，null 表示取消分配
    pub waiter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::TableStatus::*;

    #[test]
    fn allowed_transitions() {
        assert!(Available.can_transition(Occupied));
        assert!(Available.can_transition(Reserved));
        assert!(Reserved.can_transition(Occupied));
        assert!(Reserved.can_transition(Available));
        assert!(Occupied.can_transition(Cleaning));
        assert!(Occupied.can_transition(Available));
        assert!(Cleaning.can_transition(Available));
    }

    #[test]
    fn forbidden_transitions() {
        assert!(!Available.can_transition(Cleaning));
        assert!(!Cleaning.can_transition(Occupied));
        assert!(!Cleaning.can_transition(Reserved));
        assert!(!Occupied.can_transition(Reserved));
        assert!(!Available.can_transition(Available));
    }
}
