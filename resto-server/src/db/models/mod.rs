//! Database Models
//!
//! SurrealDB 文档模型。ID 全栈统一使用 "table:id" 字符串格式，
//! 序列化细节见 [`serde_helpers`]。

pub mod menu_item;
pub mod order;
pub mod table;
pub mod user;

pub use shared::serde_helpers;

pub use menu_item::{
    Customization, CustomizationOption, MenuItem, MenuItemCreate, MenuItemUpdate,
};
pub use order::{
    CustomizationChoice, ItemCustomization, Order, OrderCreate, OrderItem, OrderItemCreate,
    OrderStatus, OrderTotals, PaymentMethod, PaymentRequest, StatusUpdate,
};
pub use table::{Table, TableCreate, TableFull, TableStatus, TableStatusUpdate, WaiterAssignment};
pub use user::{LoginRequest, RegisterRequest, User, UserPublic, UserUpdate, VALID_ROLES};
