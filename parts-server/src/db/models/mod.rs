//! Database Models
//!
//! SurrealDB 文档模型。ID 全栈统一使用 "table:id" 字符串格式，
//! 序列化细节见 [`serde_helpers`]。

pub mod category;
pub mod order;
pub mod part;
pub mod user;

pub use shared::serde_helpers;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemCreate, OrderStatus, OrderUpdate, PaymentMethod,
    SalesReport, compute_total,
};
pub use part::{Part, PartCreate, PartFull, PartUpdate};
pub use user::{LoginRequest, RegisterRequest, User, UserPublic};
