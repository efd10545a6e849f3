//! Database models.
//!
//! One file per table. Each model carries the entity struct plus the
//! create/update payloads the repositories accept.

pub mod delivery_route;
pub mod discount_rule;
pub mod inventory_log;
pub mod order;
pub mod product;
pub mod user;

pub use delivery_route::{DeliveryRoute, DeliveryRouteCreate, RouteStop};
pub use discount_rule::{DiscountRule, DiscountRuleCreate};
pub use inventory_log::InventoryLogEntry;
pub use order::{
    Order, OrderInfo, OrderItem, OrderItemDetail, OrderItemInput, OrderStatus, OrderSummary,
};
pub use product::{Category, LowStockProduct, Product, ProductCreate};
pub use user::{Role, User, UserCreate, UserStats};
