pub mod audit;
pub mod orders;
pub mod products;
pub mod subscriptions;
pub mod tariffs;
pub mod users;

pub use audit::{AuditFields, Audited, SoftDeletable, SoftDeleteEntity};
pub use orders::{Entity as Order, OrderStatus, OrderTarget};
pub use products::Entity as Product;
pub use subscriptions::Entity as Subscription;
pub use tariffs::Entity as Tariff;
pub use users::Entity as User;
