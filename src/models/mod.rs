pub mod auth;
pub mod common;
pub mod order;
pub mod pagination;
pub mod principal;
pub mod product;
pub mod subscription;
pub mod tariff;
pub mod user;

pub use auth::*;
pub use common::*;
pub use order::*;
pub use pagination::*;
pub use principal::Principal;
pub use product::*;
pub use subscription::*;
pub use tariff::*;
pub use user::*;
