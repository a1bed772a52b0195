pub mod jwt;
pub mod password;
pub mod phone;
pub mod search;
pub mod validation;

pub use jwt::*;
pub use password::*;
pub use phone::*;
pub use search::icontains;
