pub mod access_gate;
pub mod allowlist;
pub mod cors;

pub use access_gate::*;
pub use allowlist::*;
pub use cors::*;
