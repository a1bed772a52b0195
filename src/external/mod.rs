pub mod bot_notifier;

pub use bot_notifier::*;
