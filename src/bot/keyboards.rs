use teloxide::types::{ButtonRequest, KeyboardButton, KeyboardMarkup, KeyboardRemove};

pub fn share_phone_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("📱 Share phone number").request(ButtonRequest::Contact),
    ]])
    .resize_keyboard()
    .one_time_keyboard()
}

pub fn remove_keyboard() -> KeyboardRemove {
    KeyboardRemove::new()
}
