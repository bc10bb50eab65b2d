pub mod base;
pub mod telegram;

pub use telegram::{TelegramAdminNotifier, TelegramChannel};
