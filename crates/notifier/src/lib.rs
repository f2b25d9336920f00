//! Chat notifications: a Telegram Bot API transport and a de-duplicating
//! notifier in front of it.

pub mod notifier;
pub mod telegram;

pub use notifier::{DeliveryOutcome, Notifier};
pub use telegram::{MessageSender, TelegramSender};
