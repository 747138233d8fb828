//! Communication channels (Telegram).
//!
//! Channel trait and registry so the gateway can stop channel connectors and route
//! replies. Inbound messages are sent to the gateway for dialogue handling.

mod inbound;
mod registry;
mod telegram;

pub use inbound::InboundMessage;
pub use registry::{ChannelHandle, ChannelRegistry};
pub use telegram::{TelegramChannel, TelegramUpdate, TELEGRAM_CHANNEL_ID};
