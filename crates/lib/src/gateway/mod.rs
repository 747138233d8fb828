//! Gateway: HTTP server and inbound processing for the Telegram bot.
//!
//! Single port serves the health probe and the Telegram webhook. Inbound messages from the
//! webhook or the long-poll loop are run through the dialogue engine one at a time.

mod server;

pub use server::{process_inbound_message, run_gateway, GatewayState};
