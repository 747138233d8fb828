//! Intake core library: dialogue engine, validators, model answers, CRM leads, and the
//! Telegram gateway used by the CLI.

pub mod answer;
pub mod channels;
pub mod config;
pub mod crm;
pub mod dialogue;
pub mod gateway;
pub mod llm;
pub mod session;
pub mod validate;
