//! Conversation state machine for the intake bot.
//!
//! Free chat is answered by the model; asking for a human (keyword or `/help`) starts the
//! contact-collection flow (name, email, phone, question) that ends in a CRM lead.

mod engine;
mod event;
pub mod replies;
mod state;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use engine::{contains_handoff_keyword, DialogueEngine, HANDOFF_KEYWORDS};
pub use event::{Command, InboundEvent, OutboundReply};
pub use state::{CollectedFields, DialogueState, Session, DEFAULT_DISPLAY_NAME, UNKNOWN_FIELD};
