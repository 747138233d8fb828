//! Dialogue transitions: free chat, keyword handoff, and the contact-collection flow.
//!
//! Every (state, event) pair has exactly one arm in [`DialogueEngine::step`]; the engine
//! has no error path of its own. Model and CRM failures are absorbed by the
//! [`Answerer`] and [`LeadSink`] implementations.

use super::replies;
use super::{Command, DialogueState, InboundEvent, OutboundReply, Session};
use crate::answer::{AnswerService, Answerer};
use crate::config::Settings;
use crate::crm::{BitrixClient, LeadSink};
use crate::validate;
use std::sync::Arc;

/// Substrings that ask for a human, matched case-insensitively. Only checked in free chat.
pub const HANDOFF_KEYWORDS: &[&str] = &[
    "operator",
    "manager",
    "admin",
    "moderator",
    "human",
    "help",
    "specialist",
    "pass me on",
    "оператор",
    "менеджер",
    "админ",
    "модератор",
    "человек",
    "помощь",
    "специалист",
    "передай",
];

pub fn contains_handoff_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    HANDOFF_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn asks_for_human(event: &InboundEvent) -> bool {
    match &event.command {
        Some(Command::Help) => true,
        Some(_) => false,
        None => contains_handoff_keyword(&event.text),
    }
}

/// Runs one inbound event against a session. Holds only read-only collaborators, so one
/// engine serves every conversation.
#[derive(Clone)]
pub struct DialogueEngine {
    answerer: Arc<dyn Answerer>,
    sink: Arc<dyn LeadSink>,
}

impl DialogueEngine {
    pub fn new(answerer: Arc<dyn Answerer>, sink: Arc<dyn LeadSink>) -> Self {
        Self { answerer, sink }
    }

    /// Engine backed by the model answer service and the Bitrix24 webhook.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Arc::new(AnswerService::from_settings(settings)),
            Arc::new(BitrixClient::new(settings.crm_webhook.clone())),
        )
    }

    /// Handle one event. `None` means the conversation has no session yet: one is created
    /// from the sender's display name and the reply is the greeting, unless the first event
    /// already asks for a human (`/help` or a handoff keyword), which starts the flow.
    pub async fn handle(
        &self,
        session: Option<Session>,
        event: &InboundEvent,
    ) -> (Session, OutboundReply) {
        let (session, text) = match session {
            None => {
                let mut session = Session::new(event.display_name.as_deref());
                let text = if asks_for_human(event) {
                    self.step(&mut session, event).await
                } else {
                    replies::greeting(&session.display_name)
                };
                (session, text)
            }
            Some(mut session) => {
                let text = self.step(&mut session, event).await;
                (session, text)
            }
        };
        debug_assert!(session.fields.is_in_order());
        let reply = OutboundReply {
            text,
            state: session.state,
        };
        (session, reply)
    }

    async fn step(&self, session: &mut Session, event: &InboundEvent) -> String {
        use DialogueState::*;

        let text = event.text.as_str();
        match (&event.command, session.state) {
            (Some(Command::Cancel), _) => {
                session.reset();
                replies::CANCELLED.to_string()
            }
            (Some(Command::Start), _) => {
                session.reset();
                replies::greeting(&session.display_name)
            }
            (Some(Command::Help), Conversing) => {
                session.state = CollectingName;
                replies::handoff()
            }
            (Some(Command::Help), CollectingName) => replies::NAME_PROMPT.to_string(),
            (Some(Command::Help), CollectingEmail) => replies::EMAIL_PROMPT.to_string(),
            (Some(Command::Help), CollectingPhone) => replies::PHONE_PROMPT.to_string(),
            (Some(Command::Help), CollectingQuestion) => replies::QUESTION_PROMPT.to_string(),
            (Some(Command::Other(name)), _) => {
                log::debug!("dialogue: unknown command /{}", name);
                replies::UNKNOWN_COMMAND.to_string()
            }

            (None, Conversing) => {
                if contains_handoff_keyword(text) {
                    session.state = CollectingName;
                    replies::handoff()
                } else {
                    self.answerer.answer(text).await
                }
            }
            (None, CollectingName) => {
                session.fields.name = Some(text.to_string());
                session.state = CollectingEmail;
                replies::EMAIL_PROMPT.to_string()
            }
            (None, CollectingEmail) => {
                let email = text.trim();
                if validate::is_valid_email(email) {
                    session.fields.email = Some(email.to_string());
                    session.state = CollectingPhone;
                    replies::PHONE_PROMPT.to_string()
                } else {
                    replies::EMAIL_INVALID.to_string()
                }
            }
            (None, CollectingPhone) => {
                let phone = validate::normalize_phone(text);
                if validate::is_valid_phone(&phone) {
                    session.fields.phone = Some(phone);
                    session.state = CollectingQuestion;
                    replies::QUESTION_PROMPT.to_string()
                } else {
                    replies::PHONE_INVALID.to_string()
                }
            }
            (None, CollectingQuestion) => {
                session.fields.question = Some(text.to_string());
                let lead = session.fields.to_lead();
                let accepted = self.sink.submit(&lead).await;
                session.reset();
                if accepted {
                    replies::LEAD_CREATED.to_string()
                } else {
                    replies::LEAD_FAILED.to_string()
                }
            }
        }
    }
}
