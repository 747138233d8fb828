//! Per-conversation dialogue state.

use crate::crm::LeadRecord;
use serde::Serialize;

/// Substituted for any field that is missing when a lead is assembled.
pub const UNKNOWN_FIELD: &str = "unknown";

/// Display name used when the transport does not provide one.
pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

/// Where the conversation is: free chat, or waiting for one of the handoff fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    Conversing,
    CollectingName,
    CollectingEmail,
    CollectingPhone,
    CollectingQuestion,
}

impl DialogueState {
    pub const ALL: [DialogueState; 5] = [
        DialogueState::Conversing,
        DialogueState::CollectingName,
        DialogueState::CollectingEmail,
        DialogueState::CollectingPhone,
        DialogueState::CollectingQuestion,
    ];

    pub fn is_collecting(self) -> bool {
        !matches!(self, DialogueState::Conversing)
    }
}

/// Handoff fields accepted so far. Filled strictly in order: name, email, phone, question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub question: Option<String>,
}

impl CollectedFields {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when no field is present without all of its predecessors.
    pub fn is_in_order(&self) -> bool {
        let present = [
            self.name.is_some(),
            self.email.is_some(),
            self.phone.is_some(),
            self.question.is_some(),
        ];
        present.windows(2).all(|w| w[0] || !w[1])
    }

    /// Lead from whatever was collected; gaps become [`UNKNOWN_FIELD`].
    pub fn to_lead(&self) -> LeadRecord {
        let or_unknown =
            |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN_FIELD.to_string());
        LeadRecord {
            name: or_unknown(&self.name),
            email: or_unknown(&self.email),
            phone: or_unknown(&self.phone),
            question: or_unknown(&self.question),
        }
    }
}

/// Live state of one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub state: DialogueState,
    pub display_name: String,
    pub fields: CollectedFields,
}

impl Session {
    pub fn new(display_name: Option<&str>) -> Self {
        let display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
            .to_string();
        Self {
            state: DialogueState::Conversing,
            display_name,
            fields: CollectedFields::default(),
        }
    }

    /// Back to free chat with nothing collected. The display name is kept.
    pub fn reset(&mut self) {
        self.state = DialogueState::Conversing;
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_defaults() {
        let s = Session::new(None);
        assert_eq!(s.state, DialogueState::Conversing);
        assert_eq!(s.display_name, DEFAULT_DISPLAY_NAME);
        assert!(s.fields.is_empty());
        assert_eq!(Session::new(Some("  ")).display_name, DEFAULT_DISPLAY_NAME);
        assert_eq!(Session::new(Some("Ana")).display_name, "Ana");
    }

    #[test]
    fn field_order_check() {
        let mut f = CollectedFields::default();
        assert!(f.is_in_order());
        f.name = Some("Ana".into());
        f.email = Some("ana@example.com".into());
        assert!(f.is_in_order());
        f.email = None;
        f.phone = Some("5551234567".into());
        assert!(!f.is_in_order());
    }

    #[test]
    fn lead_substitutes_unknown() {
        let f = CollectedFields {
            name: Some("Ana".into()),
            question: Some("q".into()),
            ..Default::default()
        };
        let lead = f.to_lead();
        assert_eq!(lead.name, "Ana");
        assert_eq!(lead.email, UNKNOWN_FIELD);
        assert_eq!(lead.phone, UNKNOWN_FIELD);
        assert_eq!(lead.question, "q");
    }

    #[test]
    fn reset_keeps_display_name() {
        let mut s = Session::new(Some("Ana"));
        s.state = DialogueState::CollectingPhone;
        s.fields.name = Some("Ana".into());
        s.reset();
        assert_eq!(s, Session::new(Some("Ana")));
    }
}
