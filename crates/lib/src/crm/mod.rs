//! CRM lead submission.
//!
//! The dialogue engine hands a finished [`LeadRecord`] to a [`LeadSink`]; the Bitrix24
//! webhook client is the production sink.

mod bitrix;

pub use bitrix::{is_truthy, lead_payload, BitrixClient, CrmError};

use async_trait::async_trait;

/// Contact details and inquiry collected during a handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub question: String,
}

/// Destination for completed leads. Returns whether the lead was accepted; never fails.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn submit(&self, lead: &LeadRecord) -> bool;
}
