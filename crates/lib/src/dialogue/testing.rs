//! Test doubles for the engine's collaborators.

use crate::answer::Answerer;
use crate::crm::{LeadRecord, LeadSink};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Answers with the input prefixed by "model says: " and counts calls.
#[derive(Default)]
pub struct EchoAnswerer {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Answerer for EchoAnswerer {
    async fn answer(&self, text: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        format!("model says: {}", text)
    }
}

/// Records every submitted lead and answers with a fixed verdict.
pub struct RecordingSink {
    accept: bool,
    leads: Mutex<Vec<LeadRecord>>,
}

impl RecordingSink {
    pub fn new(accept: bool) -> Self {
        Self {
            accept,
            leads: Mutex::new(Vec::new()),
        }
    }

    pub fn leads(&self) -> Vec<LeadRecord> {
        self.leads.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadSink for RecordingSink {
    async fn submit(&self, lead: &LeadRecord) -> bool {
        self.leads.lock().unwrap().push(lead.clone());
        self.accept
    }
}
