//! Bitrix24 inbound-webhook client: `crm.lead.add`.

use super::{LeadRecord, LeadSink};
use async_trait::async_trait;
use serde_json::{json, Value};

const LEAD_ADD_METHOD: &str = "crm.lead.add";
const CONTACT_VALUE_TYPE: &str = "WORK";

#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("crm request failed: {0}")]
    Request(reqwest::Error),
    #[error("crm api error: {0}")]
    Api(String),
    #[error("crm response malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("crm rejected lead: {0}")]
    Rejected(String),
}

/// The webhook URL carries the portal secret, so it never reaches the error text.
impl From<reqwest::Error> for CrmError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.without_url())
    }
}

/// Client for a Bitrix24 webhook base such as `https://portal.bitrix24.ru/rest/1/<key>/`.
#[derive(Clone)]
pub struct BitrixClient {
    webhook_base: String,
    client: reqwest::Client,
}

impl BitrixClient {
    pub fn new(webhook_base: impl Into<String>) -> Self {
        let mut webhook_base = webhook_base.into().trim().to_string();
        if !webhook_base.ends_with('/') {
            webhook_base.push('/');
        }
        Self {
            webhook_base,
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}{}", self.webhook_base, method)
    }

    /// POST crm.lead.add. Returns the `result` value (the new lead id) when it is truthy.
    pub async fn add_lead(&self, lead: &LeadRecord) -> Result<Value, CrmError> {
        let res = self
            .client
            .post(self.method_url(LEAD_ADD_METHOD))
            .json(&lead_payload(lead))
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(CrmError::Api(format!("{} {}", status, body)));
        }
        let raw = res.text().await?;
        let data: Value = serde_json::from_str(&raw)?;
        match data.get("result") {
            Some(result) if is_truthy(result) => Ok(result.clone()),
            _ => Err(CrmError::Rejected(raw)),
        }
    }
}

#[async_trait]
impl LeadSink for BitrixClient {
    async fn submit(&self, lead: &LeadRecord) -> bool {
        match self.add_lead(lead).await {
            Ok(id) => {
                log::info!("crm: lead created (result {})", id);
                true
            }
            Err(e) => {
                log::warn!("crm: lead not created: {}", e);
                false
            }
        }
    }
}

/// JSON body for crm.lead.add: phone and email as typed multi-field entries, question in comments.
pub fn lead_payload(lead: &LeadRecord) -> Value {
    json!({
        "fields": {
            "TITLE": format!("Request from {}", lead.name),
            "NAME": lead.name,
            "PHONE": [{ "VALUE": lead.phone, "VALUE_TYPE": CONTACT_VALUE_TYPE }],
            "EMAIL": [{ "VALUE": lead.email, "VALUE_TYPE": CONTACT_VALUE_TYPE }],
            "COMMENTS": format!("Client question:\n{}", lead.question),
        }
    })
}

/// Loose truthiness for the webhook `result`: null, false, 0, "" and empty containers are false.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
