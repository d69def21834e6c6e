pub mod lenient;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lenient::{
    json_truthy, loose_count, loose_counts, loose_opt_string, loose_string, null_as_default, or_default,
    truthy, truthy_string,
};

/// Turn count per honeypot client id, as reported by `/stats`.
pub type TurnCounts = BTreeMap<String, u64>;

/// Message shown to the user when the report call cannot reach the backend.
pub const REPORT_FAILED_MESSAGE: &str = "Failed to connect to NPCI.";

/// One exchange between a suspected scammer and the honeypot persona.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default, deserialize_with = "loose_string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "loose_opt_string")]
    pub client_id: Option<String>,
    /// Inbound text; either a plain string or an object carrying `text`
    #[serde(default)]
    pub message: Option<MessageBody>,
    #[serde(default, deserialize_with = "loose_string")]
    pub reply: String,
    #[serde(default, deserialize_with = "or_default")]
    pub extracted_intelligence: Option<ExtractedIntelligence>,
    #[serde(default, deserialize_with = "truthy")]
    pub scam_detected: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub suspicion_level: Option<SuspicionLevel>,
    #[serde(default, deserialize_with = "loose_string")]
    pub reasoning: String,
    #[serde(default, deserialize_with = "loose_count")]
    pub turns_count: u64,
}

impl Interaction {
    /// Text of the inbound message, see [`MessageBody::text`].
    pub fn message_text(&self) -> String {
        message_text(self.message.as_ref())
    }

    /// True when the backend extracted a UPI id from this exchange.
    pub fn has_upi(&self) -> bool {
        self.extracted_intelligence
            .as_ref()
            .is_some_and(|intel| intel.upi_id.is_some())
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedIntelligence {
    #[serde(default, deserialize_with = "truthy_string")]
    pub upi_id: Option<String>,
    #[serde(default, deserialize_with = "truthy_string")]
    pub bank_details: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub phishing_links: Vec<String>,
}

impl ExtractedIntelligence {
    pub fn is_empty(&self) -> bool {
        self.upi_id.is_none() && self.bank_details.is_none() && self.phishing_links.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Structured(Value),
}

impl MessageBody {
    /// Plain strings are returned as is. Objects yield their `text` field
    /// when it is truthy; anything else is rendered as compact JSON.
    pub fn text(&self) -> String {
        match self {
            MessageBody::Text(text) => text.clone(),
            MessageBody::Structured(value) => match value.get("text") {
                Some(Value::String(text)) if !text.is_empty() => text.clone(),
                Some(text) if json_truthy(text) => text.to_string(),
                _ => value.to_string(),
            },
        }
    }
}

impl From<&str> for MessageBody {
    fn from(text: &str) -> Self {
        MessageBody::Text(text.to_string())
    }
}

/// Extract display text from an optional message; absent yields "".
pub fn message_text(message: Option<&MessageBody>) -> String {
    message.map(MessageBody::text).unwrap_or_default()
}

/// How suspicious the scammer is that they are talking to a bot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SuspicionLevel {
    Low,
    Medium,
    High,
    Other(String),
}

impl SuspicionLevel {
    pub fn as_str(&self) -> &str {
        match self {
            SuspicionLevel::Low => "LOW",
            SuspicionLevel::Medium => "MEDIUM",
            SuspicionLevel::High => "HIGH",
            SuspicionLevel::Other(raw) => raw,
        }
    }
}

impl From<String> for SuspicionLevel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "LOW" => SuspicionLevel::Low,
            "MEDIUM" => SuspicionLevel::Medium,
            "HIGH" => SuspicionLevel::High,
            _ => SuspicionLevel::Other(raw),
        }
    }
}

impl From<SuspicionLevel> for String {
    fn from(level: SuspicionLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for SuspicionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `GET /stats`. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactions: Option<Vec<Interaction>>,
    #[serde(
        default,
        deserialize_with = "loose_counts",
        skip_serializing_if = "Option::is_none"
    )]
    pub turn_counts: Option<TurnCounts>,
}

impl StatsResponse {
    /// The value handed to the view when `/stats` cannot be fetched.
    pub fn empty() -> Self {
        Self {
            interactions: Some(Vec::new()),
            turn_counts: Some(TurnCounts::new()),
        }
    }
}

/// Classification tag of an intel row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntelKind {
    Upi,
    Bank,
    Link,
    Other(String),
}

impl IntelKind {
    pub fn as_str(&self) -> &str {
        match self {
            IntelKind::Upi => "UPI",
            IntelKind::Bank => "BANK",
            IntelKind::Link => "LINK",
            IntelKind::Other(raw) => raw,
        }
    }
}

impl Default for IntelKind {
    fn default() -> Self {
        IntelKind::Other(String::new())
    }
}

impl From<String> for IntelKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "UPI" => IntelKind::Upi,
            "BANK" => IntelKind::Bank,
            "LINK" => IntelKind::Link,
            _ => IntelKind::Other(raw),
        }
    }
}

impl From<IntelKind> for String {
    fn from(kind: IntelKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for IntelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `GET /api/intel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelItem {
    #[serde(rename = "type", default)]
    pub kind: IntelKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    /// Client id the item was extracted from
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
}

/// Body of `POST /api/report`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

impl ReportResult {
    pub fn failed() -> Self {
        Self {
            status: "error".to_string(),
            message: REPORT_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    StatsRefreshed {
        stats: StatsResponse,
        at: DateTime<Utc>,
    },
    IntelRefreshed {
        items: Vec<IntelItem>,
        at: DateTime<Utc>,
    },
    ReportCompleted {
        result: ReportResult,
        at: DateTime<Utc>,
    },
}
