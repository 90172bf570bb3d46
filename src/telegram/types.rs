//! Inbound webhook schema
//!
//! Deserialized and validated once at ingress. Identifiers arrive as wide
//! integers but legacy senders may encode them as strings; both are accepted.

use serde::{Deserialize, Deserializer};

/// Accept a wide integer id from either a number or a string encoding
fn wide_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WideInt {
        Num(i64),
        Str(String),
    }

    match WideInt::deserialize(deserializer)? {
        WideInt::Num(n) => Ok(n),
        WideInt::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn opt_wide_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "wide_int")] i64);

    Option::<Wrapper>::deserialize(deserializer).map(|opt| opt.map(|Wrapper(n)| n))
}

/// One webhook delivery
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    #[serde(deserialize_with = "wide_int")]
    pub update_id: i64,

    pub message: Option<IncomingMessage>,

    /// Accepted structurally, not treated specially
    pub edited_message: Option<IncomingMessage>,
}

impl Update {
    /// Validate a raw delivery; a schema miss never reaches the core
    pub fn parse(payload: serde_json::Value) -> crate::core::AgentResult<Self> {
        serde_json::from_value(payload)
            .map_err(|error| crate::core::AgentError::MalformedUpdate(error.to_string()))
    }
}

/// A message inside an update
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    #[serde(deserialize_with = "wide_int")]
    pub message_id: i64,

    pub from: Sender,
    pub chat: ChatRef,

    #[serde(default, deserialize_with = "opt_wide_int")]
    pub date: Option<i64>,

    pub text: Option<String>,
}

/// Who sent the message
#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    #[serde(deserialize_with = "wide_int")]
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: String,
    pub language_code: String,
}

/// The conversation the message belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRef {
    #[serde(deserialize_with = "wide_int")]
    pub id: i64,
    pub first_name: Option<String>,
    pub username: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub chat_type: String,
}
