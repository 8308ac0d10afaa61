//! Marketing API types
//!
//! Wire shapes for segments, campaigns and engagement events. Free-text fields
//! the backend treats as open vocabularies (`channel`, `status`, `event_type`)
//! are parsed into enums here, keeping the original text in an `Unknown`
//! variant when the value is not one the dashboard knows about.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Vocabularies
// =============================================================================

/// Delivery channel of a campaign
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    Email,
    Sms,
    Social,
    Ads,
    Unknown(String),
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Social => "social",
            Channel::Ads => "ads",
            Channel::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Channel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "email" => Channel::Email,
            "sms" => Channel::Sms,
            "social" => Channel::Social,
            "ads" => Channel::Ads,
            _ => Channel::Unknown(raw),
        }
    }
}

/// Campaign lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Launched,
    Sent,
    Unknown(String),
}

impl CampaignStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Scheduled => "scheduled",
            CampaignStatus::Launched => "launched",
            CampaignStatus::Sent => "sent",
            CampaignStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for CampaignStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "draft" => CampaignStatus::Draft,
            "scheduled" => CampaignStatus::Scheduled,
            "launched" => CampaignStatus::Launched,
            "sent" => CampaignStatus::Sent,
            _ => CampaignStatus::Unknown(raw),
        }
    }
}

/// Kind of engagement recorded against a campaign
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    View,
    Click,
    Sent,
    Opened,
    Clicked,
    Converted,
    Unknown(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::View => "view",
            EventType::Click => "click",
            EventType::Sent => "sent",
            EventType::Opened => "opened",
            EventType::Clicked => "clicked",
            EventType::Converted => "converted",
            EventType::Unknown(raw) => raw,
        }
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "view" => EventType::View,
            "click" => EventType::Click,
            "sent" => EventType::Sent,
            "opened" => EventType::Opened,
            "clicked" => EventType::Clicked,
            "converted" => EventType::Converted,
            _ => EventType::Unknown(raw),
        }
    }
}

macro_rules! wire_text {
    ($($ty:ident),*) => {$(
        impl From<&str> for $ty {
            fn from(raw: &str) -> Self {
                $ty::from(raw.to_string())
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

wire_text!(Channel, CampaignStatus, EventType);

// =============================================================================
// Resources
// =============================================================================

/// Named audience-targeting rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: i64,
    pub name: String,
    /// Opaque rule text, never interpreted by the client
    pub criteria: String,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Marketing send tied to a channel and a target segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub channel: Channel,
    pub segment_id: Option<i64>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Only drafts can be launched
    pub fn can_launch(&self) -> bool {
        self.status == CampaignStatus::Draft
    }
}

/// Timestamped interaction attributed to a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub campaign_id: i64,
    pub event_type: EventType,
    #[serde(with = "timestamp")]
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub event_metadata: Option<String>,
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSegment {
    pub name: String,
    pub criteria: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCampaign {
    pub name: String,
    pub channel: Channel,
    pub segment_id: i64,
    /// Sent as `null` when absent
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    pub event_type: EventType,
}

// =============================================================================
// Auth bodies
// =============================================================================

/// Token issued by `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Account returned by `POST /auth/register`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub email: String,
}

/// Error body returned on non-success responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

/// `detail` is either a plain message or a list of validation issues
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationIssue {
    pub msg: String,
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ErrorDetail {
    /// Human-readable message, if the detail carries one
    pub fn message(&self) -> Option<&str> {
        let msg = match self {
            ErrorDetail::Message(msg) => msg.as_str(),
            ErrorDetail::Validation(issues) => issues.first()?.msg.as_str(),
            ErrorDetail::Other(_) => return None,
        };
        (!msg.trim().is_empty()).then_some(msg)
    }
}

impl ErrorBody {
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(ErrorDetail::message)
    }
}

// =============================================================================
// Timestamps
// =============================================================================

/// Accepts RFC 3339 and offset-less ISO-8601 datetimes (read as UTC)
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
            })
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
