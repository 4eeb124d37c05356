//! Approval Request Model
//!
//! A captured, not-yet-applied edit or delete. Field names are camelCase on
//! the wire because existing approval partitions already use them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::record::deserialize_id;
use super::{Plant, Record};

/// Gated mutation kind. Creates are never gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Edit,
    Delete,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request lifecycle: `pending` -> `approved` | `rejected`, both terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    /// Assigned by the store when the request is recorded
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_id"
    )]
    pub id: Option<String>,
    pub action_type: ActionType,
    pub target_entity_type: String,
    pub target_id: String,
    /// Partition the replay goes to
    pub target_plant: Plant,
    /// Proposed new state (edit) or the removed row (delete)
    #[serde(deserialize_with = "deserialize_target_data")]
    pub target_data: Record,
    pub reason: String,
    pub requested_by: String,
    pub requested_by_role: String,
    #[serde(default)]
    pub requested_by_plant: Option<Plant>,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
    /// Reviewer whose approval is being applied. Written before the replay;
    /// serialized as null when cleared because updates merge into the row.
    #[serde(default)]
    pub applying_by: Option<String>,
    #[serde(default)]
    pub applying_at: Option<DateTime<Utc>>,
}

/// Spreadsheet-style backends store nested objects as JSON text.
fn deserialize_target_data<'de, D>(deserializer: D) -> Result<Record, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => serde_json::from_str(&text).map_err(serde::de::Error::custom),
        other => Record::from_value(other).map_err(serde::de::Error::custom),
    }
}

impl PendingRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// An approval started applying but its verdict was never recorded
    pub fn is_applying(&self) -> bool {
        self.is_pending() && self.applying_at.is_some()
    }

    /// Row representation for the approval partition
    pub fn to_record(&self) -> serde_json::Result<Record> {
        Record::from_value(serde_json::to_value(self)?)
    }
}

impl TryFrom<Record> for PendingRequest {
    type Error = serde_json::Error;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        serde_json::from_value(record.to_value()?)
    }
}
