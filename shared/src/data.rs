//! Data service wire types
//!
//! The remote data service speaks one JSON envelope in both directions:
//!
//! ```json
//! { "action": "create", "partition": "downtime_NPK1", "payload": { ... } }
//! { "success": true, "data": { ... } }
//! { "success": false, "error": "Sheet is locked" }
//! ```
//!
//! A `success: false` answer is a business rejection. Transport failures
//! never reach this envelope.

use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Write operation against one partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOp {
    Create,
    Update,
    Delete,
}

impl WriteOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for WriteOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action field of a [`DataRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataAction {
    Read,
    Create,
    Update,
    Delete,
}

impl From<WriteOp> for DataAction {
    fn from(op: WriteOp) -> Self {
        match op {
            WriteOp::Create => Self::Create,
            WriteOp::Update => Self::Update,
            WriteOp::Delete => Self::Delete,
        }
    }
}

/// Request sent to the data service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRequest {
    pub action: DataAction,
    /// Physical partition key (e.g. `downtime_NPK1`)
    pub partition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Record>,
}

impl DataRequest {
    /// Read every row of a partition
    pub fn read(partition: impl Into<String>) -> Self {
        Self {
            action: DataAction::Read,
            partition: partition.into(),
            payload: None,
        }
    }

    /// Apply one write to a partition
    pub fn write(partition: impl Into<String>, op: WriteOp, payload: Record) -> Self {
        Self {
            action: op.into(),
            partition: partition.into(),
            payload: Some(payload),
        }
    }
}

/// Response envelope returned by the data service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> DataResponse<T> {
    /// Successful response carrying data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful response without data (e.g. delete)
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// Business rejection
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Split into the returned data or the backend's rejection message
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "request rejected by data service".to_string()))
        }
    }
}
