//! Function instance types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a function instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionInstanceStatus {
    Processing,
    Success,
    Error,
}

impl FunctionInstanceStatus {
    /// `success` and `error` are final; the server never leaves them.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Processing)
    }
}

/// One in-flight or completed execution of a server function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInstance {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub parent_function_instance_id: Option<String>,
    pub status: FunctionInstanceStatus,
    /// Present when `status` is `success`
    #[serde(default)]
    pub result: Option<Value>,
    /// Present when `status` is `error`
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub start_date: Option<String>,
}

impl FunctionInstance {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Body of a 202 response from the execution trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionAccepted {
    pub function_instance_id: String,
}
