//! Branches: versioned workspaces of facts and collections.

use serde::{Deserialize, Serialize};

/// A branch managed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub modified_date: Option<String>,
}
