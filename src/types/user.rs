//! Users and user groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A role granted to a user group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupRole {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub roles: Vec<UserGroupRole>,
}

/// A user known to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_groups: Vec<UserGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
