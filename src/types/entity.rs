//! Script entities: functions, components and collections.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields shared by every versioned entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntity {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub modified_date: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default)]
    pub initial_hash: Option<String>,
    #[serde(default)]
    pub current_hash: Option<String>,
}

/// A function parameter declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub key: String,
    #[serde(default)]
    pub description: String,
}

/// Component parameters share the function parameter shape.
pub type ComponentParameter = FunctionParameter;

/// A server-side function definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntity {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<FunctionParameter>,
    /// Whether the server runs this function as a background function
    #[serde(default)]
    pub run_in_background: bool,
    #[serde(default)]
    pub script: String,
}

/// A reusable UI/script component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntity {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub parameters: Vec<ComponentParameter>,
    #[serde(default)]
    pub parameters_component_id: Option<String>,
}

/// A fact collection definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntity {
    #[serde(flatten)]
    pub base: BaseEntity,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub user_group_ids: Vec<String>,
    #[serde(default)]
    pub privileges: Vec<Value>,
    #[serde(default)]
    pub fact_title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A background function that has been started on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundFunction {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_function_entity_flattens_base() {
        let raw = json!({
            "id": "fn-1",
            "label": "Recalculate totals",
            "isDefault": false,
            "folderId": null,
            "modifiedDate": "2024-03-01T10:00:00Z",
            "createdDate": "2024-01-01T10:00:00Z",
            "initialHash": "a1",
            "currentHash": "b2",
            "description": "Recalculates invoice totals",
            "parameters": [{ "key": "invoiceId", "description": "Invoice to update" }],
            "runInBackground": true,
            "script": "return 1;"
        });

        let entity: FunctionEntity = serde_json::from_value(raw).unwrap();
        assert_eq!(entity.base.id, "fn-1");
        assert_eq!(entity.base.label, "Recalculate totals");
        assert_eq!(entity.base.current_hash.as_deref(), Some("b2"));
        assert!(entity.run_in_background);
        assert_eq!(entity.parameters[0].key, "invoiceId");
    }

    #[test]
    fn test_collection_entity_defaults() {
        let raw = json!({ "id": "col-1", "label": "Invoices" });
        let entity: CollectionEntity = serde_json::from_value(raw).unwrap();

        assert_eq!(entity.base.id, "col-1");
        assert!(entity.user_group_ids.is_empty());
        assert!(entity.tags.is_empty());
        assert!(entity.fact_title.is_none());
    }

    #[test]
    fn test_background_function_keeps_unknown_fields() {
        let raw = json!({ "id": "bg-1", "label": "Sync", "startedBy": "admin" });
        let function: BackgroundFunction = serde_json::from_value(raw).unwrap();

        assert_eq!(function.id, "bg-1");
        assert_eq!(function.extra.get("startedBy"), Some(&json!("admin")));
    }
}
