//! Fact records, history pages and validation shapes.
//!
//! `T` is the caller's field payload for a collection. Use
//! `serde_json::Value` when the shape is not known up front.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Page size used when the caller does not pick one.
pub const DEFAULT_HISTORY_PAGE_SIZE: u32 = 10;

/// Which page of a fact's history to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactHistoryPage {
    /// Zero-based page number
    pub page_index: u32,
    pub page_size: u32,
}

impl FactHistoryPage {
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
        }
    }
}

impl Default for FactHistoryPage {
    fn default() -> Self {
        Self::new(0, DEFAULT_HISTORY_PAGE_SIZE)
    }
}

/// A stored fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactData<T> {
    pub id: String,
    pub collection_id: String,
    pub fields: T,
    #[serde(default)]
    pub status_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub last_modified_date: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

/// One page of a fact's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactHistory<T> {
    pub list: Vec<FactData<T>>,
    pub total_count: u64,
}

/// Response of a create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFact<T> {
    pub fact: FactData<T>,
}

/// A fact submitted for validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactValidationRequest<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub fields: T,
}

impl<T> FactValidationRequest<T> {
    pub fn new(fields: T) -> Self {
        Self { id: None, fields }
    }
}

/// Field errors for one rejected fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactValidationError<T> {
    pub fact: FactValidationRequest<T>,
    /// Field name -> error message
    #[serde(default)]
    pub field_errors: HashMap<String, String>,
}

/// Result of validating a batch of facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactValidationResult<T> {
    pub invalid: bool,
    #[serde(default = "Vec::new")]
    pub errors: Vec<FactValidationError<T>>,
}

// ===== Request Bodies =====

/// Body of `/api/factValidation/query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub user_agnostic: bool,
    pub expression: &'a str,
}

/// Body of `/api/facts/delete-multiple`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFactsRequest {
    pub fact_ids: Vec<String>,
}

/// Body of `/api/facts` for both create (POST) and update (PUT).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFactRequest<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub collection_id: &'a str,
    pub fields: &'a T,
}

/// Body of `/api/factValidation`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateFactsRequest<'a, T> {
    pub collection_id: &'a str,
    pub facts: &'a [FactValidationRequest<T>],
}
