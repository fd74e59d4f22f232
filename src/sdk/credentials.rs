//! Token acquisition for the Claviz server.
//!
//! The handshake is two unauthenticated calls:
//! 1. `GET {url}/api/version` names the identity authority and app
//! 2. `POST {authority}/api/token` exchanges the credentials for a token

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::default_user_agent;
use crate::error::{Error, Result};
use crate::sdk::api_client::ensure_success;

/// Server metadata returned by `/api/version`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerVersion {
    pub claviz_id_app_name: Option<String>,
    pub claviz_id_authority: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Password grant request sent to the identity authority.
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    pub client_id: String,
    pub grant_type: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Token response from the identity authority.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Authenticate and return an `Authorization` header value
/// (`Bearer {access_token}`).
///
/// # Errors
///
/// Returns the transport error if either call fails, or [`Error::Auth`] if a
/// response lacks the expected fields.
pub async fn get_token(url: &str, username: &str, password: &str) -> Result<String> {
    let http = Client::builder()
        .user_agent(default_user_agent())
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

    let version_url = format!("{}/api/version", url.trim_end_matches('/'));
    debug!(url = version_url.as_str(), "Fetching server metadata");
    let response = ensure_success(http.get(&version_url).send().await?).await?;
    let version: ServerVersion = response.json().await?;

    let app_name = version
        .claviz_id_app_name
        .ok_or_else(|| Error::Auth("server metadata is missing clavizIdAppName".to_string()))?;
    let authority = version
        .claviz_id_authority
        .ok_or_else(|| Error::Auth("server metadata is missing clavizIdAuthority".to_string()))?;

    let token_url = format!("{}/api/token", authority.trim_end_matches('/'));
    let request = TokenRequest {
        client_id: format!("{}.resource", app_name),
        grant_type: "password",
        username,
        password,
    };

    debug!(
        url = token_url.as_str(),
        client_id = request.client_id.as_str(),
        username,
        "Requesting access token"
    );
    let response = ensure_success(http.post(&token_url).json(&request).send().await?).await?;
    let token: TokenResponse = response.json().await?;

    let access_token = token
        .access_token
        .ok_or_else(|| Error::Auth("token response is missing access_token".to_string()))?;

    Ok(format!("Bearer {}", access_token))
}
