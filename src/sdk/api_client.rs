//! HTTP client façade for the Claviz server API.
//!
//! Every direct method maps to exactly one HTTP request. Non-2xx responses
//! and network failures are returned as-is, nothing here retries.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::metrics::ClientMetrics;
use crate::sdk::credentials::get_token;
use crate::types::*;

/// Client for a Claviz server.
///
/// Base URL and authorization header are fixed at construction. The client
/// is cheap to clone and clones share one connection pool and one set of
/// metrics.
#[derive(Debug, Clone)]
pub struct ClavizClient {
    http: Client,
    base_url: String,
    pub(crate) poll_interval: Duration,
    pub(crate) metrics: Arc<ClientMetrics>,
}

impl ClavizClient {
    /// Create a client for `url` authorized with `token`
    /// (the full header value, e.g. `Bearer eyJ...`).
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(url, token))
    }

    /// Create a client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut authorization = HeaderValue::from_str(&config.token)
            .map_err(|e| Error::Config(format!("Invalid authorization token: {}", e)))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_interval: config.poll_interval(),
            metrics: ClientMetrics::new(),
        })
    }

    /// Authenticate with username and password, then create a client.
    pub async fn login(url: &str, username: &str, password: &str) -> Result<Self> {
        let token = get_token(url, username, password).await?;
        Self::new(url, token)
    }

    /// Get the server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the interval between function instance status polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Get the metrics shared by this client and its clones.
    pub fn metrics(&self) -> &Arc<ClientMetrics> {
        &self.metrics
    }

    // ===== Transport =====

    /// Start a request against `path` (which begins with `/`).
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();
        debug!(method = method.as_str(), path, request_id = request_id.as_str(), "Sending request");

        self.http
            .request(method, url)
            .header("X-Request-Id", request_id)
    }

    /// Send a request and fail on non-2xx.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.metrics.inc_requests();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.inc_failed();
                return Err(e.into());
            }
        };

        match ensure_success(response).await {
            Ok(response) => {
                self.metrics.inc_success();
                Ok(response)
            }
            Err(e) => {
                self.metrics.inc_failed();
                Err(e)
            }
        }
    }

    async fn send_json<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_unit(&self, request: RequestBuilder) -> Result<()> {
        self.send(request).await?;
        Ok(())
    }

    // ===== Facts =====

    /// Evaluate `expression` on the server and return the matching rows.
    ///
    /// With `user_agnostic` set the expression runs as if the admin ran it.
    pub async fn query<T: DeserializeOwned>(
        &self,
        expression: &str,
        user_agnostic: bool,
    ) -> Result<Vec<T>> {
        let body = QueryRequest {
            user_agnostic,
            expression,
        };
        self.send_json(
            self.request(Method::POST, "/api/factValidation/query")
                .json(&body),
        )
        .await
    }

    /// Remove facts by id.
    pub async fn delete_facts(&self, fact_ids: Vec<String>) -> Result<()> {
        let body = DeleteFactsRequest { fact_ids };
        self.send_unit(
            self.request(Method::POST, "/api/facts/delete-multiple")
                .json(&body),
        )
        .await
    }

    pub async fn get_fact_data<T: DeserializeOwned>(&self, fact_id: &str) -> Result<FactData<T>> {
        self.send_json(
            self.request(Method::GET, "/api/facts/fact-data")
                .query(&[("factId", fact_id)]),
        )
        .await
    }

    /// Get one page of a fact's history.
    ///
    /// `FactHistoryPage::default()` is the first page of
    /// [`DEFAULT_HISTORY_PAGE_SIZE`] entries.
    pub async fn get_fact_history<T: DeserializeOwned>(
        &self,
        fact_id: &str,
        page: FactHistoryPage,
    ) -> Result<FactHistory<T>> {
        let page_index = page.page_index.to_string();
        let page_size = page.page_size.to_string();
        self.send_json(self.request(Method::GET, "/api/facts/fact-history").query(&[
            ("factId", fact_id),
            ("pageIndex", page_index.as_str()),
            ("pageSize", page_size.as_str()),
        ]))
        .await
    }

    /// Import facts into a collection in one batch.
    ///
    /// Returns the server's verbose import report, or `Value::Null` when the
    /// response has no body.
    pub async fn import_facts<T: Serialize>(
        &self,
        collection_id: &str,
        facts: &[T],
    ) -> Result<Value> {
        let response = self
            .send(
                self.request(Method::POST, "/api/facts/import")
                    .query(&[("collectionId", collection_id), ("verbose", "true")])
                    .json(facts),
            )
            .await?;
        read_json_or_null(response).await
    }

    /// Create or update a fact.
    ///
    /// A non-empty `fact_id` updates that fact with PUT; `None` or an empty id
    /// creates a new fact with POST. The body is the same either way.
    pub async fn save_fact<T>(
        &self,
        fact_id: Option<&str>,
        collection_id: &str,
        fields: &T,
    ) -> Result<SavedFact<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let method = if fact_id.is_some_and(|id| !id.is_empty()) {
            Method::PUT
        } else {
            Method::POST
        };
        let body = SaveFactRequest {
            id: fact_id,
            collection_id,
            fields,
        };
        self.send_json(self.request(method, "/api/facts").json(&body))
            .await
    }

    /// Validate facts against a collection's rules.
    ///
    /// Firing `cancel` aborts the request and returns [`Error::Canceled`].
    pub async fn validate_fact<T>(
        &self,
        collection_id: &str,
        facts: &[FactValidationRequest<T>],
        cancel: Option<&CancellationToken>,
    ) -> Result<FactValidationResult<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let body = ValidateFactsRequest {
            collection_id,
            facts,
        };
        let call = self.send_json(self.request(Method::POST, "/api/factValidation").json(&body));

        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(Error::Canceled),
                result = call => result,
            },
            None => call.await,
        }
    }

    // ===== Users =====

    pub async fn get_current_user(&self) -> Result<UserInfo> {
        self.send_json(self.request(Method::GET, "/api/system/current-user"))
            .await
    }

    pub async fn get_user_list(&self) -> Result<Vec<UserInfo>> {
        self.send_json(self.request(Method::GET, "/api/system/user-list"))
            .await
    }

    // ===== Branches =====

    pub async fn get_branches(&self) -> Result<Vec<Branch>> {
        self.send_json(self.request(Method::GET, "/api/branchesManager"))
            .await
    }

    /// Get the branch the current user is working in.
    pub async fn get_current_user_branch(&self) -> Result<Branch> {
        self.send_json(self.request(Method::GET, "/api/branchesManager/working"))
            .await
    }

    /// Migrate facts between branches. `options` is passed through as the
    /// request body.
    pub async fn migrate_facts<O: Serialize + ?Sized>(&self, options: &O) -> Result<Value> {
        let response = self
            .send(
                self.request(Method::POST, "/api/branchesManager/migrate-facts")
                    .json(options),
            )
            .await?;
        read_json_or_null(response).await
    }

    // ===== Entities =====

    pub async fn get_function_entities(&self) -> Result<Vec<FunctionEntity>> {
        self.send_json(self.request(Method::GET, "/api/functionsManager/full"))
            .await
    }

    pub async fn get_component_entities(&self) -> Result<Vec<ComponentEntity>> {
        self.send_json(self.request(Method::GET, "/api/components/full"))
            .await
    }

    /// List collections, optionally restricted to one branch. An empty
    /// branch id is treated as no filter.
    pub async fn get_collection_entities(
        &self,
        branch_id: Option<&str>,
    ) -> Result<Vec<CollectionEntity>> {
        let mut request = self.request(Method::GET, "/api/collections/full");
        if let Some(branch_id) = branch_id.filter(|id| !id.is_empty()) {
            request = request.query(&[("branchId", branch_id)]);
        }
        self.send_json(request).await
    }

    // ===== Background Functions =====

    pub async fn get_started_background_functions(&self) -> Result<Vec<BackgroundFunction>> {
        self.send_json(self.request(Method::GET, "/api/functionsManager/background"))
            .await
    }

    pub async fn start_background_function(&self, function_id: &str) -> Result<()> {
        let path = format!("/api/functionsManager/background/{}/start", function_id);
        self.send_unit(self.request(Method::PUT, &path)).await
    }

    pub async fn stop_background_function(&self, function_id: &str) -> Result<()> {
        let path = format!("/api/functionsManager/background/{}/stop", function_id);
        self.send_unit(self.request(Method::PUT, &path)).await
    }

    // ===== Function Instances =====

    pub async fn get_started_function_instances(&self) -> Result<Vec<FunctionInstance>> {
        self.send_json(self.request(Method::GET, "/api/functions/functionInstances"))
            .await
    }

    /// Stop a function instance if it is still processing, and delete it.
    pub async fn destroy_function_instance(&self, function_instance_id: &str) -> Result<()> {
        let path = format!("/api/functions/functionInstances/{}", function_instance_id);
        self.send_unit(self.request(Method::DELETE, &path)).await
    }

    pub async fn get_function_instance_status(
        &self,
        function_instance_id: &str,
    ) -> Result<FunctionInstance> {
        let path = format!("/api/functions/functionInstances/{}", function_instance_id);
        self.send_json(self.request(Method::GET, &path)).await
    }
}

/// Turn a non-2xx response into [`Error::Api`] carrying the body text.
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();

    if !status.is_success() {
        let status_text = status.canonical_reason().unwrap_or("Unknown");
        let body = response.text().await.unwrap_or_default();
        return Err(Error::api(status.as_u16(), status_text, body));
    }

    Ok(response)
}

/// Parse a JSON body; an empty body reads as `null`.
pub(crate) async fn read_json_or_null(response: Response) -> Result<Value> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
