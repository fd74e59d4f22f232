//! Long-running function execution.
//!
//! `POST /api/functions/{id}` either answers with the result directly or
//! with `202 Accepted` and a function instance id. In the latter case the
//! instance is polled until it reaches a terminal status or the caller
//! cancels, and the instance record is destroyed on every exit path that
//! reaches a terminal state.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::sdk::api_client::{read_json_or_null, ClavizClient};
use crate::types::{FunctionAccepted, FunctionInstanceStatus};

/// How a background execution ended.
#[derive(Debug, Clone, PartialEq)]
enum ExecutionOutcome {
    Success(Value),
    Failed(Value),
    Canceled,
}

impl ClavizClient {
    /// Execute a server function and return its result.
    ///
    /// If the server accepts the call for background processing, the
    /// function instance is polled every [`ClavizClient::poll_interval`]
    /// until it finishes. `cancel` is checked before each poll; once it
    /// fires the instance is destroyed and [`Error::Canceled`] is returned.
    /// Requests already in flight always run to completion.
    ///
    /// # Errors
    ///
    /// - [`Error::FunctionFailed`] with the instance's error payload when the
    ///   function ends with status `error`
    /// - [`Error::Canceled`] when `cancel` fires
    /// - transport errors from the trigger or a status poll, unchanged
    pub async fn execute_function<P, R>(
        &self,
        function_id: &str,
        params: &P,
        cancel: Option<&CancellationToken>,
    ) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.metrics.inc_executions();

        let path = format!("/api/functions/{}", function_id);
        let response = self
            .send(self.request(Method::POST, &path).json(params))
            .await?;

        if response.status() != StatusCode::ACCEPTED {
            let body = read_json_or_null(response).await?;
            return Ok(serde_json::from_value(body)?);
        }

        let body = read_json_or_null(response).await?;
        let accepted: FunctionAccepted = serde_json::from_value(body).map_err(|e| {
            Error::UnexpectedResponse(format!(
                "202 from function {} without a function instance id: {}",
                function_id, e
            ))
        })?;

        self.metrics.inc_background();
        info!(
            function_id,
            instance_id = accepted.function_instance_id.as_str(),
            "Function accepted for background processing"
        );

        match self
            .await_function_instance(&accepted.function_instance_id, cancel)
            .await?
        {
            ExecutionOutcome::Success(result) => Ok(serde_json::from_value(result)?),
            ExecutionOutcome::Failed(error) => Err(Error::FunctionFailed(error)),
            ExecutionOutcome::Canceled => Err(Error::Canceled),
        }
    }

    /// Poll an instance until it is terminal or `cancel` fires.
    async fn await_function_instance(
        &self,
        instance_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<ExecutionOutcome> {
        let is_canceled = || cancel.is_some_and(CancellationToken::is_cancelled);

        while !is_canceled() {
            let instance = self.get_function_instance_status(instance_id).await?;
            self.metrics.inc_status_polls();

            match instance.status {
                FunctionInstanceStatus::Success => {
                    self.destroy_quietly(instance_id).await;
                    info!(instance_id, "Function instance succeeded");
                    return Ok(ExecutionOutcome::Success(
                        instance.result.unwrap_or(Value::Null),
                    ));
                }
                FunctionInstanceStatus::Error => {
                    self.destroy_quietly(instance_id).await;
                    info!(instance_id, "Function instance failed");
                    return Ok(ExecutionOutcome::Failed(
                        instance.error.unwrap_or(Value::Null),
                    ));
                }
                FunctionInstanceStatus::Processing => {
                    debug!(
                        instance_id,
                        wait_ms = self.poll_interval.as_millis() as u64,
                        "Function instance still processing"
                    );
                    self.wait_for_next_poll(cancel).await;
                }
            }
        }

        self.metrics.inc_canceled();
        info!(instance_id, "Function execution canceled");
        self.destroy_quietly(instance_id).await;
        Ok(ExecutionOutcome::Canceled)
    }

    /// Sleep for one poll interval; a fired token ends the sleep early.
    async fn wait_for_next_poll(&self, cancel: Option<&CancellationToken>) {
        match cancel {
            Some(token) => {
                tokio::select! {
                    _ = sleep(self.poll_interval) => {}
                    _ = token.cancelled() => {}
                }
            }
            None => sleep(self.poll_interval).await,
        }
    }

    /// Destroy an instance record; failure is logged and ignored because
    /// the execution outcome is already decided.
    async fn destroy_quietly(&self, instance_id: &str) {
        match self.destroy_function_instance(instance_id).await {
            Ok(()) => self.metrics.inc_destroyed(),
            Err(e) => {
                self.metrics.inc_cleanup_failures();
                warn!(instance_id, error = %e, "Failed to destroy function instance");
            }
        }
    }
}
