//! Claviz Client - Rust SDK
//!
//! A typed async client for the Claviz fact management platform. It
//! authenticates a user, then exposes one method per server endpoint and
//! translates JSON responses into typed domain objects.
//!
//! # Architecture
//!
//! 1. **SDK Layer** (`sdk`) - Token handshake, client façade, function execution
//! 2. **Types** (`types`) - Entities, facts, branches, users, function instances
//! 3. **Support** (`config`, `error`, `metrics`) - Configuration, error taxonomy, counters
//!
//! # Example
//!
//! ```no_run
//! use claviz_client::{ClavizClient, CancellationToken};
//! use serde_json::{json, Value};
//!
//! # async fn run() -> claviz_client::Result<()> {
//! let client = ClavizClient::login("https://claviz.example.com", "jane", "s3cret").await?;
//!
//! let cancel = CancellationToken::new();
//! let totals: Value = client
//!     .execute_function("recalculate-totals", &json!({ "year": 2024 }), Some(&cancel))
//!     .await?;
//! println!("{}", totals);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod sdk;
pub mod types;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use metrics::{ClientMetrics, MetricsSnapshot};
pub use sdk::{get_token, ClavizClient};
pub use tokio_util::sync::CancellationToken;
pub use types::*;

/// Crate version, sent in the user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
