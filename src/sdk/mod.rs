//! Claviz server SDK.
//!
//! # Architecture
//!
//! - `api_client` - Client façade with one method per server endpoint
//! - `credentials` - Username/password token handshake
//! - `execution` - Long-running function execution with polling and cancellation

pub mod api_client;
pub mod credentials;
pub mod execution;

pub use api_client::ClavizClient;
pub use credentials::{get_token, ServerVersion, TokenResponse};
