use serde::Serialize;
use thiserror::Error;

/// Blocking `reqwest` implementation of [`QueryTransport`].
pub mod http;

pub use http::HttpTransport;

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";
/// Remote method that executes a query.
pub const EXECUTE_METHOD: &str = "execute";

/// Parameters of an `execute` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcParams {
    /// Endpoint access token.
    pub token: String,
    /// SQL text to run.
    pub query: String,
}

/// JSON-RPC request envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcRequest {
    /// Protocol version, always [`JSONRPC_VERSION`].
    pub jsonrpc: String,
    /// Remote method name.
    pub method: String,
    /// Call parameters.
    pub params: RpcParams,
    /// Opaque request identifier.
    pub id: u64,
}

impl RpcRequest {
    /// Build an `execute` request for `query`.
    pub fn execute(token: impl Into<String>, query: impl Into<String>, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: EXECUTE_METHOD.to_string(),
            params: RpcParams {
                token: token.into(),
                query: query.into(),
            },
            id,
        }
    }
}

/// Raw reply of the endpoint, before any JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any response from the endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response within the configured timeout.
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout.
        seconds: u64,
    },
    /// Connection, TLS, or body read failure.
    #[error("request failed: {0}")]
    Request(String),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Sends one query request and returns the raw reply.
///
/// Implementations hold no state between calls; a non-2xx reply is still a
/// successful transport round trip and is judged by the caller.
pub trait QueryTransport {
    /// Send `request` and wait for the reply.
    fn send(&self, request: &RpcRequest) -> Result<TransportResponse, TransportError>;
}

impl<T: QueryTransport + ?Sized> QueryTransport for &T {
    fn send(&self, request: &RpcRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }
}
