use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::transport::{QueryTransport, RpcRequest, TransportError, TransportResponse};

/// Posts JSON-RPC requests to a fixed endpoint with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for `endpoint`; every request gives up after `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Use a preconfigured client; `timeout` is only reported in errors.
    pub fn with_client(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    fn map_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

impl QueryTransport for HttpTransport {
    fn send(&self, request: &RpcRequest) -> Result<TransportResponse, TransportError> {
        debug!(
            endpoint = %self.endpoint,
            method = %request.method,
            id = request.id,
            "sending query"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| self.map_error(e))?;
        debug!(status, bytes = body.len(), "received response");

        Ok(TransportResponse { status, body })
    }
}
