use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use transport::{BasicAuth, HttpRequest, HttpResponse, StatusCode, Transport, TransportError};

use crate::error::TransmissionError;
use crate::models::{RpcRequest, RpcResponse};
use crate::session::{SessionStore, SESSION_ID_HEADER};

/// Progress of the session-token handshake within one RPC call.
///
/// There is no transition out of `Refreshed` other than returning, so a
/// call is retried at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handshake {
    /// First attempt with whatever token is cached
    Initial,
    /// Retried with a token the daemon just issued
    Refreshed,
}

pub struct TransmissionClient {
    transport: Arc<dyn Transport>,
    rpc_url: Arc<str>,
    auth: Option<BasicAuth>,
    session: Arc<SessionStore>,
    timeout: Option<Duration>,
}

impl TransmissionClient {
    /// Create a client for the RPC endpoint, e.g.
    /// `http://localhost:9091/transmission/rpc`
    pub fn new(transport: Arc<dyn Transport>, rpc_url: impl Into<String>) -> Self {
        let rpc_url: String = rpc_url.into();
        Self {
            transport,
            rpc_url: Arc::from(rpc_url),
            auth: None,
            session: Arc::new(SessionStore::new()),
            timeout: None,
        }
    }

    /// Use Basic auth; ignored unless both username and password are set
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.auth = BasicAuth::from_credentials(username, password);
        self
    }

    /// Share a session token cache with other clients of the same daemon
    pub fn with_session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = session;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn build_request(&self, body: serde_json::Value) -> crate::Result<HttpRequest> {
        let mut request = HttpRequest::post(self.rpc_url.as_ref())
            .basic_auth(self.auth.as_ref())?
            .json(body)
            .timeout(self.timeout);
        if let Some(token) = self.session.get() {
            request = request.header(SESSION_ID_HEADER, &token)?;
        }
        Ok(request)
    }

    /// Perform one RPC call, handling the `409 Conflict` token handshake.
    ///
    /// Returns the whole response body when `result` is `"success"`.
    pub(crate) async fn call<T: Serialize>(
        &self,
        method: &str,
        arguments: T,
    ) -> crate::Result<serde_json::Value> {
        let body = serde_json::to_value(RpcRequest { method, arguments })
            .map_err(TransportError::from)?;

        let mut state = Handshake::Initial;
        loop {
            let request = self.build_request(body.clone())?;
            let response = self.transport.execute(request).await?;

            if response.status != StatusCode::CONFLICT {
                return parse_response(response);
            }

            let token = response
                .header(SESSION_ID_HEADER)
                .filter(|token| !token.is_empty());
            state = match (state, token) {
                (Handshake::Initial, Some(token)) => {
                    tracing::debug!("Transmission session token refreshed, retrying {}", method);
                    self.session.replace(token);
                    Handshake::Refreshed
                }
                _ => {
                    return Err(TransmissionError::Request {
                        status: response.status.as_u16(),
                    })
                }
            };
        }
    }
}

fn parse_response(response: HttpResponse) -> crate::Result<serde_json::Value> {
    if !response.is_success() {
        return Err(TransmissionError::Request {
            status: response.status.as_u16(),
        });
    }

    let body: serde_json::Value = response.json()?;
    let rpc: RpcResponse =
        serde_json::from_value(body.clone()).map_err(|e| TransmissionError::Protocol {
            message: format!("malformed response: {}", e),
        })?;

    if rpc.result != "success" {
        return Err(TransmissionError::Protocol {
            message: rpc.result,
        });
    }
    Ok(body)
}
