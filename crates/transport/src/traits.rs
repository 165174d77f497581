use async_trait::async_trait;

use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::Result;

/// Issue a single HTTP request and return the complete response.
///
/// Implementations must not interpret status codes: a 403 or a 409 is a
/// successful round trip and is returned as an [`HttpResponse`]. Only failures
/// to talk to the server at all (DNS, connect, TLS, timeout) are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}
