use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use transport::header::COOKIE;
use transport::{BasicAuth, HttpRequest, Transport};

pub struct QBittorrentClient {
    transport: Arc<dyn Transport>,
    base_url: Arc<str>,
    auth: Option<BasicAuth>,
    sid: RwLock<Option<String>>,
    timeout: Option<Duration>,
}

impl QBittorrentClient {
    /// Create a client for the WebUI at `base_url`, e.g. `http://localhost:8080`
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        Self {
            transport,
            base_url: Arc::from(base_url),
            auth: None,
            sid: RwLock::new(None),
            timeout: None,
        }
    }

    /// Send Basic auth on API calls (for WebUIs behind a reverse proxy);
    /// ignored unless both username and password are set
    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.auth = BasicAuth::from_credentials(username, password);
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/api/v2{}", self.base_url, path)
    }

    pub(crate) fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Current `SID` cookie, if logged in
    pub fn sid(&self) -> Option<String> {
        self.sid.read().clone()
    }

    pub(crate) fn set_sid(&self, sid: String) {
        *self.sid.write() = Some(sid);
    }

    /// POST to an API path with auth, session cookie and timeout applied
    pub(crate) fn post(&self, path: &str) -> crate::Result<HttpRequest> {
        let mut request = HttpRequest::post(self.url(path))
            .basic_auth(self.auth.as_ref())?
            .timeout(self.timeout);
        if let Some(sid) = self.sid() {
            request = request.header(COOKIE.as_str(), &format!("SID={}", sid))?;
        }
        Ok(request)
    }
}
