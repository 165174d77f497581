use transport::header::SET_COOKIE;
use transport::HttpRequest;

use crate::client::QBittorrentClient;
use crate::error::QBittorrentError;

/// Extract the `SID` value from a `Set-Cookie` header
fn parse_sid(set_cookie: &str) -> Option<&str> {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.trim().strip_prefix("SID="))
        .filter(|sid| !sid.is_empty())
}

impl QBittorrentClient {
    /// Login to qBittorrent WebUI
    /// POST /api/v2/auth/login
    pub async fn login(&self, username: &str, password: &str) -> crate::Result<()> {
        let request = HttpRequest::post(self.url("/auth/login"))
            .form(&[("username", username), ("password", password)])
            .timeout(self.request_timeout());

        let response = self.transport().execute(request).await?;

        let status = response.status;
        let body = response.text();

        if !status.is_success() {
            return Err(QBittorrentError::Auth(format!(
                "Login failed: {} - {}",
                status.as_u16(),
                body
            )));
        }
        if body == "Fails." {
            return Err(QBittorrentError::Auth("Invalid username or password".into()));
        }

        if let Some(sid) = response.header_all(SET_COOKIE.as_str()).find_map(parse_sid) {
            self.set_sid(sid.to_string());
        }

        tracing::debug!("Successfully logged in to qBittorrent");
        Ok(())
    }
}
