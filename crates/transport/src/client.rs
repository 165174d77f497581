use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

use crate::error::TransportError;
use crate::request::{Body, FormPart, HttpRequest, MultipartForm};
use crate::response::HttpResponse;
use crate::traits::Transport;

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with cookie support and sane connection limits.
    pub fn new() -> crate::Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing client (should have `cookie_store` enabled)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn into_form(form: MultipartForm) -> crate::Result<Form> {
    form.parts()
        .iter()
        .cloned()
        .try_fold(Form::new(), |form, part| match part {
            FormPart::Text { name, value } => Ok(form.text(name, value)),
            FormPart::File {
                name,
                file_name,
                content,
            } => {
                let part = Part::bytes(content.to_vec())
                    .file_name(file_name)
                    .mime_str("application/x-bittorrent")
                    .map_err(TransportError::Request)?;
                Ok(form.part(name, part))
            }
        })
}

/// Host and path only, so credentials in the userinfo never reach the logs
fn log_target(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or_default(), url.path())
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> crate::Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            timeout,
        } = request;

        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Form(fields) => builder.form(&fields),
            Body::Multipart(form) => builder.multipart(into_form(form)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        tracing::trace!("{} -> {}", log_target(response.url()), status);
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
