use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use transmission::SessionStore;
use transport::Transport;

use crate::client::AdapterClient;
use crate::config::ConfigProvider;
use crate::error::SendError;
use crate::models::{AddRequest, AdapterOutcome, BackendFailure, SendResult, TorrentReference};
use crate::payload::PayloadFetcher;
use crate::traits::Adapter;

/// Sends a torrent to every enabled client.
pub struct Dispatcher {
    config: Arc<dyn ConfigProvider>,
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(config: Arc<dyn ConfigProvider>, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            session: Arc::new(SessionStore::new()),
            timeout: None,
        }
    }

    /// Use an existing Transmission session cache
    pub fn with_session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = session;
        self
    }

    /// Per-request timeout applied to every HTTP call of a send
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send `reference` to all enabled clients.
    ///
    /// Fails early, before any client is contacted, when no client is
    /// enabled, the reference is not a URI, or a requested download fails.
    /// Otherwise every enabled client is tried and the result of the
    /// earliest configured one that succeeded is returned.
    pub async fn send(&self, reference: &str) -> crate::Result<SendResult> {
        let options = self.config.snapshot();

        let adapters: Vec<AdapterClient> = options
            .enabled_backends()
            .map(|(kind, config)| {
                AdapterClient::from_config(
                    kind,
                    config,
                    self.transport.clone(),
                    self.session.clone(),
                    self.timeout,
                )
            })
            .collect();
        if adapters.is_empty() {
            return Err(SendError::NoBackendsEnabled);
        }

        let reference = TorrentReference::parse(reference)?;

        let payload = PayloadFetcher::new(self.transport.clone())
            .timeout(self.timeout)
            .fetch(&reference, options.global.upload_file)
            .await?;

        let request = AddRequest {
            reference: &reference,
            payload: payload.as_ref(),
            add_paused: options.global.add_paused,
        };

        tracing::debug!(
            "Sending torrent to {} client(s){}",
            adapters.len(),
            if payload.is_some() { " as file" } else { "" }
        );

        reduce(fan_out(&adapters, &request).await)
    }
}

/// Run every adapter concurrently and wait for all of them.
///
/// Outcomes are returned in the order of `adapters`, not completion order.
pub(crate) async fn fan_out<A: Adapter>(
    adapters: &[A],
    request: &AddRequest<'_>,
) -> Vec<AdapterOutcome> {
    join_all(adapters.iter().map(|adapter| invoke(adapter, request))).await
}

async fn invoke<A: Adapter>(adapter: &A, request: &AddRequest<'_>) -> AdapterOutcome {
    AdapterOutcome {
        backend: adapter.kind(),
        result: adapter.add_torrent(request).await,
    }
}

/// First success in configuration order, else every failure in order.
pub(crate) fn reduce(outcomes: Vec<AdapterOutcome>) -> crate::Result<SendResult> {
    let mut failures = Vec::with_capacity(outcomes.len());
    let mut winner = None;

    for outcome in outcomes {
        match outcome.result {
            Ok(body) => {
                if winner.is_none() {
                    winner = Some(SendResult {
                        backend: outcome.backend,
                        body,
                    });
                }
            }
            Err(e) => {
                tracing::warn!("Failed to send torrent to {}: {}", outcome.backend, e);
                failures.push(BackendFailure {
                    backend: outcome.backend,
                    message: e.to_string(),
                });
            }
        }
    }

    match winner {
        Some(result) => {
            tracing::info!("Torrent sent to {}", result.backend);
            Ok(result)
        }
        None => Err(SendError::AllBackendsFailed(failures)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::time::Instant;
    use transport::mock::MockTransport;
    use transport::{Body, HttpResponse, Method, StatusCode};

    use super::*;
    use crate::config::{BackendConfig, DispatchOptions, GlobalOptions};
    use crate::error::BackendError;
    use crate::models::BackendKind;

    const TR_RPC: &str = "http://tr:9091/transmission/rpc";
    const QB_ADD: &str = "http://qb:8080/api/v2/torrents/add";
    const QB_LOGIN: &str = "http://qb:8080/api/v2/auth/login";
    const TORRENT: &str = "https://tracker.example/ubuntu.torrent";
    const MAGNET: &str = "magnet:?xt=urn:btih:0123456789abcdef";
    const SESSION_HEADER: &str = "X-Transmission-Session-Id";

    fn tr_success() -> HttpResponse {
        HttpResponse::new(StatusCode::OK).with_json(&json!({
            "result": "success",
            "arguments": {"torrent-added": {"id": 1, "name": "ubuntu", "hashString": "abc"}}
        }))
    }

    fn options(global: GlobalOptions, order: &[BackendKind]) -> DispatchOptions {
        order.iter().fold(DispatchOptions::new(global), |options, kind| {
            let config = match kind {
                BackendKind::Transmission => BackendConfig::new(TR_RPC),
                BackendKind::QBittorrent => {
                    BackendConfig::new("http://qb:8080").credentials("admin", "adminadmin")
                }
            };
            options.backend(*kind, config)
        })
    }

    fn both() -> [BackendKind; 2] {
        [BackendKind::Transmission, BackendKind::QBittorrent]
    }

    fn dispatcher(options: DispatchOptions, mock: &Arc<MockTransport>) -> Dispatcher {
        Dispatcher::new(Arc::new(options), mock.clone())
    }

    fn upload_file() -> GlobalOptions {
        GlobalOptions {
            add_paused: false,
            upload_file: true,
        }
    }

    #[tokio::test]
    async fn test_no_enabled_backends_makes_no_calls() {
        let mock = Arc::new(MockTransport::new());
        let mut options = options(upload_file(), &both());
        for (_, config) in options.backends.iter_mut() {
            config.enabled = false;
        }

        let err = dispatcher(options, &mock).send(TORRENT).await.unwrap_err();

        assert!(matches!(err, SendError::NoBackendsEnabled));
        assert_eq!(mock.total_hits(), 0);
    }

    #[tokio::test]
    async fn test_invalid_reference_makes_no_calls() {
        let mock = Arc::new(MockTransport::new());
        let err = dispatcher(options(upload_file(), &both()), &mock)
            .send("not a uri")
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::InvalidReference(_)));
        assert_eq!(mock.total_hits(), 0);
    }

    #[tokio::test]
    async fn test_payload_downloaded_once_for_all_backends() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(
            Method::GET,
            TORRENT,
            HttpResponse::new(StatusCode::OK).with_body(&b"d4:infoe"[..]),
        );
        mock.reply(Method::POST, TR_RPC, tr_success());
        mock.reply(Method::POST, QB_ADD, StatusCode::OK);

        dispatcher(options(upload_file(), &both()), &mock)
            .send(TORRENT)
            .await
            .unwrap();

        assert_eq!(mock.hits(Method::GET, TORRENT), 1);

        let tr = mock.requests_to(Method::POST, TR_RPC);
        let Body::Json(body) = &tr[0].body else {
            panic!("expected json body");
        };
        assert_eq!(body["arguments"]["metainfo"], "ZDQ6aW5mb2U=");
        assert!(body["arguments"].get("filename").is_none());

        let qb = mock.requests_to(Method::POST, QB_ADD);
        let Body::Multipart(form) = &qb[0].body else {
            panic!("expected multipart body");
        };
        assert!(form.get("torrents").is_some());
        assert!(form.get("urls").is_none());
    }

    #[tokio::test]
    async fn test_magnet_is_passed_by_reference() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(Method::POST, TR_RPC, tr_success());
        mock.reply(Method::POST, QB_ADD, StatusCode::OK);

        dispatcher(options(upload_file(), &both()), &mock)
            .send(MAGNET)
            .await
            .unwrap();

        assert_eq!(mock.total_hits(), 2);

        let tr = mock.requests_to(Method::POST, TR_RPC);
        let Body::Json(body) = &tr[0].body else {
            panic!("expected json body");
        };
        assert_eq!(body["arguments"]["filename"], MAGNET);

        let qb = mock.requests_to(Method::POST, QB_ADD);
        let Body::Multipart(form) = &qb[0].body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.text_value("urls"), Some(MAGNET));
    }

    #[tokio::test]
    async fn test_download_failure_aborts_before_backends() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(Method::GET, TORRENT, StatusCode::NOT_FOUND);
        mock.reply(Method::POST, TR_RPC, tr_success());

        let err = dispatcher(options(upload_file(), &both()), &mock)
            .send(TORRENT)
            .await
            .unwrap_err();

        assert!(matches!(err, SendError::Download(_)));
        assert_eq!(mock.total_hits(), 1);
    }

    #[tokio::test]
    async fn test_each_send_downloads_again() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(
            Method::GET,
            TORRENT,
            HttpResponse::new(StatusCode::OK).with_body(&b"d4:infoe"[..]),
        );
        mock.reply(Method::POST, TR_RPC, tr_success());

        let dispatcher = dispatcher(options(upload_file(), &[BackendKind::Transmission]), &mock);
        dispatcher.send(TORRENT).await.unwrap();
        dispatcher.send(TORRENT).await.unwrap();

        assert_eq!(mock.hits(Method::GET, TORRENT), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_earliest_configured_success_wins_over_faster() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(Method::POST, TR_RPC, tr_success());
        mock.delay(Method::POST, TR_RPC, Duration::from_secs(5));
        mock.reply(Method::POST, QB_ADD, StatusCode::OK);

        let started = Instant::now();
        let result = dispatcher(options(GlobalOptions::default(), &both()), &mock)
            .send(MAGNET)
            .await
            .unwrap();

        assert_eq!(result.backend, BackendKind::Transmission);
        assert_eq!(result.body.unwrap()["result"], "success");
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_configuration_order_decides_winner() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(Method::POST, TR_RPC, tr_success());
        mock.reply(Method::POST, QB_ADD, StatusCode::OK);
        mock.delay(Method::POST, QB_ADD, Duration::from_secs(5));

        let order = [BackendKind::QBittorrent, BackendKind::Transmission];
        let result = dispatcher(options(GlobalOptions::default(), &order), &mock)
            .send(MAGNET)
            .await
            .unwrap();

        assert_eq!(result.backend, BackendKind::QBittorrent);
        assert!(result.body.is_none());
    }

    #[tokio::test]
    async fn test_failed_backend_does_not_hide_later_success() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(Method::POST, TR_RPC, StatusCode::INTERNAL_SERVER_ERROR);
        mock.reply(Method::POST, QB_ADD, StatusCode::OK);

        let result = dispatcher(options(GlobalOptions::default(), &both()), &mock)
            .send(MAGNET)
            .await
            .unwrap();

        assert_eq!(result.backend, BackendKind::QBittorrent);
    }

    #[tokio::test]
    async fn test_all_backends_failed_lists_every_backend_in_order() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(Method::POST, TR_RPC, StatusCode::UNAUTHORIZED);
        mock.reply(Method::POST, QB_ADD, StatusCode::FORBIDDEN);
        mock.reply(
            Method::POST,
            QB_LOGIN,
            HttpResponse::new(StatusCode::OK).with_body("Fails."),
        );

        let err = dispatcher(options(GlobalOptions::default(), &both()), &mock)
            .send(MAGNET)
            .await
            .unwrap_err();

        let failures = err.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].backend, BackendKind::Transmission);
        assert_eq!(failures[0].message, "request error: 401");
        assert_eq!(failures[1].backend, BackendKind::QBittorrent);
        assert_eq!(
            failures[1].message,
            "failed to authorize: Invalid username or password"
        );
        assert_eq!(
            err.to_string(),
            "all enabled clients failed: Transmission: request error: 401, \
             qBittorrent: failed to authorize: Invalid username or password"
        );
    }

    #[tokio::test]
    async fn test_session_token_survives_across_sends() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(
            Method::POST,
            TR_RPC,
            HttpResponse::new(StatusCode::CONFLICT).with_header(SESSION_HEADER, "tok"),
        )
        .reply(Method::POST, TR_RPC, tr_success());

        let dispatcher =
            dispatcher(options(GlobalOptions::default(), &[BackendKind::Transmission]), &mock);
        dispatcher.send(MAGNET).await.unwrap();
        dispatcher.send(MAGNET).await.unwrap();

        let requests = mock.requests_to(Method::POST, TR_RPC);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].header_str(SESSION_HEADER), Some("tok"));
        assert_eq!(dispatcher.session().get().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_stale_seeded_token_is_replaced() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(
            Method::POST,
            TR_RPC,
            HttpResponse::new(StatusCode::CONFLICT).with_header(SESSION_HEADER, "fresh"),
        )
        .reply(Method::POST, TR_RPC, tr_success());

        let session = Arc::new(SessionStore::with_token("stale"));
        let dispatcher =
            dispatcher(options(GlobalOptions::default(), &[BackendKind::Transmission]), &mock)
                .with_session(session.clone());
        let result = dispatcher.send(MAGNET).await.unwrap();

        assert_eq!(result.backend, BackendKind::Transmission);
        let requests = mock.requests_to(Method::POST, TR_RPC);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].header_str(SESSION_HEADER), Some("stale"));
        assert_eq!(requests[1].header_str(SESSION_HEADER), Some("fresh"));
        assert_eq!(session.get().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_add_paused_reaches_every_backend() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(Method::POST, TR_RPC, tr_success());
        mock.reply(Method::POST, QB_ADD, StatusCode::OK);
        let global = GlobalOptions {
            add_paused: true,
            upload_file: false,
        };

        dispatcher(options(global, &both()), &mock)
            .send(TORRENT)
            .await
            .unwrap();

        assert_eq!(mock.hits(Method::GET, TORRENT), 0);
        let tr = mock.requests_to(Method::POST, TR_RPC);
        let Body::Json(body) = &tr[0].body else {
            panic!("expected json body");
        };
        assert_eq!(body["arguments"]["paused"], true);
        assert_eq!(body["arguments"]["filename"], TORRENT);
        let qb = mock.requests_to(Method::POST, QB_ADD);
        let Body::Multipart(form) = &qb[0].body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.text_value("paused"), Some("true"));
    }

    struct FakeAdapter {
        kind: BackendKind,
        delay: Duration,
        result: Result<Option<serde_json::Value>, u16>,
    }

    #[async_trait]
    impl Adapter for FakeAdapter {
        fn kind(&self) -> BackendKind {
            self.kind
        }

        async fn add_torrent(
            &self,
            _request: &AddRequest<'_>,
        ) -> Result<Option<serde_json::Value>, BackendError> {
            tokio::time::sleep(self.delay).await;
            self.result
                .clone()
                .map_err(|status| BackendError::Request { status })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_runs_concurrently_and_keeps_order() {
        let adapters = [
            FakeAdapter {
                kind: BackendKind::Transmission,
                delay: Duration::from_secs(3),
                result: Ok(Some(json!({"from": "slow"}))),
            },
            FakeAdapter {
                kind: BackendKind::QBittorrent,
                delay: Duration::from_secs(1),
                result: Ok(None),
            },
        ];
        let reference = TorrentReference::parse(MAGNET).unwrap();
        let request = AddRequest {
            reference: &reference,
            payload: None,
            add_paused: false,
        };

        let started = Instant::now();
        let outcomes = fan_out(&adapters, &request).await;

        // both ran at the same time
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(outcomes[0].backend, BackendKind::Transmission);
        assert_eq!(outcomes[1].backend, BackendKind::QBittorrent);

        let result = reduce(outcomes).unwrap();
        assert_eq!(result.body, Some(json!({"from": "slow"})));
    }

    #[tokio::test]
    async fn test_reduce_skips_failures_before_success() {
        let outcomes = vec![
            AdapterOutcome {
                backend: BackendKind::Transmission,
                result: Err(BackendError::Request { status: 500 }),
            },
            AdapterOutcome {
                backend: BackendKind::QBittorrent,
                result: Ok(None),
            },
        ];

        let result = reduce(outcomes).unwrap();
        assert_eq!(result.backend, BackendKind::QBittorrent);
    }
}
