//! Scripted in-memory [`Transport`] for tests.
//!
//! Replies are registered per `(method, url)` route and consumed in order;
//! the last reply of a route is repeated once the queue is drained. Every
//! executed request is recorded so tests can assert on what went over the
//! wire.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};

use crate::error::TransportError;
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::traits::Transport;

#[derive(Debug, Clone)]
pub enum MockReply {
    Response(HttpResponse),
    /// Simulates a failure to reach the server
    Unreachable,
}

impl From<HttpResponse> for MockReply {
    fn from(response: HttpResponse) -> Self {
        MockReply::Response(response)
    }
}

impl From<StatusCode> for MockReply {
    fn from(status: StatusCode) -> Self {
        MockReply::Response(HttpResponse::new(status))
    }
}

#[derive(Debug)]
struct Route {
    method: Method,
    url: String,
    replies: VecDeque<MockReply>,
    delay: Option<Duration>,
}

impl Route {
    fn next_reply(&mut self) -> Option<MockReply> {
        if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        }
    }
}

#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `method url`.
    pub fn reply(&self, method: Method, url: &str, reply: impl Into<MockReply>) -> &Self {
        let reply = reply.into();
        let mut routes = self.routes.lock();
        match routes
            .iter_mut()
            .find(|r| r.method == method && r.url == url)
        {
            Some(route) => route.replies.push_back(reply),
            None => routes.push(Route {
                method,
                url: url.to_string(),
                replies: VecDeque::from([reply]),
                delay: None,
            }),
        }
        self
    }

    /// Delay every reply of an already registered route.
    pub fn delay(&self, method: Method, url: &str, delay: Duration) -> &Self {
        if let Some(route) = self
            .routes
            .lock()
            .iter_mut()
            .find(|r| r.method == method && r.url == url)
        {
            route.delay = Some(delay);
        }
        self
    }

    /// All requests executed so far, in call order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Requests sent to `method url`, in call order
    pub fn requests_to(&self, method: Method, url: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }

    pub fn hits(&self, method: Method, url: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> crate::Result<HttpResponse> {
        let (reply, delay) = {
            let mut routes = self.routes.lock();
            let route = routes
                .iter_mut()
                .find(|r| r.method == request.method && r.url == request.url);
            match route {
                Some(route) => (route.next_reply(), route.delay),
                None => (None, None),
            }
        };
        let url = request.url.clone();
        self.requests.lock().push(request);

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Unreachable) | None => Err(TransportError::Unreachable(url)),
        }
    }
}
