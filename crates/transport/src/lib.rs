//! Minimal HTTP transport abstraction.
//!
//! Every network call made by the torrent clients and the dispatcher goes
//! through [`Transport`]. Production code uses [`ReqwestTransport`]; tests
//! script responses with `mock::MockTransport` (feature `mock`).

mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod request;
mod response;
mod traits;

pub use client::ReqwestTransport;
pub use error::TransportError;
pub use request::{BasicAuth, Body, FormPart, HttpRequest, MultipartForm};
pub use response::HttpResponse;
pub use traits::Transport;

pub use reqwest::header;
pub use reqwest::{Method, StatusCode};

pub type Result<T> = std::result::Result<T, TransportError>;
