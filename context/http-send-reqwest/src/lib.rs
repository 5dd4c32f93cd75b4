//! Reqwest-based HTTP client implementation for apisign.
//!
//! This crate provides `ReqwestHttpSend`, an HTTP client that implements
//! the `HttpSend` trait from `apisign_core` using the popular reqwest library.
//!
//! ## Example
//!
//! ```no_run
//! use apisign_core::Context;
//! use apisign_http_send_reqwest::ReqwestHttpSend;
//! use reqwest::Client;
//! use std::time::Duration;
//!
//! # fn main() -> anyhow::Result<()> {
//! let client = Client::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//!
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Requests that exceed the client's deadline are reported as
//! [`ErrorKind::Timeout`](apisign_core::ErrorKind::Timeout); every other
//! transport failure becomes [`ErrorKind::Unexpected`](apisign_core::ErrorKind::Unexpected)
//! with the reqwest error attached as source.

use apisign_core::{Error, HttpSend, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};

/// HTTP client implementation using reqwest.
///
/// The wrapped client is reused for every request, so connection pooling and
/// any configured timeout apply across calls.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::unexpected("failed to convert http request").with_source(e))?;
        debug!("sending {} {}", req.method(), req.url());

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(map_reqwest_error)?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(map_reqwest_error)?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout("http request timed out").with_source(err)
    } else {
        Error::unexpected("failed to send http request").with_source(err)
    }
}
