//! Download transports.
//!
//! The pipeline talks to upstreams through the [`Transport`] trait so the
//! fetch logic can be exercised without touching the network. The real
//! implementation is [`HttpTransport`]; a scripted one lives behind the
//! `mock` feature.

use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// What a completed transfer looked like from the transport's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Download {
    /// Bytes actually written to the sink.
    pub bytes: u64,
    /// Content length advertised by the server, if any.
    pub advertised: Option<u64>,
}

/// Byte-stream download capability.
#[async_trait]
pub trait Transport {
    /// Stream the body at `url` into `sink`.
    ///
    /// Implementations handle transport-level failure (status codes,
    /// timeouts, connection errors) and leave payload verification to
    /// the caller.
    async fn download(&self, url: &str, sink: &mut (dyn AsyncWrite + Send + Unpin)) -> Result<Download>;
}

/// Shared handle to a transport implementation.
pub type TransportHandle = Arc<dyn Transport + Send + Sync>;

/// HTTP(S) transport over a pooled reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Connect timeout, independent of the per-request total.
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Build a transport whose requests abort after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Self::CONNECT_TIMEOUT.min(timeout))
            .user_agent(concat!("fontpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| exn::Exn::from(ErrorKind::Network(err.to_string())))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn download(&self, url: &str, sink: &mut (dyn AsyncWrite + Send + Unpin)) -> Result<Download> {
        let response = self.client.get(url).send().await.map_err(map_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let advertised = response.content_length();

        let mut response = response;
        let mut bytes = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest)? {
            sink.write_all(&chunk).await.map_err(ErrorKind::io)?;
            bytes += chunk.len() as u64;
        }
        sink.flush().await.map_err(ErrorKind::io)?;
        Ok(Download { bytes, advertised })
    }
}

#[track_caller]
fn map_reqwest(err: reqwest::Error) -> crate::error::Error {
    let kind = if err.is_timeout() {
        ErrorKind::Timeout
    } else if let Some(status) = err.status() {
        ErrorKind::Status(status.as_u16())
    } else {
        ErrorKind::Network(err.to_string())
    };
    exn::Exn::from(kind)
}
