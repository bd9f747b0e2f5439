//! Scripted transport for tests.

use crate::error::{ErrorKind, Result};
use crate::transport::{Download, Transport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Scripted response for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Deliver the body in full.
    Body(Vec<u8>),
    /// Advertise `advertised` bytes but deliver only the body, the way a
    /// dropped connection looks to the fetcher.
    Advertising { body: Vec<u8>, advertised: u64 },
    /// Answer with an HTTP error status.
    Status(u16),
    /// Simulate an expired request timeout.
    Timeout,
}

/// In-memory transport mapping URLs to scripted responses.
///
/// Unknown URLs answer 404. Every download attempt bumps a shared
/// counter, which lets tests assert that a cached archive skipped the
/// network entirely.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, MockResponse>,
    requests: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn respond(mut self, url: impl Into<String>, response: MockResponse) -> Self {
        self.responses.insert(url.into(), response);
        self
    }

    #[must_use]
    pub fn body(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.respond(url, MockResponse::Body(body.into()))
    }

    /// Number of download attempts made through this transport.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Clone of the attempt counter, for asserting after the transport
    /// has been moved into a [`TransportHandle`](crate::TransportHandle).
    pub fn request_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn download(&self, url: &str, sink: &mut (dyn AsyncWrite + Send + Unpin)) -> Result<Download> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(url) {
            None => exn::bail!(ErrorKind::Status(404)),
            Some(MockResponse::Status(status)) => exn::bail!(ErrorKind::Status(*status)),
            Some(MockResponse::Timeout) => exn::bail!(ErrorKind::Timeout),
            Some(MockResponse::Body(body)) => {
                sink.write_all(body).await.map_err(ErrorKind::io)?;
                Ok(Download { bytes: body.len() as u64, advertised: Some(body.len() as u64) })
            },
            Some(MockResponse::Advertising { body, advertised }) => {
                sink.write_all(body).await.map_err(ErrorKind::io)?;
                Ok(Download { bytes: body.len() as u64, advertised: Some(*advertised) })
            },
        }
    }
}
