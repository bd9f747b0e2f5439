//! Cached, verified archive downloads.
//!
//! Downloads land in a temp file next to their final cache location and
//! are renamed into place only after verification, so a half-written
//! file is never served from cache and concurrent fetchers cannot
//! observe partial state. A cached copy that still verifies is reused
//! without touching the network.

use crate::error::{ErrorKind, Result};
use crate::transport::{Download, TransportHandle};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Verification expectations for one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expected {
    /// Reject transfers smaller than this many bytes.
    pub min_size: u64,
    /// Pinned BLAKE3 hex digest, when the upstream artifact is versioned.
    pub checksum: Option<String>,
}

/// Outcome of [`fetch_archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Verified file in the cache directory.
    pub path: PathBuf,
    /// Size of the cached file in bytes.
    pub bytes: u64,
    /// Whether a previously cached copy was reused.
    pub reused: bool,
}

/// Ensure a verified local copy of `url` exists at `dest`.
#[instrument(skip(transport, expected))]
pub async fn fetch_archive(
    transport: &TransportHandle,
    url: &str,
    dest: &Path,
    expected: &Expected,
) -> Result<Fetched> {
    if let Some(bytes) = verify_cached(dest, expected).await? {
        debug!(path = %dest.display(), "reusing verified cache entry");
        return Ok(Fetched { path: dest.to_path_buf(), bytes, reused: true });
    }

    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => exn::bail!(ErrorKind::Io(format!("cache path has no parent directory: {}", dest.display()))),
    };
    tokio::fs::create_dir_all(parent).await.map_err(ErrorKind::io)?;

    let temp = tempfile::Builder::new().prefix(".fetch-").tempfile_in(parent).map_err(ErrorKind::io)?;
    let clone = temp.as_file().try_clone().map_err(ErrorKind::io)?;
    let mut sink = tokio::fs::File::from_std(clone);
    let download = transport.download(url, &mut sink).await?;
    sink.sync_all().await.map_err(ErrorKind::io)?;
    drop(sink);

    verify_download(&download, expected)?;
    verify_checksum(temp.path(), expected).await?;

    // Atomic publish; readers only ever see a fully verified file.
    temp.persist(dest).map_err(|err| exn::Exn::from(ErrorKind::Io(err.error.to_string())))?;
    debug!(path = %dest.display(), bytes = download.bytes, "archive cached");
    Ok(Fetched { path: dest.to_path_buf(), bytes: download.bytes, reused: false })
}

fn verify_download(download: &Download, expected: &Expected) -> Result<()> {
    if let Some(advertised) = download.advertised
        && advertised != download.bytes
    {
        exn::bail!(ErrorKind::Truncated { expected: advertised, actual: download.bytes });
    }
    if download.bytes < expected.min_size {
        exn::bail!(ErrorKind::TooSmall { minimum: expected.min_size, actual: download.bytes });
    }
    Ok(())
}

async fn verify_checksum(path: &Path, expected: &Expected) -> Result<()> {
    let Some(checksum) = &expected.checksum else { return Ok(()) };
    let actual = hash_file(path).await?;
    if !actual.eq_ignore_ascii_case(checksum) {
        exn::bail!(ErrorKind::Integrity { expected: checksum.clone(), actual });
    }
    Ok(())
}

async fn hash_file(path: &Path) -> Result<String> {
    let data = tokio::fs::read(path).await.map_err(ErrorKind::io)?;
    Ok(blake3::hash(&data).to_string())
}

/// `Some(size)` when the cached copy exists and passes verification.
///
/// A stale or undersized cache entry counts as absent so the caller
/// re-downloads; it never fails the build on its own.
async fn verify_cached(dest: &Path, expected: &Expected) -> Result<Option<u64>> {
    let metadata = match tokio::fs::metadata(dest).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ErrorKind::io(err)),
    };
    if !metadata.is_file() {
        exn::bail!(ErrorKind::Io(format!("cache path is not a file: {}", dest.display())));
    }
    if metadata.len() < expected.min_size.max(1) {
        return Ok(None);
    }
    if let Some(checksum) = &expected.checksum {
        let actual = hash_file(dest).await?;
        if !actual.eq_ignore_ascii_case(checksum) {
            return Ok(None);
        }
    }
    Ok(Some(metadata.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockResponse, MockTransport};
    use std::sync::Arc;

    const URL: &str = "https://fonts.test/pack.zip";
    const BODY: &[u8] = b"a perfectly plausible archive";

    fn handle(transport: MockTransport) -> TransportHandle {
        Arc::new(transport)
    }

    #[tokio::test]
    async fn test_download_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        let transport = handle(MockTransport::new().body(URL, BODY));

        let fetched = fetch_archive(&transport, URL, &dest, &Expected::default()).await.unwrap();
        assert!(!fetched.reused);
        assert_eq!(fetched.bytes, BODY.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), BODY);
    }

    #[tokio::test]
    async fn test_cache_reused_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        let transport = MockTransport::new().body(URL, BODY);
        let requests = transport.request_counter();
        let transport = handle(transport);

        let first = fetch_archive(&transport, URL, &dest, &Expected::default()).await.unwrap();
        let second = fetch_archive(&transport, URL, &dest, &Expected::default()).await.unwrap();
        assert!(!first.reused);
        assert!(second.reused);
        assert_eq!(second.bytes, BODY.len() as u64);
        assert_eq!(requests.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_truncated_transfer_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        let transport = handle(MockTransport::new().respond(
            URL,
            MockResponse::Advertising { body: BODY.to_vec(), advertised: BODY.len() as u64 + 100 },
        ));

        let err = fetch_archive(&transport, URL, &dest, &Expected::default()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Truncated { .. }));
        // The partial download never reached the cache.
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_undersized_transfer_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        let transport = handle(MockTransport::new().body(URL, BODY));
        let expected = Expected { min_size: 1024 * 1024, checksum: None };

        let err = fetch_archive(&transport, URL, &dest, &expected).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::TooSmall { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_checksum_verified() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        let transport = handle(MockTransport::new().body(URL, BODY));
        let expected = Expected { min_size: 0, checksum: Some(blake3::hash(BODY).to_string()) };

        let fetched = fetch_archive(&transport, URL, &dest, &expected).await.unwrap();
        assert!(!fetched.reused);
    }

    #[tokio::test]
    async fn test_checksum_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        let transport = handle(MockTransport::new().body(URL, BODY));
        let expected = Expected { min_size: 0, checksum: Some(blake3::hash(b"other").to_string()) };

        let err = fetch_archive(&transport, URL, &dest, &expected).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Integrity { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_stale_cache_redownloaded() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        std::fs::write(&dest, b"junk").unwrap();
        let transport = handle(MockTransport::new().body(URL, BODY));
        let expected = Expected { min_size: BODY.len() as u64, checksum: None };

        let fetched = fetch_archive(&transport, URL, &dest, &expected).await.unwrap();
        assert!(!fetched.reused);
        assert_eq!(std::fs::read(&dest).unwrap(), BODY);
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        let transport = handle(MockTransport::new().respond(URL, MockResponse::Status(500)));

        let err = fetch_archive(&transport, URL, &dest, &Expected::default()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Status(500)));
    }

    #[tokio::test]
    async fn test_timeout_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("pack.zip");
        let transport = handle(MockTransport::new().respond(URL, MockResponse::Timeout));

        let err = fetch_archive(&transport, URL, &dest, &Expected::default()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Timeout));
    }
}
