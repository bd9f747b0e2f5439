//! Verified, cached downloads of upstream font archives.
//!
//! A build is all-or-nothing, so this crate is strict about what counts
//! as a successful fetch: the right status, the advertised number of
//! bytes, at least the configured minimum size, and (when pinned) the
//! right checksum. Anything less aborts the run before extraction ever
//! starts.
//!
//! The cache directory persists across runs. Entries are published with
//! an atomic rename, which doubles as the per-archive lock: no reader
//! can ever observe a half-written download.

pub mod error;
mod fetch;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod transport;

pub use crate::fetch::{Expected, Fetched, fetch_archive};
pub use crate::transport::{Download, HttpTransport, Transport, TransportHandle};
