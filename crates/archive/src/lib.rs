//! Unpacking upstream font archives.
//!
//! This crate turns a downloaded archive into a flat set of font files in
//! a scratch workspace:
//!
//! - **Format detection** from magic bytes ([`ArchiveFormat::from_magic_bytes`])
//!   or file names ([`ArchiveFormat::from_path`])
//! - **One adapter per container format** behind the [`ArchiveReader`]
//!   capability trait (list entries, stream entry bytes)
//! - **Extraction** via [`extract_fonts`]: font payloads only, normalized
//!   relative paths, wrapper directories stripped, nested archives
//!   descended into
//!
//! Everything here is synchronous; the pipeline runs it on a blocking
//! task. Zip, plain tar, gzip tar and xz tar are supported.

pub mod error;
mod extract;
mod format;
mod path;
mod reader;
mod tar;
mod zip;

pub use crate::extract::{ExtractedEntry, FONT_EXTENSIONS, extract_fonts, is_font_path};
pub use crate::format::ArchiveFormat;
pub use crate::reader::{ArchiveReader, Entry, open};
