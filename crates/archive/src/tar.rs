//! Tar adapter, covering plain, gzip and xz compressed tarballs.

use crate::error::{ErrorKind, Result};
use crate::path::normalize_entry;
use crate::reader::{ArchiveReader, Entry};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use xz2::read::XzDecoder;

pub struct TarReader<R: Read> {
    archive: tar::Archive<R>,
}

impl TarReader<File> {
    pub fn plain(file: File) -> Self {
        Self { archive: tar::Archive::new(file) }
    }
}

impl TarReader<GzDecoder<File>> {
    pub fn gzip(file: File) -> Self {
        Self { archive: tar::Archive::new(GzDecoder::new(file)) }
    }
}

impl TarReader<XzDecoder<File>> {
    pub fn xz(file: File) -> Self {
        Self { archive: tar::Archive::new(XzDecoder::new(file)) }
    }
}

impl<R: Read> ArchiveReader for TarReader<R> {
    fn for_each(&mut self, visit: &mut dyn FnMut(Entry, &mut dyn Read) -> Result<()>) -> Result<()> {
        let entries = self.archive.entries().map_err(corrupt)?;
        for entry in entries {
            let mut entry = entry.map_err(corrupt)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let raw = entry.path().map_err(corrupt)?.to_string_lossy().into_owned();
            let path = normalize_entry(&raw)?;
            visit(Entry { path }, &mut entry)?;
        }
        Ok(())
    }
}

#[track_caller]
fn corrupt(err: std::io::Error) -> crate::error::Error {
    exn::Exn::from(ErrorKind::Corrupt(err.to_string()))
}
