//! ZIP adapter.
//!
//! Wraps the `zip` crate behind [`ArchiveReader`]. Encrypted entries are
//! treated as corruption; no upstream font package is password protected,
//! so hitting one means the download is not what we think it is.

use crate::error::{ErrorKind, Result};
use crate::path::normalize_entry;
use crate::reader::{ArchiveReader, Entry};
use std::io::{Read, Seek};

pub struct ZipReader<R> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipReader<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(corrupt)?;
        Ok(Self { archive })
    }
}

impl<R: Read + Seek> ArchiveReader for ZipReader<R> {
    fn for_each(&mut self, visit: &mut dyn FnMut(Entry, &mut dyn Read) -> Result<()>) -> Result<()> {
        for index in 0..self.archive.len() {
            let mut entry = self.archive.by_index(index).map_err(corrupt)?;
            if entry.is_dir() || entry.is_symlink() {
                continue;
            }
            if entry.encrypted() {
                exn::bail!(ErrorKind::Corrupt(format!("encrypted entry: {}", entry.name())));
            }
            let path = normalize_entry(entry.name())?;
            visit(Entry { path }, &mut entry)?;
        }
        Ok(())
    }
}

#[track_caller]
fn corrupt(err: zip::result::ZipError) -> crate::error::Error {
    exn::Exn::from(ErrorKind::Corrupt(err.to_string()))
}
