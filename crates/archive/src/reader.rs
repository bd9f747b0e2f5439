//! Format adapters behind a common reader interface.
//!
//! Extraction needs exactly two capabilities from a container: enumerate
//! its file entries and stream each entry's bytes. Every format
//! implements those behind [`ArchiveReader`], so the pipeline never
//! branches on format outside this crate.

use crate::error::{ErrorKind, Result};
use crate::format::ArchiveFormat;
use crate::tar::TarReader;
use crate::zip::ZipReader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// A single file entry inside an archive.
pub struct Entry {
    /// Normalized path relative to the archive root.
    pub path: PathBuf,
}

/// Stream-visit every file entry of a container.
///
/// Entries are handed to a callback rather than returned as an iterator
/// because zip entries borrow their archive; the callback shape works for
/// both seekable (zip) and sequential (tar) containers.
pub trait ArchiveReader {
    /// Visit each file entry in archive order with a reader over its
    /// bytes. Directories and symlinks are skipped by the adapter.
    fn for_each(&mut self, visit: &mut dyn FnMut(Entry, &mut dyn Read) -> Result<()>) -> Result<()>;
}

/// Open an archive with the right adapter for its format.
///
/// Magic bytes decide; the file name is only consulted when the content
/// is inconclusive (plain tar keeps its magic 257 bytes in, so an
/// unlucky short file can only be identified by name).
pub fn open(path: &Path) -> Result<Box<dyn ArchiveReader>> {
    let mut head = [0u8; 512];
    let mut file = File::open(path).map_err(ErrorKind::io)?;
    let filled = read_head(&mut file, &mut head)?;
    let format = ArchiveFormat::from_magic_bytes(&head[..filled])
        .or_else(|| ArchiveFormat::from_path(path))
        .ok_or_else(|| exn::Exn::from(ErrorKind::UnsupportedFormat(path.display().to_string())))?;
    tracing::debug!(archive = %path.display(), %format, "opening archive");

    let file = File::open(path).map_err(ErrorKind::io)?;
    Ok(match format {
        ArchiveFormat::Zip => Box::new(ZipReader::new(BufReader::new(file))?),
        ArchiveFormat::Tar => Box::new(TarReader::plain(file)),
        ArchiveFormat::TarGz => Box::new(TarReader::gzip(file)),
        ArchiveFormat::TarXz => Box::new(TarReader::xz(file)),
    })
}

fn read_head(file: &mut File, buffer: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match file.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {},
            Err(err) => return Err(ErrorKind::io(err)),
        }
    }
    Ok(filled)
}
