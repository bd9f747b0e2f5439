//! Archive format detection.

use derive_more::Display;
use std::path::Path;

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
const XZ_MAGIC: [u8; 6] = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const TAR_MAGIC: [u8; 5] = *b"ustar";
const TAR_MAGIC_OFFSET: usize = 257;

/// A supported archive container format.
///
/// Gzip and xz compressed tarballs are distinct variants so a reader can
/// be constructed without sniffing the stream twice.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// ZIP container (.zip)
    #[display("zip")]
    Zip,
    /// Plain tarball (.tar)
    #[display("tar")]
    Tar,
    /// Gzip compressed tarball (.tar.gz, .tgz)
    #[display("tar.gz")]
    TarGz,
    /// XZ compressed tarball (.tar.xz, .txz)
    #[display("tar.xz")]
    TarXz,
}

impl ArchiveFormat {
    /// Detect the archive format from a file name.
    ///
    /// Compound extensions are checked before single ones, so
    /// `fonts.tar.gz` is a gzipped tarball and never a bare `.gz`.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?.to_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Some(Self::TarXz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Detect the archive format from magic bytes.
    ///
    /// Gzip and xz streams are assumed to wrap a tarball; that is the
    /// only use either has as an upstream font archive. Plain tar keeps
    /// its magic at offset 257, so short buffers cannot identify it.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&ZIP_MAGIC) {
            return Some(Self::Zip);
        }
        if bytes.starts_with(&GZIP_MAGIC) {
            return Some(Self::TarGz);
        }
        if bytes.starts_with(&XZ_MAGIC) {
            return Some(Self::TarXz);
        }
        if bytes.len() >= TAR_MAGIC_OFFSET + TAR_MAGIC.len()
            && bytes[TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()] == TAR_MAGIC
        {
            return Some(Self::Tar);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fonts.zip", Some(ArchiveFormat::Zip))]
    #[case("FONTS.ZIP", Some(ArchiveFormat::Zip))]
    #[case("fonts.tar", Some(ArchiveFormat::Tar))]
    #[case("fonts.tar.gz", Some(ArchiveFormat::TarGz))]
    #[case("fonts.tgz", Some(ArchiveFormat::TarGz))]
    #[case("fonts.tar.xz", Some(ArchiveFormat::TarXz))]
    #[case("fonts.txz", Some(ArchiveFormat::TarXz))]
    #[case("nested/dir/fonts.zip", Some(ArchiveFormat::Zip))]
    #[case("fonts.ttf", None)]
    #[case("fonts.gz", None)]
    #[case("fonts", None)]
    fn test_from_path(#[case] path: &str, #[case] expected: Option<ArchiveFormat>) {
        assert_eq!(ArchiveFormat::from_path(path), expected);
    }

    #[rstest]
    #[case(&[0x50, 0x4B, 0x03, 0x04, 0x14], Some(ArchiveFormat::Zip))]
    #[case(&[0x1F, 0x8B, 0x08], Some(ArchiveFormat::TarGz))]
    #[case(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00], Some(ArchiveFormat::TarXz))]
    #[case(b"OTTO", None)]
    #[case(b"", None)]
    fn test_from_magic_bytes(#[case] bytes: &[u8], #[case] expected: Option<ArchiveFormat>) {
        assert_eq!(ArchiveFormat::from_magic_bytes(bytes), expected);
    }

    #[test]
    fn test_tar_magic_at_offset() {
        let mut bytes = vec![0u8; 512];
        bytes[TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()].copy_from_slice(&TAR_MAGIC);
        assert_eq!(ArchiveFormat::from_magic_bytes(&bytes), Some(ArchiveFormat::Tar));
        // Too short to reach the magic.
        assert_eq!(ArchiveFormat::from_magic_bytes(&bytes[..100]), None);
    }
}
