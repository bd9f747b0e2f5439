//! The built-in catalog.
//!
//! Upstream archives are pinned to tagged release URLs so two runs see
//! identical inputs. Declaration order is the deduplication priority
//! order: the Noto text faces are authoritative, coding and regional
//! packs come after them.
//!
//! Matchers here prefer file-name globs over path prefixes: extraction
//! strips wrapper directories, so directory layout varies between
//! upstreams while file names stay put. Cascadia ships parallel
//! ttf/otf/woff2 trees and keeps its layout, so a prefix is used there
//! to pick exactly the installable TrueType set.

use crate::Catalog;
use crate::matcher::Matcher;
use crate::model::{ArchiveSource, Group};

const MIB: u64 = 1024 * 1024;

impl Catalog {
    /// The static catalog used by the CLI.
    ///
    /// The default selection covers common Western scripts plus coding
    /// fonts. The CJK and emoji packs exist but are disabled by default
    /// purely to keep disk usage down; the CJK collection alone
    /// outweighs everything else combined.
    pub fn builtin() -> Self {
        Self::new(
            vec![
                ArchiveSource::new(
                    "noto-sans",
                    "https://github.com/notofonts/latin-greek-cyrillic/releases/download/NotoSans-v2.013/NotoSans-v2.013.zip",
                )
                .min_size(MIB / 2),
                ArchiveSource::new(
                    "noto-serif",
                    "https://github.com/notofonts/latin-greek-cyrillic/releases/download/NotoSerif-v2.013/NotoSerif-v2.013.zip",
                )
                .min_size(MIB / 2),
                ArchiveSource::new(
                    "cascadia-code",
                    "https://github.com/microsoft/cascadia-code/releases/download/v2404.23/CascadiaCode-2404.23.zip",
                )
                .min_size(4 * MIB),
                ArchiveSource::new(
                    "jetbrains-mono",
                    "https://download.jetbrains.com/fonts/JetBrainsMono-2.304.zip",
                )
                .min_size(2 * MIB),
                ArchiveSource::new(
                    "noto-cjk",
                    "https://github.com/notofonts/noto-cjk/releases/download/Sans2.004/04_NotoSansCJK-OTC.zip",
                )
                .min_size(16 * MIB),
                ArchiveSource::new(
                    "noto-emoji",
                    "https://github.com/googlefonts/noto-emoji/archive/refs/tags/v2.047.tar.gz",
                )
                .cache_name("noto-emoji-2.047.tar.gz")
                .min_size(MIB),
            ],
            vec![
                Group::new("sans", "Noto Sans text faces for Latin, Greek and Cyrillic")
                    .enabled_by_default()
                    .matcher(Matcher::glob(Some("noto-sans"), "NotoSans*.ttf")),
                Group::new("serif", "Noto Serif text faces for Latin, Greek and Cyrillic")
                    .enabled_by_default()
                    .matcher(Matcher::glob(Some("noto-serif"), "NotoSerif*.ttf")),
                Group::new("mono", "Fixed-pitch coding fonts (Cascadia Code, JetBrains Mono)")
                    .enabled_by_default()
                    .matcher(Matcher::prefix(Some("cascadia-code"), "ttf"))
                    .matcher(Matcher::glob(Some("jetbrains-mono"), "JetBrainsMono*.ttf")),
                Group::new("cjk", "Noto Sans CJK for Chinese, Japanese and Korean (very large)")
                    .matcher(Matcher::glob(Some("noto-cjk"), "NotoSansCJK*.ttc"))
                    .matcher(Matcher::glob(Some("noto-cjk"), "NotoSansCJK*.otc")),
                Group::new("emoji", "Noto color emoji")
                    .matcher(Matcher::glob(Some("noto-emoji"), "NotoColorEmoji*.ttf")),
            ],
        )
    }
}
