//! Name-table inspection.
//!
//! Family and style come from the font's own name table rather than its
//! file name; upstream vendors rename files freely but keep name records
//! intact. Typographic names (ids 16/17) take precedence over the legacy
//! family/subfamily pair because the legacy pair folds style variants
//! into the family name ("Foo Condensed" instead of "Foo").

use ttf_parser::{Face, PlatformId, name_id};

/// Windows platform language id for English (United States).
const WINDOWS_ENGLISH_US: u16 = 0x0409;
/// Style used when a font names its family but not its subfamily.
const DEFAULT_STYLE: &str = "Regular";

/// Family and style detected from a font's name table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FamilyStyle {
    pub family: String,
    pub style: String,
}

impl std::fmt::Display for FamilyStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// Read family and style metadata from a font binary.
///
/// Handles single faces and TrueType collections; the first face of a
/// collection names the whole file. Windows English records are
/// preferred (vendors populate them reliably), with any Unicode record
/// as the fallback.
///
/// Returns `None` when the binary cannot be parsed or carries no usable
/// family record. Such files are kept in the build but take no part in
/// family-based deduplication.
#[must_use]
pub fn inspect(data: &[u8]) -> Option<FamilyStyle> {
    let face = match Face::parse(data, 0) {
        Ok(face) => face,
        Err(err) => {
            tracing::debug!("unreadable font metadata: {err}");
            return None;
        },
    };
    let family = name_value(&face, &[name_id::TYPOGRAPHIC_FAMILY, name_id::FAMILY])?;
    let style = name_value(&face, &[name_id::TYPOGRAPHIC_SUBFAMILY, name_id::SUBFAMILY])
        .unwrap_or_else(|| DEFAULT_STYLE.to_string());
    Some(FamilyStyle { family, style })
}

/// First usable value for any of `ids`, in order of preference.
fn name_value(face: &Face<'_>, ids: &[u16]) -> Option<String> {
    for &id in ids {
        let mut fallback = None;
        for name in face.names().into_iter() {
            if name.name_id != id || !name.is_unicode() {
                continue;
            }
            let Some(value) = name.to_string() else { continue };
            if value.is_empty() {
                continue;
            }
            if name.platform_id == PlatformId::Windows && name.language_id == WINDOWS_ENGLISH_US {
                return Some(value);
            }
            if fallback.is_none() {
                fallback = Some(value);
            }
        }
        if fallback.is_some() {
            return fallback;
        }
    }
    None
}
