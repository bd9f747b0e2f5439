//! Minimal font fixtures for tests.
//!
//! Builds just enough of an OpenType binary (head, hhea, maxp and name
//! tables, no glyphs) for `ttf-parser` to accept the face and expose its
//! name records. Real fonts are far too large to check into tests, and
//! the pipeline only ever looks at the name table anyway.

/// A single-face font whose name table holds the given records.
///
/// Records are (name id, value) pairs, stored as Windows/Unicode
/// (platform 3, encoding 1, language 0x0409) entries. Passing different
/// values also changes the binary content, which is how tests construct
/// distinct files that share a family.
#[must_use]
pub fn font_with_names(names: &[(u16, &str)]) -> Vec<u8> {
    font_at_offset(names, 0)
}

/// A TrueType collection wrapping a single [`font_with_names`] face.
#[must_use]
pub fn collection_with_names(names: &[(u16, &str)]) -> Vec<u8> {
    // ttc header: tag, version, face count, offset of the first face.
    const HEADER: u32 = 16;
    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    push_u32(&mut out, 0x0001_0000);
    push_u32(&mut out, 1);
    push_u32(&mut out, HEADER);
    out.extend_from_slice(&font_at_offset(names, HEADER));
    out
}

/// Table offsets inside a collection are absolute, hence `base`.
fn font_at_offset(names: &[(u16, &str)], base: u32) -> Vec<u8> {
    let head = head_table();
    let hhea = hhea_table();
    let maxp = maxp_table();
    let name = name_table(names);

    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000); // sfnt version
    push_u16(&mut out, 4); // table count
    push_u16(&mut out, 64); // search range
    push_u16(&mut out, 2); // entry selector
    push_u16(&mut out, 0); // range shift

    // Table records sorted by tag, data padded to 4-byte boundaries.
    let mut offset: u32 = 12 + 16 * 4;
    let mut data = Vec::new();
    for (tag, table) in [(b"head", &head), (b"hhea", &hhea), (b"maxp", &maxp), (b"name", &name)] {
        out.extend_from_slice(tag);
        push_u32(&mut out, 0); // checksum, not verified by readers
        push_u32(&mut out, base + offset);
        push_u32(&mut out, table.len() as u32);
        data.extend_from_slice(table);
        let padding = (4 - table.len() % 4) % 4;
        data.extend(std::iter::repeat_n(0u8, padding));
        offset += (table.len() + padding) as u32;
    }
    out.extend_from_slice(&data);
    out
}

fn head_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_u32(&mut t, 0); // font revision
    push_u32(&mut t, 0); // checksum adjustment
    push_u32(&mut t, 0x5F0F_3CF5); // magic
    push_u16(&mut t, 0); // flags
    push_u16(&mut t, 1000); // units per em
    t.extend_from_slice(&[0u8; 16]); // created + modified
    t.extend_from_slice(&[0u8; 8]); // bounding box
    push_u16(&mut t, 0); // mac style
    push_u16(&mut t, 8); // lowest rec ppem
    push_u16(&mut t, 2); // font direction hint
    push_u16(&mut t, 0); // index to loc format
    push_u16(&mut t, 0); // glyph data format
    t
}

fn hhea_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_u16(&mut t, 800); // ascender
    push_u16(&mut t, (-200i16) as u16); // descender
    push_u16(&mut t, 0); // line gap
    push_u16(&mut t, 0); // max advance width
    t.extend_from_slice(&[0u8; 6]); // min side bearings, max extent
    push_u16(&mut t, 1); // caret slope rise
    push_u16(&mut t, 0); // caret slope run
    push_u16(&mut t, 0); // caret offset
    t.extend_from_slice(&[0u8; 8]); // reserved
    push_u16(&mut t, 0); // metric data format
    push_u16(&mut t, 1); // number of h-metrics
    t
}

fn maxp_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0000_5000); // version 0.5
    push_u16(&mut t, 1); // glyph count
    t
}

fn name_table(names: &[(u16, &str)]) -> Vec<u8> {
    let mut records: Vec<(u16, &str)> = names.to_vec();
    records.sort_by_key(|(id, _)| *id);

    let mut t = Vec::new();
    push_u16(&mut t, 0); // format
    push_u16(&mut t, records.len() as u16);
    push_u16(&mut t, 6 + 12 * records.len() as u16); // string storage offset

    let mut strings = Vec::new();
    for (id, value) in &records {
        let start = strings.len() as u16;
        for unit in value.encode_utf16() {
            push_u16(&mut strings, unit);
        }
        push_u16(&mut t, 3); // platform: windows
        push_u16(&mut t, 1); // encoding: unicode bmp
        push_u16(&mut t, 0x0409); // language: english (us)
        push_u16(&mut t, *id);
        push_u16(&mut t, strings.len() as u16 - start);
        push_u16(&mut t, start);
    }
    t.extend_from_slice(&strings);
    t
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
