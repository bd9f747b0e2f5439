//! End-to-end pipeline properties, driven through the public build
//! stream with a scripted transport and synthetic archives: completeness
//! of selection, rejection of unknown groups, deterministic
//! deduplication, idempotent rebuilds and all-or-nothing failure.

use fontpack_build::{BuildEvent, Context, DupReason, build};
use fontpack_catalog::{ArchiveSource, Catalog, Group, Matcher};
use fontpack_fetch::TransportHandle;
use fontpack_fetch::mock::{MockResponse, MockTransport};
use fontpack_font::testfont::font_with_names;
use futures::{StreamExt, pin_mut};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const FAMILY: u16 = 1;
const SUBFAMILY: u16 = 2;
const POSTSCRIPT_NAME: u16 = 6;

const ALPHA_URL: &str = "https://fonts.test/alpha.zip";
const BETA_URL: &str = "https://fonts.test/beta.zip";

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn font(family: &str, style: &str, flavour: &str) -> Vec<u8> {
    // The postscript record varies the bytes without touching the family,
    // so tests can make distinct files that are family-duplicates.
    font_with_names(&[(FAMILY, family), (SUBFAMILY, style), (POSTSCRIPT_NAME, flavour)])
}

fn catalog() -> Catalog {
    Catalog::new(
        vec![
            ArchiveSource::new("alpha", ALPHA_URL),
            ArchiveSource::new("beta", BETA_URL),
        ],
        vec![
            Group::new("base", "Core text fonts")
                .enabled_by_default()
                .matcher(Matcher::glob(Some("alpha"), "Alpha-*.ttf"))
                .matcher(Matcher::glob(Some("beta"), "Beta-*.ttf"))
                .matcher(Matcher::glob(None, "Dupe-*.ttf")),
            Group::new("extra", "Optional fonts").matcher(Matcher::glob(None, "Extra-*.ttf")),
        ],
    )
}

fn context(root: &Path) -> Context {
    Context::new(root.join("cache"), root.join("scratch"), root.join("output"), 2)
}

async fn run_events(
    transport: &TransportHandle,
    catalog: &Catalog,
    groups: Option<&str>,
    ctx: &Context,
) -> Vec<BuildEvent> {
    let selection = catalog.resolve(groups).unwrap();
    let events = build(transport, catalog, &selection, ctx);
    pin_mut!(events);
    let mut collected = Vec::new();
    while let Some(event) = events.next().await {
        collected.push(event.expect("build stage succeeds"));
    }
    collected
}

/// Snapshot of the published output tree: relative path to content.
fn tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(base: &Path, dir: &Path, into: &mut BTreeMap<String, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, into);
            } else {
                let relative = path.strip_prefix(base).unwrap().to_string_lossy().into_owned();
                into.insert(relative, std::fs::read(&path).unwrap());
            }
        }
    }
    let mut into = BTreeMap::new();
    walk(root, root, &mut into);
    into
}

#[tokio::test]
async fn default_build_contains_exactly_the_default_groups() {
    let dir = tempfile::tempdir().unwrap();
    let transport: TransportHandle = Arc::new(
        MockTransport::new()
            .body(
                ALPHA_URL,
                zip_bytes(&[
                    ("fonts/Alpha-Regular.ttf", &font("Alpha Sans", "Regular", "alpha-r")),
                    ("fonts/Alpha-Bold.ttf", &font("Alpha Sans", "Bold", "alpha-b")),
                    ("fonts/Extra-One.ttf", &font("Extra", "Regular", "extra-1")),
                    ("README.txt", b"not a font"),
                ]),
            )
            .body(BETA_URL, zip_bytes(&[("Beta-Regular.ttf", &font("Beta Serif", "Regular", "beta-r"))])),
    );
    let catalog = catalog();
    let ctx = context(dir.path());

    let events = run_events(&transport, &catalog, None, &ctx).await;
    assert!(matches!(events.last(), Some(BuildEvent::Complete)));

    let output = tree(&ctx.output_dir);
    let paths: Vec<&str> = output.keys().map(String::as_str).collect();
    // Every selected file exactly once, sorted into family directories;
    // the non-default group and the non-font payload are absent.
    assert_eq!(
        paths,
        ["Alpha Sans/Alpha-Bold.ttf", "Alpha Sans/Alpha-Regular.ttf", "Beta Serif/Beta-Regular.ttf"]
    );
}

#[tokio::test]
async fn explicit_selection_adds_optional_groups() {
    let dir = tempfile::tempdir().unwrap();
    let transport: TransportHandle = Arc::new(
        MockTransport::new()
            .body(
                ALPHA_URL,
                zip_bytes(&[
                    ("Alpha-Regular.ttf", &font("Alpha Sans", "Regular", "alpha-r")),
                    ("Extra-One.ttf", &font("Extra", "Regular", "extra-1")),
                ]),
            )
            .body(BETA_URL, zip_bytes(&[("Beta-Regular.ttf", &font("Beta Serif", "Regular", "beta-r"))])),
    );
    let catalog = catalog();
    let ctx = context(dir.path());

    run_events(&transport, &catalog, Some("base,extra"), &ctx).await;
    let output = tree(&ctx.output_dir);
    assert!(output.contains_key("Extra/Extra-One.ttf"));
    assert_eq!(output.len(), 3);
}

#[tokio::test]
async fn unknown_group_fails_fast_and_lists_valid_names() {
    let err = catalog().resolve(Some("base,nope")).unwrap_err();
    match &*err {
        fontpack_catalog::error::ErrorKind::UnknownGroup { name, valid } => {
            assert_eq!(name, "nope");
            assert_eq!(valid, &["base", "extra"]);
        },
    }
    // The message alone is enough for the user to self-correct.
    let message = err.to_string();
    assert!(message.contains("nope"), "message was: {message}");
    assert!(message.contains("base") && message.contains("extra"), "message was: {message}");
}

#[tokio::test]
async fn family_duplicates_resolve_to_the_priority_archive() {
    let dir = tempfile::tempdir().unwrap();
    let alpha_dupe = font("Dupe", "Regular", "from-alpha");
    let beta_dupe = font("Dupe", "Regular", "from-beta");
    assert_ne!(alpha_dupe, beta_dupe);

    let transport: TransportHandle = Arc::new(
        MockTransport::new()
            .body(ALPHA_URL, zip_bytes(&[("Dupe-Regular.ttf", &alpha_dupe)]))
            .body(BETA_URL, zip_bytes(&[("Dupe-Regular.ttf", &beta_dupe)])),
    );
    let catalog = catalog();
    let ctx = context(dir.path());

    let events = run_events(&transport, &catalog, None, &ctx).await;
    let output = tree(&ctx.output_dir);
    assert_eq!(output.len(), 1);
    // The copy from the archive declared first in the catalog wins,
    // regardless of which task finished first.
    assert_eq!(output.get("Dupe/Dupe-Regular.ttf"), Some(&alpha_dupe));

    let dropped = events
        .iter()
        .find_map(|event| match event {
            BuildEvent::Deduplicated { dropped, .. } => Some(dropped),
            _ => None,
        })
        .unwrap();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].archive, "beta");
    assert_eq!(dropped[0].kept_archive, "alpha");
    assert_eq!(dropped[0].reason, DupReason::Family);
}

#[tokio::test]
async fn identical_content_across_archives_collapses() {
    let dir = tempfile::tempdir().unwrap();
    let same = font("Twin", "Regular", "identical");
    let transport: TransportHandle = Arc::new(
        MockTransport::new()
            .body(ALPHA_URL, zip_bytes(&[("Dupe-Twin.ttf", &same)]))
            .body(BETA_URL, zip_bytes(&[("Dupe-Twin.ttf", &same)])),
    );
    let catalog = catalog();
    let ctx = context(dir.path());

    let events = run_events(&transport, &catalog, None, &ctx).await;
    assert_eq!(tree(&ctx.output_dir).len(), 1);
    let dropped = events
        .iter()
        .find_map(|event| match event {
            BuildEvent::Deduplicated { dropped, .. } => Some(dropped),
            _ => None,
        })
        .unwrap();
    assert_eq!(dropped[0].reason, DupReason::Content);
}

#[tokio::test]
async fn rebuilds_are_idempotent_and_reuse_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let transport = MockTransport::new()
        .body(ALPHA_URL, zip_bytes(&[("Alpha-Regular.ttf", &font("Alpha Sans", "Regular", "alpha-r"))]))
        .body(BETA_URL, zip_bytes(&[("Beta-Regular.ttf", &font("Beta Serif", "Regular", "beta-r"))]));
    let requests = transport.request_counter();
    let transport: TransportHandle = Arc::new(transport);
    let catalog = catalog();
    let ctx = context(dir.path());

    run_events(&transport, &catalog, None, &ctx).await;
    let first = tree(&ctx.output_dir);
    let second_events = run_events(&transport, &catalog, None, &ctx).await;
    let second = tree(&ctx.output_dir);

    // Byte-identical output trees, and no second round of downloads.
    assert_eq!(first, second);
    assert_eq!(requests.load(std::sync::atomic::Ordering::SeqCst), 2);
    assert!(second_events.iter().any(|event| matches!(event, BuildEvent::ArchiveCached { .. })));
}

#[tokio::test]
async fn fetch_failure_aborts_the_whole_build() {
    let dir = tempfile::tempdir().unwrap();
    let transport: TransportHandle = Arc::new(
        MockTransport::new()
            .body(ALPHA_URL, zip_bytes(&[("Alpha-Regular.ttf", &font("Alpha Sans", "Regular", "alpha-r"))]))
            .respond(BETA_URL, MockResponse::Status(500)),
    );
    let catalog = catalog();
    let ctx = context(dir.path());
    let selection = catalog.resolve(None).unwrap();

    let events = build(&transport, &catalog, &selection, &ctx);
    pin_mut!(events);
    let mut failure = None;
    while let Some(event) = events.next().await {
        match event {
            Ok(BuildEvent::Materialized(_)) => panic!("a failed build must not publish output"),
            Ok(_) => {},
            Err(err) => {
                failure = Some(err);
                break;
            },
        }
    }

    let err = failure.expect("the beta fetch must fail the build");
    match &*err {
        fontpack_build::error::ErrorKind::Fetch { archive, .. } => assert_eq!(archive, "beta"),
        other => panic!("unexpected error kind: {other}"),
    }
    // Nothing was published.
    assert!(!ctx.output_dir.exists());
}

#[tokio::test]
async fn group_stats_report_disabled_groups() {
    let dir = tempfile::tempdir().unwrap();
    let extra = font("Extra", "Regular", "extra-1");
    let transport: TransportHandle = Arc::new(
        MockTransport::new()
            .body(
                ALPHA_URL,
                zip_bytes(&[
                    ("Alpha-Regular.ttf", &font("Alpha Sans", "Regular", "alpha-r")),
                    ("Extra-One.ttf", &extra),
                ]),
            )
            .body(BETA_URL, zip_bytes(&[("Beta-Regular.ttf", &font("Beta Serif", "Regular", "beta-r"))])),
    );
    let catalog = catalog();
    let ctx = context(dir.path());

    let events = run_events(&transport, &catalog, None, &ctx).await;
    let stats = events
        .iter()
        .find_map(|event| match event {
            BuildEvent::Selected { stats, .. } => Some(stats),
            _ => None,
        })
        .unwrap();

    let base = stats.iter().find(|stat| stat.name == "base").unwrap();
    let extra_stat = stats.iter().find(|stat| stat.name == "extra").unwrap();
    assert!(base.enabled);
    assert_eq!(base.files, 2);
    // Disabled groups still show up with their observed size, so the
    // operator can see what enabling them would cost.
    assert!(!extra_stat.enabled);
    assert_eq!(extra_stat.files, 1);
    assert_eq!(extra_stat.bytes, extra.len() as u64);
}
