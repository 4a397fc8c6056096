//! Integration tests for directories that stat as directories but cannot be
//! listed.

use filefind::{Advance, FileFinder, FileFinderBuilder, FindErrorKind, TraversalOrder};
use logging::{DebugFlag, DiagnosticEvent, VerbosityConfig, drain_events, init};
use std::path::{Path, PathBuf};
use test_support::MemoryFs;

/// /r/{locked/{hidden}, z}, with /r/locked unreadable.
fn tree() -> MemoryFs {
    let mut fs = MemoryFs::new();
    fs.dir("/r")
        .dir("/r/locked")
        .file("/r/locked/hidden")
        .file("/r/z")
        .lock("/r/locked");
    fs
}

fn collect(finder: FileFinder<&MemoryFs>) -> Vec<String> {
    finder
        .map(|entry| {
            entry
                .expect("an unreadable directory never fails the walk")
                .path()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

#[test]
fn unreadable_directory_has_no_children() {
    let fs = tree();
    let finder = FileFinder::with_filesystem(&fs, ["/r"]).expect("finder");
    assert_eq!(collect(finder), ["/r", "/r/locked", "/r/z"]);
}

#[test]
fn unreadable_directory_in_depth_first_order() {
    let fs = tree();
    let finder = FileFinderBuilder::new("/r")
        .order(TraversalOrder::DepthFirst)
        .filesystem(&fs)
        .build()
        .expect("finder");
    assert_eq!(collect(finder), ["/r/locked", "/r/z", "/r"]);
}

#[test]
fn unreadable_root_is_produced_alone() {
    let fs = tree();
    let finder = FileFinder::with_filesystem(&fs, ["/r/locked", "/r/z"]).expect("finder");
    assert_eq!(collect(finder), ["/r/locked", "/r/z"]);
}

#[test]
fn override_on_unreadable_directory_is_refused() {
    let fs = tree();
    let mut finder = FileFinder::with_filesystem(&fs, ["/r"]).expect("finder");
    let mut seen = Vec::new();
    while finder.advance().expect("advance") == Advance::Found {
        let path = finder.current_path().expect("path").to_path_buf();
        if path == Path::new("/r/locked") {
            assert!(finder.current_children().expect("peek").is_empty());

            let error = finder.prune().expect_err("locked directory");
            assert!(matches!(
                error.kind(),
                FindErrorKind::CouldNotOpenDirectory { path } if path == Path::new("/r/locked")
            ));
            assert_eq!(error.to_string(), "could not open directory '/r/locked'");
            assert!(finder.set_traverse_to(&["hidden"]).is_err());
        }
        seen.push(path);
    }
    assert_eq!(seen, ["/r", "/r/locked", "/r/z"].map(PathBuf::from));
}

#[test]
fn unreadable_directory_is_reported_under_dir() {
    let mut config = VerbosityConfig::default();
    config.apply_debug_flag("dir").expect("flag");
    init(config);
    drain_events();

    let fs = tree();
    let _ = collect(FileFinder::with_filesystem(&fs, ["/r"]).expect("finder"));

    let events = drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        DiagnosticEvent::Debug { flag: DebugFlag::Dir, level: 1, message }
            if message.contains("/r/locked")
    ));
}
