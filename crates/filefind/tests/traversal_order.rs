//! Integration tests for the order in which entries are produced.
//!
//! The trees live in [`MemoryFs`], whose `read_dir` deliberately returns
//! names in reverse, so every ordering assertion also checks that listings
//! are sorted before use.

use filefind::{Advance, FileFinder, FileFinderBuilder, TraversalOrder};
use test_support::MemoryFs;

// ============================================================================
// Helper Functions
// ============================================================================

/// /r/{a/{x, y/{z}}, b, c/}
fn tree() -> MemoryFs {
    let mut fs = MemoryFs::new();
    fs.dir("/r")
        .dir("/r/a")
        .file("/r/a/x")
        .dir("/r/a/y")
        .file("/r/a/y/z")
        .file("/r/b")
        .dir("/r/c");
    fs
}

fn collect(finder: FileFinder<&MemoryFs>) -> Vec<String> {
    finder
        .map(|entry| {
            entry
                .expect("entry should succeed")
                .path()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

// ============================================================================
// Flat and Depth-First Order
// ============================================================================

/// Flat order produces each directory before anything beneath it.
#[test]
fn flat_order_is_preorder() {
    let fs = tree();
    let finder = FileFinder::with_filesystem(&fs, ["/r"]).expect("finder");
    assert_eq!(
        collect(finder),
        ["/r", "/r/a", "/r/a/x", "/r/a/y", "/r/a/y/z", "/r/b", "/r/c"]
    );
}

/// Depth-first order finishes a directory's contents before producing it.
#[test]
fn depth_first_order_is_postorder() {
    let fs = tree();
    let finder = FileFinderBuilder::new("/r")
        .order(TraversalOrder::DepthFirst)
        .filesystem(&fs)
        .build()
        .expect("finder");
    assert_eq!(
        collect(finder),
        ["/r/a/x", "/r/a/y/z", "/r/a/y", "/r/a", "/r/b", "/r/c", "/r"]
    );
}

/// Siblings are ordered by the bytes of their names, so upper case sorts
/// before lower case.
#[test]
fn siblings_are_sorted_bytewise() {
    let mut fs = MemoryFs::new();
    fs.dir("/r").file("/r/b").file("/r/B").file("/r/a").file("/r/a.txt");

    let finder = FileFinder::with_filesystem(&fs, ["/r"]).expect("finder");
    assert_eq!(collect(finder), ["/r", "/r/B", "/r/a", "/r/a.txt", "/r/b"]);
}

/// An empty directory is produced once in either order.
#[test]
fn empty_directory_root_is_produced_once() {
    let mut fs = MemoryFs::new();
    fs.dir("/empty");

    for depth_first in [false, true] {
        let finder = FileFinderBuilder::new("/empty")
            .depth_first(depth_first)
            .filesystem(&fs)
            .build()
            .expect("finder");
        assert_eq!(collect(finder), ["/empty"]);
    }
}

// ============================================================================
// Targets
// ============================================================================

/// Targets are traversed in the order given; missing ones are skipped.
#[test]
fn targets_are_visited_in_order_and_missing_ones_skipped() {
    let fs = tree();
    let finder =
        FileFinder::with_filesystem(&fs, ["/r/c", "/missing", "/r/a/y"]).expect("finder");
    assert_eq!(collect(finder), ["/r/c", "/r/a/y", "/r/a/y/z"]);
}

/// Naming the same directory twice in a row reuses its listing: the second
/// visit is produced but its children were already handed out.
#[test]
fn consecutive_repeated_target_reuses_listing() {
    let fs = tree();
    let finder = FileFinder::with_filesystem(&fs, ["/r/a/y", "/r/a/y"]).expect("finder");
    assert_eq!(collect(finder), ["/r/a/y", "/r/a/y/z", "/r/a/y"]);
    assert_eq!(fs.read_dir_calls(), 1);
}

/// A repeat separated by another target is read and traversed afresh.
#[test]
fn separated_repeated_target_is_traversed_again() {
    let fs = tree();
    let finder =
        FileFinder::with_filesystem(&fs, ["/r/a/y", "/r/c", "/r/a/y"]).expect("finder");
    assert_eq!(
        collect(finder),
        ["/r/a/y", "/r/a/y/z", "/r/c", "/r/a/y", "/r/a/y/z"]
    );
    assert_eq!(fs.read_dir_calls(), 3);
}

/// A regular-file target yields exactly one entry and then the end.
#[test]
fn file_target_yields_single_entry() {
    let fs = tree();
    let mut finder = FileFinder::with_filesystem(&fs, ["/r/b"]).expect("finder");
    assert_eq!(finder.advance().expect("advance"), Advance::Found);
    let entry = finder.current_entry().expect("entry");
    assert!(entry.is_file());
    assert!(entry.is_root());
    assert_eq!(finder.advance().expect("advance"), Advance::End);
    assert!(finder.next().is_none());
}

// ============================================================================
// Determinism and Laziness
// ============================================================================

/// Two sessions over the same tree agree entry for entry.
#[test]
fn independent_sessions_agree() {
    let fs = tree();
    for order in [TraversalOrder::Flat, TraversalOrder::DepthFirst] {
        let build = || {
            FileFinderBuilder::new("/r")
                .order(order)
                .filesystem(&fs)
                .build()
                .expect("finder")
        };
        assert_eq!(collect(build()), collect(build()));
    }
}

/// Each directory is listed exactly once, even when the caller peeks at
/// its children before the traversal descends.
#[test]
fn directories_are_read_once() {
    let fs = tree();
    let mut finder = FileFinder::with_filesystem(&fs, ["/r"]).expect("finder");
    while finder.advance().expect("advance") == Advance::Found {
        if finder.current_entry().is_some_and(|entry| entry.is_dir()) {
            let _ = finder.current_children().expect("peek");
        }
    }
    assert_eq!(fs.read_dir_calls(), 4);
}

/// Nothing is read before the first advance and the walk stops where the
/// caller stops.
#[test]
fn traversal_is_lazy() {
    let fs = tree();
    let mut finder = FileFinder::with_filesystem(&fs, ["/r"]).expect("finder");
    assert_eq!(fs.read_dir_calls(), 0);

    finder.advance().expect("advance");
    assert_eq!(fs.read_dir_calls(), 0);
    finder.advance().expect("advance");
    assert_eq!(fs.read_dir_calls(), 1);
    drop(finder);
    assert_eq!(fs.read_dir_calls(), 1);
}
