//! Integration tests for cycle detection and filesystem boundaries.
//!
//! Device and inode numbers come from [`MemoryFs`], so mount points and bind
//! mounts can be modelled without privileges.

use filefind::{Advance, FileFinder, FileFinderBuilder};
use std::ffi::OsString;
use std::path::Path;
use test_support::MemoryFs;

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

fn build(fs: &MemoryFs, follow: bool, cross: bool) -> FileFinder<&MemoryFs> {
    FileFinderBuilder::new("/r")
        .follow_symlinks(follow)
        .cross_filesystems(cross)
        .filesystem(fs)
        .build()
        .expect("finder")
}

// ============================================================================
// Symlink Cycles
// ============================================================================

/// `root/a/loop -> root` terminates and never revisits the root beneath the
/// link, in either order.
#[test]
fn symlink_loop_to_root_terminates() {
    let mut fs = MemoryFs::new();
    fs.dir("/r").dir("/r/a").symlink("/r/a/loop", "/r");

    assert_eq!(collect(build(&fs, true, false)), ["/r", "/r/a", "/r/a/loop"]);

    let finder = FileFinderBuilder::new("/r")
        .follow_symlinks(true)
        .depth_first(true)
        .filesystem(&fs)
        .build()
        .expect("finder");
    assert_eq!(collect(finder), ["/r/a/loop", "/r/a", "/r"]);
}

/// A link to an intermediate ancestor is caught as well.
#[test]
fn symlink_loop_to_intermediate_ancestor_terminates() {
    let mut fs = MemoryFs::new();
    fs.dir("/r")
        .dir("/r/a")
        .dir("/r/a/b")
        .symlink("/r/a/b/up", "/r/a")
        .file("/r/a/b/f");

    assert_eq!(
        collect(build(&fs, true, false)),
        ["/r", "/r/a", "/r/a/b", "/r/a/b/f", "/r/a/b/up"]
    );
}

/// Two links to the same directory are both entered: only directories on
/// the current path count as visited.
#[test]
fn sibling_links_to_same_directory_are_both_entered() {
    let mut fs = MemoryFs::new();
    fs.dir("/shared")
        .file("/shared/f")
        .dir("/r")
        .symlink("/r/l1", "/shared")
        .symlink("/r/l2", "/shared");

    assert_eq!(
        collect(build(&fs, true, false)),
        ["/r", "/r/l1", "/r/l1/f", "/r/l2", "/r/l2/f"]
    );
}

/// Links are produced but not entered unless following is enabled.
#[test]
fn symlinks_are_not_entered_by_default() {
    let mut fs = MemoryFs::new();
    fs.dir("/shared").file("/shared/f").dir("/r").symlink("/r/l", "/shared");

    let finder = build(&fs, false, false);
    let entries: Vec<_> = finder.map(|entry| entry.expect("entry")).collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[1].is_symlink());
    assert!(entries[1].is_dir());
}

/// A bind mount of an ancestor shares its identity and is not entered, even
/// without symlink following.
#[test]
fn bind_mount_of_ancestor_is_not_entered() {
    let mut fs = MemoryFs::new();
    fs.dir("/r").dir("/r/a").bind("/r/a/again", "/r").file("/r/a/again/f");

    assert_eq!(collect(build(&fs, false, false)), ["/r", "/r/a", "/r/a/again"]);
}

// ============================================================================
// Filesystem Boundaries
// ============================================================================

fn mounted_tree() -> MemoryFs {
    let mut fs = MemoryFs::new();
    fs.dir("/r").file("/r/f").on_device(2).dir("/r/mnt").file("/r/mnt/g");
    fs
}

/// A mount point is produced but not entered by default.
#[test]
fn mount_point_is_not_entered_by_default() {
    let fs = mounted_tree();
    assert_eq!(collect(build(&fs, false, false)), ["/r", "/r/f", "/r/mnt"]);
}

/// Crossing filesystems enters the mount point.
#[test]
fn mount_point_is_entered_when_crossing() {
    let fs = mounted_tree();
    assert_eq!(
        collect(build(&fs, false, true)),
        ["/r", "/r/f", "/r/mnt", "/r/mnt/g"]
    );
}

/// A target on another device is always entered; the boundary check starts
/// beneath it.
#[test]
fn target_on_other_device_is_entered() {
    let fs = mounted_tree();
    let finder = FileFinder::with_filesystem(&fs, ["/r/mnt"]).expect("finder");
    assert_eq!(collect(finder), ["/r/mnt", "/r/mnt/g"]);
}

/// Following a link does not bypass the boundary check; the device of the
/// link's target is what counts.
#[test]
fn followed_link_to_other_device_respects_boundary() {
    let mut fs = mounted_tree();
    fs.on_device(1).symlink("/r/to-mnt", "/r/mnt");

    assert_eq!(
        collect(build(&fs, true, false)),
        ["/r", "/r/f", "/r/mnt", "/r/to-mnt"]
    );
    assert_eq!(
        collect(build(&fs, true, true)),
        ["/r", "/r/f", "/r/mnt", "/r/mnt/g", "/r/to-mnt", "/r/to-mnt/g"]
    );
}

// ============================================================================
// Peeking at Directories That Are Not Entered
// ============================================================================

/// An unfollowed link, a mount point without crossing and a directory
/// already on the path all list their children on request, and an override
/// on them is accepted, yet none of those children is visited.
#[test]
fn children_of_unentered_directories_are_listed_but_not_visited() {
    let mut fs = MemoryFs::new();
    fs.dir("/r")
        .dir("/r/a")
        .file("/r/a/f")
        .symlink("/r/link", "/r/a")
        .bind("/r/a/again", "/r")
        .on_device(2)
        .dir("/r/mnt")
        .file("/r/mnt/g");

    let mut finder = build(&fs, false, false);
    let mut seen = Vec::new();
    while finder.advance().expect("advance") == Advance::Found {
        let path = finder.current_path().expect("path").to_path_buf();
        let unentered = ["/r/link", "/r/mnt", "/r/a/again"]
            .iter()
            .any(|candidate| path == Path::new(candidate));
        if unentered {
            let children = finder.current_children().expect("peek").to_vec();
            if path != Path::new("/r/a/again") {
                assert_eq!(children.len(), 1, "{}", path.display());
            }
            finder
                .set_traverse_to(&[OsString::from("f")])
                .expect("override is accepted");
        }
        seen.push(path.to_string_lossy().into_owned());
    }

    assert_eq!(
        seen,
        ["/r", "/r/a", "/r/a/again", "/r/a/f", "/r/link", "/r/mnt"]
    );
}
