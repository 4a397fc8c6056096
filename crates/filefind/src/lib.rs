#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filefind` is a resumable recursive filesystem traversal. A [`FileFinder`]
//! is an external iterator: every [`FileFinder::advance`] runs the walk up to
//! the next entry and returns, so callers can interleave traversal with other
//! work, inspect a directory's children before they are visited, prune them
//! or substitute their own visiting order.
//!
//! # Design
//!
//! - [`FileFinderBuilder`] configures the targets and a [`FindOptions`]
//!   policy: [`TraversalOrder`], symlink following and filesystem crossing,
//!   plus an optional path filter and emit callback.
//! - [`FileFinder`] keeps an explicit stack of levels. The bottom level hands
//!   out the caller's targets; every level above it hands out the sorted
//!   children of the directory named by the level beneath. For each candidate
//!   the finder runs a two-step plan (emit then recurse in flat order,
//!   recurse then emit in depth-first order).
//! - Each level carries its own copy of the set of directory identities
//!   (device and inode) entered on the way down. A directory already on that
//!   path, or one on another device when crossing is disabled, is produced but
//!   not entered.
//! - [`FileSystem`] abstracts the four primitives the engine needs;
//!   [`LocalFileSystem`] forwards to [`std::fs`].
//!
//! # Invariants
//!
//! - Siblings are visited in byte-wise order of their names unless the caller
//!   installed an override with [`FileFinder::set_traverse_to`].
//! - A directory is entered at most once per path from its root, so symbolic
//!   link loops terminate.
//! - Two sessions over an unchanged tree produce identical sequences.
//! - Each level remembers the last directory it listed. The same path
//!   appearing again at that level reuses the listing and its cursor, so
//!   names already handed out are not handed out again.
//! - Filesystem errors never abort traversal; an unreadable directory simply
//!   has no children.
//!
//! # Errors
//!
//! [`FindError`] reports allocation failure
//! ([`FindErrorKind::OutOfResources`]) and, from the override operations, a
//! current entry that cannot be opened as a directory
//! ([`FindErrorKind::CouldNotOpenDirectory`]).
//!
//! # Examples
//!
//! ```
//! use filefind::FileFinderBuilder;
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path();
//! fs::create_dir(root.join("b"))?;
//! fs::write(root.join("b/inner.txt"), b"data")?;
//! fs::write(root.join("a.txt"), b"data")?;
//!
//! let finder = FileFinderBuilder::new(root).build()?;
//! let mut seen = Vec::new();
//! for entry in finder {
//!     let entry = entry?;
//!     seen.push(entry.path().strip_prefix(root)?.to_path_buf());
//! }
//!
//! assert_eq!(
//!     seen,
//!     ["", "a.txt", "b", "b/inner.txt"].map(std::path::PathBuf::from)
//! );
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod dir_cache;
mod entry;
mod error;
mod finder;
mod fs;
mod level;
mod visit_set;

pub use builder::{Callback, FileFinderBuilder, Filter, FindOptions, TraversalOrder};
pub use entry::FindEntry;
pub use error::{FindError, FindErrorKind};
pub use finder::{Advance, FileFinder};
pub use fs::{EntryStat, FileIdentity, FileKind, FileStat, FileSystem, LocalFileSystem};
