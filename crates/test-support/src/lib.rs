#![deny(unsafe_code)]

//! Shared test utilities for the filefind workspace.
//!
//! [`MemoryFs`] is an in-memory [`FileSystem`] whose device and inode numbers
//! are chosen by the test, which makes mount points and bind-mount loops easy
//! to model. [`TempTree`] lays out a real directory tree under a temporary
//! directory from a compact description.

use filefind::{FileIdentity, FileKind, FileStat, FileSystem};
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

const MAX_LINK_HOPS: usize = 40;

#[derive(Clone, Debug)]
enum Node {
    Dir,
    File,
    Symlink(PathBuf),
}

#[derive(Clone, Debug)]
struct Inode {
    node: Node,
    identity: FileIdentity,
}

/// In-memory filesystem keyed by absolute path.
///
/// `read_dir` returns names in reverse order so tests notice when the
/// traversal forgets to sort.
#[derive(Debug)]
pub struct MemoryFs {
    nodes: BTreeMap<PathBuf, Inode>,
    next_inode: u64,
    device: u64,
    locked: BTreeSet<PathBuf>,
    reads: Cell<usize>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Creates a filesystem holding only `/` on device 1.
    pub fn new() -> Self {
        let mut fs = Self {
            nodes: BTreeMap::new(),
            next_inode: 1,
            device: 1,
            locked: BTreeSet::new(),
            reads: Cell::new(0),
        };
        fs.insert("/", Node::Dir);
        fs
    }

    /// Device used for nodes created from now on.
    pub fn on_device(&mut self, device: u64) -> &mut Self {
        self.device = device;
        self
    }

    /// Creates a directory (parents must exist).
    pub fn dir(&mut self, path: &str) -> &mut Self {
        self.insert(path, Node::Dir);
        self
    }

    /// Creates a regular file (parents must exist).
    pub fn file(&mut self, path: &str) -> &mut Self {
        self.insert(path, Node::File);
        self
    }

    /// Creates a symbolic link at `path` pointing at the absolute `target`.
    pub fn symlink(&mut self, path: &str, target: &str) -> &mut Self {
        self.insert(path, Node::Symlink(PathBuf::from(target)));
        self
    }

    /// Creates a directory sharing the identity of `original`, the way a bind
    /// mount does.
    pub fn bind(&mut self, path: &str, original: &str) -> &mut Self {
        let identity = self.nodes[Path::new(original)].identity;
        self.nodes.insert(
            PathBuf::from(path),
            Inode {
                node: Node::Dir,
                identity,
            },
        );
        self
    }

    /// Makes `read_dir` on `path` fail with permission denied. The directory
    /// still stats as a directory.
    pub fn lock(&mut self, path: &str) -> &mut Self {
        self.locked.insert(PathBuf::from(path));
        self
    }

    /// Identity assigned to `path`.
    pub fn identity(&self, path: &str) -> FileIdentity {
        self.nodes[Path::new(path)].identity
    }

    /// Number of `read_dir` calls served so far.
    pub fn read_dir_calls(&self) -> usize {
        self.reads.get()
    }

    fn insert(&mut self, path: &str, node: Node) {
        let identity = FileIdentity::new(self.device, self.next_inode);
        self.next_inode += 1;
        self.nodes
            .insert(PathBuf::from(path), Inode { node, identity });
    }

    /// Resolves symbolic links in every component, and in the final one
    /// when `follow_last` is set. Link targets are absolute.
    fn resolve(&self, path: &Path, follow_last: bool) -> io::Result<PathBuf> {
        let mut pending = segments(path);
        pending.reverse();
        let mut current = PathBuf::from("/");
        let mut hops = 0;

        while let Some(segment) = pending.pop() {
            if segment == ".." {
                current.pop();
                continue;
            }
            let candidate = current.join(&segment);
            let inode = self.nodes.get(&candidate).ok_or_else(not_found)?;
            match &inode.node {
                Node::Symlink(target) if follow_last || !pending.is_empty() => {
                    hops += 1;
                    if hops > MAX_LINK_HOPS {
                        return Err(io::Error::other("too many levels of symbolic links"));
                    }
                    current = PathBuf::from("/");
                    pending.extend(segments(target).into_iter().rev());
                }
                _ => current = candidate,
            }
        }
        Ok(current)
    }

    fn lookup(&self, path: &Path, follow_last: bool) -> io::Result<&Inode> {
        let resolved = self.resolve(path, follow_last)?;
        self.nodes.get(&resolved).ok_or_else(not_found)
    }
}

impl FileSystem for MemoryFs {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        self.reads.set(self.reads.get() + 1);
        let resolved = self.resolve(dir, true)?;
        if self.locked.contains(&resolved) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        match self.nodes.get(&resolved).map(|inode| &inode.node) {
            Some(Node::Dir) => {}
            Some(_) => return Err(io::Error::other("not a directory")),
            None => return Err(not_found()),
        }

        let mut names: Vec<OsString> = self
            .nodes
            .keys()
            .filter(|key| key.parent() == Some(resolved.as_path()))
            .filter_map(|key| key.file_name().map(ToOwned::to_owned))
            .collect();
        names.reverse();
        Ok(names)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        self.lookup(path, false).map(Inode::stat)
    }

    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        self.lookup(path, true).map(Inode::stat)
    }
}

impl Inode {
    const fn stat(&self) -> FileStat {
        let kind = match self.node {
            Node::Dir => FileKind::Directory,
            Node::File => FileKind::Regular,
            Node::Symlink(_) => FileKind::Symlink,
        };
        FileStat::new(self.identity, kind)
    }
}

fn segments(path: &Path) -> Vec<OsString> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_os_string()),
            Component::ParentDir => Some(OsString::from("..")),
            _ => None,
        })
        .collect()
}

fn not_found() -> io::Error {
    io::Error::from(io::ErrorKind::NotFound)
}

/// Real directory tree rooted at `<tempdir>/root`.
///
/// Entries ending in `/` become directories; everything else becomes a file
/// whose contents are its own relative path. Parents are created as needed.
#[derive(Debug)]
pub struct TempTree {
    temp: tempfile::TempDir,
    root: PathBuf,
}

impl TempTree {
    /// Builds the tree described by `entries`.
    pub fn new(entries: &[&str]) -> io::Result<Self> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("root");
        fs::create_dir(&root)?;
        for entry in entries {
            let path = root.join(entry.trim_end_matches('/'));
            if entry.ends_with('/') {
                fs::create_dir_all(&path)?;
            } else {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, entry.as_bytes())?;
            }
        }
        Ok(Self { temp, root })
    }

    /// Root directory of the tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the tree.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Directory containing [`root`](Self::root); free for siblings such as
    /// symlink targets.
    pub fn scratch(&self) -> &Path {
        self.temp.path()
    }
}
