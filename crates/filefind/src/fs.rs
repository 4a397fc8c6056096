//! Filesystem access used by the traversal engine.
//!
//! The engine only needs four primitives: list a directory, `lstat` a path,
//! `stat` a path and check whether a root target exists. [`FileSystem`]
//! captures them so tests can substitute an in-memory tree with arbitrary
//! device and inode numbers. [`LocalFileSystem`] forwards to [`std::fs`].

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// Device and inode pair identifying a filesystem object.
///
/// An inode number of zero means the platform could not supply an identity;
/// such values never match during cycle detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileIdentity {
    /// Device the object lives on.
    pub device: u64,
    /// Inode number on that device.
    pub inode: u64,
}

impl FileIdentity {
    /// Creates an identity from a device and inode number.
    #[must_use]
    pub const fn new(device: u64, inode: u64) -> Self {
        Self { device, inode }
    }

    /// Reports whether the identity carries no inode information.
    #[must_use]
    pub const fn is_anonymous(self) -> bool {
        self.inode == 0
    }
}

/// Coarse file type reported by a [`FileSystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// A directory.
    Directory,
    /// A regular file.
    Regular,
    /// A symbolic link (only reported by [`FileSystem::symlink_metadata`]).
    Symlink,
    /// Sockets, devices, FIFOs and anything else.
    Other,
}

/// Metadata snapshot returned by a [`FileSystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStat {
    /// Identity of the object.
    pub identity: FileIdentity,
    /// Type of the object.
    pub kind: FileKind,
}

impl FileStat {
    /// Creates a snapshot from its parts.
    #[must_use]
    pub const fn new(identity: FileIdentity, kind: FileKind) -> Self {
        Self { identity, kind }
    }
}

/// Filesystem primitives consumed by [`FileFinder`](crate::FileFinder).
pub trait FileSystem {
    /// Lists the immediate children of `dir` in any order.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<OsString>>;

    /// Inspects `path` without following a final symbolic link.
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat>;

    /// Inspects `path`, following symbolic links.
    fn metadata(&self, path: &Path) -> io::Result<FileStat>;

    /// Reports whether `path` names an existing object.
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        (**self).read_dir(dir)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        (**self).symlink_metadata(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        (**self).metadata(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

/// [`FileSystem`] backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(dir)?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect()
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        fs::symlink_metadata(path).map(|metadata| stat_from_metadata(&metadata))
    }

    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        fs::metadata(path).map(|metadata| stat_from_metadata(&metadata))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn stat_from_metadata(metadata: &fs::Metadata) -> FileStat {
    let file_type = metadata.file_type();
    let kind = if file_type.is_symlink() {
        FileKind::Symlink
    } else if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_file() {
        FileKind::Regular
    } else {
        FileKind::Other
    };
    FileStat::new(identity_of(metadata), kind)
}

#[cfg(unix)]
fn identity_of(metadata: &fs::Metadata) -> FileIdentity {
    use std::os::unix::fs::MetadataExt;

    FileIdentity::new(metadata.dev(), metadata.ino())
}

#[cfg(not(unix))]
fn identity_of(_metadata: &fs::Metadata) -> FileIdentity {
    FileIdentity::default()
}

/// Type and identity information cached for one traversal candidate.
///
/// The flags follow `stat` semantics: a symbolic link to a directory reports
/// [`is_dir`](Self::is_dir) as well as [`is_symlink`](Self::is_symlink). A
/// path that could not be inspected reports no flags at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryStat {
    identity: FileIdentity,
    target: Option<FileIdentity>,
    is_dir: bool,
    is_file: bool,
    is_symlink: bool,
}

impl EntryStat {
    /// Inspects `path` through `fs`, resolving a final symbolic link for the
    /// type flags.
    pub(crate) fn probe<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Self {
        let stat = match fs.symlink_metadata(path) {
            Ok(stat) => stat,
            Err(error) => {
                logging::debug_log!(Stat, 1, "cannot inspect {:?}: {}", path, error);
                return Self::default();
            }
        };

        if stat.kind != FileKind::Symlink {
            return Self {
                identity: stat.identity,
                target: None,
                is_dir: stat.kind == FileKind::Directory,
                is_file: stat.kind == FileKind::Regular,
                is_symlink: false,
            };
        }

        let resolved = fs.metadata(path).ok();
        if resolved.is_none() {
            logging::debug_log!(Stat, 2, "dangling symlink {:?}", path);
        }
        Self {
            identity: stat.identity,
            target: resolved.map(|target| target.identity),
            is_dir: resolved.is_some_and(|target| target.kind == FileKind::Directory),
            is_file: resolved.is_some_and(|target| target.kind == FileKind::Regular),
            is_symlink: true,
        }
    }

    /// Identity of the path itself (the link for symbolic links).
    #[must_use]
    pub const fn identity(&self) -> FileIdentity {
        self.identity
    }

    /// Identity of a symbolic link's resolved target, if it resolved.
    #[must_use]
    pub const fn target_identity(&self) -> Option<FileIdentity> {
        self.target
    }

    /// Identity of the directory a descent would actually enter.
    pub(crate) fn descent_identity(&self) -> FileIdentity {
        self.target.unwrap_or(self.identity)
    }

    /// Whether the path is, or resolves to, a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Whether the path is, or resolves to, a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        self.is_file
    }

    /// Whether the path itself is a symbolic link.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        self.is_symlink
    }
}
