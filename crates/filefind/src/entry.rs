use crate::error::FindError;
use crate::fs::{EntryStat, FileIdentity};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Entry produced by one traversal step.
///
/// Besides the composed [`path`](Self::path), the entry keeps the pieces it
/// was composed from: the root target it was reached through
/// ([`base`](Self::base)), the directory names between that root and the
/// entry ([`dir_components`](Self::dir_components)) and, for
/// non-directories, the final name ([`basename`](Self::basename)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FindEntry {
    pub(crate) path: PathBuf,
    pub(crate) base: OsString,
    pub(crate) dir_components: Vec<OsString>,
    pub(crate) basename: Option<OsString>,
    pub(crate) stat: EntryStat,
}

impl FindEntry {
    /// Builds an entry from the component list `[root, name, name, ...]`.
    pub(crate) fn from_components(
        path: &Path,
        components: &[OsString],
        stat: EntryStat,
    ) -> Result<Self, FindError> {
        let (base, names) = components
            .split_first()
            .map_or((OsStr::new(""), &[][..]), |(base, names)| {
                (base.as_os_str(), names)
            });
        let (dirs, basename) = match names.split_last() {
            Some((last, dirs)) if !stat.is_dir() => (dirs, Some(last.clone())),
            _ => (names, None),
        };

        let mut dir_components = Vec::new();
        dir_components
            .try_reserve_exact(dirs.len())
            .map_err(|error| FindError::out_of_resources("entry components", error))?;
        dir_components.extend(dirs.iter().cloned());

        let mut owned_path = PathBuf::new();
        owned_path
            .try_reserve(path.as_os_str().len())
            .map_err(|error| FindError::out_of_resources("entry path", error))?;
        owned_path.as_mut_os_string().push(path.as_os_str());

        Ok(Self {
            path: owned_path,
            base: base.to_os_string(),
            dir_components,
            basename,
            stat,
        })
    }

    /// Returns the full path of the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the root target this entry was reached through.
    #[must_use]
    pub fn base(&self) -> &OsStr {
        &self.base
    }

    /// Returns the names between the root target and the entry.
    ///
    /// For a directory this includes the directory's own name; for anything
    /// else the final name is reported by [`basename`](Self::basename)
    /// instead.
    #[must_use]
    pub fn dir_components(&self) -> &[OsString] {
        &self.dir_components
    }

    /// Returns the final name of a non-directory entry.
    ///
    /// Directories and root targets yield `None`.
    #[must_use]
    pub fn basename(&self) -> Option<&OsStr> {
        self.basename.as_deref()
    }

    /// Returns the file name of the entry, or `None` for a root target.
    ///
    /// # Examples
    ///
    /// ```
    /// use filefind::FileFinder;
    /// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
    /// let temp = tempfile::tempdir()?;
    /// std::fs::create_dir(temp.path().join("sub"))?;
    ///
    /// let mut finder = FileFinder::new([temp.path()])?;
    /// let root = finder.next().unwrap()?;
    /// assert!(root.file_name().is_none());
    /// let sub = finder.next().unwrap()?;
    /// assert_eq!(sub.file_name(), Some(std::ffi::OsStr::new("sub")));
    /// # Ok(())
    /// # }
    /// # demo().unwrap();
    /// ```
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        if self.is_root() {
            return None;
        }
        self.basename()
            .or_else(|| self.dir_components.last().map(OsString::as_os_str))
    }

    /// Returns the cached type and identity information.
    #[must_use]
    pub const fn stat(&self) -> &EntryStat {
        &self.stat
    }

    /// Returns the device and inode of the entry itself.
    #[must_use]
    pub const fn identity(&self) -> FileIdentity {
        self.stat.identity()
    }

    /// Whether the entry is, or resolves to, a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.stat.is_dir()
    }

    /// Whether the entry is, or resolves to, a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        self.stat.is_file()
    }

    /// Whether the entry itself is a symbolic link.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        self.stat.is_symlink()
    }

    /// Number of names between the root target and the entry (root depth is `0`).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.dir_components.len() + usize::from(self.basename.is_some())
    }

    /// Indicates whether this entry is one of the caller's targets.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.depth() == 0
    }
}
