use std::collections::TryReserveError;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

/// Error returned by fallible [`FileFinder`](crate::FileFinder) operations.
///
/// A failed operation leaves the session exactly as it was before the call,
/// so callers may retry or keep traversing.
#[derive(Debug)]
pub struct FindError {
    kind: FindErrorKind,
}

impl FindError {
    pub(crate) const fn new(kind: FindErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) const fn out_of_resources(context: &'static str, source: TryReserveError) -> Self {
        Self::new(FindErrorKind::OutOfResources { context, source })
    }

    pub(crate) const fn could_not_open_directory(path: PathBuf) -> Self {
        Self::new(FindErrorKind::CouldNotOpenDirectory { path })
    }

    /// Returns the specific failure.
    #[must_use]
    pub const fn kind(&self) -> &FindErrorKind {
        &self.kind
    }

    /// Returns the directory associated with the error, if any.
    ///
    /// Allocation failures are not tied to a path and return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use filefind::FileFinder;
    /// use std::path::Path;
    ///
    /// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
    /// let temp = tempfile::tempdir()?;
    /// let file = temp.path().join("plain.txt");
    /// std::fs::write(&file, b"data")?;
    ///
    /// let mut finder = FileFinder::new([&file])?;
    /// finder.advance()?;
    /// let error = finder.prune().unwrap_err();
    /// assert_eq!(error.path(), Some(file.as_path()));
    /// # Ok(())
    /// # }
    /// # demo().unwrap();
    /// ```
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.kind.path()
    }
}

impl fmt::Display for FindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FindErrorKind::OutOfResources { context, source } => {
                write!(f, "out of resources while growing {context}: {source}")
            }
            FindErrorKind::CouldNotOpenDirectory { path } => {
                write!(f, "could not open directory '{}'", path.display())
            }
        }
    }
}

impl Error for FindError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            FindErrorKind::OutOfResources { source, .. } => Some(source),
            FindErrorKind::CouldNotOpenDirectory { .. } => None,
        }
    }
}

/// Classification of traversal failures.
#[derive(Debug)]
pub enum FindErrorKind {
    /// A buffer could not be grown.
    OutOfResources {
        /// Which buffer was being grown.
        context: &'static str,
        /// Allocation failure reported by the collection.
        source: TryReserveError,
    },
    /// The current entry could not be listed as a directory, so its children
    /// cannot be overridden or pruned.
    CouldNotOpenDirectory {
        /// Path of the current entry.
        path: PathBuf,
    },
}

impl FindErrorKind {
    /// Returns the path tied to the failure, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::OutOfResources { .. } => None,
            Self::CouldNotOpenDirectory { path } => Some(path),
        }
    }
}
