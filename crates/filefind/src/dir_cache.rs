//! Memoized, sorted listing of one directory plus its traversal override.

use crate::error::FindError;
use crate::fs::FileSystem;
use logging::debug_log;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Children of the directory a level's current entry names.
///
/// `listing` is the byte-wise sorted result of reading the directory.
/// `traverse_to` starts as a copy of it and may be replaced by the caller;
/// `cursor` indexes the next name handed out from `traverse_to`.
#[derive(Clone, Debug, Default)]
pub(crate) struct DirectoryCache {
    scanned: Option<PathBuf>,
    opened: bool,
    listing: Vec<OsString>,
    traverse_to: Vec<OsString>,
    cursor: usize,
}

impl DirectoryCache {
    /// Reads `dir` unless it is the directory already cached.
    ///
    /// Returns whether the directory could be read. An unreadable directory
    /// is cached as empty.
    pub(crate) fn open<F: FileSystem + ?Sized>(
        &mut self,
        fs: &F,
        dir: &Path,
    ) -> Result<bool, FindError> {
        if self.holds(dir) {
            debug_log!(Dir, 3, "reusing listing of {:?}", dir);
            return Ok(self.opened);
        }

        let (mut listing, opened) = match fs.read_dir(dir) {
            Ok(names) => (names, true),
            Err(error) => {
                debug_log!(Dir, 1, "cannot open directory {:?}: {}", dir, error);
                (Vec::new(), false)
            }
        };
        listing.sort();
        let traverse_to = copy_names(&listing)?;

        let mut scanned = PathBuf::new();
        scanned
            .try_reserve(dir.as_os_str().len())
            .map_err(|error| FindError::out_of_resources("directory path", error))?;
        scanned.as_mut_os_string().push(dir.as_os_str());

        debug_log!(Dir, 2, "read {} entries from {:?}", listing.len(), dir);
        self.scanned = Some(scanned);
        self.opened = opened;
        self.listing = listing;
        self.traverse_to = traverse_to;
        self.cursor = 0;
        Ok(opened)
    }

    /// Whether `dir` is the directory currently cached.
    pub(crate) fn holds(&self, dir: &Path) -> bool {
        self.scanned.as_deref() == Some(dir)
    }

    /// Sorted names of the cached directory.
    pub(crate) fn listing(&self) -> &[OsString] {
        &self.listing
    }

    /// Names not yet handed out.
    pub(crate) fn remaining(&self) -> &[OsString] {
        self.traverse_to.get(self.cursor..).unwrap_or_default()
    }

    /// Next name to hand out, without consuming it.
    pub(crate) fn peek(&self) -> Option<&OsStr> {
        self.traverse_to.get(self.cursor).map(OsString::as_os_str)
    }

    /// Consumes the name returned by [`peek`](Self::peek).
    pub(crate) fn consume(&mut self) {
        if self.cursor < self.traverse_to.len() {
            self.cursor += 1;
        }
    }

    /// Replaces the names still to be handed out and rewinds the cursor.
    pub(crate) fn set_traverse_to<S: AsRef<OsStr>>(&mut self, names: &[S]) -> Result<(), FindError> {
        let mut traverse_to = Vec::new();
        traverse_to
            .try_reserve_exact(names.len())
            .map_err(|error| FindError::out_of_resources("traversal override", error))?;
        traverse_to.extend(names.iter().map(|name| name.as_ref().to_os_string()));

        self.traverse_to = traverse_to;
        self.cursor = 0;
        Ok(())
    }
}

fn copy_names(names: &[OsString]) -> Result<Vec<OsString>, FindError> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(names.len())
        .map_err(|error| FindError::out_of_resources("directory listing", error))?;
    copy.extend(names.iter().cloned());
    Ok(copy)
}
