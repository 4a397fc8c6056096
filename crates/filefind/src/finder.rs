use crate::builder::{Callback, FileFinderBuilder, Filter, FindOptions, TraversalOrder};
use crate::entry::FindEntry;
use crate::error::FindError;
use crate::fs::{EntryStat, FileSystem, LocalFileSystem};
use crate::level::{Action, Level, LevelKind};
use crate::visit_set::VisitSet;
use logging::{debug_log, info_log};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::iter;
use std::path::{Component, Path, PathBuf};

/// Outcome of a successful [`FileFinder::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// A new entry is available through [`FileFinder::current_entry`].
    Found,
    /// Every target has been traversed.
    End,
}

/// What the current level produced on this pass.
enum Step {
    Emitted,
    Continue,
}

/// Resumable traversal over one or more targets.
///
/// Each call to [`advance`](Self::advance) runs the traversal up to the next
/// entry and stops. Between calls the caller may inspect the children of the
/// entry just produced with [`current_children`](Self::current_children),
/// reorder or restrict them with [`set_traverse_to`](Self::set_traverse_to),
/// or skip them entirely with [`prune`](Self::prune).
///
/// Directory contents are visited in byte-wise order of their names. In
/// [`TraversalOrder::Flat`] a directory is produced before its contents; in
/// [`TraversalOrder::DepthFirst`] after them.
///
/// ```
/// use filefind::{Advance, FileFinder};
/// use std::fs;
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let root = temp.path();
/// fs::create_dir(root.join("keep"))?;
/// fs::create_dir(root.join("skip"))?;
/// fs::write(root.join("keep/a.txt"), b"a")?;
/// fs::write(root.join("skip/b.txt"), b"b")?;
///
/// let mut finder = FileFinder::new([root])?;
/// let mut seen = Vec::new();
/// while finder.advance()? == Advance::Found {
///     let path = finder.current_path().unwrap().to_path_buf();
///     if path.ends_with("skip") {
///         finder.prune()?;
///     }
///     seen.push(path.strip_prefix(root)?.to_path_buf());
/// }
///
/// let seen: Vec<_> = seen.iter().map(|path| path.to_str().unwrap()).collect();
/// assert_eq!(seen, ["", "keep", "keep/a.txt", "skip"]);
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
pub struct FileFinder<F = LocalFileSystem> {
    fs: F,
    targets: Vec<PathBuf>,
    stack: Vec<Level>,
    components: Vec<OsString>,
    path: PathBuf,
    entry: Option<FindEntry>,
    options: FindOptions,
    filter: Option<Filter>,
    callback: Option<Callback>,
    finished: bool,
}

impl FileFinder<LocalFileSystem> {
    /// Creates a flat-order traversal over `targets` on the local filesystem.
    pub fn new<I, P>(targets: I) -> Result<Self, FindError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        FileFinderBuilder::with_targets(targets).build()
    }
}

impl<F: FileSystem> FileFinder<F> {
    /// Creates a flat-order traversal over `targets` read through `fs`.
    pub fn with_filesystem<I, P>(fs: F, targets: I) -> Result<Self, FindError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        FileFinderBuilder::with_targets(targets)
            .filesystem(fs)
            .build()
    }

    pub(crate) fn from_parts(
        fs: F,
        targets: Vec<PathBuf>,
        options: FindOptions,
        filter: Option<Filter>,
        callback: Option<Callback>,
    ) -> Result<Self, FindError> {
        let mut stack = Vec::new();
        stack
            .try_reserve(1)
            .map_err(|error| FindError::out_of_resources("directory stack", error))?;
        stack.push(Level::root());

        debug_log!(Walk, 1, "traversing {} target(s) with {:?}", targets.len(), options);
        Ok(Self {
            fs,
            targets,
            stack,
            components: Vec::new(),
            path: PathBuf::new(),
            entry: None,
            options,
            filter,
            callback,
            finished: false,
        })
    }

    /// Returns the active traversal policy.
    #[must_use]
    pub const fn options(&self) -> FindOptions {
        self.options
    }

    /// Produces directories after their contents when enabled.
    ///
    /// Takes effect from the next candidate on; set it before the first
    /// [`advance`](Self::advance) for a consistent order.
    pub const fn set_depth_first(&mut self, depth_first: bool) {
        self.options.order = if depth_first {
            TraversalOrder::DepthFirst
        } else {
            TraversalOrder::Flat
        };
    }

    /// Descends into symbolic links that resolve to directories when enabled.
    pub const fn set_follow_symlinks(&mut self, follow: bool) {
        self.options.follow_symlinks = follow;
    }

    /// Descends into directories on other devices when enabled.
    pub const fn set_cross_filesystems(&mut self, cross: bool) {
        self.options.cross_filesystems = cross;
    }

    /// Installs a path predicate; rejected paths are neither produced nor
    /// descended into.
    pub fn set_filter<P>(&mut self, filter: P)
    where
        P: FnMut(&Path) -> bool + 'static,
    {
        self.filter = Some(Box::new(filter));
    }

    /// Installs a hook that sees every produced entry.
    pub fn set_callback<C>(&mut self, callback: C)
    where
        C: FnMut(&FindEntry) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Runs the traversal up to the next entry.
    ///
    /// Returns [`Advance::End`] once every target is exhausted, and on every
    /// call after that. Each internal step either completes or leaves the
    /// session untouched, so a call that failed with
    /// [`FindErrorKind::OutOfResources`](crate::FindErrorKind::OutOfResources)
    /// may simply be repeated.
    pub fn advance(&mut self) -> Result<Advance, FindError> {
        if self.finished {
            return Ok(Advance::End);
        }

        loop {
            if let Step::Emitted = self.process_current()? {
                return Ok(Advance::Found);
            }
            if self.next_candidate()? {
                continue;
            }
            if !self.leave_level()? {
                debug_log!(Walk, 1, "traversal finished");
                self.finished = true;
                self.entry = None;
                return Ok(Advance::End);
            }
        }
    }

    /// Path of the entry produced by the last [`advance`](Self::advance).
    ///
    /// `None` before the first advance and after the traversal ended.
    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.entry.as_ref().map(FindEntry::path)
    }

    /// Entry produced by the last [`advance`](Self::advance).
    #[must_use]
    pub const fn current_entry(&self) -> Option<&FindEntry> {
        self.entry.as_ref()
    }

    /// Sorted names inside the current entry.
    ///
    /// The directory is read on first use and the listing is reused by the
    /// subsequent descent. Non-directories and unreadable directories yield an
    /// empty slice, as does a session with no current entry.
    ///
    /// The listing is returned even for a directory the traversal will not
    /// enter: an unfollowed symbolic link, a mount point while crossing is
    /// disabled, or a directory already on the current path. Its names are
    /// never visited.
    pub fn current_children(&mut self) -> Result<&[OsString], FindError> {
        if self.finished {
            return Ok(&[]);
        }
        let Some(level) = self.stack.last_mut() else {
            return Ok(&[]);
        };
        if level.current().is_none() {
            return Ok(&[]);
        }
        level.children.open(&self.fs, &self.path)?;
        Ok(level.children.listing())
    }

    /// Names inside the current entry that the traversal has yet to visit.
    ///
    /// Empty until the children have been opened by
    /// [`current_children`](Self::current_children),
    /// [`set_traverse_to`](Self::set_traverse_to) or a descent.
    #[must_use]
    pub fn remaining_children(&self) -> &[OsString] {
        if self.finished {
            return &[];
        }
        self.stack
            .last()
            .filter(|level| level.current().is_some() && level.children.holds(&self.path))
            .map_or(&[], |level| level.children.remaining())
    }

    /// Replaces the children visited beneath the current entry.
    ///
    /// `names` need not exist, be unique or be sorted; they are visited in the
    /// given order. The override sticks until a different directory is
    /// opened at this depth, so a repeated name resumes where the earlier
    /// visit stopped instead of starting over.
    ///
    /// An override on a directory the traversal will not enter (see
    /// [`current_children`](Self::current_children)) is accepted but has no
    /// effect.
    ///
    /// # Errors
    ///
    /// [`FindErrorKind::CouldNotOpenDirectory`](crate::FindErrorKind::CouldNotOpenDirectory)
    /// when there is no current entry or it cannot be read as a directory.
    pub fn set_traverse_to<S: AsRef<OsStr>>(&mut self, names: &[S]) -> Result<(), FindError> {
        let level = match self.stack.last_mut() {
            Some(level) if !self.finished && level.current().is_some() => level,
            _ => return Err(FindError::could_not_open_directory(self.path.clone())),
        };
        if !level.children.open(&self.fs, &self.path)? {
            return Err(FindError::could_not_open_directory(self.path.clone()));
        }
        level.children.set_traverse_to(names)?;
        debug_log!(
            Prune,
            1,
            "visiting {} name(s) beneath {:?}",
            names.len(),
            self.path
        );
        Ok(())
    }

    /// Skips everything beneath the current entry.
    ///
    /// Equivalent to an empty [`set_traverse_to`](Self::set_traverse_to);
    /// pruning twice is the same as pruning once.
    pub fn prune(&mut self) -> Result<(), FindError> {
        self.set_traverse_to::<&OsStr>(&[])
    }

    fn process_current(&mut self) -> Result<Step, FindError> {
        let Some(index) = self.stack.len().checked_sub(1) else {
            return Ok(Step::Continue);
        };
        if self.stack[index].current().is_none() || !self.admit_current(index) {
            return Ok(Step::Continue);
        }

        while let Some(action) = self.stack[index].pending_action() {
            match action {
                Action::Emit => {
                    self.emit(index)?;
                    return Ok(Step::Emitted);
                }
                Action::Recurse => {
                    if self.eligible_for_descent(index) {
                        self.descend(index)?;
                        self.stack[index].complete_action();
                        return Ok(Step::Continue);
                    }
                    self.stack[index].complete_action();
                }
            }
        }
        Ok(Step::Continue)
    }

    /// Runs the filter once per candidate and remembers the verdict.
    fn admit_current(&mut self, index: usize) -> bool {
        let level = &mut self.stack[index];
        if let Some(verdict) = level.admitted() {
            return verdict;
        }

        let verdict = self
            .filter
            .as_mut()
            .is_none_or(|filter| filter(self.path.as_path()));
        if !verdict {
            debug_log!(Filter, 1, "filter rejected {:?}", self.path);
        }
        level.set_admitted(verdict);
        verdict
    }

    fn emit(&mut self, index: usize) -> Result<(), FindError> {
        let level = &mut self.stack[index];
        let entry = FindEntry::from_components(&self.path, &self.components, level.stat())?;
        level.complete_action();
        debug_log!(Walk, 3, "emitting {:?}", self.path);

        let entry: &FindEntry = self.entry.insert(entry);
        if let Some(callback) = self.callback.as_mut() {
            callback(entry);
        }
        Ok(())
    }

    fn eligible_for_descent(&self, index: usize) -> bool {
        let level = &self.stack[index];
        let stat = level.stat();
        if !stat.is_dir() {
            return false;
        }
        // Root targets are entered through the ordinary push exactly once.
        if self.stack.len() <= 1 {
            return true;
        }
        if stat.is_symlink() && !self.options.follow_symlinks {
            debug_log!(Walk, 2, "not following symlink {:?}", self.path);
            return false;
        }

        let identity = stat.descent_identity();
        if identity.device != level.device && !self.options.cross_filesystems {
            debug_log!(
                Mount,
                1,
                "not crossing from device {} to {} at {:?}",
                level.device,
                identity.device,
                self.path
            );
            return false;
        }
        if let Some(depth) = level.visited.first_seen(identity) {
            debug_log!(
                Dup,
                1,
                "skipping {:?}: same directory as depth {}",
                self.path,
                depth
            );
            return false;
        }
        true
    }

    fn descend(&mut self, index: usize) -> Result<(), FindError> {
        let depth = self.stack.len();
        let level = &mut self.stack[index];
        let identity = level.stat().descent_identity();
        level.children.open(&self.fs, &self.path)?;
        let visited = level.visited.descend(identity, depth)?;

        self.stack
            .try_reserve(1)
            .map_err(|error| FindError::out_of_resources("directory stack", error))?;
        self.components
            .try_reserve(1)
            .map_err(|error| FindError::out_of_resources("path components", error))?;

        debug_log!(
            Walk,
            2,
            "entering {:?} at depth {} ({} directories on path)",
            self.path,
            depth,
            visited.len()
        );
        self.stack.push(Level::descend(visited, identity.device));
        Ok(())
    }

    fn next_candidate(&mut self) -> Result<bool, FindError> {
        let Some(index) = self.stack.len().checked_sub(1) else {
            return Ok(false);
        };
        match self.stack[index].kind() {
            LevelKind::Root { .. } => self.next_target(),
            LevelKind::Descend => self.next_child(index),
        }
    }

    fn next_target(&mut self) -> Result<bool, FindError> {
        let Some(root) = self.stack.first_mut() else {
            return Ok(false);
        };

        while let Some(index) = root.pending_target(self.targets.len()) {
            let target = self.targets[index].as_os_str();
            if !self.fs.exists(Path::new(target)) {
                info_log!(
                    Skip,
                    1,
                    "skipping {}: no such file or directory",
                    Path::new(target).display()
                );
                root.consume_target();
                continue;
            }

            let path = compose_path(&[], target)?;
            let mut components = Vec::new();
            components
                .try_reserve_exact(1)
                .map_err(|error| FindError::out_of_resources("path components", error))?;
            components.push(target.to_os_string());

            let stat = EntryStat::probe(&self.fs, &path);
            let identity = stat.descent_identity();
            let visited = VisitSet::rooted_at(identity)?;
            debug_log!(Walk, 1, "starting target {:?}", path);

            root.consume_target();
            root.set_candidate(target.to_os_string(), stat, self.options.order.plan());
            root.visited = visited;
            root.device = identity.device;
            self.components = components;
            self.path = path;
            return Ok(true);
        }
        Ok(false)
    }

    fn next_child(&mut self, index: usize) -> Result<bool, FindError> {
        let (ancestors, rest) = self.stack.split_at_mut(index);
        let (Some(parent), Some(level)) = (ancestors.last_mut(), rest.first_mut()) else {
            return Ok(false);
        };
        let Some(name) = parent.children.peek() else {
            return Ok(false);
        };

        let prefix = self.components.get(..index).unwrap_or(&self.components);
        let path = compose_path(prefix, name)?;
        let name = name.to_os_string();
        parent.children.consume();

        let stat = EntryStat::probe(&self.fs, &path);
        debug_log!(Walk, 3, "visiting {:?}", path);
        self.components.truncate(index);
        self.components.push(name.clone());
        level.set_candidate(name, stat, self.options.order.plan());
        self.path = path;
        Ok(true)
    }

    /// Pops the top level; returns `false` when only the root level is left.
    fn leave_level(&mut self) -> Result<bool, FindError> {
        let Some(remaining) = self.stack.len().checked_sub(1).filter(|len| *len > 0) else {
            return Ok(false);
        };

        // A depth-first parent still owes its emit, which needs its own path.
        let path = if self.options.depth_first() {
            let parents = self.components.get(..remaining).unwrap_or(&self.components);
            Some(compose_components(parents)?)
        } else {
            None
        };

        self.stack.pop();
        self.components.truncate(remaining);
        if let Some(path) = path {
            self.path = path;
        }
        debug_log!(Walk, 3, "back at depth {}", remaining - 1);
        Ok(true)
    }
}

impl<F: FileSystem> Iterator for FileFinder<F> {
    type Item = Result<FindEntry, FindError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Advance::Found) => self.entry.clone().map(Ok),
            Ok(Advance::End) => None,
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl<F: fmt::Debug> fmt::Debug for FileFinder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileFinder")
            .field("fs", &self.fs)
            .field("targets", &self.targets)
            .field("depth", &self.stack.len())
            .field("path", &self.path)
            .field("options", &self.options)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// Joins `name` onto the already composed `prefix`.
///
/// The first component is taken verbatim. Later names are appended as
/// relative paths, so a name containing a root or drive prefix cannot
/// replace what came before it.
fn compose_path(prefix: &[OsString], name: &OsStr) -> Result<PathBuf, FindError> {
    let mut parts = prefix
        .iter()
        .map(OsString::as_os_str)
        .chain(iter::once(name));
    let capacity: usize = parts.clone().map(|part| part.len() + 1).sum();

    let mut path = PathBuf::new();
    path.try_reserve(capacity)
        .map_err(|error| FindError::out_of_resources("composed path", error))?;
    if let Some(base) = parts.next() {
        path.push(base);
    }
    for part in parts {
        for component in Path::new(part).components() {
            if !matches!(component, Component::Prefix(_) | Component::RootDir) {
                path.push(component);
            }
        }
    }
    Ok(path)
}

fn compose_components(components: &[OsString]) -> Result<PathBuf, FindError> {
    match components.split_last() {
        Some((name, prefix)) => compose_path(prefix, name),
        None => Ok(PathBuf::new()),
    }
}
