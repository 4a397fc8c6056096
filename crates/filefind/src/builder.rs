use crate::entry::FindEntry;
use crate::error::FindError;
use crate::finder::FileFinder;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::level::{Action, ActionPlan};
use std::fmt;
use std::path::{Path, PathBuf};

/// Predicate over a composed path; `false` means neither emit nor descend.
pub type Filter = Box<dyn FnMut(&Path) -> bool>;

/// Hook invoked with every emitted entry.
pub type Callback = Box<dyn FnMut(&FindEntry)>;

/// Order in which a directory and its contents are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TraversalOrder {
    /// A directory is produced before anything beneath it.
    #[default]
    Flat,
    /// A directory is produced after everything beneath it.
    DepthFirst,
}

impl TraversalOrder {
    pub(crate) const fn plan(self) -> ActionPlan {
        match self {
            Self::Flat => [Action::Emit, Action::Recurse],
            Self::DepthFirst => [Action::Recurse, Action::Emit],
        }
    }
}

/// Traversal policy shared by the builder and the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FindOptions {
    /// Whether directories come before or after their contents.
    pub order: TraversalOrder,
    /// Descend into symbolic links that resolve to directories.
    pub follow_symlinks: bool,
    /// Descend into directories on a different device than their parent.
    pub cross_filesystems: bool,
}

impl FindOptions {
    /// Reports whether directories are produced after their contents.
    #[must_use]
    pub const fn depth_first(&self) -> bool {
        matches!(self.order, TraversalOrder::DepthFirst)
    }
}

/// Configures a traversal over one or more targets.
///
/// ```
/// use filefind::FileFinderBuilder;
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// std::fs::write(temp.path().join("a.txt"), b"a")?;
/// std::fs::write(temp.path().join("b.log"), b"b")?;
///
/// let finder = FileFinderBuilder::new(temp.path())
///     .depth_first(true)
///     .filter(|path| path.extension().is_none_or(|ext| ext != "log"))
///     .build()?;
/// let names: Vec<_> = finder
///     .map(|entry| entry.map(|entry| entry.path().to_path_buf()))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(names, vec![temp.path().join("a.txt"), temp.path().to_path_buf()]);
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
pub struct FileFinderBuilder<F = LocalFileSystem> {
    fs: F,
    targets: Vec<PathBuf>,
    options: FindOptions,
    filter: Option<Filter>,
    callback: Option<Callback>,
}

impl FileFinderBuilder<LocalFileSystem> {
    /// Creates a builder that will traverse `target`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(target: P) -> Self {
        Self::with_targets([target])
    }

    /// Creates a builder that will traverse each of `targets` in turn.
    ///
    /// Targets that do not exist when the traversal reaches them are skipped.
    #[must_use]
    pub fn with_targets<I, P>(targets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            fs: LocalFileSystem,
            targets: targets.into_iter().map(Into::into).collect(),
            options: FindOptions::default(),
            filter: None,
            callback: None,
        }
    }
}

impl<F: FileSystem> FileFinderBuilder<F> {
    /// Appends another target.
    #[must_use]
    pub fn target<P: Into<PathBuf>>(mut self, target: P) -> Self {
        self.targets.push(target.into());
        self
    }

    /// Replaces the whole traversal policy.
    #[must_use]
    pub const fn options(mut self, options: FindOptions) -> Self {
        self.options = options;
        self
    }

    /// Selects the traversal order.
    #[must_use]
    pub const fn order(mut self, order: TraversalOrder) -> Self {
        self.options.order = order;
        self
    }

    /// Produces directories after their contents when enabled.
    #[must_use]
    pub const fn depth_first(self, depth_first: bool) -> Self {
        self.order(if depth_first {
            TraversalOrder::DepthFirst
        } else {
            TraversalOrder::Flat
        })
    }

    /// Configures whether symbolic links to directories are descended into.
    ///
    /// The link itself is always produced. Cycle detection uses the identity
    /// of the link's target, so a link back to an ancestor is never entered.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.options.follow_symlinks = follow;
        self
    }

    /// Configures whether directories on other devices are descended into.
    ///
    /// Mount points are produced either way.
    #[must_use]
    pub const fn cross_filesystems(mut self, cross: bool) -> Self {
        self.options.cross_filesystems = cross;
        self
    }

    /// Installs a path predicate. Rejected paths are neither produced nor
    /// descended into.
    #[must_use]
    pub fn filter<P>(mut self, filter: P) -> Self
    where
        P: FnMut(&Path) -> bool + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Installs a hook that sees every produced entry.
    #[must_use]
    pub fn callback<C>(mut self, callback: C) -> Self
    where
        C: FnMut(&FindEntry) + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Swaps the filesystem the traversal reads from.
    #[must_use]
    pub fn filesystem<G: FileSystem>(self, fs: G) -> FileFinderBuilder<G> {
        FileFinderBuilder {
            fs,
            targets: self.targets,
            options: self.options,
            filter: self.filter,
            callback: self.callback,
        }
    }

    /// Builds a [`FileFinder`] using the configured options.
    pub fn build(self) -> Result<FileFinder<F>, FindError> {
        FileFinder::from_parts(
            self.fs,
            self.targets,
            self.options,
            self.filter,
            self.callback,
        )
    }
}

impl<F: fmt::Debug> fmt::Debug for FileFinderBuilder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileFinderBuilder")
            .field("fs", &self.fs)
            .field("targets", &self.targets)
            .field("options", &self.options)
            .field("filter", &self.filter.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_flat_without_following_or_crossing() {
        let options = FindOptions::default();
        assert_eq!(options.order, TraversalOrder::Flat);
        assert!(!options.depth_first());
        assert!(!options.follow_symlinks);
        assert!(!options.cross_filesystems);
    }

    #[test]
    fn order_selects_action_plan() {
        assert_eq!(TraversalOrder::Flat.plan(), [Action::Emit, Action::Recurse]);
        assert_eq!(
            TraversalOrder::DepthFirst.plan(),
            [Action::Recurse, Action::Emit]
        );
    }

    #[test]
    fn builder_setters_update_options() {
        let builder = FileFinderBuilder::new("a")
            .target("b")
            .depth_first(true)
            .follow_symlinks(true)
            .cross_filesystems(true);

        assert_eq!(builder.targets, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(builder.options.depth_first());
        assert!(builder.options.follow_symlinks);
        assert!(builder.options.cross_filesystems);

        let reset = builder.depth_first(false);
        assert_eq!(reset.options.order, TraversalOrder::Flat);
    }

    #[test]
    fn debug_output_reports_hooks_without_formatting_them() {
        let builder = FileFinderBuilder::new("a").filter(|_| true);
        let rendered = format!("{builder:?}");
        assert!(rendered.contains("filter: true"));
        assert!(rendered.contains("callback: false"));
    }
}
