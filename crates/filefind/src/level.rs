//! One position in the traversal stack.

use crate::dir_cache::DirectoryCache;
use crate::fs::EntryStat;
use crate::visit_set::VisitSet;
use std::ffi::{OsStr, OsString};

/// Step taken for a level's current entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Record the entry as the traversal result.
    Emit,
    /// Push a level for the entry's children when it is eligible.
    Recurse,
}

/// The two actions run for every candidate, in order.
pub(crate) type ActionPlan = [Action; 2];

/// Where a level draws its candidates from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LevelKind {
    /// The caller's targets; `next_target` indexes the next one to try.
    Root { next_target: usize },
    /// The children of the parent level's current entry.
    Descend,
}

#[derive(Debug)]
pub(crate) struct Level {
    kind: LevelKind,
    current: Option<OsString>,
    stat: EntryStat,
    admitted: Option<bool>,
    plan: ActionPlan,
    next_action: usize,
    /// Children of `current`, opened lazily.
    pub(crate) children: DirectoryCache,
    /// Directories entered on the path down to this level.
    pub(crate) visited: VisitSet,
    /// Device of the directory this level lists.
    pub(crate) device: u64,
}

impl Level {
    fn with_kind(kind: LevelKind, visited: VisitSet, device: u64) -> Self {
        Self {
            kind,
            current: None,
            stat: EntryStat::default(),
            admitted: None,
            plan: [Action::Emit, Action::Recurse],
            next_action: 0,
            children: DirectoryCache::default(),
            visited,
            device,
        }
    }

    pub(crate) fn root() -> Self {
        Self::with_kind(LevelKind::Root { next_target: 0 }, VisitSet::default(), 0)
    }

    pub(crate) fn descend(visited: VisitSet, device: u64) -> Self {
        Self::with_kind(LevelKind::Descend, visited, device)
    }

    pub(crate) const fn kind(&self) -> LevelKind {
        self.kind
    }

    /// Index of the next root target, if this is the root level and any remain.
    pub(crate) const fn pending_target(&self, target_count: usize) -> Option<usize> {
        match self.kind {
            LevelKind::Root { next_target } if next_target < target_count => Some(next_target),
            _ => None,
        }
    }

    pub(crate) const fn consume_target(&mut self) {
        if let LevelKind::Root { next_target } = &mut self.kind {
            *next_target += 1;
        }
    }

    /// Makes `name` the current entry and restarts its action plan.
    ///
    /// The children cache is left alone; it is keyed by path and rereads
    /// only when asked to open a different directory.
    pub(crate) fn set_candidate(&mut self, name: OsString, stat: EntryStat, plan: ActionPlan) {
        self.current = Some(name);
        self.stat = stat;
        self.admitted = None;
        self.plan = plan;
        self.next_action = 0;
    }

    pub(crate) fn current(&self) -> Option<&OsStr> {
        self.current.as_deref()
    }

    pub(crate) const fn stat(&self) -> EntryStat {
        self.stat
    }

    /// Cached filter verdict for the current entry.
    pub(crate) const fn admitted(&self) -> Option<bool> {
        self.admitted
    }

    pub(crate) const fn set_admitted(&mut self, verdict: bool) {
        self.admitted = Some(verdict);
    }

    pub(crate) fn pending_action(&self) -> Option<Action> {
        self.current.as_ref()?;
        self.plan.get(self.next_action).copied()
    }

    pub(crate) const fn complete_action(&mut self) {
        self.next_action += 1;
    }
}
