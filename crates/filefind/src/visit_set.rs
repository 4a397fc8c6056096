//! Directory identities on the path from a root to the current level.

use crate::error::FindError;
use crate::fs::FileIdentity;
use rustc_hash::FxHashMap;

/// Maps each directory entered on the current path to the depth at which it
/// was first seen.
///
/// Every level owns its own copy. Entering a directory clones the parent's
/// set and adds one identity, so popping a level never touches an ancestor.
#[derive(Clone, Debug, Default)]
pub(crate) struct VisitSet {
    depths: FxHashMap<FileIdentity, usize>,
}

impl VisitSet {
    /// Set holding only a root target's identity at depth zero.
    pub(crate) fn rooted_at(identity: FileIdentity) -> Result<Self, FindError> {
        Self::default().descend(identity, 0)
    }

    /// Copy of this set extended with `identity` at `depth`.
    pub(crate) fn descend(&self, identity: FileIdentity, depth: usize) -> Result<Self, FindError> {
        let mut depths = FxHashMap::default();
        depths
            .try_reserve(self.depths.len() + 1)
            .map_err(|error| FindError::out_of_resources("visit set", error))?;
        depths.extend(self.depths.iter().map(|(identity, depth)| (*identity, *depth)));
        if !identity.is_anonymous() {
            depths.entry(identity).or_insert(depth);
        }
        Ok(Self { depths })
    }

    /// Depth at which `identity` was entered, if it is on the current path.
    pub(crate) fn first_seen(&self, identity: FileIdentity) -> Option<usize> {
        if identity.is_anonymous() {
            return None;
        }
        self.depths.get(&identity).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.depths.len()
    }
}
