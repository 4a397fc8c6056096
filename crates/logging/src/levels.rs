//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

/// Info flags for user-facing diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// Root targets or entries that were skipped.
    Skip,
    /// End-of-run statistics.
    Stats,
}

impl InfoFlag {
    /// Every info flag, in declaration order.
    pub const ALL: [Self; 2] = [Self::Skip, Self::Stats];

    /// Returns the token used to select this flag on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Stats => "stats",
        }
    }
}

/// Debug flags for traversal-engine diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// Directory scans and listing reuse.
    Dir,
    /// Cycle detection through the visited-inode set.
    Dup,
    /// Caller-supplied filter decisions.
    Filter,
    /// Filesystem boundary checks.
    Mount,
    /// Traversal overrides and prunes.
    Prune,
    /// Metadata lookups.
    Stat,
    /// Stack pushes, pops and action dispatch.
    Walk,
}

impl DebugFlag {
    /// Every debug flag, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Dir,
        Self::Dup,
        Self::Filter,
        Self::Mount,
        Self::Prune,
        Self::Stat,
        Self::Walk,
    ];

    /// Returns the token used to select this flag on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dir => "dir",
            Self::Dup => "dup",
            Self::Filter => "filter",
            Self::Mount => "mount",
            Self::Prune => "prune",
            Self::Stat => "stat",
            Self::Walk => "walk",
        }
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Skipped entries level.
    pub skip: u8,
    /// Statistics level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Skip => self.skip,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Skip => self.skip = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in InfoFlag::ALL {
            self.set(flag, level);
        }
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Directory scan level.
    pub dir: u8,
    /// Cycle detection level.
    pub dup: u8,
    /// Filter decision level.
    pub filter: u8,
    /// Filesystem boundary level.
    pub mount: u8,
    /// Override and prune level.
    pub prune: u8,
    /// Metadata lookup level.
    pub stat: u8,
    /// State machine level.
    pub walk: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Dir => self.dir,
            DebugFlag::Dup => self.dup,
            DebugFlag::Filter => self.filter,
            DebugFlag::Mount => self.mount,
            DebugFlag::Prune => self.prune,
            DebugFlag::Stat => self.stat,
            DebugFlag::Walk => self.walk,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Dir => self.dir = level,
            DebugFlag::Dup => self.dup = level,
            DebugFlag::Filter => self.filter = level,
            DebugFlag::Mount => self.mount = level,
            DebugFlag::Prune => self.prune = level,
            DebugFlag::Stat => self.stat = level,
            DebugFlag::Walk => self.walk = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_flag_names_are_unique() {
        let mut names: Vec<_> = InfoFlag::ALL.iter().map(|flag| flag.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), InfoFlag::ALL.len());
    }

    #[test]
    fn debug_flag_names_are_unique() {
        let mut names: Vec<_> = DebugFlag::ALL.iter().map(|flag| flag.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DebugFlag::ALL.len());
    }

    #[test]
    fn debug_flag_debug_format() {
        assert_eq!(format!("{:?}", DebugFlag::Dir), "Dir");
        assert_eq!(format!("{:?}", DebugFlag::Dup), "Dup");
        assert_eq!(format!("{:?}", DebugFlag::Walk), "Walk");
    }

    #[test]
    fn info_levels_get_set_roundtrip() {
        let mut levels = InfoLevels::default();
        levels.set(InfoFlag::Skip, 2);
        assert_eq!(levels.get(InfoFlag::Skip), 2);
        assert_eq!(levels.get(InfoFlag::Stats), 0);
    }

    #[test]
    fn debug_levels_set_all_touches_every_flag() {
        let mut levels = DebugLevels::default();
        levels.set_all(3);
        for flag in DebugFlag::ALL {
            assert_eq!(levels.get(flag), 3, "{flag:?}");
        }
    }

    #[test]
    fn info_levels_set_all_touches_every_flag() {
        let mut levels = InfoLevels::default();
        levels.set_all(1);
        for flag in InfoFlag::ALL {
            assert_eq!(levels.get(flag), 1, "{flag:?}");
        }
    }
}
