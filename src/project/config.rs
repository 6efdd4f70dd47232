//! Run configuration.

use std::path::{Path, PathBuf};

use crate::base::constants::{DEFAULT_MAX_VALUE_LEN, DEFAULT_REEXPORT_HOPS};

/// Options for one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Directory module names are computed against. When unset, the common
    /// ancestor directory of the input files is used.
    pub root: Option<PathBuf>,
    /// Parse files on the rayon thread pool
    pub parallel: bool,
    /// Variable values longer than this many characters are truncated
    pub max_value_len: usize,
    /// Maximum re-export hops followed during name resolution
    pub follow_reexports: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            root: None,
            parallel: true,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            follow_reexports: DEFAULT_REEXPORT_HOPS,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_value_len(mut self, max_value_len: usize) -> Self {
        self.max_value_len = max_value_len;
        self
    }

    pub fn with_follow_reexports(mut self, hops: usize) -> Self {
        self.follow_reexports = hops;
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}
