//! Traversal configuration.

/// Default limit on nested entity depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Knobs for a [`Traverser`](super::Traverser).
///
/// With the `serde` feature enabled, options deserialize from host
/// configuration; missing keys fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraverseOptions {
    /// Maximum number of nested entities on the path from the root.
    pub max_depth: usize,
    /// Verify the whole graph is in the expected state before mutating it.
    ///
    /// Catches already-sealed, not-sealed and malformed leaves up front so
    /// those errors leave the graph untouched. Authentication failures are
    /// only discovered while opening and can still leave a partially opened
    /// graph.
    pub preflight: bool,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            preflight: false,
        }
    }
}

impl TraverseOptions {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_preflight(mut self, preflight: bool) -> Self {
        self.preflight = preflight;
        self
    }
}
