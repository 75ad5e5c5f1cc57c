use crate::DEFAULT_MAX_DEPTH;

///
/// WalkConfig
///
/// Limits applied by bounded walks before any node is visited.
/// `max_depth` counts nodes on the longest root-to-leaf path, so a lone
/// leaf has height 1.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WalkConfig {
    pub max_depth: Option<usize>,
}

impl WalkConfig {
    /// Configuration without a height ceiling.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_depth: None }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}
