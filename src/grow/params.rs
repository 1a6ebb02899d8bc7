use serde::{Deserialize, Serialize};

/// When the distance-to-border check applies to a candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderPolicy {
    /// Only candidates outside the bounding rectangle of placed nodes as of
    /// the previous level are checked.
    #[default]
    SkipInterior,
    /// Every candidate is checked.
    Always,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GrowOptions {
    /// Stop once this many nodes are placed. `None` derives a cap of twice
    /// the number of cells fitting in the boundary.
    pub max_nodes: Option<usize>,
    /// Candidates closer to the border than this many spacing units (the
    /// smaller of the two spacings) become holes. Zero disables the check.
    pub border_margin: f64,
    pub border_policy: BorderPolicy,
    /// Compare every candidate against the root patch instead of its parent.
    pub compare_from_root: bool,
}

impl Default for GrowOptions {
    fn default() -> Self {
        Self {
            max_nodes: None,
            border_margin: 1.0,
            border_policy: BorderPolicy::SkipInterior,
            compare_from_root: false,
        }
    }
}
