use serde::Deserialize;

/// Tuning of the recursive refinement search.
///
/// - `iteration_size`: candidates per axis of one search box, odd so the box
///   centre is itself a candidate.
/// - `iterations`: boxes evaluated per radius level; each further box is a
///   zoom by one half around the best candidate so far.
/// - `levels`: number of escalating radius levels (`±k·σ` for level `k`).
/// - `precision_bias`: scores are divided by `1 + precision_bias · d²`, with
///   `d` the geographic distance from the expected position.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub threshold: f32,
    pub iteration_size: usize,
    pub iterations: usize,
    pub levels: usize,
    pub precision_bias: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            iteration_size: 5,
            iterations: 2,
            levels: 3,
            precision_bias: 0.0,
        }
    }
}
