//! Frontier growth: the engine, its options and cancellation.
pub mod cancel;
pub mod engine;
pub mod params;

pub use cancel::CancelToken;
pub use engine::{GrowthEngine, HoleReason, Matcher, Outcome};
pub use params::{BorderPolicy, GrowOptions};
