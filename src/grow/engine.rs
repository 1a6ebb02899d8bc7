//! Level-order frontier expansion.
//!
//! Each level drains the frontier, evaluates every candidate against a
//! read-only view of the graph, then applies the outcomes in frontier order:
//! statuses first, then neighbour linking for the newly placed nodes. No
//! candidate of a level observes another candidate of the same level, so the
//! evaluation phase may run in parallel and still produce the same graph.
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::cancel::CancelToken;
use super::params::{BorderPolicy, GrowOptions};
use crate::basis::Basis;
use crate::boundary::Boundary;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{GrowthStage, LevelReport, Termination};
use crate::graph::{PinGraph, PlaceEffects};
use crate::rate::Rater;
use crate::sample::{Patch, PatchSampler};
use crate::search::{RefinementSearch, SearchOptions};
use crate::types::{GeoPoint, GridCoord, NodeStatus};
use log::{debug, warn};
use std::time::Instant;

const BORDER_SLOP: f64 = 1e-9;

/// Why a candidate became a hole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoleReason {
    NearBorder,
    /// The search found no position reaching the threshold.
    LowConfidence,
    /// The comparison patch could not be sampled.
    NoTarget,
}

/// Evaluation result of one candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Placed { position: GeoPoint, confidence: f32 },
    DeadEnd,
    Hole(HoleReason),
}

/// Raster side of the engine: how candidates are validated against imagery.
pub struct Matcher<'a> {
    pub sampler: &'a PatchSampler,
    pub rater: &'a dyn Rater,
    pub search: &'a SearchOptions,
    /// Positional standard deviation in lattice index units `(col, row)`.
    pub sigma: (f64, f64),
    /// Fixed comparison patch; `None` compares against each parent.
    pub root_patch: Option<&'a Patch>,
}

pub struct GrowthEngine<'a> {
    basis: Basis,
    boundary: &'a dyn Boundary,
    matcher: Option<Matcher<'a>>,
    options: &'a GrowOptions,
    max_nodes: usize,
    cancel: Option<&'a CancelToken>,
}

impl<'a> GrowthEngine<'a> {
    /// Engine placing candidates at their approximate positions (no raster).
    pub fn new(
        basis: Basis,
        boundary: &'a dyn Boundary,
        options: &'a GrowOptions,
        max_nodes: usize,
    ) -> Self {
        Self {
            basis,
            boundary,
            matcher: None,
            options,
            max_nodes,
            cancel: None,
        }
    }

    pub fn with_matcher(mut self, matcher: Matcher<'a>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }

    /// Expand `graph` until the frontier is empty, the cap is reached or the
    /// run is cancelled.
    pub fn grow(&self, graph: &mut PinGraph) -> GrowthStage {
        let start = Instant::now();
        let mut stage = GrowthStage {
            max_nodes: self.max_nodes,
            ..Default::default()
        };
        stage.termination = loop {
            if graph.frontier().is_empty() {
                break Termination::Exhausted;
            }
            if graph.placed_count() >= self.max_nodes {
                warn!(
                    "growth stopped at the cap of {} placed nodes with {} loose ends left",
                    self.max_nodes,
                    graph.frontier().len()
                );
                break Termination::CapReached;
            }
            if self.cancelled() {
                break Termination::Cancelled;
            }
            let level = self.grow_level(graph, stage.levels.len());
            debug!(
                "level {}: {} candidates, {} placed, {} holes, {} dead ends, {} merges, {} revived",
                level.level_index,
                level.candidates,
                level.placed,
                level.holes,
                level.dead_ends,
                level.merges,
                level.revived
            );
            stage.levels.push(level);
        };
        stage.elapsed_ms = elapsed_ms(start);
        stage
    }

    fn grow_level(&self, graph: &mut PinGraph, level_index: usize) -> LevelReport {
        let start = Instant::now();
        let snapshot = graph.take_frontier();
        let view: &PinGraph = graph;

        #[cfg(feature = "parallel")]
        let outcomes: Vec<(GridCoord, Option<Outcome>)> = snapshot
            .par_iter()
            .map(|&c| (c, self.evaluate(view, c)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<(GridCoord, Option<Outcome>)> = snapshot
            .iter()
            .map(|&c| (c, self.evaluate(view, c)))
            .collect();

        let mut report = LevelReport {
            level_index,
            candidates: snapshot.len(),
            ..Default::default()
        };
        let mut placed = Vec::new();
        let mut skipped = Vec::new();
        let mut confidence_sum = 0.0f32;
        for (coord, outcome) in outcomes {
            match outcome {
                None => skipped.push(coord),
                Some(Outcome::Placed {
                    position,
                    confidence,
                }) => {
                    if graph.set_placed(coord, position) {
                        placed.push(coord);
                        confidence_sum += confidence;
                    }
                }
                Some(Outcome::DeadEnd) => {
                    graph.mark(coord, NodeStatus::DeadEnd);
                    report.dead_ends += 1;
                }
                Some(Outcome::Hole(reason)) => {
                    graph.mark(coord, NodeStatus::Hole);
                    report.holes += 1;
                    if reason == HoleReason::NearBorder {
                        report.near_border += 1;
                    }
                }
            }
        }

        let mut effects = PlaceEffects::default();
        for &coord in &placed {
            effects += graph.link_neighbours(coord);
        }
        report.skipped = skipped.len();
        graph.restore_frontier(skipped);
        graph.refresh_bounds();

        report.placed = placed.len();
        report.spawned = effects.spawned;
        report.merges = effects.merged;
        report.revived = effects.revived;
        if !placed.is_empty() {
            report.mean_confidence = Some(confidence_sum / placed.len() as f32);
        }
        report.elapsed_ms = elapsed_ms(start);
        report
    }

    /// Decide one candidate. `None` means the candidate was not evaluated
    /// (cancelled or no longer a loose end).
    pub fn evaluate(&self, graph: &PinGraph, coord: GridCoord) -> Option<Outcome> {
        if self.cancelled() {
            return None;
        }
        let node = graph.get(coord)?;
        if node.status != NodeStatus::LooseEnd {
            return None;
        }
        let (dir, parent) = node.parent_relation()?;
        let parent_pos = graph.position(parent)?;
        let approx = parent_pos + self.basis.step(dir.reverse());

        if !self.boundary.contains(approx) {
            return Some(Outcome::DeadEnd);
        }
        if self.near_border(graph, coord, approx) {
            return Some(Outcome::Hole(HoleReason::NearBorder));
        }

        let Some(m) = &self.matcher else {
            return Some(Outcome::Placed {
                position: approx,
                confidence: 1.0,
            });
        };
        let sampled;
        let target = match m.root_patch {
            Some(p) => p,
            None => match m.sampler.sample(parent_pos) {
                Some(p) => {
                    sampled = p;
                    &sampled
                }
                None => return Some(Outcome::Hole(HoleReason::NoTarget)),
            },
        };
        let search = RefinementSearch::new(
            m.sampler,
            m.rater,
            self.boundary,
            self.basis,
            m.sigma,
            m.search,
        );
        match search.search(target, approx) {
            Some(found) if found.confidence >= m.search.threshold => Some(Outcome::Placed {
                position: found.position,
                confidence: found.confidence,
            }),
            _ => Some(Outcome::Hole(HoleReason::LowConfidence)),
        }
    }

    fn near_border(&self, graph: &PinGraph, coord: GridCoord, approx: GeoPoint) -> bool {
        let margin = self.options.border_margin * self.basis.spacing_unit();
        if margin <= 0.0 {
            return false;
        }
        let check = match self.options.border_policy {
            BorderPolicy::Always => true,
            BorderPolicy::SkipInterior => !graph.bounds().is_some_and(|b| b.contains(coord)),
        };
        // relative slop keeps cells exactly one margin away from flickering
        check && self.boundary.distance_to_border(approx) < margin * (1.0 - BORDER_SLOP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Polygon;

    #[test]
    fn regular_growth_fills_the_boundary() {
        let basis = Basis::from_angle(0.0, 1.0, 1.0);
        let boundary = Polygon::rectangle(-0.5, -0.5, 4.5, 2.5);
        let options = GrowOptions {
            border_margin: 0.0,
            ..Default::default()
        };
        let mut graph = PinGraph::new(GeoPoint::zeros());
        let stage = GrowthEngine::new(basis, &boundary, &options, 1000).grow(&mut graph);
        assert_eq!(stage.termination, Termination::Exhausted);
        assert_eq!(graph.placed_count(), 15);
        assert!(graph.frontier().is_empty());
        assert_eq!(stage.total_placed(), 14);
    }

    #[test]
    fn cap_stops_growth_between_levels() {
        let basis = Basis::from_angle(0.0, 1.0, 1.0);
        let boundary = Polygon::rectangle(-10.5, -10.5, 10.5, 10.5);
        let options = GrowOptions::default();
        let mut graph = PinGraph::new(GeoPoint::zeros());
        let stage = GrowthEngine::new(basis, &boundary, &options, 5).grow(&mut graph);
        assert_eq!(stage.termination, Termination::CapReached);
        assert_eq!(stage.levels.len(), 1);
        assert_eq!(graph.placed_count(), 5);
        assert!(!graph.frontier().is_empty());
    }

    #[test]
    fn cancelled_run_keeps_a_consistent_graph() {
        let basis = Basis::from_angle(0.0, 1.0, 1.0);
        let boundary = Polygon::rectangle(-10.5, -10.5, 10.5, 10.5);
        let options = GrowOptions::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut graph = PinGraph::new(GeoPoint::zeros());
        let stage = GrowthEngine::new(basis, &boundary, &options, 1000)
            .with_cancel(&cancel)
            .grow(&mut graph);
        assert_eq!(stage.termination, Termination::Cancelled);
        assert_eq!(graph.placed_count(), 1);
        assert_eq!(graph.frontier().len(), 4);
    }

    #[test]
    fn near_border_candidates_become_holes_only_outside_bounds() {
        let basis = Basis::from_angle(0.0, 1.0, 1.0);
        // right edge 0.6 past column 2, top and bottom edges 0.5 past rows ±1
        let boundary = Polygon::rectangle(-0.5, -1.5, 2.6, 1.5);
        let options = GrowOptions::default();
        let mut graph = PinGraph::new(GeoPoint::zeros());
        GrowthEngine::new(basis, &boundary, &options, 1000).grow(&mut graph);
        assert_eq!(graph.status(GridCoord::new(1, 0)), Some(NodeStatus::Placed));
        assert_eq!(graph.status(GridCoord::new(2, 0)), Some(NodeStatus::Hole));
        assert_eq!(graph.status(GridCoord::new(0, 1)), Some(NodeStatus::Hole));
        assert_eq!(graph.status(GridCoord::new(-1, 0)), Some(NodeStatus::DeadEnd));
        assert_eq!(graph.placed_count(), 2);
    }

    /// Root at the origin plus a patched (1, 1): the bounds cover (1, 0),
    /// which is still a loose end half a spacing from the right edge.
    fn bounded_loose_end() -> (PinGraph, Polygon) {
        let mut graph = PinGraph::new(GeoPoint::zeros());
        graph.insert_patched(GridCoord::new(1, 1), GeoPoint::new(1.0, 1.0));
        graph.refresh_bounds();
        (graph, Polygon::rectangle(-3.0, -3.0, 1.5, 4.0))
    }

    #[test]
    fn always_policy_checks_candidates_inside_the_bounds() {
        let basis = Basis::from_angle(0.0, 1.0, 1.0);
        let (graph, boundary) = bounded_loose_end();
        let c = GridCoord::new(1, 0);
        assert!(graph.bounds().unwrap().contains(c));

        let skip = GrowOptions::default();
        let engine = GrowthEngine::new(basis, &boundary, &skip, 1000);
        assert!(matches!(engine.evaluate(&graph, c), Some(Outcome::Placed { .. })));

        let always = GrowOptions {
            border_policy: BorderPolicy::Always,
            ..Default::default()
        };
        let engine = GrowthEngine::new(basis, &boundary, &always, 1000);
        assert_eq!(
            engine.evaluate(&graph, c),
            Some(Outcome::Hole(HoleReason::NearBorder))
        );
    }

    #[test]
    fn cell_exactly_one_spacing_from_the_edge_is_kept() {
        let basis = Basis::from_angle(0.0, 10.0, 10.0);
        let boundary = Polygon::rectangle(-10.0, -10.0, 20.0, 10.0);
        let options = GrowOptions::default();
        let mut graph = PinGraph::new(GeoPoint::zeros());
        GrowthEngine::new(basis, &boundary, &options, 1000).grow(&mut graph);
        // columns 0 and 1 fit, the cells on the edge are outside
        assert_eq!(graph.placed_count(), 2);
        assert_eq!(graph.status(GridCoord::new(2, 0)), Some(NodeStatus::DeadEnd));
        assert_eq!(graph.status(GridCoord::new(0, 1)), Some(NodeStatus::DeadEnd));
    }

    #[test]
    fn cancel_inside_a_level_requeues_unevaluated_candidates() {
        use crate::image::{GeoTransform, ImageF32, Raster};
        use std::sync::Arc;

        let mut band = ImageF32::new(40, 40);
        for y in 0..40 {
            for x in 0..40 {
                band.set(x, y, (x + 2 * y) as f32);
            }
        }
        let raster = Arc::new(Raster::new(vec![band], GeoTransform::north_up(0.0, 40.0, 1.0)).unwrap());
        let sampler = PatchSampler::new(raster, 3.0, 3.0);
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let rater = move |_: &Patch, _: &Patch| {
            trigger.cancel();
            1.0f32
        };
        let search = SearchOptions::default();
        let basis = Basis::from_angle(0.0, 5.0, 5.0);
        let boundary = Polygon::rectangle(0.0, 0.0, 40.0, 40.0);
        let options = GrowOptions::default();
        let mut graph = PinGraph::new(GeoPoint::new(20.0, 20.0));
        let stage = GrowthEngine::new(basis, &boundary, &options, 1000)
            .with_matcher(Matcher {
                sampler: &sampler,
                rater: &rater,
                search: &search,
                sigma: (0.05, 0.05),
                root_patch: None,
            })
            .with_cancel(&cancel)
            .grow(&mut graph);

        assert_eq!(stage.termination, Termination::Cancelled);
        assert_eq!(stage.levels.len(), 1);
        let level = &stage.levels[0];
        assert_eq!(level.candidates, 4);
        assert!(level.placed >= 1);
        assert_eq!(level.placed + level.skipped, 4);
        for node in graph.nodes() {
            match node.status {
                NodeStatus::Placed => assert!(node.position.is_some(), "{} has no position", node.coord),
                NodeStatus::LooseEnd => {
                    assert!(graph.frontier().contains(&node.coord), "{} dropped", node.coord)
                }
                other => panic!("{} ended as {other:?}", node.coord),
            }
        }
        for d in crate::types::Direction::ALL {
            let c = GridCoord::ORIGIN.step(d);
            let status = graph.status(c).unwrap();
            assert!(status == NodeStatus::Placed || graph.frontier().contains(&c));
        }
    }
}
