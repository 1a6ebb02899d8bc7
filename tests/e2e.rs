mod common;

use common::synthetic_field::plant_field;
use pin_network::boundary::Polygon;
use pin_network::diagnostics::Termination;
use pin_network::rate::RaterKind;
use pin_network::sample::Patch;
use pin_network::types::{GeoPoint, GridCoord, NodeStatus, StartCorner};
use pin_network::{FieldSetup, PinLocator, PinParams, PinRun};
use std::collections::BTreeSet;
use std::sync::Arc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 5 × 5 plants at 20..=60 inside a [10, 70]² boundary, rows along +x.
/// Every plant is at least one spacing from the edge.
fn field(missing: &[GeoPoint]) -> FieldSetup {
    FieldSetup::new(
        Polygon::rectangle(10.0, 10.0, 70.0, 70.0),
        GeoPoint::new(20.0, 20.0),
        GeoPoint::new(60.0, 20.0),
    )
    .with_raster(Arc::new(plant_field(80, 20.0, 10.0, missing)))
}

fn matching_params() -> PinParams {
    let mut params = PinParams {
        row_spacing: 10.0,
        col_spacing: 10.0,
        rater: Some(RaterKind::AbsoluteDifference),
        ..Default::default()
    };
    params.patch.overlay_radius = 0.0;
    params.search.threshold = 0.85;
    params
}

fn assert_graph_invariants(run: &PinRun) {
    let graph = &run.graph;
    let root = graph.root();
    assert_eq!(root.coord, GridCoord::ORIGIN);
    assert_eq!(root.status, NodeStatus::Placed);
    let mut seen = BTreeSet::new();
    for node in graph.nodes() {
        assert!(seen.insert(node.coord), "duplicate cell {}", node.coord);
        for (dir, n) in node.neighbours() {
            assert_eq!(node.coord.step(dir), n, "non-adjacent link at {}", node.coord);
        }
        if node.status == NodeStatus::Placed {
            assert!(node.position.is_some());
        }
    }
}

#[test]
fn geometry_only_field_places_every_cell() {
    init_logger();
    let setup = FieldSetup::new(
        Polygon::rectangle(10.0, 10.0, 70.0, 70.0),
        GeoPoint::new(20.0, 20.0),
        GeoPoint::new(60.0, 20.0),
    );
    let params = PinParams {
        row_spacing: 10.0,
        col_spacing: 10.0,
        ..Default::default()
    };
    let run = PinLocator::new(params, setup).run().unwrap();
    assert_eq!(run.graph.placed_count(), 25);
    assert!(run.graph.frontier().is_empty());
    assert_eq!(run.report.growth.termination, Termination::Exhausted);
    assert_eq!(run.map.placed_count(), 25);
    let corner = run.map.get(5, 5).unwrap();
    let p = corner.position.unwrap();
    assert!((p - GeoPoint::new(60.0, 60.0)).norm() < 1e-9, "p={p:?}");
    assert_graph_invariants(&run);
}

#[test]
fn intact_field_matches_every_plant_exactly() {
    init_logger();
    let run = PinLocator::new(matching_params(), field(&[])).run().unwrap();
    assert_eq!(run.graph.placed_count(), 25);
    assert_eq!(run.graph.count(NodeStatus::Hole), 0);
    assert_eq!(run.report.dead_ends, 20);
    assert!(run.report.self_similarity.unwrap() >= 0.975);
    for pin in run.map.placed() {
        let p = pin.position.unwrap();
        let expected = GeoPoint::new(10.0 + 10.0 * pin.col as f64, 10.0 + 10.0 * pin.row as f64);
        assert!((p - expected).norm() < 1e-9, "pin ({}, {}) at {p:?}", pin.col, pin.row);
    }
    assert_graph_invariants(&run);
}

#[test]
fn single_missing_plant_becomes_a_hole_then_gets_patched() {
    init_logger();
    let missing = [GeoPoint::new(40.0, 40.0)];

    let mut params = matching_params();
    params.max_patch_size = 0;
    let run = PinLocator::new(params, field(&missing)).run().unwrap();
    assert_eq!(run.graph.count(NodeStatus::Hole), 1);
    assert_eq!(
        run.graph.status(GridCoord::new(2, 2)),
        Some(NodeStatus::Hole)
    );
    assert_eq!(run.graph.placed_count(), 24);
    assert_eq!(run.report.unpatched_holes, 1);
    assert!(run.map.get(3, 3).unwrap().position.is_none());

    let mut params = matching_params();
    params.max_patch_size = 1;
    let run = PinLocator::new(params, field(&missing)).run().unwrap();
    assert_eq!(run.map.placed_count(), 25);
    assert_eq!(run.report.unpatched_holes, 0);
    assert_eq!(run.report.patching.patched, vec![GridCoord::new(2, 2)]);
    let p = run.map.get(3, 3).unwrap().position.unwrap();
    assert!((p - GeoPoint::new(40.0, 40.0)).norm() < 1e-9, "p={p:?}");
    assert_graph_invariants(&run);
}

#[test]
fn right_neighbour_lands_exactly_one_column_step_away() {
    let setup = FieldSetup::new(
        Polygon::rectangle(5.0, 15.0, 25.0, 25.0),
        GeoPoint::new(10.0, 20.0),
        GeoPoint::new(20.0, 20.0),
    );
    let params = PinParams {
        row_spacing: 1.0,
        col_spacing: 2.0,
        ..Default::default()
    };
    let run = PinLocator::new(params, setup).run().unwrap();
    assert_eq!(
        run.graph.position(GridCoord::new(1, 0)),
        Some(GeoPoint::new(12.0, 20.0))
    );
}

#[test]
fn score_equal_to_threshold_is_accepted() {
    init_logger();
    let rater = |t: &Patch, c: &Patch| if t.center() == c.center() { 1.0f32 } else { 0.85 };
    let run = PinLocator::new(matching_params(), field(&[GeoPoint::new(40.0, 40.0)]))
        .with_rater(rater)
        .run()
        .unwrap();
    assert_eq!(run.graph.placed_count(), 25);
    assert_eq!(run.graph.count(NodeStatus::Hole), 0);
}

#[test]
fn failing_self_similarity_is_fatal() {
    let rater = |_: &Patch, _: &Patch| 0.5f32;
    let err = PinLocator::new(matching_params(), field(&[]))
        .with_rater(rater)
        .run()
        .unwrap_err();
    assert_eq!(err, pin_network::PinError::SelfSimilarity(0.5));
}

#[test]
fn random_rater_keeps_graph_invariants() {
    init_logger();
    let mut params = matching_params();
    params.rater = Some(RaterKind::Random { seed: 7 });
    params.search.threshold = 0.5;
    let run = PinLocator::new(params, field(&[])).run().unwrap();
    assert!(run.report.self_similarity.is_none());
    assert!(run.graph.placed_count() > 1);
    let boundary = Polygon::rectangle(10.0, 10.0, 70.0, 70.0);
    for pin in run.map.placed() {
        let p = pin.position.unwrap();
        assert!(pin_network::boundary::Boundary::contains(&boundary, p));
    }
    assert_graph_invariants(&run);
}

#[test]
fn random_rater_grows_the_same_graph_on_every_run() {
    let run = || {
        let mut params = matching_params();
        params.rater = Some(RaterKind::Random { seed: 7 });
        params.search.threshold = 0.5;
        let run = PinLocator::new(params, field(&[])).run().unwrap();
        run.graph
            .nodes()
            .map(|n| (n.coord, n.status, n.position))
            .collect::<Vec<_>>()
    };
    #[cfg(feature = "parallel")]
    let (first, second) = {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        (pool.install(run), pool.install(run))
    };
    #[cfg(not(feature = "parallel"))]
    let (first, second) = (run(), run());
    assert_eq!(first, second);
}

#[test]
fn comparing_against_the_root_patch_matches_every_plant() {
    init_logger();
    let mut params = matching_params();
    params.grow.compare_from_root = true;
    let run = PinLocator::new(params, field(&[])).run().unwrap();
    assert_eq!(run.graph.placed_count(), 25);
    assert_eq!(run.graph.count(NodeStatus::Hole), 0);
    for pin in run.map.placed() {
        let p = pin.position.unwrap();
        let expected = GeoPoint::new(10.0 + 10.0 * pin.col as f64, 10.0 + 10.0 * pin.row as f64);
        assert!((p - expected).norm() < 1e-9, "pin ({}, {}) at {p:?}", pin.col, pin.row);
    }

    // a missing plant still fails against the root patch
    let mut params = matching_params();
    params.grow.compare_from_root = true;
    params.max_patch_size = 0;
    let run = PinLocator::new(params, field(&[GeoPoint::new(40.0, 40.0)]))
        .run()
        .unwrap();
    assert_eq!(run.graph.status(GridCoord::new(2, 2)), Some(NodeStatus::Hole));
    assert_eq!(run.graph.placed_count(), 24);
    assert_graph_invariants(&run);
}

#[test]
fn top_right_start_mirrors_both_axes() {
    let setup = FieldSetup::new(
        Polygon::rectangle(10.0, 10.0, 70.0, 50.0),
        GeoPoint::new(20.0, 20.0),
        GeoPoint::new(60.0, 20.0),
    );
    let params = PinParams {
        row_spacing: 10.0,
        col_spacing: 10.0,
        start_corner: StartCorner::TopRight,
        ..Default::default()
    };
    let run = PinLocator::new(params, setup).run().unwrap();
    // 5 columns × 3 rows; (1, 1) is the top-right pin
    assert_eq!(run.map.placed_count(), 15);
    let p = run.map.get(1, 1).unwrap().position.unwrap();
    assert!((p - GeoPoint::new(60.0, 40.0)).norm() < 1e-9, "p={p:?}");
    let q = run.map.get(5, 3).unwrap().position.unwrap();
    assert!((q - GeoPoint::new(20.0, 20.0)).norm() < 1e-9, "q={q:?}");
}
