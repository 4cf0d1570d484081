// Integration tests for tube mesh topology

use std::collections::HashMap;

use tube_core::traits::Validate;
use tube_geometry::{InterpolationMode, Polyline, RingMode, SplineEvaluator};
use tube_math::{DVec3, Point3};
use tube_mesh::{build_segment_tubes, build_tube, TriangleMesh, TubeConfig};

fn square() -> Vec<Point3> {
    vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(10.0, 0.0, 0.0),
        DVec3::new(10.0, 10.0, 0.0),
        DVec3::new(0.0, 10.0, 0.0),
    ]
}

/// Every directed edge must appear exactly once and be matched by its
/// reverse: the surface is closed and consistently oriented.
fn assert_watertight(mesh: &TriangleMesh) {
    let mut edges: HashMap<(u32, u32), usize> = HashMap::new();
    for [a, b, c] in mesh.triangles() {
        for edge in [(a, b), (b, c), (c, a)] {
            *edges.entry(edge).or_default() += 1;
        }
    }
    for (&(a, b), &count) in &edges {
        assert_eq!(count, 1, "directed edge {}->{} used {} times", a, b, count);
        assert!(
            edges.contains_key(&(b, a)),
            "edge {}->{} has no opposite",
            a,
            b
        );
    }
}

/// Signed volume via the divergence theorem; positive for outward winding.
fn signed_volume(mesh: &TriangleMesh) -> f64 {
    mesh.triangles()
        .map(|[a, b, c]| {
            let (a, b, c) = (
                mesh.positions[a as usize],
                mesh.positions[b as usize],
                mesh.positions[c as usize],
            );
            a.dot(b.cross(c)) / 6.0
        })
        .sum()
}

#[test]
fn open_spline_tube_is_watertight_and_outward() {
    let poly = SplineEvaluator::new()
        .evaluate(&square(), InterpolationMode::CardinalSpline, RingMode::Open)
        .unwrap();
    let mesh = build_tube(&poly, &TubeConfig::default()).unwrap();

    assert_eq!(mesh.vertex_count(), 20 * 400);
    assert_eq!(mesh.triangle_count(), 20 * 399 * 2 + 2 * 18);
    assert_eq!(mesh.cap_triangle_count(), 36);
    mesh.validate().unwrap();
    assert_watertight(&mesh);
    assert!(signed_volume(&mesh) > 0.0);
}

#[test]
fn closed_spline_tube_is_watertight_without_caps() {
    let poly = SplineEvaluator::new()
        .evaluate(&square(), InterpolationMode::CardinalSpline, RingMode::Closed)
        .unwrap();
    let mesh = build_tube(&poly, &TubeConfig::default()).unwrap();

    // The closing sample repeats the first one and does not get a ring.
    assert_eq!(mesh.ring_count(), poly.len() - 1);
    assert_eq!(mesh.vertex_count(), 20 * mesh.ring_count());
    assert_eq!(mesh.triangle_count(), 20 * mesh.ring_count() * 2);
    assert_eq!(mesh.cap_triangle_count(), 0);
    mesh.validate().unwrap();
    assert_watertight(&mesh);

    // A torus-like tube of radius 5 around a loop roughly 10 wide.
    let volume = signed_volume(&mesh);
    assert!(volume > 0.0, "volume {}", volume);
}

#[test]
fn segment_tubes_are_each_closed() {
    let mesh = build_segment_tubes(&square(), &TubeConfig::default()).unwrap();
    assert_eq!(mesh.triangle_count(), 3 * 76);
    assert_watertight(&mesh);
    assert!(signed_volume(&mesh) > 0.0);
}

#[test]
fn segment_tube_ring_centers_are_control_points() {
    let pts = square();
    let mesh = build_segment_tubes(&pts, &TubeConfig::default()).unwrap();
    let centers: Vec<Point3> = mesh.rings.iter().map(|r| r.center).collect();
    let expected = [pts[0], pts[1], pts[1], pts[2], pts[2], pts[3]];
    assert_eq!(centers.len(), expected.len());
    for (c, e) in centers.iter().zip(expected.iter()) {
        assert!((*c - *e).length() < 1e-12);
    }
}

#[test]
fn radius_scales_offsets_only() {
    let poly = SplineEvaluator::new()
        .evaluate(&square(), InterpolationMode::CardinalSpline, RingMode::Open)
        .unwrap();
    let small = build_tube(&poly, &TubeConfig::default().with_radius(2.0)).unwrap();
    let large = build_tube(&poly, &TubeConfig::default().with_radius(6.0)).unwrap();

    assert_eq!(small.indices, large.indices);
    for (rs, rl) in small.rings.iter().zip(&large.rings) {
        assert_eq!(rs.center, rl.center);
        for k in 0..rs.sides {
            let os = small.positions[rs.vertex(k) as usize] - rs.center;
            let ol = large.positions[rl.vertex(k) as usize] - rl.center;
            assert!((os * 3.0 - ol).length() < 1e-9);
        }
    }
}

#[test]
fn hairpin_path_does_not_flip() {
    // Out and straight back: the cross-section must not rotate half a turn.
    let poly = Polyline::new(vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(10.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 0.0),
    ]);
    let mesh = build_tube(&poly, &TubeConfig::default().with_radius(1.0)).unwrap();
    let first = mesh.positions[0] - mesh.rings[0].center;
    let last = mesh.positions[mesh.rings[2].first_vertex as usize] - mesh.rings[2].center;
    assert!((first - last).length() < 1e-9);
    mesh.validate().unwrap();
}
