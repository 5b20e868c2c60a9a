use glam::Vec3;
use scene_core::face_geometry::{
    brow_curve, mouth_curve, nose_curves, sweep_tube, BrowSide, CurveError, CurvePoints,
    QuadraticBezier3, BROW_SAMPLES, MOUTH_SAMPLES, TUBE_RADIUS, TUBE_RING_SEGMENTS,
};
use scene_core::mesh::{plane, unit_cube, uv_sphere, MeshData};

fn assert_mesh_is_well_formed(mesh: &MeshData) {
    assert_eq!(mesh.positions.len(), mesh.normals.len());
    assert!(!mesh.indices.is_empty());
    assert_eq!(mesh.indices.len() % 3, 0, "indices must form whole triangles");
    let max = mesh.positions.len() as u32;
    for &i in &mesh.indices {
        assert!(i < max, "index {i} out of bounds ({max} vertices)");
    }
    for n in &mesh.normals {
        let len = Vec3::from_array(*n).length();
        assert!(
            (len - 1.0).abs() < 1e-3,
            "normals should be unit length, got {len}"
        );
    }
}

#[test]
fn bezier_interpolates_its_endpoints() {
    let curve = QuadraticBezier3 {
        p0: Vec3::new(-1.0, 0.0, 0.0),
        p1: Vec3::new(0.0, 2.0, 0.0),
        p2: Vec3::new(1.0, 0.0, 0.0),
    };
    assert!(curve.point(0.0).distance(curve.p0) < 1e-6);
    assert!(curve.point(1.0).distance(curve.p2) < 1e-6);
    // The midpoint bends toward the control point
    assert!((curve.point(0.5).y - 1.0).abs() < 1e-6);
}

#[test]
fn closed_mouth_is_an_open_arc() {
    let curve = mouth_curve(0.0, 1.0);
    assert!(!curve.closed);
    assert_eq!(curve.points.len(), MOUTH_SAMPLES);
    let first = curve.points[0];
    let last = *curve.points.last().unwrap();
    assert!((first.x - -0.1).abs() < 1e-6);
    assert!((last.x - 0.1).abs() < 1e-6);
}

#[test]
fn open_mouth_becomes_a_closed_ellipse() {
    let curve = mouth_curve(0.8, 0.0);
    assert!(curve.closed);
    // Every point sits on the ellipse around the mouth anchor
    let radius = 0.05 + 0.8 * 0.05;
    for p in &curve.points {
        let dx = p.x / radius;
        let dy = (p.y + 0.3) / (radius * 1.2);
        assert!(
            (dx * dx + dy * dy - 1.0).abs() < 1e-3,
            "point {p:?} off the mouth ellipse"
        );
        assert!((p.z - 1.05).abs() < 1e-6);
    }
}

#[test]
fn mouth_shape_switches_at_half_openness() {
    assert!(!mouth_curve(0.5, 0.0).closed);
    assert!(mouth_curve(0.501, 0.0).closed);
}

#[test]
fn smile_bends_down_frown_bends_up() {
    // The arc's control point dips for a smile, so the sampled middle sits
    // lower than for a frown.
    let smile = mouth_curve(0.0, 1.0);
    let frown = mouth_curve(0.0, -1.0);
    let mid_smile = smile.points[MOUTH_SAMPLES / 2].y;
    let mid_frown = frown.points[MOUTH_SAMPLES / 2].y;
    assert!(
        mid_smile < mid_frown,
        "smile midpoint {mid_smile} should dip below frown midpoint {mid_frown}"
    );
}

#[test]
fn brows_mirror_left_and_right() {
    let left = brow_curve(BrowSide::Left, 0.0, 0.0);
    let right = brow_curve(BrowSide::Right, 0.0, 0.0);
    assert_eq!(left.points.len(), BROW_SAMPLES);
    // x ranges mirror around the nose
    assert!((left.points[0].x - -0.5).abs() < 1e-6);
    assert!((left.points.last().unwrap().x - -0.2).abs() < 1e-6);
    assert!((right.points[0].x - 0.2).abs() < 1e-6);
    assert!((right.points.last().unwrap().x - 0.5).abs() < 1e-6);
}

#[test]
fn positive_tilt_drops_the_inner_ends() {
    // Angry brows angle in: inner endpoint down, outer slightly up.
    let flat = brow_curve(BrowSide::Left, 0.0, 0.0);
    let angry = brow_curve(BrowSide::Left, 1.0, 0.0);
    let inner_flat = flat.points.last().unwrap().y;
    let inner_angry = angry.points.last().unwrap().y;
    assert!(
        inner_angry < inner_flat,
        "tilt should drop the inner left endpoint"
    );
    assert!(angry.points[0].y > flat.points[0].y, "outer end rises");

    let angry_right = brow_curve(BrowSide::Right, 1.0, 0.0);
    let flat_right = brow_curve(BrowSide::Right, 0.0, 0.0);
    assert!(angry_right.points[0].y < flat_right.points[0].y);
}

#[test]
fn lift_raises_the_whole_brow() {
    let flat = brow_curve(BrowSide::Right, 0.0, 0.0);
    let lifted = brow_curve(BrowSide::Right, 0.0, 1.0);
    for (a, b) in flat.points.iter().zip(&lifted.points) {
        assert!(
            (b.y - a.y - 0.15).abs() < 1e-5,
            "lift should translate every sample by 0.15"
        );
    }
}

#[test]
fn tube_sweep_produces_a_valid_mesh() {
    let curve = mouth_curve(0.0, 1.0);
    let mesh = sweep_tube(&curve, TUBE_RADIUS, TUBE_RING_SEGMENTS).expect("sweep");
    assert_mesh_is_well_formed(&mesh);
    assert_eq!(mesh.positions.len(), MOUTH_SAMPLES * TUBE_RING_SEGMENTS);
}

#[test]
fn closed_tube_wraps_its_index_ring() {
    let curve = mouth_curve(0.9, 0.0);
    let mesh = sweep_tube(&curve, TUBE_RADIUS, TUBE_RING_SEGMENTS).expect("sweep");
    assert_mesh_is_well_formed(&mesh);
    // A closed sweep has as many quad bands as rings
    let quads = MOUTH_SAMPLES * TUBE_RING_SEGMENTS;
    assert_eq!(mesh.indices.len(), quads * 6);
}

#[test]
fn tube_surface_hugs_the_centreline() {
    let curve = brow_curve(BrowSide::Left, 0.3, 0.2);
    let mesh = sweep_tube(&curve, TUBE_RADIUS, TUBE_RING_SEGMENTS).expect("sweep");
    for (i, p) in mesh.positions.iter().enumerate() {
        let centre = curve.points[i / TUBE_RING_SEGMENTS];
        let dist = Vec3::from_array(*p).distance(centre);
        assert!(
            (dist - TUBE_RADIUS).abs() < 1e-4,
            "ring vertex {dist} away from centreline, expected {TUBE_RADIUS}"
        );
    }
}

#[test]
fn degenerate_curves_are_rejected() {
    let empty = CurvePoints {
        points: vec![],
        closed: false,
    };
    assert_eq!(
        sweep_tube(&empty, TUBE_RADIUS, TUBE_RING_SEGMENTS),
        Err(CurveError::TooFewPoints(0))
    );
    let dot = CurvePoints {
        points: vec![Vec3::ZERO],
        closed: false,
    };
    assert_eq!(
        sweep_tube(&dot, TUBE_RADIUS, TUBE_RING_SEGMENTS),
        Err(CurveError::TooFewPoints(1))
    );
}

#[test]
fn nose_is_an_l_of_two_segments() {
    let [vertical, horizontal] = nose_curves();
    assert!(!vertical.closed && !horizontal.closed);
    // The two segments share the elbow
    let elbow_a = *vertical.points.last().unwrap();
    let elbow_b = horizontal.points[0];
    assert!(elbow_a.distance(elbow_b) < 1e-6);
    sweep_tube(&vertical, TUBE_RADIUS, TUBE_RING_SEGMENTS).expect("vertical sweep");
    sweep_tube(&horizontal, TUBE_RADIUS, TUBE_RING_SEGMENTS).expect("horizontal sweep");
}

#[test]
fn primitive_meshes_are_well_formed() {
    assert_mesh_is_well_formed(&unit_cube());
    assert_mesh_is_well_formed(&uv_sphere(16, 12));
    assert_mesh_is_well_formed(&plane(1.0, 1.2));
}

#[test]
fn sphere_vertices_sit_on_the_unit_sphere() {
    let sphere = uv_sphere(24, 16);
    for p in &sphere.positions {
        let len = Vec3::from_array(*p).length();
        assert!((len - 1.0).abs() < 1e-4);
    }
}

#[test]
fn cube_spans_the_unit_box() {
    let cube = unit_cube();
    for p in &cube.positions {
        for c in p {
            assert!((c.abs() - 0.5).abs() < 1e-6);
        }
    }
    assert_eq!(cube.indices.len(), 36);
}
