use rand::prelude::*;
use scene_core::sampling::{
    chaos_position, ease_in_out_cubic, mix_seed, scatter_box, tree_position, TreeDims,
};

#[test]
fn chaos_samples_stay_inside_the_ball() {
    let mut rng = StdRng::seed_from_u64(7);
    for radius in [1.0_f32, 5.0, 15.0, 20.0] {
        for _ in 0..2000 {
            let p = chaos_position(&mut rng, radius);
            assert!(
                p.length() <= radius + 1e-4,
                "sample {p:?} escaped ball of radius {radius}"
            );
        }
    }
}

#[test]
fn chaos_samples_fill_the_volume() {
    // Uniform-by-volume sampling puts roughly half the points inside
    // r = R * cbrt(0.5); a surface-biased sampler would fail this badly.
    let mut rng = StdRng::seed_from_u64(11);
    let radius = 10.0_f32;
    let half_volume_radius = radius * 0.5_f32.cbrt();
    let total = 4000;
    let inner = (0..total)
        .filter(|_| chaos_position(&mut rng, radius).length() < half_volume_radius)
        .count();
    let fraction = inner as f32 / total as f32;
    assert!(
        (fraction - 0.5).abs() < 0.05,
        "expected ~50% of samples inside the half-volume radius, got {fraction}"
    );
}

#[test]
fn tree_samples_sit_on_the_cone_shell() {
    let mut rng = StdRng::seed_from_u64(3);
    let dims = TreeDims {
        height: 12.0,
        base_radius: 5.0,
        y_offset: -4.0,
    };
    for _ in 0..2000 {
        let p = tree_position(&mut rng, dims);
        assert!(
            p.y >= dims.y_offset - 1e-4 && p.y <= dims.y_offset + dims.height + 1e-4,
            "height {} outside the cone span",
            p.y
        );
        let normalized = (p.y - dims.y_offset) / dims.height;
        let expected_ring = dims.base_radius * (1.0 - normalized);
        let actual_ring = (p.x * p.x + p.z * p.z).sqrt();
        assert!(
            (actual_ring - expected_ring).abs() < 1e-3,
            "ring radius {actual_ring} should be {expected_ring} at normalized height {normalized}"
        );
    }
}

#[test]
fn tree_sampler_respects_custom_offsets() {
    let mut rng = StdRng::seed_from_u64(5);
    let dims = TreeDims {
        height: 4.0,
        base_radius: 2.0,
        y_offset: -5.0,
    };
    for _ in 0..500 {
        let p = tree_position(&mut rng, dims);
        assert!(p.y >= -5.0 - 1e-4 && p.y <= -1.0 + 1e-4);
    }
}

#[test]
fn scatter_box_stays_in_extent() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..1000 {
        let p = scatter_box(&mut rng, 10.0);
        assert!(p.x.abs() <= 5.0 && p.y.abs() <= 5.0 && p.z.abs() <= 5.0);
    }
}

#[test]
fn ease_hits_the_anchor_points() {
    assert_eq!(ease_in_out_cubic(0.0), 0.0);
    assert_eq!(ease_in_out_cubic(1.0), 1.0);
    assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn ease_is_monotonic_non_decreasing() {
    let mut prev = ease_in_out_cubic(0.0);
    for i in 1..=1000 {
        let t = i as f32 / 1000.0;
        let e = ease_in_out_cubic(t);
        assert!(
            e >= prev - 1e-6,
            "ease decreased at t={t}: {prev} -> {e}"
        );
        prev = e;
    }
}

#[test]
fn ease_stays_within_unit_interval() {
    for i in 0..=1000 {
        let t = i as f32 / 1000.0;
        let e = ease_in_out_cubic(t);
        assert!((-1e-6..=1.0 + 1e-6).contains(&e), "ease({t}) = {e}");
    }
}

#[test]
fn mixed_seeds_are_distinct_per_stream() {
    let base = 42;
    let seeds: Vec<u64> = (0..16).map(|i| mix_seed(base, i)).collect();
    for i in 0..seeds.len() {
        for j in (i + 1)..seeds.len() {
            assert_ne!(seeds[i], seeds[j], "streams {i} and {j} collided");
        }
    }
}
