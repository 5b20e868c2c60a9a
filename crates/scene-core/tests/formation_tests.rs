use glam::Vec3;
use scene_core::formation::{
    standard_inventory, CollapsePolicy, FoliageField, GeometryKind, InstanceRaw, Population,
};

const DT: f32 = 1.0 / 60.0;

fn translation(instance: &InstanceRaw) -> Vec3 {
    Vec3::new(
        instance.model[3][0],
        instance.model[3][1],
        instance.model[3][2],
    )
}

fn gifts() -> Population {
    let (config, _) = standard_inventory()[0];
    Population::new(config, 42, 1.0)
}

#[test]
fn inventory_matches_the_shipped_tree() {
    let inventory = standard_inventory();
    let names: Vec<&str> = inventory.iter().map(|(c, _)| c.name).collect();
    assert_eq!(names, ["gifts", "baubles", "lights", "photos"]);

    let (gifts, gifts_geo) = &inventory[0];
    assert_eq!(gifts.count, 50);
    assert_eq!(*gifts_geo, GeometryKind::Cube);
    assert!((gifts.weight - 0.8).abs() < 1e-6);
    assert!((gifts.outward_factor - 1.1).abs() < 1e-6);

    let (lights, _) = &inventory[2];
    assert_eq!(lights.count, 400);
    assert!((lights.weight - 3.0).abs() < 1e-6);

    let (photos, photos_geo) = &inventory[3];
    assert_eq!(photos.count, 60);
    assert_eq!(*photos_geo, GeometryKind::Plane);
    assert_eq!(photos.collapse, CollapsePolicy::FaceOutSway);
    assert!((photos.outward_factor - 1.15).abs() < 1e-6);

    // Heavier populations react slower
    assert!(gifts.weight < photos.weight && photos.weight < lights.weight);
}

#[test]
fn buffers_match_count_exactly() {
    let population = gifts();
    assert_eq!(population.chaos_positions().len(), population.count());
    assert_eq!(population.target_positions().len(), population.count());
}

#[test]
fn morph_endpoint_chaos() {
    let (config, _) = standard_inventory()[0];
    let mut population = Population::new(config, 42, 0.0);
    let mut out = Vec::new();
    population.advance(0.0, DT, 0.0, &mut out);
    assert_eq!(out.len(), population.count());
    for (instance, chaos) in out.iter().zip(population.chaos_positions()) {
        let p = translation(instance);
        assert!(
            p.distance(*chaos) < 1e-4,
            "at progress 0 the instance should sit at its chaos pose: {p:?} vs {chaos:?}"
        );
    }
}

#[test]
fn morph_endpoint_tree() {
    let mut population = gifts();
    let mut out = Vec::new();
    population.advance(1.0, DT, 0.0, &mut out);
    for (instance, target) in out.iter().zip(population.target_positions()) {
        let p = translation(instance);
        assert!(
            p.distance(*target) < 1e-4,
            "at progress 1 the instance should sit at its tree pose: {p:?} vs {target:?}"
        );
    }
}

#[test]
fn morph_midpoint_is_the_eased_blend() {
    let (config, _) = standard_inventory()[0];
    let mut population = Population::new(config, 42, 0.5);
    let mut out = Vec::new();
    // Global equals the smoothed value, so it stays put; ease(0.5) = 0.5.
    population.advance(0.5, DT, 0.0, &mut out);
    for ((instance, chaos), target) in out
        .iter()
        .zip(population.chaos_positions())
        .zip(population.target_positions())
    {
        let expected = (*chaos + *target) / 2.0;
        let p = translation(instance);
        assert!(
            p.distance(expected) < 1e-3,
            "midpoint blend off: {p:?} vs {expected:?}"
        );
    }
}

#[test]
fn smoothing_approaches_without_overshoot() {
    let mut population = gifts();
    let mut out = Vec::new();
    let mut prev = population.smoothed_progress();
    assert_eq!(prev, 1.0);
    for _ in 0..600 {
        population.advance(0.0, DT, 0.0, &mut out);
        let now = population.smoothed_progress();
        assert!(now <= prev + 1e-6, "smoothed progress overshot: {prev} -> {now}");
        assert!(now >= 0.0);
        prev = now;
    }
    assert!(
        prev < 0.01,
        "after 10 seconds at 60fps the gifts should have all but reached chaos, got {prev}"
    );
}

#[test]
fn smoothing_converges_geometrically() {
    let mut population = gifts();
    let mut out = Vec::new();
    let alpha = 0.8 * DT;
    let mut expected = 1.0_f32;
    for _ in 0..120 {
        population.advance(0.0, DT, 0.0, &mut out);
        expected += (0.0 - expected) * alpha;
        assert!(
            (population.smoothed_progress() - expected).abs() < 1e-4,
            "smoothed progress diverged from the closed form"
        );
    }
}

#[test]
fn heavier_populations_lag_lighter_ones() {
    let inventory = standard_inventory();
    let mut gifts = Population::new(inventory[0].0, 1, 1.0);
    let mut lights = Population::new(inventory[2].0, 1, 1.0);
    let mut out = Vec::new();
    for _ in 0..60 {
        gifts.advance(0.0, DT, 0.0, &mut out);
        lights.advance(0.0, DT, 0.0, &mut out);
    }
    assert!(
        lights.smoothed_progress() < gifts.smoothed_progress(),
        "lights (k=3.0) should be closer to the target than gifts (k=0.8)"
    );
}

#[test]
fn formed_ornaments_collapse_rotation_to_identity() {
    let mut population = gifts();
    let mut out = Vec::new();
    population.advance(1.0, DT, 0.0, &mut out);
    // Smoothed progress is 1, so the eased value is past the stabilise
    // threshold; the rotation part must be pure scale.
    for instance in &out {
        let m = instance.model;
        assert!(m[0][1].abs() < 1e-5 && m[0][2].abs() < 1e-5);
        assert!(m[1][0].abs() < 1e-5 && m[1][2].abs() < 1e-5);
        assert!(m[2][0].abs() < 1e-5 && m[2][1].abs() < 1e-5);
        assert!(m[0][0] > 0.0, "scale must stay positive");
    }
}

#[test]
fn formed_photos_face_outward() {
    let (config, _) = standard_inventory()[3];
    let mut photos = Population::new(config, 42, 1.0);
    let mut out = Vec::new();
    photos.advance(1.0, DT, 1.25, &mut out);
    for instance in &out {
        let m = instance.model;
        let p = translation(instance);
        let outward = Vec3::new(p.x, 0.0, p.z).normalize_or_zero();
        if outward.length_squared() < 0.5 {
            continue; // degenerate: instance on the trunk axis
        }
        // Third basis column is the plane normal scaled by the instance size.
        let normal = Vec3::new(m[2][0], m[2][1], m[2][2]).normalize();
        assert!(
            normal.dot(outward) > 0.95,
            "photo normal {normal:?} should point outward {outward:?}"
        );
    }
}

#[test]
fn tumbling_instances_rotate_while_chaotic() {
    let (config, _) = standard_inventory()[0];
    let mut population = Population::new(config, 42, 0.0);
    let mut first = Vec::new();
    let mut second = Vec::new();
    population.advance(0.0, DT, 0.0, &mut first);
    population.advance(0.0, DT, 0.1, &mut second);
    let changed = first
        .iter()
        .zip(&second)
        .filter(|(a, b)| a.model[0] != b.model[0])
        .count();
    assert!(
        changed > first.len() / 2,
        "most chaotic instances should tumble between frames, only {changed} moved"
    );
}

#[test]
fn instance_colors_come_from_the_configured_set() {
    let (config, _) = standard_inventory()[2]; // lights
    let mut population = Population::new(config, 9, 1.0);
    let mut out = Vec::new();
    population.advance(1.0, DT, 0.0, &mut out);
    for instance in &out {
        let rgb = [instance.color[0], instance.color[1], instance.color[2]];
        assert!(
            config.color_set.iter().any(|c| *c == rgb),
            "colour {rgb:?} not in the lights palette"
        );
        assert_eq!(instance.color[3], config.emissive);
    }
}

#[test]
fn foliage_field_samples_every_point() {
    let field = FoliageField::new(42, 1.0);
    assert_eq!(field.points().len(), 15_000);
    for point in field.points().iter().take(500) {
        let chaos = Vec3::from_array(point.chaos);
        assert!(chaos.length() <= 20.0 + 1e-3);
        assert!(point.random >= 0.0 && point.random < 1.0);
    }
}

#[test]
fn foliage_progress_tracks_the_global_signal() {
    let mut field = FoliageField::new(42, 1.0);
    for _ in 0..600 {
        field.advance(0.0, DT);
    }
    assert!(field.progress() < 0.01);
    for _ in 0..600 {
        field.advance(1.0, DT);
    }
    assert!(field.progress() > 0.99);
}
