//! Parametric curves for the face features and the tube sweep that turns
//! them into renderable meshes.
//!
//! Mouth and brows are rebuilt from fresh curves every frame; the sweep is
//! therefore kept allocation-light and panic-free. Curves are expressed in
//! the face group's local space (the glowing sphere has radius 1.2, features
//! sit just in front of it around z ≈ 1).

use glam::{Quat, Vec3};
use thiserror::Error;

use crate::mesh::MeshData;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurveError {
    #[error("tube sweep needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

pub const TUBE_RADIUS: f32 = 0.015;
pub const TUBE_RING_SEGMENTS: usize = 8;
pub const MOUTH_SAMPLES: usize = 32;
pub const BROW_SAMPLES: usize = 20;
pub const NOSE_SAMPLES: usize = 8;

/// A sampled centreline ready for sweeping.
#[derive(Clone, Debug)]
pub struct CurvePoints {
    pub points: Vec<Vec3>,
    pub closed: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct QuadraticBezier3 {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl QuadraticBezier3 {
    pub fn point(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        self.p0 * (u * u) + self.p1 * (2.0 * u * t) + self.p2 * (t * t)
    }

    pub fn sample(&self, n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| self.point(i as f32 / (n - 1) as f32))
            .collect()
    }
}

/// Mouth centreline. Above half openness the mouth becomes a closed "O"
/// ellipse; otherwise an open smile/frown arc whose depth follows the smile
/// parameter (positive = smile, negative = frown).
pub fn mouth_curve(openness: f32, smile: f32) -> CurvePoints {
    let width = 0.2;
    let y0 = -0.3;
    let z0 = 1.05;

    if openness > 0.5 {
        let radius = 0.05 + openness * 0.05;
        let points = (0..MOUTH_SAMPLES)
            .map(|i| {
                let theta = i as f32 / MOUTH_SAMPLES as f32 * std::f32::consts::TAU;
                Vec3::new(radius * theta.cos(), y0 + radius * 1.2 * theta.sin(), z0)
            })
            .collect();
        CurvePoints {
            points,
            closed: true,
        }
    } else {
        let depth = 0.05 * smile + 0.05;
        let curve = QuadraticBezier3 {
            p0: Vec3::new(-width / 2.0, y0 + 0.05, z0),
            p1: Vec3::new(0.0, y0 - depth, z0 + 0.05),
            p2: Vec3::new(width / 2.0, y0 + 0.05, z0),
        };
        CurvePoints {
            points: curve.sample(MOUTH_SAMPLES),
            closed: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowSide {
    Left,
    Right,
}

/// Brow centreline. Positive tilt drops the inner end and raises the outer
/// half as much (the angry shape); lift raises the whole brow.
pub fn brow_curve(side: BrowSide, tilt: f32, lift: f32) -> CurvePoints {
    let (x_start, x_end) = match side {
        BrowSide::Left => (-0.5, -0.2),
        BrowSide::Right => (0.2, 0.5),
    };

    let lift_offset = lift * 0.15;
    let tilt_offset = tilt * 0.15;
    let mut y_start = 0.3 + lift_offset;
    let y_mid = 0.55 + lift_offset;
    let mut y_end = 0.35 + lift_offset;

    // Inner endpoint: the end for the left brow, the start for the right.
    match side {
        BrowSide::Left => {
            y_end -= tilt_offset;
            y_start += tilt_offset * 0.5;
        }
        BrowSide::Right => {
            y_start -= tilt_offset;
            y_end += tilt_offset * 0.5;
        }
    }

    let curve = QuadraticBezier3 {
        p0: Vec3::new(x_start, y_start, 1.0),
        p1: Vec3::new((x_start + x_end) / 2.0, y_mid, 1.05),
        p2: Vec3::new(x_end, y_end, 1.05),
    };
    CurvePoints {
        points: curve.sample(BROW_SAMPLES),
        closed: false,
    }
}

fn line_points(a: Vec3, b: Vec3, n: usize) -> Vec<Vec3> {
    (0..n)
        .map(|i| a.lerp(b, i as f32 / (n - 1) as f32))
        .collect()
}

/// The two static segments of the L-shaped nose.
pub fn nose_curves() -> [CurvePoints; 2] {
    [
        CurvePoints {
            points: line_points(
                Vec3::new(-0.02, 0.15, 1.0),
                Vec3::new(-0.02, -0.10, 1.05),
                NOSE_SAMPLES,
            ),
            closed: false,
        },
        CurvePoints {
            points: line_points(
                Vec3::new(-0.02, -0.10, 1.05),
                Vec3::new(0.08, -0.10, 1.04),
                NOSE_SAMPLES,
            ),
            closed: false,
        },
    ]
}

/// Sweep a circular cross-section along the curve using parallel-transport
/// frames, producing a tube mesh with outward normals.
pub fn sweep_tube(
    curve: &CurvePoints,
    radius: f32,
    ring_segments: usize,
) -> Result<MeshData, CurveError> {
    let points = &curve.points;
    let n = points.len();
    if n < 2 {
        return Err(CurveError::TooFewPoints(n));
    }

    let tangent_at = |i: usize| -> Vec3 {
        let (prev, next) = if curve.closed {
            (points[(i + n - 1) % n], points[(i + 1) % n])
        } else {
            (points[i.saturating_sub(1)], points[(i + 1).min(n - 1)])
        };
        (next - prev).normalize_or_zero()
    };

    // Seed the frame with any vector perpendicular to the first tangent.
    let t0 = tangent_at(0);
    let mut prev_tangent = if t0.length_squared() > 1e-12 { t0 } else { Vec3::Z };
    let seed = if prev_tangent.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let mut normal = (seed - prev_tangent * seed.dot(prev_tangent)).normalize_or_zero();
    if normal.length_squared() < 1e-6 {
        normal = Vec3::Y;
    }

    let mut mesh = MeshData::default();
    for i in 0..n {
        let tangent = tangent_at(i);
        if tangent.length_squared() > 1e-12 {
            // Transport the frame across the bend between tangents.
            let rot = Quat::from_rotation_arc(prev_tangent, tangent);
            normal = (rot * normal).normalize_or_zero();
            prev_tangent = tangent;
        }
        let binormal = prev_tangent.cross(normal).normalize_or_zero();

        for j in 0..ring_segments {
            let theta = j as f32 / ring_segments as f32 * std::f32::consts::TAU;
            let dir = normal * theta.cos() + binormal * theta.sin();
            mesh.positions.push((points[i] + dir * radius).to_array());
            mesh.normals.push(dir.to_array());
        }
    }

    let ring = ring_segments as u32;
    let span = if curve.closed { n } else { n - 1 };
    for i in 0..span {
        let a0 = (i as u32) * ring;
        let b0 = (((i + 1) % n) as u32) * ring;
        for j in 0..ring {
            let j1 = (j + 1) % ring;
            mesh.indices.extend_from_slice(&[
                a0 + j,
                b0 + j,
                a0 + j1,
                b0 + j,
                b0 + j1,
                a0 + j1,
            ]);
        }
    }

    Ok(mesh)
}
