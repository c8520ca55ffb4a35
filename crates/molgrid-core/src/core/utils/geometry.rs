use crate::core::models::structure::Structure;
use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};
use rand::Rng;
use std::f64::consts::TAU;

pub fn centroid(points: impl IntoIterator<Item = Point3<f64>>) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Grid center for a complex: the centroid of the ligand's heavy atoms, falling back to all
/// ligand atoms, then to the origin for an empty ligand.
pub fn ligand_center(ligand: &Structure) -> Point3<f64> {
    centroid(ligand.heavy_atoms().map(|a| a.position))
        .or_else(|| centroid(ligand.atoms().iter().map(|a| a.position)))
        .unwrap_or_else(Point3::origin)
}

/// Draws a rotation uniformly from SO(3) (Shoemake's subgroup algorithm).
pub fn random_rotation(rng: &mut impl Rng) -> UnitQuaternion<f64> {
    let u1: f64 = rng.r#gen();
    let u2: f64 = rng.r#gen();
    let u3: f64 = rng.r#gen();
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    UnitQuaternion::from_quaternion(Quaternion::new(
        b * (TAU * u3).cos(),
        a * (TAU * u2).sin(),
        a * (TAU * u2).cos(),
        b * (TAU * u3).sin(),
    ))
}

/// A rigid-body motion about a fixed grid center.
///
/// Points are rotated about `center` and then shifted by `translation`; the grid itself stays
/// centered on `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub center: Point3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl RigidTransform {
    pub fn identity(center: Point3<f64>) -> Self {
        Self {
            center,
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Draws a fresh transform. `max_translation` bounds each axis independently.
    pub fn random(
        center: Point3<f64>,
        rotate: bool,
        max_translation: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let rotation = if rotate {
            random_rotation(rng)
        } else {
            UnitQuaternion::identity()
        };
        let translation = if max_translation > 0.0 {
            Vector3::new(
                rng.gen_range(-max_translation..=max_translation),
                rng.gen_range(-max_translation..=max_translation),
                rng.gen_range(-max_translation..=max_translation),
            )
        } else {
            Vector3::zeros()
        };
        Self {
            center,
            rotation,
            translation,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == UnitQuaternion::identity() && self.translation == Vector3::zeros()
    }

    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.center + self.rotation * (point - self.center) + self.translation
    }
}
