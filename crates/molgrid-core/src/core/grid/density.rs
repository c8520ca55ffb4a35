use super::spec::GridSpec;
use crate::core::models::grid::VoxelGrid;
use crate::core::models::structure::Structure;
use crate::core::typing::typemap::TypeMap;
use crate::core::utils::geometry::RigidTransform;

/// How a single atom contributes to the grid points around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DensityKernel {
    /// Gaussian core with a quadratic tail; contributions of overlapping atoms are summed.
    #[default]
    Smooth,
    /// 1.0 for every point inside the cutoff sphere, combined by maximum.
    Binary,
}

/// Density of an atom of radius `radius` at distance `distance`.
///
/// Within one radius the value is a Gaussian with width `radius / 2`; beyond that it follows
/// a quadratic that meets the Gaussian smoothly at `radius` and reaches zero at 1.5 radii.
/// Everything at or beyond `radius_multiple * radius` is zero.
pub fn atom_density(distance: f64, radius: f64, radius_multiple: f64) -> f64 {
    if distance >= radius_multiple * radius {
        return 0.0;
    }
    let h = 0.5 * radius;
    let d2 = distance * distance;
    if distance <= radius {
        (-d2 / (2.0 * h * h)).exp()
    } else {
        let ie2 = (-2.0f64).exp();
        d2 * ie2 / (h * h) - 6.0 * distance * ie2 / h + 9.0 * ie2
    }
}

/// Renders typed structures into channel blocks of a [`VoxelGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voxelizer {
    pub spec: GridSpec,
    pub radius_multiple: f64,
    pub use_covalent_radius: bool,
    pub kernel: DensityKernel,
}

impl Voxelizer {
    /// Adds the atoms of `structure` into `grid`, placing type-map channel `c` at grid channel
    /// `channel_offset + c`. Atoms are moved by `transform` first; the grid is centered on
    /// `transform.center`. Atoms whose type is not in `type_map` are skipped.
    pub fn voxelize(
        &self,
        structure: &Structure,
        type_map: &TypeMap,
        transform: &RigidTransform,
        grid: &mut VoxelGrid,
        channel_offset: usize,
    ) {
        debug_assert_eq!(grid.points(), self.spec.points);
        debug_assert!(channel_offset + type_map.num_channels() <= grid.channels());

        let origin = self.spec.origin(&transform.center);

        for atom in structure.atoms() {
            let (Some(channel), Some(info)) = (type_map.channel(atom.type_index), atom.info())
            else {
                continue;
            };
            let radius = info.radius(self.use_covalent_radius);
            let cutoff = self.radius_multiple * radius;
            let position = transform.apply(&atom.position);

            let ranges = (
                self.spec.index_range(origin.x, position.x, cutoff),
                self.spec.index_range(origin.y, position.y, cutoff),
                self.spec.index_range(origin.z, position.z, cutoff),
            );
            let (Some((i0, i1)), Some((j0, j1)), Some((k0, k1))) = ranges else {
                continue;
            };

            let target = channel_offset + channel;
            for i in i0..=i1 {
                for j in j0..=j1 {
                    for k in k0..=k1 {
                        let point = self.spec.point(&origin, i, j, k);
                        let distance = (point - position).norm();
                        let idx = grid.index(target, i, j, k);
                        let cell = &mut grid.data_mut()[idx];
                        match self.kernel {
                            DensityKernel::Smooth => {
                                *cell += atom_density(distance, radius, self.radius_multiple)
                                    as f32;
                            }
                            DensityKernel::Binary => {
                                if distance < cutoff {
                                    *cell = 1.0;
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
