use nalgebra::Point3;

const INTEGER_RATIO_TOLERANCE: f64 = 1e-6;

/// Number of grid points along one axis: `ceil(dimension / resolution) + 1`.
///
/// Ratios within floating-point noise of an integer are treated as that integer, so
/// `3.0 / 0.3` gives 11 points rather than 12.
pub fn points_per_axis(dimension: f64, resolution: f64) -> usize {
    let ratio = dimension / resolution;
    let rounded = ratio.round();
    let steps = if (ratio - rounded).abs() < INTEGER_RATIO_TOLERANCE {
        rounded
    } else {
        ratio.ceil()
    };
    steps.max(0.0) as usize + 1
}

/// Spatial layout of a cubic grid: spacing and point count per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub resolution: f64,
    pub points: usize,
}

impl GridSpec {
    pub fn new(dimension: f64, resolution: f64) -> Self {
        Self {
            resolution,
            points: points_per_axis(dimension, resolution),
        }
    }

    /// Physical edge length actually spanned by the grid points.
    pub fn span(&self) -> f64 {
        self.resolution * (self.points - 1) as f64
    }

    /// Position of grid point `(0, 0, 0)` for a grid centered on `center`.
    pub fn origin(&self, center: &Point3<f64>) -> Point3<f64> {
        let half = self.span() / 2.0;
        Point3::new(center.x - half, center.y - half, center.z - half)
    }

    pub fn point(&self, origin: &Point3<f64>, i: usize, j: usize, k: usize) -> Point3<f64> {
        Point3::new(
            origin.x + self.resolution * i as f64,
            origin.y + self.resolution * j as f64,
            origin.z + self.resolution * k as f64,
        )
    }

    /// Inclusive index range of grid points along one axis that lie within `cutoff` of
    /// `coordinate`, or `None` when the sphere misses the grid on that axis.
    pub fn index_range(&self, origin: f64, coordinate: f64, cutoff: f64) -> Option<(usize, usize)> {
        let last = (self.points - 1) as f64;
        let lo = ((coordinate - cutoff - origin) / self.resolution).ceil().max(0.0);
        let hi = ((coordinate + cutoff - origin) / self.resolution)
            .floor()
            .min(last);
        (lo <= hi).then_some((lo as usize, hi as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_48_points() {
        assert_eq!(points_per_axis(23.5, 0.5), 48);
    }

    #[test]
    fn non_integer_ratio_rounds_up() {
        assert_eq!(points_per_axis(24.0, 0.5), 49);
        assert_eq!(points_per_axis(10.0, 3.0), 5);
    }

    #[test]
    fn floating_point_noise_does_not_add_a_point() {
        assert_eq!(points_per_axis(3.0, 0.3), 11);
    }

    #[test]
    fn origin_centers_the_grid() {
        let spec = GridSpec::new(2.0, 0.5);
        assert_eq!(spec.points, 5);
        let origin = spec.origin(&Point3::new(1.0, 1.0, 1.0));
        assert_eq!(origin, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(spec.point(&origin, 4, 2, 0), Point3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn index_range_clamps_to_grid() {
        let spec = GridSpec::new(2.0, 0.5);
        assert_eq!(spec.index_range(0.0, 1.0, 0.6), Some((1, 3)));
        assert_eq!(spec.index_range(0.0, -0.2, 0.5), Some((0, 0)));
        assert_eq!(spec.index_range(0.0, 10.0, 1.0), None);
    }
}
