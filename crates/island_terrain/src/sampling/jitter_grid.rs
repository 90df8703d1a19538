//! Jittered-grid candidate sampling.
use glam::{Vec2, Vec3};
use mint::Vector2;
use rand::Rng;

use crate::placement::{GridCell, GridPoint};
use crate::sampling::{next_down, rand01, CandidateSampling};

/// One candidate per grid cell, offset from the cell center by a random jitter.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JitterGridSampling {
    /// Jitter amount in [0, 1], where 0 is cell centers and 1 reaches the cell border.
    pub jitter: f32,
    /// Cell size in island-local units.
    pub cell_size: f32,
}

impl JitterGridSampling {
    pub fn new(jitter: f32, cell_size: f32) -> Self {
        Self {
            jitter: jitter.clamp(0.0, 1.0),
            cell_size,
        }
    }
}

impl CandidateSampling for JitterGridSampling {
    fn generate(&self, area_extent: Vector2<f32>, rng: &mut dyn Rng) -> Vec<GridPoint> {
        let extent = Vec2::from(area_extent);
        if extent.x <= 0.0 || extent.y <= 0.0 {
            return Vec::new();
        }

        let eff = if self.cell_size.is_finite() && self.cell_size > 0.0 {
            self.cell_size
        } else {
            (extent.x.min(extent.y) / 10.0).max(1.0)
        };

        let cols = ((extent.x / eff).floor() as usize).max(1);
        let rows = ((extent.y / eff).floor() as usize).max(1);
        let cell = Vec2::new(extent.x / cols as f32, extent.y / rows as f32);
        let half = extent * 0.5;
        let max = Vec2::new(next_down(half.x), next_down(half.y));
        let reach = cell * 0.5 * self.jitter;

        let mut jitter_axis = |r: f32| {
            if r > 0.0 {
                (rand01(rng) * 2.0 - 1.0) * r
            } else {
                0.0
            }
        };

        let mut points = Vec::with_capacity(cols * rows);
        for j in 0..rows {
            for i in 0..cols {
                let center = -half + cell * Vec2::new(i as f32 + 0.5, j as f32 + 0.5);
                let offset = Vec2::new(jitter_axis(reach.x), jitter_axis(reach.y));
                let p = (center + offset).clamp(-half, max);
                points.push(GridPoint::new(
                    Vec3::new(p.x, 0.0, p.y),
                    GridCell(i as i32, j as i32),
                ));
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn new_clamps_jitter_value() {
        assert_eq!(JitterGridSampling::new(2.0, 1.0).jitter, 1.0);
        assert_eq!(JitterGridSampling::new(-1.0, 1.0).jitter, 0.0);
    }

    #[test]
    fn zero_jitter_places_points_at_cell_centers() {
        let sampler = JitterGridSampling::new(0.0, 2.0);
        let mut rng = StdRng::seed_from_u64(1);
        let points = sampler.generate(Vec2::new(4.0, 4.0).into(), &mut rng);

        assert_eq!(points.len(), 4);
        assert_eq!(points[0].position, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(points[0].cell, GridCell(0, 0));
        assert_eq!(points[3].position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(points[3].cell, GridCell(1, 1));
    }

    #[test]
    fn jittered_points_stay_inside_their_cell() {
        let sampler = JitterGridSampling::new(1.0, 2.5);
        let mut rng = StdRng::seed_from_u64(77);
        let points = sampler.generate(Vec2::new(10.0, 10.0).into(), &mut rng);
        assert_eq!(points.len(), 16);
        for p in &points {
            let x0 = -5.0 + p.cell.0 as f32 * 2.5;
            let z0 = -5.0 + p.cell.1 as f32 * 2.5;
            assert!(p.position.x >= x0 - 1e-4 && p.position.x <= x0 + 2.5 + 1e-4);
            assert!(p.position.z >= z0 - 1e-4 && p.position.z <= z0 + 2.5 + 1e-4);
            assert!(!p.is_lifted());
        }
    }

    #[test]
    fn empty_for_non_positive_extent() {
        let sampler = JitterGridSampling::new(0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        assert!(sampler.generate(Vec2::new(0.0, 5.0).into(), &mut rng).is_empty());
    }
}
