//! Object placement on a classified island surface.
//!
//! Candidates come from a [`crate::sampling::CandidateSampling`] strategy. The
//! [`ObjectPositionFilter`] keeps those whose pixel height lies inside the configured range and
//! whose terrain blend contains enough of the target terrain type, then lifts survivors onto
//! the surface.
use glam::Vec3;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::heightmap::Heightmap;
use crate::sampling::JitterGridSampling;
use crate::terrain::{OrderedCatalog, TerrainBlend, TerrainTypeId};

/// Identifier of the candidate-grid cell a point was generated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell(
    /// Cell index along X.
    pub i32,
    /// Cell index along Z.
    pub i32,
);

/// Placement candidate in island-local space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    /// Local position; `y` is zero until the point is lifted.
    pub position: Vec3,
    pub cell: GridCell,
    lifted: bool,
}

impl GridPoint {
    pub fn new(position: Vec3, cell: GridCell) -> Self {
        Self {
            position,
            cell,
            lifted: false,
        }
    }

    /// Sets the elevation of the point.
    pub fn lift(&mut self, elevation: f32) {
        self.position.y = elevation;
        self.lifted = true;
    }

    pub fn is_lifted(&self) -> bool {
        self.lifted
    }
}

/// Rules for accepting placement candidates.
#[non_exhaustive]
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementConfig {
    /// Terrain type a candidate must stand on.
    pub terrain_type: TerrainTypeId,
    /// Minimum share of `terrain_type` in the pixel's blend.
    pub min_fraction: f32,
    /// Lowest accepted normalized height.
    pub min_height: f32,
    /// Highest accepted normalized height.
    pub max_height: f32,
    /// World height of a normalized height of 1.
    pub max_terrain_height: f32,
    /// Candidate grid.
    pub sampling: JitterGridSampling,
}

impl PlacementConfig {
    pub fn new(terrain_type: impl Into<TerrainTypeId>) -> Self {
        Self {
            terrain_type: terrain_type.into(),
            min_fraction: 0.5,
            min_height: 0.0,
            max_height: 1.0,
            max_terrain_height: 1.0,
            sampling: JitterGridSampling::new(0.5, 1.0),
        }
    }

    pub fn with_min_fraction(mut self, min_fraction: f32) -> Self {
        self.min_fraction = min_fraction;
        self
    }

    pub fn with_height_range(mut self, min_height: f32, max_height: f32) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    pub fn with_max_terrain_height(mut self, max_terrain_height: f32) -> Self {
        self.max_terrain_height = max_terrain_height;
        self
    }

    pub fn with_sampling(mut self, sampling: JitterGridSampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_height > self.max_height {
            return Err(Error::InvalidConfig(
                "min_height must be <= max_height".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_fraction) {
            return Err(Error::InvalidConfig(
                "min_fraction must be in [0, 1]".into(),
            ));
        }
        if !self.max_terrain_height.is_finite() || self.max_terrain_height < 0.0 {
            return Err(Error::InvalidConfig(
                "max_terrain_height must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of filtering a candidate set.
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct PlacementResult {
    /// Accepted, lifted points in candidate order.
    pub positions: Vec<GridPoint>,
    pub positions_evaluated: usize,
    pub positions_rejected: usize,
}

/// Accepts, rejects and lifts placement candidates.
#[derive(Clone, Debug)]
pub struct ObjectPositionFilter {
    config: PlacementConfig,
    radius: f32,
}

impl ObjectPositionFilter {
    /// Filter for an island spanning `[-radius, radius]` on X and Z.
    ///
    /// The target terrain type must exist in `catalog`.
    pub fn try_new(config: PlacementConfig, radius: f32, catalog: &OrderedCatalog) -> Result<Self> {
        config.validate()?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidConfig("radius must be > 0".into()));
        }
        if !catalog.contains(&config.terrain_type) {
            return Err(Error::UnknownTerrainType {
                id: config.terrain_type.clone(),
            });
        }
        Ok(Self { config, radius })
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// True if the pixel at `index` satisfies both the height and the terrain rule.
    pub fn accepts(&self, heightmap: &Heightmap, blends: &[TerrainBlend], index: usize) -> bool {
        let height = heightmap.at(index);
        if height < self.config.min_height || height > self.config.max_height {
            return false;
        }
        blends
            .get(index)
            .is_some_and(|b| b.has_fraction(&self.config.terrain_type, self.config.min_fraction))
    }

    /// Keeps accepted candidates in order and lifts them to `height * max_terrain_height`.
    pub fn filter(
        &self,
        candidates: Vec<GridPoint>,
        heightmap: &Heightmap,
        blends: &[TerrainBlend],
    ) -> Result<PlacementResult> {
        if blends.len() != heightmap.len() {
            return Err(Error::ResolutionMismatch {
                context: "terrain blends".into(),
                expected: heightmap.len(),
                actual: blends.len(),
            });
        }

        let evaluated = candidates.len();
        if evaluated == 0 {
            warn!(
                "Placement on '{}': no candidates to evaluate.",
                self.config.terrain_type
            );
        }
        let positions: Vec<GridPoint> = candidates
            .into_iter()
            .filter_map(|mut point| {
                let index = heightmap.local_to_index(point.position, self.radius);
                if !self.accepts(heightmap, blends, index) {
                    return None;
                }
                point.lift(heightmap.at(index) * self.config.max_terrain_height);
                Some(point)
            })
            .collect();

        let rejected = evaluated - positions.len();
        debug!(
            "Placement on '{}': {} of {} candidates accepted.",
            self.config.terrain_type,
            positions.len(),
            evaluated
        );

        Ok(PlacementResult {
            positions,
            positions_evaluated: evaluated,
            positions_rejected: rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::terrain::{BlendingEngine, TerrainType};

    fn engine() -> BlendingEngine {
        let catalog = OrderedCatalog::try_new(vec![
            TerrainType::new("sand", Color::WHITE, 0.0),
            TerrainType::new("grass", Color::WHITE, 0.3),
            TerrainType::new("rock", Color::WHITE, 0.7),
        ])
        .expect("valid catalog");
        BlendingEngine::new(catalog, 0.1)
    }

    fn surface(heights: Vec<f32>) -> (Heightmap, Vec<TerrainBlend>) {
        let engine = engine();
        let map = Heightmap::try_from_vec(2, heights).expect("2x2 map");
        let blends = map.as_slice().iter().map(|h| engine.classify_height(*h)).collect();
        (map, blends)
    }

    fn candidate(x: f32, z: f32) -> GridPoint {
        GridPoint::new(Vec3::new(x, 0.0, z), GridCell(0, 0))
    }

    fn filter(config: PlacementConfig) -> ObjectPositionFilter {
        ObjectPositionFilter::try_new(config, 1.0, engine().catalog()).expect("valid filter")
    }

    #[test]
    fn rejects_pixels_below_min_height_regardless_of_type() {
        let (map, blends) = surface(vec![0.05, 0.05, 0.05, 0.05]);
        let f = filter(
            PlacementConfig::new("sand")
                .with_min_fraction(0.0)
                .with_height_range(0.1, 1.0),
        );
        let result = f.filter(vec![candidate(-0.5, -0.5)], &map, &blends).expect("filter");
        assert!(result.positions.is_empty());
        assert_eq!(result.positions_rejected, 1);
    }

    #[test]
    fn keeps_order_and_lifts_accepted_points() {
        // Pixels: (0,0)=grass, (1,0)=sand, (0,1)=grass, (1,1)=rock.
        let (map, blends) = surface(vec![0.5, 0.1, 0.4, 0.9]);
        let f = filter(
            PlacementConfig::new("grass")
                .with_min_fraction(0.9)
                .with_max_terrain_height(20.0),
        );
        let candidates = vec![
            candidate(-0.5, 0.5),
            candidate(0.5, -0.5),
            candidate(-0.5, -0.5),
            candidate(0.5, 0.5),
        ];
        let result = f.filter(candidates, &map, &blends).expect("filter");

        assert_eq!(result.positions_evaluated, 4);
        assert_eq!(result.positions.len(), 2);
        assert_eq!(result.positions[0].position, Vec3::new(-0.5, 8.0, 0.5));
        assert_eq!(result.positions[1].position, Vec3::new(-0.5, 10.0, -0.5));
        assert!(result.positions.iter().all(GridPoint::is_lifted));
    }

    #[test]
    fn blended_pixels_need_enough_of_the_target_type() {
        // 0.29 is 60% sand / 40% grass.
        let (map, blends) = surface(vec![0.29; 4]);
        let strict = filter(PlacementConfig::new("grass").with_min_fraction(0.5));
        let loose = filter(PlacementConfig::new("grass").with_min_fraction(0.35));
        let p = || vec![candidate(0.0, 0.0)];
        assert!(strict.filter(p(), &map, &blends).expect("filter").positions.is_empty());
        assert_eq!(loose.filter(p(), &map, &blends).expect("filter").positions.len(), 1);
    }

    #[test]
    fn config_errors_are_reported() {
        let catalog = engine().catalog().clone();
        let bad_range = PlacementConfig::new("grass").with_height_range(0.8, 0.2);
        assert!(matches!(
            ObjectPositionFilter::try_new(bad_range, 1.0, &catalog),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ObjectPositionFilter::try_new(PlacementConfig::new("lava"), 1.0, &catalog),
            Err(Error::UnknownTerrainType { .. })
        ));
    }

    #[test]
    fn mismatched_blend_buffer_is_an_error() {
        let (map, _) = surface(vec![0.5; 4]);
        let f = filter(PlacementConfig::new("grass"));
        let err = f.filter(vec![candidate(0.0, 0.0)], &map, &[]).unwrap_err();
        assert!(matches!(err, Error::ResolutionMismatch { expected: 4, actual: 0, .. }));
    }
}
