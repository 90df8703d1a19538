//! Object position generation on a classified island.
use std::sync::Arc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::generation::texture::TerrainTexture;
use crate::heightmap::Heightmap;
use crate::placement::{ObjectPositionFilter, PlacementResult};
use crate::sampling::CandidateSampling;
use crate::task::{Handoff, StepPolicy, TaskWork};

/// Samples candidates over the whole island and filters them in a single step.
pub struct GenerateObjectPositions {
    filter: ObjectPositionFilter,
    radius: f32,
    seed: u64,

    get_heightmap: Handoff<Heightmap>,
    get_texture: Handoff<TerrainTexture>,

    inputs: Option<(Arc<Heightmap>, Arc<TerrainTexture>)>,
    result: PlacementResult,
}

impl GenerateObjectPositions {
    pub const NAME: &'static str = "Generate Object Positions";

    pub fn new(
        filter: ObjectPositionFilter,
        radius: f32,
        seed: u64,
        get_heightmap: Handoff<Heightmap>,
        get_texture: Handoff<TerrainTexture>,
    ) -> Self {
        Self {
            filter,
            radius,
            seed,
            get_heightmap,
            get_texture,
            inputs: None,
            result: PlacementResult::default(),
        }
    }
}

impl TaskWork for GenerateObjectPositions {
    type Output = PlacementResult;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn prepare(&mut self) -> Result<StepPolicy> {
        let heightmap = self.get_heightmap.snapshot(Self::NAME, "heightmap")?;
        let texture = self.get_texture.snapshot(Self::NAME, "terrain texture")?;
        self.inputs = Some((heightmap, texture));
        Ok(StepPolicy::Single)
    }

    fn execute_step(&mut self, _step: usize) -> Result<()> {
        let Some((heightmap, texture)) = self.inputs.as_ref() else {
            return Err(Error::Other(format!(
                "{} executed before its inputs were read",
                Self::NAME
            )));
        };

        let mut rng = StdRng::seed_from_u64(self.seed);
        let extent = Vec2::splat(2.0 * self.radius);
        let candidates = self
            .filter
            .config()
            .sampling
            .generate(extent.into(), &mut rng);

        self.result = self.filter.filter(candidates, heightmap, &texture.blends)?;
        Ok(())
    }

    fn finish(&mut self) -> PlacementResult {
        self.inputs = None;
        std::mem::take(&mut self.result)
    }
}
