//! Island generation: heightmap, terrain texture and object positions as one resumable
//! pipeline.
//!
//! An [`IslandArea`] chains three tasks:
//!
//! 1. [`GenerateHeightmap`] samples an external [`HeightSampler`] over the island square.
//! 2. [`ClassifyTerrain`] turns every pixel into a [`crate::terrain::TerrainBlend`] and a color.
//! 3. [`GenerateObjectPositions`] samples candidates and keeps those the
//!    [`ObjectPositionFilter`] accepts.
//!
//! Hosts call [`IslandArea::generate_step`] once per frame, or [`IslandArea::generate`] to
//! finish in one call.
use std::sync::Arc;

use tracing::warn;

use crate::error::{Error, Result};
use crate::heightmap::Heightmap;
use crate::placement::{ObjectPositionFilter, PlacementConfig, PlacementResult};
use crate::task::{EventSink, Handoff, Pipeline, PipelineProgress, RunMode, Task};
use crate::terrain::{CatalogConfig, TerrainNode};

pub mod heightmap;
pub mod positions;
pub mod texture;

pub use heightmap::{GenerateHeightmap, HeightSampler};
pub use positions::GenerateObjectPositions;
pub use texture::{ClassifyTerrain, TerrainTexture};

/// Size, granularity and seeding of one island.
#[non_exhaustive]
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IslandConfig {
    /// Heightmap pixels per side.
    pub resolution: usize,
    /// Half the side length of the island square in local units.
    pub radius: f32,
    /// Heightmap rows processed per step by the divisible tasks.
    pub rows_per_step: usize,
    /// Work performed per [`IslandArea::generate_step`].
    pub mode: RunMode,
    /// Seed for candidate sampling.
    pub seed: u64,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            resolution: 128,
            radius: 64.0,
            rows_per_step: 8,
            mode: RunMode::Stepped,
            seed: 0,
        }
    }
}

impl IslandConfig {
    pub fn new(resolution: usize, radius: f32) -> Self {
        Self {
            resolution,
            radius,
            ..Self::default()
        }
    }

    pub fn with_rows_per_step(mut self, rows_per_step: usize) -> Self {
        self.rows_per_step = rows_per_step;
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(Error::InvalidConfig("resolution must be > 0".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidConfig(
                "radius must be finite and > 0".into(),
            ));
        }
        if self.rows_per_step == 0 {
            return Err(Error::InvalidConfig("rows_per_step must be > 0".into()));
        }
        Ok(())
    }
}

/// One island and the pipeline that generates it.
pub struct IslandArea {
    config: IslandConfig,
    pipeline: Pipeline,
    heightmap: Handoff<Heightmap>,
    texture: Handoff<TerrainTexture>,
    positions: Handoff<PlacementResult>,
}

impl IslandArea {
    /// Validates every configuration and wires the generation tasks. No work runs yet.
    ///
    /// `nodes` come from an external node generator; each must name a catalog type and carry
    /// an intensity map of `config.resolution` pixels per side.
    pub fn try_new(
        config: IslandConfig,
        catalog: &CatalogConfig,
        placement: PlacementConfig,
        sampler: impl HeightSampler + 'static,
        nodes: Vec<TerrainNode>,
    ) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;

        let generate_heightmap = Task::new(GenerateHeightmap::new(
            Box::new(sampler),
            config.resolution,
            config.radius,
            config.rows_per_step,
        ));
        let heightmap = generate_heightmap.output();

        let terrain_nodes = Handoff::new();
        let classify = ClassifyTerrain::try_new(
            catalog,
            heightmap.clone(),
            terrain_nodes.clone(),
            config.rows_per_step,
        )?;
        let pixels = config.resolution * config.resolution;
        for node in &nodes {
            if !classify.catalog().contains(&node.terrain_type) {
                return Err(Error::UnknownTerrainType {
                    id: node.terrain_type.clone(),
                });
            }
            if node.intensity.len() != pixels {
                return Err(Error::ResolutionMismatch {
                    context: format!("intensity map of node '{}'", node.id),
                    expected: pixels,
                    actual: node.intensity.len(),
                });
            }
        }
        terrain_nodes.publish(Arc::new(nodes));
        let filter = ObjectPositionFilter::try_new(placement, config.radius, classify.catalog())?;
        let classify = Task::new(classify);
        let texture = classify.output();

        let place = Task::new(GenerateObjectPositions::new(
            filter,
            config.radius,
            config.seed,
            heightmap.clone(),
            texture.clone(),
        ));
        let positions = place.output();

        let pipeline = Pipeline::new("Island")
            .with_task(generate_heightmap)
            .with_task(classify)
            .with_task(place);

        Ok(Self {
            config,
            pipeline,
            heightmap,
            texture,
            positions,
        })
    }

    pub fn config(&self) -> &IslandConfig {
        &self.config
    }

    /// Performs one frame of work in the configured [`RunMode`]. Returns `true` once the
    /// island is complete.
    pub fn generate_step(&mut self) -> Result<bool> {
        self.pipeline.tick(self.config.mode)
    }

    pub fn generate_step_with_events(&mut self, sink: &mut dyn EventSink) -> Result<bool> {
        self.pipeline.tick_with_events(self.config.mode, sink)
    }

    /// Runs the remaining generation to completion.
    pub fn generate(&mut self) -> Result<()> {
        self.pipeline.run()
    }

    pub fn generate_with_events(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        self.pipeline.run_with_events(sink)
    }

    pub fn is_finished(&self) -> bool {
        self.pipeline.is_finished()
    }

    pub fn progress(&self) -> PipelineProgress {
        self.pipeline.progress()
    }

    /// Generated heightmap, or `None` with a warning while it is still being generated.
    pub fn heightmap(&self) -> Option<Arc<Heightmap>> {
        ready_or_warn(&self.heightmap, "heightmap")
    }

    /// Classified terrain texture, or `None` with a warning while it is still being generated.
    pub fn texture(&self) -> Option<Arc<TerrainTexture>> {
        ready_or_warn(&self.texture, "terrain texture")
    }

    /// Accepted object positions, or `None` with a warning while they are still being
    /// generated.
    pub fn positions(&self) -> Option<Arc<PlacementResult>> {
        ready_or_warn(&self.positions, "object positions")
    }
}

fn ready_or_warn<T>(handoff: &Handoff<T>, what: &str) -> Option<Arc<T>> {
    let value = handoff.get();
    if value.is_none() {
        warn!("Island {} requested before it was generated.", what);
    }
    value
}
