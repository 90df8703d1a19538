//! Terrain classification task producing per-pixel blends and texture colors.
use std::sync::Arc;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::heightmap::Heightmap;
use crate::task::{Handoff, StepPolicy, TaskWork};
use crate::terrain::{BlendingEngine, CatalogConfig, OrderedCatalog, TerrainBlend, TerrainNode};

/// Classified island surface: one blend and one color per heightmap pixel.
#[derive(Clone, Debug, Default)]
pub struct TerrainTexture {
    pub resolution: usize,
    pub pixels: Vec<Color>,
    pub blends: Vec<TerrainBlend>,
}

impl TerrainTexture {
    /// Pixels as 8-bit RGBA, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }
}

/// Classifies every heightmap pixel, a block of rows per step.
pub struct ClassifyTerrain {
    catalog: OrderedCatalog,
    blend_height: f32,
    rows_per_step: usize,

    get_heightmap: Handoff<Heightmap>,
    get_nodes: Handoff<Vec<TerrainNode>>,

    heightmap: Arc<Heightmap>,
    engine: Option<BlendingEngine>,
    texture: TerrainTexture,
}

impl ClassifyTerrain {
    pub const NAME: &'static str = "Classify Terrain";

    /// Validates the catalog up front; heightmap and nodes are read on the first advance.
    pub fn try_new(
        config: &CatalogConfig,
        get_heightmap: Handoff<Heightmap>,
        get_nodes: Handoff<Vec<TerrainNode>>,
        rows_per_step: usize,
    ) -> Result<Self> {
        let catalog = config.ordered_catalog()?;
        Ok(Self {
            catalog,
            blend_height: config.blend_height,
            rows_per_step: rows_per_step.max(1),
            get_heightmap,
            get_nodes,
            heightmap: Arc::new(Heightmap::new(0)),
            engine: None,
            texture: TerrainTexture::default(),
        })
    }

    pub fn catalog(&self) -> &OrderedCatalog {
        &self.catalog
    }
}

impl TaskWork for ClassifyTerrain {
    type Output = TerrainTexture;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn prepare(&mut self) -> Result<StepPolicy> {
        let heightmap = self.get_heightmap.snapshot(Self::NAME, "heightmap")?;
        let nodes = self.get_nodes.snapshot(Self::NAME, "terrain nodes")?;

        for node in nodes.iter() {
            if node.intensity.len() != heightmap.len() {
                return Err(Error::ResolutionMismatch {
                    context: format!("intensity map of node '{}'", node.id),
                    expected: heightmap.len(),
                    actual: node.intensity.len(),
                });
            }
        }

        let engine =
            BlendingEngine::try_new(self.catalog.clone(), self.blend_height, nodes.to_vec())?;

        self.texture = TerrainTexture {
            resolution: heightmap.resolution(),
            pixels: vec![Color::BLACK; heightmap.len()],
            blends: vec![TerrainBlend::new(); heightmap.len()],
        };
        self.engine = Some(engine);
        let rows = heightmap.resolution();
        self.heightmap = heightmap;

        Ok(StepPolicy::chunked(rows, self.rows_per_step))
    }

    fn execute_step(&mut self, step: usize) -> Result<()> {
        let Some(engine) = self.engine.as_ref() else {
            return Err(Error::Other(format!(
                "{} executed before its inputs were read",
                Self::NAME
            )));
        };
        let resolution = self.heightmap.resolution();
        let first = step * self.rows_per_step * resolution;
        let last = ((step + 1) * self.rows_per_step * resolution).min(self.heightmap.len());

        for index in first..last {
            let blend = engine.classify_pixel(self.heightmap.at(index), index);
            self.texture.pixels[index] = blend.color();
            self.texture.blends[index] = blend;
        }
        Ok(())
    }

    fn finish(&mut self) -> TerrainTexture {
        std::mem::take(&mut self.texture)
    }
}
