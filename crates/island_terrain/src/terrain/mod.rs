//! Terrain classification: terrain type definitions, height-ordered catalogs, blends,
//! influencing nodes, and the blending engine that ties them together.
//!
//! A pixel height is classified into a [`TerrainBlend`] by the [`BlendingEngine`], which looks up
//! the terrain type occupying that height in an [`OrderedCatalog`] and mixes in the neighbour
//! below or above near band boundaries. Dominant [`TerrainNode`]s shift band boundaries inside
//! their footprint.
use glam::Vec2;

use crate::color::Color;

pub mod blend;
pub mod catalog;
pub mod engine;
pub mod node;

pub use blend::{TerrainBlend, TerrainTypeFraction};
pub use catalog::{CatalogConfig, OrderedCatalog};
pub use engine::BlendingEngine;
pub use node::TerrainNode;

pub type TerrainTypeId = String;

/// Parameters for the noise layer associated with a terrain type.
///
/// Carried through the catalog for noise generators; classification does not read them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoiseParams {
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub offset: Vec2,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: Vec2::ZERO,
        }
    }
}

/// A named terrain classification that begins at `starting_height` and extends up to the
/// starting height of the next type in the catalog.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainType {
    pub id: TerrainTypeId,
    pub color: Color,
    /// Normalized height in `[0, 1]`.
    pub starting_height: f32,
    pub noise: NoiseParams,
}

impl TerrainType {
    pub fn new(id: impl Into<TerrainTypeId>, color: Color, starting_height: f32) -> Self {
        Self {
            id: id.into(),
            color,
            starting_height,
            noise: NoiseParams::default(),
        }
    }

    pub fn with_noise(mut self, noise: NoiseParams) -> Self {
        self.noise = noise;
        self
    }

    /// Copy of this type starting at a different height.
    pub fn with_starting_height(&self, starting_height: f32) -> Self {
        Self {
            starting_height,
            ..self.clone()
        }
    }
}
