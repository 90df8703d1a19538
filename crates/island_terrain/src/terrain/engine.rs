//! Per-pixel terrain classification.
//!
//! The [`BlendingEngine`] turns a pixel height into a [`TerrainBlend`]:
//!
//! 1. The type whose band contains the height is looked up in the ordered catalog.
//! 2. Near the top of that band (within half a blend height of the next type's start) the
//!    next type is mixed in, rising from 0 to 0.5 at the boundary.
//! 3. Near the bottom of the band the type below is mixed in, falling from 0.5 at the
//!    boundary to 0.
//! 4. Everywhere else the pixel is a single type.
//!
//! The blend height is clamped to the current type's own span, so the two regions cannot
//! overlap. If a misconfiguration still makes both apply, the top region wins.
//!
//! Inside the footprint of a dominant [`TerrainNode`] the lookup runs against a catalog in
//! which the node's type has taken over the band below it. When several dominant nodes cover
//! the same pixel the first one in declaration order is used.
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::terrain::{CatalogConfig, OrderedCatalog, TerrainBlend, TerrainNode, TerrainType};

#[derive(Clone, Debug)]
struct DominantZone {
    node: usize,
    catalog: OrderedCatalog,
}

/// Classifies pixel heights into terrain blends.
#[derive(Clone, Debug)]
pub struct BlendingEngine {
    catalog: OrderedCatalog,
    blend_height: f32,
    nodes: Vec<TerrainNode>,
    dominant: Vec<DominantZone>,
}

impl BlendingEngine {
    /// Engine without terrain nodes.
    pub fn new(catalog: OrderedCatalog, blend_height: f32) -> Self {
        Self {
            catalog,
            blend_height: blend_height.max(0.0),
            nodes: Vec::new(),
            dominant: Vec::new(),
        }
    }

    /// Engine with terrain nodes. Every node must reference a type in the catalog.
    pub fn try_new(
        catalog: OrderedCatalog,
        blend_height: f32,
        nodes: Vec<TerrainNode>,
    ) -> Result<Self> {
        for node in &nodes {
            if !catalog.contains(&node.terrain_type) {
                return Err(Error::UnknownTerrainType {
                    id: node.terrain_type.clone(),
                });
            }
        }

        let dominant: Vec<DominantZone> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.dominant)
            .map(|(i, n)| DominantZone {
                node: i,
                catalog: catalog.dominated_by(&n.terrain_type),
            })
            .collect();

        debug!(
            "Blending engine: {} types, blend height {}, {} nodes ({} dominant).",
            catalog.len(),
            blend_height,
            nodes.len(),
            dominant.len()
        );

        Ok(Self {
            catalog,
            blend_height: blend_height.max(0.0),
            nodes,
            dominant,
        })
    }

    /// Builds an engine from a validated [`CatalogConfig`].
    pub fn from_config(config: &CatalogConfig, nodes: Vec<TerrainNode>) -> Result<Self> {
        let catalog = config.ordered_catalog()?;
        Self::try_new(catalog, config.blend_height, nodes)
    }

    pub fn catalog(&self) -> &OrderedCatalog {
        &self.catalog
    }

    pub fn blend_height(&self) -> f32 {
        self.blend_height
    }

    pub fn nodes(&self) -> &[TerrainNode] {
        &self.nodes
    }

    /// The terrain type whose band contains `height`, ignoring nodes.
    pub fn find_type_by_height(&self, height: f32) -> &Arc<TerrainType> {
        let index = self.catalog.index_for_height(height);
        &self.catalog.as_slice()[index]
    }

    /// Catalog used for `pixel_index`: shifted by the first dominant node covering the pixel,
    /// or the base catalog.
    pub fn catalog_for_pixel(&self, pixel_index: usize) -> &OrderedCatalog {
        self.dominant
            .iter()
            .find(|zone| self.nodes[zone.node].in_range(pixel_index))
            .map(|zone| &zone.catalog)
            .unwrap_or(&self.catalog)
    }

    /// Blend for a height outside every node footprint.
    pub fn classify_height(&self, height: f32) -> TerrainBlend {
        blend_in_catalog(&self.catalog, self.blend_height, height)
    }

    /// Blend for the pixel at `pixel_index` with the given height.
    pub fn classify_pixel(&self, height: f32, pixel_index: usize) -> TerrainBlend {
        let catalog = self.catalog_for_pixel(pixel_index);
        blend_in_catalog(catalog, self.blend_height, height)
    }
}

fn blend_in_catalog(catalog: &OrderedCatalog, blend_height: f32, height: f32) -> TerrainBlend {
    let types = catalog.as_slice();
    let index = catalog.index_for_height(height);
    let current = &types[index];
    let below = index.checked_sub(1).map(|i| &types[i]);
    let above = types.get(index + 1);

    let ceiling = above.map_or(1.0, |a| a.starting_height);
    let blend_height = blend_height.clamp(0.0, (ceiling - current.starting_height).max(0.0));
    let half = blend_height / 2.0;

    match (below, above) {
        (_, Some(above)) if height > above.starting_height - half => {
            let top_start = above.starting_height - half;
            let above_amount = (height - top_start) / blend_height;
            let mut blend = TerrainBlend::new();
            blend.add_terrain_type(above.clone(), above_amount);
            blend.add_terrain_type(current.clone(), 1.0 - above_amount);
            blend
        }
        (Some(below), _) if height < current.starting_height + half => {
            let t = (height - current.starting_height) / half;
            let mut blend = TerrainBlend::new();
            blend.add_terrain_type(current.clone(), 0.5 + t / 2.0);
            blend.add_terrain_type(below.clone(), 0.5 - t / 2.0);
            blend
        }
        _ => TerrainBlend::pure(current.clone()),
    }
}
