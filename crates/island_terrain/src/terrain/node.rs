//! Terrain nodes: localized influences carrying a terrain type and an intensity map.
use std::sync::Arc;

use crate::heightmap::Heightmap;
use crate::terrain::TerrainTypeId;

/// An external terrain-altering influence.
///
/// A node covers every pixel where its intensity is above zero. Dominant nodes let their
/// terrain type take over the band of the type directly below it inside that footprint.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct TerrainNode {
    pub id: String,
    pub terrain_type: TerrainTypeId,
    pub dominant: bool,
    /// Per-pixel intensity in `[0, 1]`, laid out like the island heightmap.
    pub intensity: Arc<Heightmap>,
}

impl TerrainNode {
    pub fn new(
        id: impl Into<String>,
        terrain_type: impl Into<TerrainTypeId>,
        intensity: impl Into<Arc<Heightmap>>,
    ) -> Self {
        Self {
            id: id.into(),
            terrain_type: terrain_type.into(),
            dominant: false,
            intensity: intensity.into(),
        }
    }

    pub fn with_dominant(mut self, dominant: bool) -> Self {
        self.dominant = dominant;
        self
    }

    #[inline]
    pub fn intensity_at(&self, pixel_index: usize) -> f32 {
        self.intensity.at(pixel_index)
    }

    #[inline]
    pub fn in_range(&self, pixel_index: usize) -> bool {
        self.intensity_at(pixel_index) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_requires_positive_intensity() {
        let map = Heightmap::from_fn(2, |x, _| x as f32 * 0.5);
        let node = TerrainNode::new("hill", "rock", map).with_dominant(true);
        assert!(node.dominant);
        assert!(!node.in_range(0));
        assert!(node.in_range(1));
        assert!(!node.in_range(42));
    }
}
