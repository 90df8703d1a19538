//! Terrain type catalogs ordered by starting height.
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::terrain::TerrainType;

/// Terrain types sorted ascending by starting height.
///
/// Construction validates the set: it must be non-empty, names must be unique, starting
/// heights must be finite values in `[0, 1]` and pairwise distinct.
#[derive(Clone, Debug)]
pub struct OrderedCatalog {
    types: Vec<Arc<TerrainType>>,
}

impl OrderedCatalog {
    pub fn try_new(types: impl IntoIterator<Item = TerrainType>) -> Result<Self> {
        let mut types: Vec<Arc<TerrainType>> = types.into_iter().map(Arc::new).collect();
        if types.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        for t in &types {
            if !(0.0..=1.0).contains(&t.starting_height) {
                return Err(Error::InvalidConfig(format!(
                    "terrain type '{}' starting height {} is outside [0, 1]",
                    t.id, t.starting_height
                )));
            }
        }

        types.sort_by(|a, b| a.starting_height.total_cmp(&b.starting_height));

        for pair in types.windows(2) {
            if pair[0].starting_height == pair[1].starting_height {
                return Err(Error::DuplicateStartingHeight {
                    first: pair[0].id.clone(),
                    second: pair[1].id.clone(),
                    height: pair[0].starting_height,
                });
            }
        }
        for (i, t) in types.iter().enumerate() {
            if types[..i].iter().any(|other| other.id == t.id) {
                return Err(Error::DuplicateTerrainType { id: t.id.clone() });
            }
        }

        Ok(Self { types })
    }

    /// Builds a catalog from already sorted entries. Only used for derived catalogs whose
    /// order is preserved by construction.
    fn from_sorted(types: Vec<Arc<TerrainType>>) -> Self {
        debug_assert!(types
            .windows(2)
            .all(|p| p[0].starting_height <= p[1].starting_height));
        Self { types }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<TerrainType>> {
        self.types.get(index)
    }

    /// Types in ascending starting-height order. Never empty.
    pub fn as_slice(&self) -> &[Arc<TerrainType>] {
        &self.types
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TerrainType>> {
        self.types.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.types.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Index of the type whose band contains `height`.
    ///
    /// A type's band is `[starting_height, next.starting_height)`. The last type matches every
    /// height at or above its start; heights below the first start (and NaN) map to the first.
    pub fn index_for_height(&self, height: f32) -> usize {
        let last = self.types.len().saturating_sub(1);
        match self.types.first() {
            Some(first) if height >= first.starting_height => {}
            _ => return 0,
        }
        for (i, pair) in self.types.windows(2).enumerate() {
            if height >= pair[0].starting_height && height < pair[1].starting_height {
                return i;
            }
        }
        last
    }

    /// Catalog where `dominant_id` takes over the band of the type directly below it.
    ///
    /// The dominated entry is replaced by a copy of the dominant type starting at the dominated
    /// type's height; the dominant type's original entry is merged into that copy. Returns a
    /// clone when the dominant type is the lowest one or absent.
    pub fn dominated_by(&self, dominant_id: &str) -> OrderedCatalog {
        let Some(index) = self.position(dominant_id) else {
            return self.clone();
        };
        if index == 0 {
            return self.clone();
        }

        let below = &self.types[index - 1];
        let expanded = Arc::new(self.types[index].with_starting_height(below.starting_height));

        let mut types = Vec::with_capacity(self.types.len() - 1);
        types.extend(self.types[..index - 1].iter().cloned());
        types.push(expanded);
        types.extend(self.types[index + 1..].iter().cloned());
        OrderedCatalog::from_sorted(types)
    }
}

/// Terrain configuration consumed by the classification stage and by external node generators.
#[non_exhaustive]
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogConfig {
    /// Terrain types in any order.
    pub terrain_types: Vec<TerrainType>,
    /// Height band over which neighbouring types are blended.
    pub blend_height: f32,
    /// Minimum number of terrain nodes an external node generator should place.
    pub min_nodes: usize,
    /// Maximum number of terrain nodes an external node generator should place.
    pub max_nodes: usize,
    /// Node reach as a fraction of the island radius, in `[0, 1]`.
    pub max_distance_multiplier: f32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            terrain_types: Vec::new(),
            blend_height: 0.0,
            min_nodes: 1,
            max_nodes: 3,
            max_distance_multiplier: 1.0,
        }
    }
}

impl CatalogConfig {
    pub fn new(terrain_types: Vec<TerrainType>) -> Self {
        Self {
            terrain_types,
            ..Default::default()
        }
    }

    pub fn with_blend_height(mut self, blend_height: f32) -> Self {
        self.blend_height = blend_height;
        self
    }

    pub fn with_node_count(mut self, min_nodes: usize, max_nodes: usize) -> Self {
        self.min_nodes = min_nodes;
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_max_distance_multiplier(mut self, multiplier: f32) -> Self {
        self.max_distance_multiplier = multiplier;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.blend_height.is_finite() || self.blend_height < 0.0 {
            return Err(Error::InvalidConfig(
                "blend_height must be finite and >= 0".into(),
            ));
        }
        if self.min_nodes > self.max_nodes {
            return Err(Error::InvalidConfig(
                "min_nodes must be <= max_nodes".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_distance_multiplier) {
            return Err(Error::InvalidConfig(
                "max_distance_multiplier must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Validates the configuration and orders its terrain types.
    pub fn ordered_catalog(&self) -> Result<OrderedCatalog> {
        self.validate()?;
        OrderedCatalog::try_new(self.terrain_types.iter().cloned())
    }
}
