#![forbid(unsafe_code)]
//! island_terrain: Height-ordered terrain classification and object placement for procedural
//! islands, split into resumable steps.
//!
//! Modules:
//! - terrain: terrain types, the ordered catalog, blends, nodes and the blending engine
//! - heightmap: square row-major height grids and local-to-pixel mapping
//! - sampling: candidate generation (jitter grid)
//! - placement: object position filter over classified pixels
//! - task: step tasks, handoffs, pipelines and events
//! - generation: the island tasks and [`generation::IslandArea`]
//!
//! For usage, see README and the demos crate.
pub mod color;
pub mod error;
pub mod generation;
pub mod heightmap;
pub mod placement;
pub mod sampling;
pub mod task;
pub mod terrain;

/// Convenient re-exports for common types. Import with `use island_terrain::prelude::*;`.
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::error::{Error, Result};
    pub use crate::generation::{
        ClassifyTerrain, GenerateHeightmap, GenerateObjectPositions, HeightSampler, IslandArea,
        IslandConfig, TerrainTexture,
    };
    pub use crate::heightmap::{Heightmap, PixelCoords};
    pub use crate::placement::{
        GridCell, GridPoint, ObjectPositionFilter, PlacementConfig, PlacementResult,
    };
    pub use crate::sampling::{CandidateSampling, JitterGridSampling};
    pub use crate::task::events::{FnSink, MultiSink, VecSink};
    pub use crate::task::{
        EventSink, Handoff, Pipeline, PipelineProgress, RunMode, StepPolicy, StepProgress,
        StepTask, Task, TaskEvent, TaskEventKind, TaskState, TaskWork,
    };
    pub use crate::terrain::{
        BlendingEngine, CatalogConfig, NoiseParams, OrderedCatalog, TerrainBlend, TerrainNode,
        TerrainType, TerrainTypeFraction, TerrainTypeId,
    };
}
