#![forbid(unsafe_code)]

mod noise;
mod rendering;

pub use noise::{demo_catalog, IslandNoise};
pub use rendering::{
    init_tracing, render_heightmap_to_png, render_island_to_png, MarkerStyle, RenderConfig,
};
