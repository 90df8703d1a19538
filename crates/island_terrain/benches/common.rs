#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;
use island_terrain::color::Color;
use island_terrain::terrain::{CatalogConfig, TerrainType};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Five-band island catalog.
pub fn island_catalog(blend_height: f32) -> CatalogConfig {
    CatalogConfig::new(vec![
        TerrainType::new("deep_water", Color::from_rgb8(20, 40, 120), 0.0),
        TerrainType::new("shallows", Color::from_rgb8(40, 110, 190), 0.2),
        TerrainType::new("sand", Color::from_rgb8(225, 205, 140), 0.35),
        TerrainType::new("grass", Color::from_rgb8(70, 160, 60), 0.45),
        TerrainType::new("rock", Color::from_rgb8(120, 115, 110), 0.75),
    ])
    .with_blend_height(blend_height)
}

/// Radial falloff with a ripple, peaking at the island center.
pub fn island_height(radius: f32) -> impl Fn(Vec2) -> f32 + Send + Sync + 'static {
    move |p: Vec2| {
        let falloff = 1.0 - p.length() / radius;
        falloff + 0.05 * (p.x * 0.7).sin() * (p.y * 0.9).cos()
    }
}
