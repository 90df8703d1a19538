use glam::Vec2;
use island_terrain::prelude::*;
use island_terrain_demos::{
    demo_catalog, init_tracing, render_island_to_png, IslandNoise, RenderConfig,
};
use tracing::info;

const RADIUS: f32 = 64.0;
const RESOLUTION: usize = 192;

/// Circular footprint with intensity fading to zero at `reach`.
fn footprint(center: Vec2, reach: f32) -> Heightmap {
    let pixel = 2.0 * RADIUS / RESOLUTION as f32;
    Heightmap::from_fn(RESOLUTION, |x, y| {
        let p = Vec2::new(
            -RADIUS + (x as f32 + 0.5) * pixel,
            -RADIUS + (y as f32 + 0.5) * pixel,
        );
        (1.0 - p.distance(center) / reach).max(0.0)
    })
}

fn generate(nodes: Vec<TerrainNode>) -> anyhow::Result<IslandArea> {
    let mut island = IslandArea::try_new(
        IslandConfig::new(RESOLUTION, RADIUS)
            .with_mode(RunMode::Atomic)
            .with_seed(5),
        &demo_catalog(0.05),
        PlacementConfig::new("grass").with_sampling(JitterGridSampling::new(0.6, 4.0)),
        IslandNoise::new(NoiseParams::default(), 21, RADIUS),
        nodes,
    )?;
    island.generate()?;
    Ok(island)
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A dominant forest pushes into the grass band, a regular rock node only marks its area.
    let nodes = vec![
        TerrainNode::new("old_forest", "forest", footprint(Vec2::new(-20.0, 10.0), 30.0))
            .with_dominant(true),
        TerrainNode::new("quarry", "rock", footprint(Vec2::new(25.0, -15.0), 20.0)),
    ];

    let plain = generate(Vec::new())?;
    let dominated = generate(nodes)?;

    let config = RenderConfig::new(RADIUS);
    for (name, island) in [("plain", &plain), ("dominated", &dominated)] {
        let (Some(texture), Some(positions)) = (island.texture(), island.positions()) else {
            anyhow::bail!("{name} island has no results");
        };
        let grass = texture
            .blends
            .iter()
            .filter(|b| b.has_fraction("grass", 0.5))
            .count();
        info!(
            "{name}: {grass} grass pixels, {} objects placed.",
            positions.positions.len()
        );
        render_island_to_png(
            &texture,
            &positions.positions,
            &config,
            format!("dominance_{name}.png"),
        )?;
    }
    Ok(())
}
