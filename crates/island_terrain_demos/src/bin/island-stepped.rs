use island_terrain::prelude::*;
use island_terrain_demos::{
    demo_catalog, init_tracing, render_heightmap_to_png, render_island_to_png, IslandNoise,
    RenderConfig,
};
use tracing::info;

const RADIUS: f32 = 96.0;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let noise = IslandNoise::new(
        NoiseParams {
            scale: 40.0,
            ..NoiseParams::default()
        },
        7,
        RADIUS,
    );
    let placement = PlacementConfig::new("forest")
        .with_min_fraction(0.6)
        .with_height_range(0.5, 0.7)
        .with_max_terrain_height(30.0)
        .with_sampling(JitterGridSampling::new(0.8, 3.0));

    let mut island = IslandArea::try_new(
        IslandConfig::new(256, RADIUS)
            .with_rows_per_step(16)
            .with_mode(RunMode::Stepped)
            .with_seed(42),
        &demo_catalog(0.04),
        placement,
        noise,
        Vec::new(),
    )?;

    // One step per simulated frame, as a host would drive it.
    let mut frame = 0usize;
    while !island.generate_step()? {
        frame += 1;
        let progress = island.progress();
        if let Some(task) = progress.current_task {
            info!(
                "frame {frame}: {task} {}/{} ({} of {} tasks done)",
                progress.current.executed_steps,
                progress.current.total_steps,
                progress.tasks_finished,
                progress.task_count
            );
        }
    }
    info!("Island finished after {} frames.", frame + 1);

    let (Some(heightmap), Some(texture), Some(positions)) =
        (island.heightmap(), island.texture(), island.positions())
    else {
        anyhow::bail!("island finished without results");
    };
    info!(
        "Placed {} of {} candidates.",
        positions.positions.len(),
        positions.positions_evaluated
    );

    render_heightmap_to_png(&heightmap, "island_stepped_height.png")?;
    render_island_to_png(
        &texture,
        &positions.positions,
        &RenderConfig::new(RADIUS).with_scale(3),
        "island_stepped.png",
    )?;
    Ok(())
}
