use island_terrain::prelude::*;
use island_terrain_demos::{demo_catalog, init_tracing, IslandNoise};
use tracing::info;

const RADIUS: f32 = 32.0;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut island = IslandArea::try_new(
        IslandConfig::new(64, RADIUS).with_rows_per_step(8),
        &demo_catalog(0.05),
        PlacementConfig::new("sand").with_height_range(0.3, 0.45),
        IslandNoise::new(NoiseParams::default(), 3, RADIUS),
        Vec::new(),
    )?;

    // Print a progress line per step and keep task summaries for the end.
    let progress_lines = FnSink::new(|event: TaskEvent| {
        if let TaskEvent::StepExecuted { task, progress, .. } = event {
            info!("{task}: {:>5.1}%", progress.fraction() * 100.0);
        }
    });
    let mut summary = VecSink::only([TaskEventKind::TaskFinished, TaskEventKind::Warning]);

    let mut frames = 0;
    {
        let mut sinks: MultiSink<Box<dyn EventSink + '_>> = MultiSink::new();
        sinks.push(Box::new(progress_lines));
        sinks.push(Box::new(&mut summary));
        while !island.generate_step_with_events(&mut sinks)? {
            frames += 1;
        }
    }

    for event in summary.as_slice() {
        match event {
            TaskEvent::TaskFinished {
                task,
                executed_steps,
            } => info!("{task}: {executed_steps} steps"),
            TaskEvent::Warning { context, message } => info!("warning in {context}: {message}"),
            _ => {}
        }
    }
    info!("{} frames in total.", frames + 1);
    Ok(())
}
