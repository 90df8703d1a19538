use glam::Vec2;
use island_terrain::prelude::*;

fn catalog() -> CatalogConfig {
    CatalogConfig::new(vec![
        TerrainType::new("grass", Color::rgb(0.2, 0.7, 0.2), 0.5),
        TerrainType::new("water", Color::rgb(0.0, 0.2, 0.8), 0.0),
        TerrainType::new("sand", Color::rgb(0.9, 0.8, 0.5), 0.3),
        TerrainType::new("rock", Color::rgb(0.5, 0.5, 0.5), 0.8),
    ])
    .with_blend_height(0.1)
}

/// Radial island: 1 at the center, 0 at the square's edge midpoints.
fn island_height(p: Vec2) -> f32 {
    1.0 - p.length() / 16.0
}

fn config(mode: RunMode) -> IslandConfig {
    IslandConfig::new(32, 16.0)
        .with_rows_per_step(8)
        .with_mode(mode)
        .with_seed(11)
}

fn island(mode: RunMode, nodes: Vec<TerrainNode>) -> IslandArea {
    IslandArea::try_new(
        config(mode),
        &catalog(),
        PlacementConfig::new("grass").with_max_terrain_height(20.0),
        island_height,
        nodes,
    )
    .expect("valid island")
}

#[test]
fn stepped_and_atomic_generation_agree() {
    let mut stepped = island(RunMode::Stepped, Vec::new());
    let mut ticks = 0;
    while !stepped.generate_step().expect("step") {
        ticks += 1;
    }
    // 4 + 4 + 1 steps; the last tick returns true.
    assert_eq!(ticks, 8);

    let mut atomic = island(RunMode::Atomic, Vec::new());
    atomic.generate().expect("generate");

    let a = stepped.texture().expect("texture");
    let b = atomic.texture().expect("texture");
    assert_eq!(a.pixels, b.pixels);
    assert_eq!(
        stepped.positions().expect("positions").positions,
        atomic.positions().expect("positions").positions
    );
}

#[test]
fn every_pixel_is_classified_within_capacity() {
    let mut area = island(RunMode::Stepped, Vec::new());
    area.generate().expect("generate");

    let heightmap = area.heightmap().expect("heightmap");
    let texture = area.texture().expect("texture");
    assert_eq!(texture.resolution, 32);
    assert_eq!(texture.blends.len(), heightmap.len());
    for blend in &texture.blends {
        assert!(!blend.fractions().is_empty());
        assert!(blend.total_amount() <= 1.0 + 1e-5);
        assert!(blend.fractions().len() <= 2);
    }
    // Corners are the lowest pixels, the center the highest.
    assert_eq!(texture.blends[0].amount_of("water"), 1.0);
    let center = heightmap.index(16, 16);
    assert_eq!(texture.blends[center].amount_of("rock"), 1.0);
}

#[test]
fn placed_objects_are_lifted_onto_grass() {
    let mut area = island(RunMode::Atomic, Vec::new());
    area.generate().expect("generate");

    let heightmap = area.heightmap().expect("heightmap");
    let texture = area.texture().expect("texture");
    let result = area.positions().expect("positions");
    assert!(!result.positions.is_empty());
    assert_eq!(
        result.positions.len() + result.positions_rejected,
        result.positions_evaluated
    );
    for point in &result.positions {
        let index = heightmap.local_to_index(point.position, 16.0);
        assert!(texture.blends[index].has_fraction("grass", 0.5));
        assert!(point.is_lifted());
        assert!((point.position.y - heightmap.at(index) * 20.0).abs() < 1e-4);
    }
}

#[test]
fn dominant_node_turns_covered_sand_into_grass() {
    let sand_ring = |h: f32| (0.3..0.5).contains(&h);
    let reference = {
        let mut area = island(RunMode::Atomic, Vec::new());
        area.generate().expect("generate");
        area.texture().expect("texture")
    };

    let everywhere = Heightmap::from_fn(32, |_, _| 1.0);
    let node = TerrainNode::new("meadow", "grass", everywhere).with_dominant(true);
    let mut area = island(RunMode::Atomic, vec![node]);
    area.generate().expect("generate");
    let heightmap = area.heightmap().expect("heightmap");
    let texture = area.texture().expect("texture");

    let mut converted = 0;
    for (index, h) in heightmap.as_slice().iter().enumerate() {
        if sand_ring(*h) {
            assert_eq!(texture.blends[index].amount_of("sand"), 0.0);
            if reference.blends[index].amount_of("sand") > 0.0 {
                converted += 1;
            }
        }
    }
    assert!(converted > 0);
}

#[test]
fn events_describe_the_whole_run() {
    let mut area = island(RunMode::Stepped, Vec::new());
    let mut sink = VecSink::only([
        TaskEventKind::PipelineStarted,
        TaskEventKind::TaskStarted,
        TaskEventKind::TaskFinished,
        TaskEventKind::PipelineFinished,
    ]);
    area.generate_with_events(&mut sink).expect("generate");

    let tasks: Vec<String> = sink
        .as_slice()
        .iter()
        .filter_map(|e| match e {
            TaskEvent::TaskFinished { task, .. } => Some(task.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        tasks,
        [
            GenerateHeightmap::NAME,
            ClassifyTerrain::NAME,
            GenerateObjectPositions::NAME
        ]
    );
    assert!(matches!(
        sink.as_slice().last(),
        Some(TaskEvent::PipelineFinished { executed_steps: 9, .. })
    ));
}

#[test]
fn progress_tracks_the_current_task() {
    let mut area = island(RunMode::Stepped, Vec::new());
    assert_eq!(area.progress().tasks_finished, 0);
    for _ in 0..5 {
        area.generate_step().expect("step");
    }
    let progress = area.progress();
    assert_eq!(progress.tasks_finished, 1);
    assert_eq!(progress.current_task.as_deref(), Some(ClassifyTerrain::NAME));
    assert_eq!(progress.current.executed_steps, 1);
    assert_eq!(progress.current.total_steps, 4);
    assert!(area.positions().is_none());
}
