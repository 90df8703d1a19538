//! Heightmap sampling task.
use glam::Vec2;

use crate::error::Result;
use crate::heightmap::Heightmap;
use crate::task::{StepPolicy, TaskWork};

/// Source of normalized heights in island-local XZ coordinates.
///
/// Noise generation lives outside this crate; any `Fn(Vec2) -> f32` can serve as a sampler.
pub trait HeightSampler: Send + Sync {
    fn sample(&self, position: Vec2) -> f32;
}

impl<F> HeightSampler for F
where
    F: Fn(Vec2) -> f32 + Send + Sync,
{
    fn sample(&self, position: Vec2) -> f32 {
        self(position)
    }
}

/// Fills a heightmap from a [`HeightSampler`], a block of rows per step.
///
/// Pixel centers are sampled; results are clamped to `[0, 1]`.
pub struct GenerateHeightmap {
    sampler: Box<dyn HeightSampler>,
    radius: f32,
    rows_per_step: usize,
    heightmap: Heightmap,
}

impl GenerateHeightmap {
    pub const NAME: &'static str = "Generate Heightmap";

    pub fn new(
        sampler: Box<dyn HeightSampler>,
        resolution: usize,
        radius: f32,
        rows_per_step: usize,
    ) -> Self {
        Self {
            sampler,
            radius,
            rows_per_step: rows_per_step.max(1),
            heightmap: Heightmap::new(resolution),
        }
    }

    fn pixel_center(&self, x: usize, y: usize) -> Vec2 {
        let pixel = 2.0 * self.radius / self.heightmap.resolution() as f32;
        Vec2::new(
            -self.radius + (x as f32 + 0.5) * pixel,
            -self.radius + (y as f32 + 0.5) * pixel,
        )
    }
}

impl TaskWork for GenerateHeightmap {
    type Output = Heightmap;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn prepare(&mut self) -> Result<StepPolicy> {
        Ok(StepPolicy::chunked(
            self.heightmap.resolution(),
            self.rows_per_step,
        ))
    }

    fn execute_step(&mut self, step: usize) -> Result<()> {
        let resolution = self.heightmap.resolution();
        let first = step * self.rows_per_step;
        let last = (first + self.rows_per_step).min(resolution);
        for y in first..last {
            let row: Vec<f32> = (0..resolution)
                .map(|x| self.sampler.sample(self.pixel_center(x, y)).clamp(0.0, 1.0))
                .collect();
            self.heightmap.row_mut(y).copy_from_slice(&row);
        }
        Ok(())
    }

    fn finish(&mut self) -> Heightmap {
        std::mem::take(&mut self.heightmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{StepTask, Task};

    #[test]
    fn samples_pixel_centers_row_by_row() {
        let work = GenerateHeightmap::new(Box::new(|p: Vec2| (p.x + 2.0) / 4.0), 4, 2.0, 1);
        let mut task = Task::new(work);
        for _ in 0..3 {
            task.advance().expect("advance");
        }
        assert!(!task.is_finished());
        task.advance().expect("advance");
        assert!(task.is_finished());

        let map = task.result();
        assert_eq!(map.resolution(), 4);
        assert_eq!(map.get(0, 0), 0.125);
        assert_eq!(map.get(3, 3), 0.875);
    }

    #[test]
    fn result_before_finish_is_an_empty_heightmap() {
        let mut task = Task::new(GenerateHeightmap::new(Box::new(|_: Vec2| 0.5), 4, 1.0, 1));
        task.advance().expect("advance");
        let map = task.result();
        assert!(map.is_empty());
        assert_eq!(map.resolution(), 0);
    }

    #[test]
    fn clamps_samples_and_rounds_step_count_up() {
        let work = GenerateHeightmap::new(Box::new(|_: Vec2| 3.0), 5, 1.0, 2);
        let mut task = Task::new(work);
        task.run().expect("run");
        assert_eq!(task.progress().total_steps, 3);
        assert!(task.result().as_slice().iter().all(|h| *h == 1.0));
    }
}
