//! Square, row-major grids of normalized samples.
//!
//! [`Heightmap`] stores one `f32` per pixel with `index = y * resolution + x`. The same layout
//! is used for elevation, node intensity maps, and per-pixel classification output, and
//! [`Heightmap::local_to_pixel`] maps island-local positions onto it.
use glam::{UVec2, Vec3};

use crate::error::{Error, Result};

/// Pixel coordinates of a square grid.
pub type PixelCoords = UVec2;

/// A square grid of samples, nominally in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heightmap {
    resolution: usize,
    data: Vec<f32>,
}

impl Heightmap {
    /// Heightmap with every sample set to zero.
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            data: vec![0.0; resolution * resolution],
        }
    }

    /// Builds a heightmap by evaluating `f(x, y)` for each pixel.
    pub fn from_fn(resolution: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(resolution * resolution);
        for y in 0..resolution {
            for x in 0..resolution {
                data.push(f(x, y));
            }
        }
        Self { resolution, data }
    }

    /// Wraps existing samples, checking that they fill a `resolution x resolution` grid.
    pub fn try_from_vec(resolution: usize, data: Vec<f32>) -> Result<Self> {
        let expected = resolution * resolution;
        if data.len() != expected {
            return Err(Error::ResolutionMismatch {
                context: "heightmap".into(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { resolution, data })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.resolution + x
    }

    /// Sample at pixel `(x, y)`, or `0.0` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x >= self.resolution || y >= self.resolution {
            return 0.0;
        }
        self.data[self.index(x, y)]
    }

    /// Sample at a linear pixel index, or `0.0` outside the grid.
    #[inline]
    pub fn at(&self, index: usize) -> f32 {
        self.data.get(index).copied().unwrap_or(0.0)
    }

    /// Mutable view of row `y`.
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.resolution;
        &mut self.data[start..start + self.resolution]
    }

    /// Maps a position in island-local space to pixel coordinates.
    ///
    /// The island spans `[-radius, radius]` on X and Z; X selects the column and Z the row.
    /// Positions outside the island are clamped to the border pixels.
    pub fn local_to_pixel(&self, position: Vec3, radius: f32) -> PixelCoords {
        let max = self.resolution.saturating_sub(1) as f32;
        let to_pixel = |v: f32| {
            let t = (v + radius) / (2.0 * radius);
            (t * self.resolution as f32).floor().clamp(0.0, max) as u32
        };
        PixelCoords::new(to_pixel(position.x), to_pixel(position.z))
    }

    /// Linear index of the pixel under an island-local position.
    pub fn local_to_index(&self, position: Vec3, radius: f32) -> usize {
        let p = self.local_to_pixel(position, radius);
        self.index(p.x as usize, p.y as usize)
    }
}
