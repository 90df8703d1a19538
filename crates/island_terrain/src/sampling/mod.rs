//! Candidate generation for object placement.
//!
//! Samplers propose [`GridPoint`]s over a square island area centered on the origin. The
//! placement filter then decides which candidates survive.
use mint::Vector2;
use rand::Rng;

use crate::placement::GridPoint;

pub mod jitter_grid;

pub use jitter_grid::JitterGridSampling;

/// Trait for candidate sampling over a centered area of the given extent.
pub trait CandidateSampling: Send + Sync {
    fn generate(&self, area_extent: Vector2<f32>, rng: &mut dyn Rng) -> Vec<GridPoint>;
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Largest float strictly below `val`, used to keep points inside a half-open area.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() || val == f32::NEG_INFINITY {
        return val;
    }
    if val == f32::INFINITY {
        return f32::MAX;
    }
    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits - 1)
    } else {
        f32::from_bits(bits + 1)
    }
}
