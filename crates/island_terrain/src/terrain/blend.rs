//! Capacity-bounded mixtures of terrain types.
use std::sync::Arc;

use crate::color::Color;
use crate::terrain::TerrainType;

/// A terrain type together with the share it contributes to a blend.
#[derive(Clone, Debug)]
pub struct TerrainTypeFraction {
    terrain_type: Arc<TerrainType>,
    amount: f32,
}

impl TerrainTypeFraction {
    pub fn terrain_type(&self) -> &TerrainType {
        &self.terrain_type
    }

    /// Share in `[0, 1]`.
    pub fn amount(&self) -> f32 {
        self.amount
    }
}

/// Mixture of terrain types at a single sample point.
///
/// Fractions are appended while the blend is built; the sum of all amounts never exceeds 1.
#[derive(Clone, Debug)]
pub struct TerrainBlend {
    fractions: Vec<TerrainTypeFraction>,
    capacity: f32,
}

impl Default for TerrainBlend {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainBlend {
    pub fn new() -> Self {
        Self {
            fractions: Vec::with_capacity(2),
            capacity: 1.0,
        }
    }

    /// Blend made of a single type at full amount.
    pub fn pure(terrain_type: Arc<TerrainType>) -> Self {
        let mut blend = Self::new();
        blend.add_terrain_type(terrain_type, 1.0);
        blend
    }

    /// Appends `terrain_type` with `amount` clamped to `[0, remaining capacity]`.
    pub fn add_terrain_type(&mut self, terrain_type: Arc<TerrainType>, amount: f32) {
        let amount = amount.max(0.0).min(self.capacity);
        self.capacity -= amount;
        self.fractions.push(TerrainTypeFraction {
            terrain_type,
            amount,
        });
    }

    pub fn fractions(&self) -> &[TerrainTypeFraction] {
        &self.fractions
    }

    /// Capacity not yet assigned to any fraction.
    pub fn remaining_capacity(&self) -> f32 {
        self.capacity
    }

    /// Sum of all fraction amounts.
    pub fn total_amount(&self) -> f32 {
        self.fractions.iter().map(|f| f.amount).sum()
    }

    /// Summed amount of every fraction whose type has the given id.
    pub fn amount_of(&self, id: &str) -> f32 {
        self.fractions
            .iter()
            .filter(|f| f.terrain_type.id == id)
            .map(|f| f.amount)
            .sum()
    }

    /// True if a single fraction of type `id` has at least `min_amount`.
    pub fn has_fraction(&self, id: &str, min_amount: f32) -> bool {
        self.fractions
            .iter()
            .any(|f| f.terrain_type.id == id && f.amount >= min_amount)
    }

    /// Weighted sum of the fraction colors.
    ///
    /// Each term is `color * amount` with alpha forced to 1. The RGB sum is not re-normalized,
    /// and the result is opaque.
    pub fn color(&self) -> Color {
        let rgb = self
            .fractions
            .iter()
            .map(|f| (f.terrain_type.color * f.amount).with_alpha(0.0))
            .fold(Color::BLACK.with_alpha(0.0), |acc, c| acc + c);
        rgb.with_alpha(1.0)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::rand01;

    fn ty(id: &str, color: Color) -> Arc<TerrainType> {
        Arc::new(TerrainType::new(id, color, 0.0))
    }

    #[test]
    fn amounts_are_clamped_to_remaining_capacity() {
        let mut blend = TerrainBlend::new();
        blend.add_terrain_type(ty("sand", Color::WHITE), 0.7);
        blend.add_terrain_type(ty("grass", Color::WHITE), 0.7);

        let amounts: Vec<f32> = blend.fractions().iter().map(|f| f.amount()).collect();
        assert_eq!(amounts.len(), 2);
        assert!((amounts[0] - 0.7).abs() < 1e-6);
        assert!((amounts[1] - 0.3).abs() < 1e-6);
        assert!(blend.remaining_capacity().abs() < 1e-6);
    }

    #[test]
    fn pure_blend_uses_the_whole_capacity() {
        let blend = TerrainBlend::pure(ty("sand", Color::rgb(1.0, 1.0, 0.0)));
        assert_eq!(blend.fractions().len(), 1);
        assert_eq!(blend.amount_of("sand"), 1.0);
        assert_eq!(blend.remaining_capacity(), 0.0);
    }

    #[test]
    fn zero_amount_still_appends_a_fraction() {
        let mut blend = TerrainBlend::new();
        blend.add_terrain_type(ty("sand", Color::WHITE), 1.0);
        blend.add_terrain_type(ty("grass", Color::WHITE), 0.4);
        assert_eq!(blend.fractions().len(), 2);
        assert_eq!(blend.fractions()[1].amount(), 0.0);
    }

    #[test]
    fn total_never_exceeds_one_for_random_sequences() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..500 {
            let mut blend = TerrainBlend::new();
            let count = 1 + (rand01(&mut rng) * 7.0) as usize;
            for i in 0..count {
                let amount = rand01(&mut rng) * 2.0 - 0.5;
                blend.add_terrain_type(ty(&format!("t{i}"), Color::WHITE), amount);
                assert!(blend.total_amount() <= 1.0 + 1e-6);
                assert!(blend.remaining_capacity() >= -1e-6);
            }
        }
    }

    #[test]
    fn color_is_weighted_sum_without_normalization() {
        let mut blend = TerrainBlend::new();
        blend.add_terrain_type(ty("red", Color::rgb(1.0, 0.0, 0.0)), 0.25);
        blend.add_terrain_type(ty("blue", Color::rgb(0.0, 0.0, 1.0)), 0.25);

        let c = blend.color();
        assert!((c.r - 0.25).abs() < 1e-6);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.25).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn color_is_idempotent_and_order_independent() {
        let a = ty("a", Color::rgb(0.3, 0.6, 0.9));
        let b = ty("b", Color::rgb(0.9, 0.1, 0.2));

        let mut ab = TerrainBlend::new();
        ab.add_terrain_type(a.clone(), 0.4);
        ab.add_terrain_type(b.clone(), 0.6);
        let mut ba = TerrainBlend::new();
        ba.add_terrain_type(b, 0.6);
        ba.add_terrain_type(a, 0.4);

        assert_eq!(ab.color(), ab.color());
        let (x, y) = (ab.color(), ba.color());
        assert!((x.r - y.r).abs() < 1e-6);
        assert!((x.g - y.g).abs() < 1e-6);
        assert!((x.b - y.b).abs() < 1e-6);
    }

    #[test]
    fn has_fraction_requires_single_entry_above_threshold() {
        let mut blend = TerrainBlend::new();
        blend.add_terrain_type(ty("grass", Color::WHITE), 0.4);
        blend.add_terrain_type(ty("sand", Color::WHITE), 0.6);
        assert!(blend.has_fraction("sand", 0.5));
        assert!(!blend.has_fraction("grass", 0.5));
        assert!(!blend.has_fraction("rock", 0.0));
        assert!((blend.amount_of("grass") - 0.4).abs() < 1e-6);
    }
}
