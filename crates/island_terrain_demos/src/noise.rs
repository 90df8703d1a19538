use glam::Vec2;
use island_terrain::color::Color;
use island_terrain::generation::HeightSampler;
use island_terrain::terrain::{CatalogConfig, NoiseParams, TerrainType};

/// Fractal value noise shaped into an island by a radial falloff.
#[derive(Clone, Debug)]
pub struct IslandNoise {
    pub params: NoiseParams,
    pub seed: u32,
    pub radius: f32,
    /// Share of the height taken from the falloff; the rest is noise.
    pub falloff_weight: f32,
}

impl IslandNoise {
    pub fn new(params: NoiseParams, seed: u32, radius: f32) -> Self {
        Self {
            params,
            seed,
            radius,
            falloff_weight: 0.65,
        }
    }

    fn fbm(&self, p: Vec2) -> f32 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0 / self.params.scale.max(f32::EPSILON);
        let mut sum = 0.0;
        let mut norm = 0.0;
        for octave in 0..self.params.octaves.max(1) {
            let q = (p + self.params.offset) * frequency;
            sum += amplitude * value_noise(q, self.seed.wrapping_add(octave));
            norm += amplitude;
            amplitude *= self.params.persistence;
            frequency *= self.params.lacunarity;
        }
        sum / norm
    }
}

impl HeightSampler for IslandNoise {
    fn sample(&self, position: Vec2) -> f32 {
        let falloff = (1.0 - position.length() / self.radius).clamp(0.0, 1.0);
        let w = self.falloff_weight.clamp(0.0, 1.0);
        (w * falloff + (1.0 - w) * self.fbm(position)) * falloff.sqrt()
    }
}

fn hash(x: i32, y: i32, seed: u32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x8da6_b343)
        ^ (y as u32).wrapping_mul(0xd816_3841)
        ^ seed.wrapping_mul(0xcb1a_b31f);
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    h as f32 / u32::MAX as f32
}

fn value_noise(p: Vec2, seed: u32) -> f32 {
    let cell = p.floor();
    let f = p - cell;
    let (x, y) = (cell.x as i32, cell.y as i32);
    let s = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(x, y, seed);
    let b = hash(x + 1, y, seed);
    let c = hash(x, y + 1, seed);
    let d = hash(x + 1, y + 1, seed);
    let top = a + (b - a) * s.x;
    let bottom = c + (d - c) * s.x;
    top + (bottom - top) * s.y
}

/// Deep water to snow, with per-type noise settings for external generators.
pub fn demo_catalog(blend_height: f32) -> CatalogConfig {
    let rough = NoiseParams {
        scale: 12.0,
        octaves: 5,
        ..NoiseParams::default()
    };
    CatalogConfig::new(vec![
        TerrainType::new("deep_water", Color::from_rgb8(18, 42, 110), 0.0),
        TerrainType::new("shallows", Color::from_rgb8(42, 112, 188), 0.22),
        TerrainType::new("sand", Color::from_rgb8(228, 208, 142), 0.34),
        TerrainType::new("grass", Color::from_rgb8(74, 158, 62), 0.42),
        TerrainType::new("forest", Color::from_rgb8(34, 102, 44), 0.58),
        TerrainType::new("rock", Color::from_rgb8(118, 112, 106), 0.74).with_noise(rough),
        TerrainType::new("snow", Color::from_rgb8(240, 244, 248), 0.9),
    ])
    .with_blend_height(blend_height)
    .with_node_count(1, 4)
}
