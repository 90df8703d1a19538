use std::path::Path;

use anyhow::{ensure, Context};
use image::{Rgba, RgbaImage};
use island_terrain::generation::TerrainTexture;
use island_terrain::heightmap::Heightmap;
use island_terrain::placement::GridPoint;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber; `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Marker drawn for each placed object.
#[derive(Clone, Copy, Debug)]
pub struct MarkerStyle {
    pub color: [u8; 4],
    /// Half size of the square marker in output pixels.
    pub half_size: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: [200, 30, 30, 255],
            half_size: 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Output pixels per texture pixel.
    pub scale: u32,
    /// Island radius the positions were generated with.
    pub radius: f32,
    pub marker: MarkerStyle,
}

impl RenderConfig {
    pub fn new(radius: f32) -> Self {
        Self {
            scale: 4,
            radius,
            marker: MarkerStyle::default(),
        }
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }
}

/// Writes the terrain texture with a marker on every position.
pub fn render_island_to_png(
    texture: &TerrainTexture,
    positions: &[GridPoint],
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    ensure!(texture.resolution > 0, "terrain texture is empty");
    let res = texture.resolution as u32;
    let scale = config.scale.max(1);
    let mut img = RgbaImage::new(res * scale, res * scale);

    let rgba = texture.to_rgba8();
    for (i, px) in rgba.chunks_exact(4).enumerate() {
        let (x, y) = (i as u32 % res, i as u32 / res);
        let color = Rgba([px[0], px[1], px[2], px[3]]);
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(x * scale + dx, y * scale + dy, color);
            }
        }
    }

    let size = img.width() as f32;
    let half = config.marker.half_size as i64;
    for point in positions {
        let u = (point.position.x + config.radius) / (2.0 * config.radius);
        let v = (point.position.z + config.radius) / (2.0 * config.radius);
        let (cx, cy) = ((u * size) as i64, (v * size) as i64);
        for y in (cy - half)..=(cy + half) {
            for x in (cx - half)..=(cx + half) {
                if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                    img.put_pixel(x as u32, y as u32, Rgba(config.marker.color));
                }
            }
        }
    }

    save(img, path.as_ref())
}

/// Writes a heightmap as grayscale.
pub fn render_heightmap_to_png(
    heightmap: &Heightmap,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    ensure!(!heightmap.is_empty(), "heightmap is empty");
    let res = heightmap.resolution() as u32;
    let img = RgbaImage::from_fn(res, res, |x, y| {
        let v = (heightmap.get(x as usize, y as usize).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([v, v, v, 255])
    });
    save(img, path.as_ref())
}

fn save(img: RgbaImage, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    img.save(path).with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
