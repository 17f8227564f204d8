//! Textures map a surface coordinate to a color.

use crate::{Color, Image, Vec2, Vec3};
use std::sync::Arc;

/// A 2D-coordinate-to-color lookup. Shared read-only across render threads.
pub trait Texture: Send + Sync {
    fn value(&self, uv: Vec2, p: Vec3) -> Color;
}

/// The same color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor(pub Color);

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self(color)
    }
}

impl Texture for SolidColor {
    fn value(&self, _uv: Vec2, _p: Vec3) -> Color {
        self.0
    }
}

/// Checkerboard in surface coordinates, `scale` cells per unit of `uv`.
pub struct Checker {
    scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl Checker {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { scale, even, odd }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor(even)),
            Arc::new(SolidColor(odd)),
        )
    }
}

impl Texture for Checker {
    fn value(&self, uv: Vec2, p: Vec3) -> Color {
        let cell = (uv * self.scale).floor();
        let parity = (cell.x as i64 + cell.y as i64).rem_euclid(2);
        if parity == 0 {
            self.even.value(uv, p)
        } else {
            self.odd.value(uv, p)
        }
    }
}

/// Nearest-texel lookup into an image; coordinates wrap.
pub struct ImageTexture {
    image: Arc<Image>,
}

impl ImageTexture {
    pub fn new(image: Arc<Image>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, uv: Vec2, _p: Vec3) -> Color {
        let (w, h) = (self.image.width(), self.image.height());
        if w == 0 || h == 0 {
            return Color::new(0.0, 1.0, 1.0);
        }
        let x = ((uv.x * w as f32).floor() as i64).rem_euclid(w as i64) as u32;
        let y = ((uv.y * h as f32).floor() as i64).rem_euclid(h as i64) as u32;
        self.image.color(x, y)
    }
}
