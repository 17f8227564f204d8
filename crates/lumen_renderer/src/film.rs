//! Film buffer the scheduler writes radiance into.

use crate::{Color, RenderError, Vec4};
use image::RgbaImage;
use rayon::prelude::*;

/// Display gamma used when quantizing to 8 bits.
const GAMMA: f32 = 2.2;

/// Row-major RGBA image of linear radiance.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Image {
    /// Create a new image filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec4::ZERO; width as usize * height as usize],
        }
    }

    /// Decode an 8-bit RGBA image (gamma encoded) into linear values.
    pub fn from_rgba_image(source: &RgbaImage) -> Self {
        let pixels = source
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                Vec4::new(
                    srgb_to_linear(r),
                    srgb_to_linear(g),
                    srgb_to_linear(b),
                    a as f32 / 255.0,
                )
            })
            .collect();
        Self {
            width: source.width(),
            height: source.height(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[self.index(x, y)]
    }

    /// Color channels of the pixel at column `x`, row `y`.
    pub fn color(&self, x: u32, y: u32) -> Color {
        self.get(x, y).truncate()
    }

    /// Store an opaque color at column `x`, row `y`.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color.extend(1.0);
    }

    /// Average color over every pixel.
    pub fn mean_radiance(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        let sum: Color = self.pixels.iter().map(|p| p.truncate()).sum();
        sum / self.pixels.len() as f32
    }

    /// Quantize to gamma-encoded RGBA8, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let texels: Vec<[u8; 4]> = self.pixels.par_iter().map(|p| encode_pixel(*p)).collect();
        bytemuck::cast_slice(&texels).to_vec()
    }

    /// Convert to an `image` buffer ready for encoding.
    pub fn to_rgba_image(&self) -> Result<RgbaImage, RenderError> {
        RgbaImage::from_raw(self.width, self.height, self.to_rgba8()).ok_or(
            RenderError::Encode {
                width: self.width,
                height: self.height,
            },
        )
    }
}

/// Apply display gamma to a linear value in `[0, 1]`.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.powf(1.0 / GAMMA)
    } else {
        0.0
    }
}

#[inline]
fn srgb_to_linear(channel: u8) -> f32 {
    (channel as f32 / 255.0).powf(GAMMA)
}

#[inline]
fn quantize(linear: f32) -> u8 {
    (255.0 * linear_to_gamma(linear.clamp(0.0, 1.0))).round() as u8
}

fn encode_pixel(p: Vec4) -> [u8; 4] {
    [
        quantize(p.x),
        quantize(p.y),
        quantize(p.z),
        (255.0 * p.w.clamp(0.0, 1.0)).round() as u8,
    ]
}
