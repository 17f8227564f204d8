//! Camera ray generation.

use lumen_math::{Ray, Vec2, Vec3};

/// Maps a pixel and a jitter offset inside it to a world-space ray.
///
/// `jitter` lies in `[0, 1)²`, measured from the pixel's top-left corner.
/// Closures of the form `Fn(row, col, jitter) -> Ray` work directly.
pub trait RaySource: Send + Sync {
    fn ray(&self, row: u32, col: u32, jitter: Vec2) -> Ray;

    /// Image size this source was set up for, as `(width, height)`.
    fn resolution(&self) -> Option<(u32, u32)> {
        None
    }
}

impl<F> RaySource for F
where
    F: Fn(u32, u32, Vec2) -> Ray + Send + Sync,
{
    fn ray(&self, row: u32, col: u32, jitter: Vec2) -> Ray {
        self(row, col, jitter)
    }
}

/// Pinhole perspective camera.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 400,
            image_height: 400,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_vfov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Recompute cached values (call after changing settings).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Viewport one unit in front of the eye
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height.max(1) as f32);

        // Camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        self.pixel_delta_u = viewport_u / self.image_width.max(1) as f32;
        self.pixel_delta_v = viewport_v / self.image_height.max(1) as f32;

        // Top-left corner of the top-left pixel
        self.pixel00_loc = self.center - w - viewport_u / 2.0 - viewport_v / 2.0;
    }

    /// Builder-style finish: returns the camera with cached values updated.
    pub fn initialized(mut self) -> Self {
        self.initialize();
        self
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl RaySource for Camera {
    fn ray(&self, row: u32, col: u32, jitter: Vec2) -> Ray {
        let pixel_sample = self.pixel00_loc
            + (col as f32 + jitter.x) * self.pixel_delta_u
            + (row as f32 + jitter.y) * self.pixel_delta_v;
        Ray::new(self.center, pixel_sample - self.center)
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        Some((self.image_width, self.image_height))
    }
}
