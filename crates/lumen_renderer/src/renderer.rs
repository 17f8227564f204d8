//! Parallel render scheduler.
//!
//! Every pixel is one task on the [`ThreadPool`]. Tasks are submitted in
//! batches of the pool's thread count and each batch is awaited before the
//! next goes out, so in-flight work stays bounded. A task owns its RNG,
//! seeded from the global seed and its pixel index, and returns its color;
//! only the scheduler thread writes the film.

use crate::thread_pool::available_parallelism;
use crate::{
    gen_f32, radiance, Color, Hittable, HittableList, Image, RaySource, RenderConfig,
    RenderError, TaskHandle, ThreadPool,
};
use lumen_math::Vec2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub pixels: u64,
    pub samples: u64,
    pub seed: u64,
    pub elapsed: Duration,
}

/// Drives the integrator across a fixed worker pool.
pub struct Renderer {
    config: Arc<RenderConfig>,
    pool: ThreadPool,
}

impl Renderer {
    /// Validate `config` and start its worker pool.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let threads = config.threads.unwrap_or_else(available_parallelism);
        let pool = ThreadPool::new(threads)?;
        Ok(Self {
            config: Arc::new(config),
            pool,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn thread_count(&self) -> usize {
        self.pool.thread_count()
    }

    /// Render every pixel of `film`.
    ///
    /// `camera` maps pixels to rays, `world` is the scene root (read-only,
    /// typically a [`HittableList`] with its BVH built) and `lights` lists
    /// geometry for explicit light sampling (may be empty).
    pub fn render(
        &self,
        camera: Arc<dyn RaySource>,
        world: Arc<dyn Hittable>,
        lights: Arc<HittableList>,
        film: &mut Image,
    ) -> Result<RenderStats, RenderError> {
        let (width, height) = (film.width(), film.height());
        if let Some((camera_width, camera_height)) = camera.resolution() {
            if (camera_width, camera_height) != (width, height) {
                return Err(RenderError::ResolutionMismatch {
                    film_width: width,
                    film_height: height,
                    camera_width,
                    camera_height,
                });
            }
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let total = width as usize * height as usize;
        let batch_size = self.thread_count();
        log::info!(
            "rendering {width}x{height} at {} spp on {batch_size} threads (seed {seed})",
            self.config.samples_per_pixel
        );

        let start = Instant::now();
        let mut written = vec![false; total];
        let mut next_report = 1;
        let mut done = 0;

        for batch_start in (0..total).step_by(batch_size.max(1)) {
            let batch_end = (batch_start + batch_size).min(total);
            let handles: Vec<(u32, u32, TaskHandle<Color>)> = (batch_start..batch_end)
                .map(|index| {
                    let row = (index / width as usize) as u32;
                    let col = (index % width as usize) as u32;
                    let handle = self.submit_pixel(
                        &camera,
                        &world,
                        &lights,
                        row,
                        col,
                        pixel_seed(seed, index as u64),
                    );
                    (row, col, handle)
                })
                .collect();

            for (row, col, handle) in handles {
                let color = handle
                    .wait()
                    .map_err(|source| RenderError::Task { row, col, source })?;
                let index = row as usize * width as usize + col as usize;
                assert!(!written[index], "pixel ({row}, {col}) written twice");
                written[index] = true;
                film.set(col, row, color);
            }

            done = batch_end;
            if done * 10 >= next_report * total {
                log::info!("{}% of pixels done", done * 100 / total);
                next_report = done * 10 / total + 1;
            }
        }
        debug_assert!(written.iter().all(|w| *w));

        let elapsed = start.elapsed();
        log::info!("render finished in {:.2?}", elapsed);

        Ok(RenderStats {
            pixels: done as u64,
            samples: done as u64 * self.config.samples_per_pixel as u64,
            seed,
            elapsed,
        })
    }

    fn submit_pixel(
        &self,
        camera: &Arc<dyn RaySource>,
        world: &Arc<dyn Hittable>,
        lights: &Arc<HittableList>,
        row: u32,
        col: u32,
        seed: u64,
    ) -> TaskHandle<Color> {
        let camera = Arc::clone(camera);
        let world = Arc::clone(world);
        let lights = Arc::clone(lights);
        let config = Arc::clone(&self.config);

        self.pool.submit(move || {
            let mut rng = StdRng::seed_from_u64(seed);
            render_pixel(
                camera.as_ref(),
                world.as_ref(),
                &lights,
                row,
                col,
                &config,
                &mut rng,
            )
        })
    }
}

/// Seed for the task rendering pixel `index`, derived from the global seed.
pub fn pixel_seed(seed: u64, index: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    (seed, index).hash(&mut hasher);
    hasher.finish()
}

/// Average `samples_per_pixel` radiance estimates through one pixel.
///
/// Samples cycle through a `jitter_grid × jitter_grid` grid of strata with a
/// uniform offset inside each stratum. Non-finite estimates are dropped
/// (counted as black).
pub fn render_pixel(
    camera: &dyn RaySource,
    world: &dyn Hittable,
    lights: &HittableList,
    row: u32,
    col: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let grid = config.jitter_grid.max(1);
    let strata = grid * grid;
    let mut pixel_color = Color::ZERO;
    let mut rejected = 0;

    for sample in 0..config.samples_per_pixel {
        let cell = sample % strata;
        let jitter = Vec2::new(
            ((cell % grid) as f32 + gen_f32(rng)) / grid as f32,
            ((cell / grid) as f32 + gen_f32(rng)) / grid as f32,
        );
        let ray = camera.ray(row, col, jitter);
        let estimate = radiance(&ray, world, lights, 0, config, rng);
        if estimate.is_finite() {
            pixel_color += estimate;
        } else {
            rejected += 1;
        }
    }

    if rejected > 0 {
        log::warn!("pixel ({row}, {col}): dropped {rejected} non-finite samples");
    }
    pixel_color / config.samples_per_pixel.max(1) as f32
}
