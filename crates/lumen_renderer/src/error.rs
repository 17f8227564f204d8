//! Error types for configuration, task execution and rendering.

use thiserror::Error;

/// A [`crate::RenderConfig`] value outside its valid range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,
    #[error("stop_probability must lie in (0, 1], got {0}")]
    StopProbability(f32),
    #[error("jitter_grid must be at least 1")]
    ZeroJitterGrid,
    #[error("threads must be at least 1 when given")]
    ZeroThreads,
    #[error("light_sampling_weight must lie in [0, 1), got {0}")]
    LightSamplingWeight(f32),
    #[error("ray_epsilon must be finite and non-negative, got {0}")]
    RayEpsilon(f32),
}

/// Why a submitted task produced no result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("task panicked: {0}")]
    Panicked(String),
    #[error("task was dropped before it ran")]
    Dropped,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("film is {film_width}x{film_height} but the camera renders {camera_width}x{camera_height}")]
    ResolutionMismatch {
        film_width: u32,
        film_height: u32,
        camera_width: u32,
        camera_height: u32,
    },

    #[error("render task for pixel (row {row}, col {col}) failed")]
    Task {
        row: u32,
        col: u32,
        #[source]
        source: TaskError,
    },

    #[error("failed to start the worker pool")]
    Spawn(#[from] rayon::ThreadPoolBuildError),

    #[error("film of {width}x{height} could not be converted to an RGBA image")]
    Encode { width: u32, height: u32 },
}
