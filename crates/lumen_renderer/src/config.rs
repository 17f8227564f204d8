//! Render-time parameters.

use crate::{Color, ConfigError};
use serde::{Deserialize, Serialize};

/// Render configuration.
///
/// Immutable for the duration of a render. Deserializes from JSON with every
/// field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Camera samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Probability of ending a path at each vertex past `min_bounces`
    pub stop_probability: f32,
    /// Bounces that always continue before Russian roulette kicks in
    pub min_bounces: u32,
    /// Side of the stratified jitter grid inside each pixel (1 = plain jitter)
    pub jitter_grid: u32,
    /// Worker threads; hardware concurrency when `None`
    pub threads: Option<usize>,
    /// Global seed; drawn at random when `None`
    pub seed: Option<u64>,
    /// Radiance returned for rays that leave the scene
    pub background: [f32; 3],
    /// Lower bound of the `t` search interval for every traced ray
    pub ray_epsilon: f32,
    /// Mixture weight of explicit light sampling when lights are supplied, in `[0, 1)`
    pub light_sampling_weight: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 64,
            stop_probability: 0.05,
            min_bounces: 8,
            jitter_grid: 1,
            threads: None,
            seed: None,
            background: [0.0; 3],
            ray_epsilon: 1e-3,
            light_sampling_weight: 0.5,
        }
    }
}

impl RenderConfig {
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_stop_probability(mut self, stop_probability: f32) -> Self {
        self.stop_probability = stop_probability;
        self
    }

    pub fn with_min_bounces(mut self, min_bounces: u32) -> Self {
        self.min_bounces = min_bounces;
        self
    }

    pub fn with_jitter_grid(mut self, jitter_grid: u32) -> Self {
        self.jitter_grid = jitter_grid;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background.to_array();
        self
    }

    pub fn with_light_sampling_weight(mut self, weight: f32) -> Self {
        self.light_sampling_weight = weight;
        self
    }

    pub fn background_color(&self) -> Color {
        Color::from_array(self.background)
    }

    /// Checks every field against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.stop_probability > 0.0 && self.stop_probability <= 1.0) {
            return Err(ConfigError::StopProbability(self.stop_probability));
        }
        if self.jitter_grid == 0 {
            return Err(ConfigError::ZeroJitterGrid);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        // The material lobe must keep some weight or indirect light is lost.
        if !(0.0..1.0).contains(&self.light_sampling_weight) {
            return Err(ConfigError::LightSamplingWeight(self.light_sampling_weight));
        }
        if !(self.ray_epsilon.is_finite() && self.ray_epsilon >= 0.0) {
            return Err(ConfigError::RayEpsilon(self.ray_epsilon));
        }
        Ok(())
    }
}
