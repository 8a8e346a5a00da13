//! Per-instance configuration, read from the host's JSON.

use serde::Deserialize;
use widgets_core::{RollingWindow, SurfaceSpec, WidgetError};

/// Allowed range of the per-step velocity multiplier.
pub const FRICTION_RANGE: (f64, f64) = (0.90, 1.00);
/// Allowed range of the post-collision speed fraction.
pub const RESTITUTION_RANGE: (f64, f64) = (0.60, 1.00);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub surface: SurfaceSpec,
    /// Body radius in CSS pixels.
    pub radius: f64,
    /// Radius at which the body's mass is 1.
    pub base_radius: f64,
    /// Pull length that gives the maximum launch speed.
    pub max_pull: f64,
    /// Launch speed at full pull, in pixels per step.
    pub max_speed: f64,
    /// Steps spent on the cue animation between arming and launch.
    pub strike_frames: u32,
    pub friction: f64,
    pub restitution: f64,
    pub chart: RollingWindow,
    pub sample_capacity: usize,
    /// Extra grab margin around the body for pointer hits.
    pub hit_slop: f64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceSpec {
                aspect: 1.5,
                min_width: 280.0,
                max_width: 720.0,
            },
            radius: 12.0,
            base_radius: 12.0,
            max_pull: 140.0,
            max_speed: 14.0,
            strike_frames: 10,
            friction: 0.99,
            restitution: 0.90,
            chart: RollingWindow::default(),
            sample_capacity: 2400,
            hit_slop: 4.0,
        }
    }
}

impl PoolConfig {
    /// Parse and sanitize. An empty object gives the defaults.
    pub fn from_json(json: &str) -> Result<Self, WidgetError> {
        let config: PoolConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Bring every field into a usable range, warning about what changed.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |name: &str, value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                log::warn!("pool-table: {} = {} is not usable, using {}", name, value, fallback);
                fallback
            }
        };

        Self {
            surface: self.surface,
            radius: positive("radius", self.radius, defaults.radius),
            base_radius: positive("base_radius", self.base_radius, defaults.base_radius),
            max_pull: positive("max_pull", self.max_pull, defaults.max_pull),
            max_speed: positive("max_speed", self.max_speed, defaults.max_speed),
            strike_frames: self.strike_frames,
            friction: clamp_param("friction", self.friction, FRICTION_RANGE, defaults.friction),
            restitution: clamp_param(
                "restitution",
                self.restitution,
                RESTITUTION_RANGE,
                defaults.restitution,
            ),
            chart: self.chart.sanitized(),
            sample_capacity: self.sample_capacity.max(2),
            hit_slop: if self.hit_slop.is_finite() { self.hit_slop.max(0.0) } else { 0.0 },
        }
    }

    /// Area proxy: `(radius / base_radius)^2`.
    pub fn mass(&self) -> f64 {
        let ratio = self.radius / self.base_radius;
        if ratio.is_finite() && ratio > 0.0 {
            ratio * ratio
        } else {
            1.0
        }
    }
}

/// Clamp an environment parameter into `range`; non-numbers fall back.
pub fn clamp_param(name: &str, value: f64, range: (f64, f64), fallback: f64) -> f64 {
    if !value.is_finite() {
        log::warn!("pool-table: {} is not a number, using {}", name, fallback);
        return fallback;
    }
    let clamped = value.clamp(range.0, range.1);
    if clamped != value {
        log::warn!("pool-table: {} = {} clamped to {}", name, value, clamped);
    }
    clamped
}
