//! Single-body integrator: Euler position update, wall reflection, friction.
//!
//! Velocities are in CSS pixels per fixed step. Every loss is measured as the
//! exact kinetic-energy difference across the operation that caused it, so
//! the ledger can account for it without drift.

use glam::DVec2;

/// Below this speed (pixels per step) the body is at rest.
pub const STOP_SPEED: f64 = 0.01;

/// The single simulated disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub mass: f64,
}

impl Body {
    pub fn new(pos: DVec2, radius: f64, mass: f64) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            radius,
            mass,
        }
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    pub fn is_resting(&self) -> bool {
        self.speed() < STOP_SPEED
    }
}

/// Playing area in table-local pixels, origin at the top-left cushion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width, self.height) * 0.5
    }

    /// Allowed `(min, max)` for the body's center along one axis.
    /// A table narrower than the body pins it to the middle.
    fn axis_range(extent: f64, radius: f64) -> (f64, f64) {
        if extent >= 2.0 * radius {
            (radius, extent - radius)
        } else {
            (extent * 0.5, extent * 0.5)
        }
    }

    /// Nearest position where a body of `radius` fits entirely.
    pub fn clamp(&self, pos: DVec2, radius: f64) -> DVec2 {
        let (x_min, x_max) = Self::axis_range(self.width, radius);
        let (y_min, y_max) = Self::axis_range(self.height, radius);
        let pos = if pos.is_finite() { pos } else { self.center() };
        DVec2::new(pos.x.clamp(x_min, x_max), pos.y.clamp(y_min, y_max))
    }

    pub fn contains(&self, pos: DVec2, radius: f64) -> bool {
        self.clamp(pos, radius) == pos
    }
}

/// User-adjustable parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Velocity multiplier per step. 1.0 is frictionless.
    pub friction: f64,
    /// Speed fraction kept per wall contact. 1.0 is perfectly elastic.
    pub restitution: f64,
}

/// Energy lost during one step, by cause.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepLosses {
    pub friction: f64,
    pub inelastic: f64,
    pub wall_hits: u32,
}

/// Advance one step: move, resolve walls, apply friction.
pub fn integrate(body: &mut Body, bounds: Bounds, env: Environment) -> StepLosses {
    body.pos += body.vel;
    let (inelastic, wall_hits) = resolve_walls(body, bounds, env.restitution);
    let friction = apply_friction(body, env.friction);
    StepLosses {
        friction,
        inelastic,
        wall_hits,
    }
}

/// Clamp the body back inside `bounds` and reflect off every wall it crossed.
///
/// Each axis is handled on its own, so a corner hit reflects both components
/// and applies restitution once per wall. Returns the energy lost and the
/// number of walls hit.
pub fn resolve_walls(body: &mut Body, bounds: Bounds, restitution: f64) -> (f64, u32) {
    let mut lost = 0.0;
    let mut hits = 0;

    let (x_min, x_max) = Bounds::axis_range(bounds.width, body.radius);
    if let Some(vx) = reflect_axis(&mut body.pos.x, body.vel.x, x_min, x_max) {
        body.vel.x = vx;
        lost += dampen(body, restitution);
        hits += 1;
    }

    let (y_min, y_max) = Bounds::axis_range(bounds.height, body.radius);
    if let Some(vy) = reflect_axis(&mut body.pos.y, body.vel.y, y_min, y_max) {
        body.vel.y = vy;
        lost += dampen(body, restitution);
        hits += 1;
    }

    (lost, hits)
}

/// Clamp `pos` into `[min, max]`; on contact return the velocity component
/// pointing back inside.
fn reflect_axis(pos: &mut f64, vel: f64, min: f64, max: f64) -> Option<f64> {
    if *pos < min {
        *pos = min;
        Some(vel.abs())
    } else if *pos > max {
        *pos = max;
        Some(-vel.abs())
    } else {
        None
    }
}

/// Scale the whole velocity by `restitution`; returns the energy removed.
fn dampen(body: &mut Body, restitution: f64) -> f64 {
    let before = body.kinetic_energy();
    body.vel *= restitution;
    (before - body.kinetic_energy()).max(0.0)
}

/// Exponential decay of both components; returns the energy removed.
pub fn apply_friction(body: &mut Body, factor: f64) -> f64 {
    if factor >= 1.0 {
        return 0.0;
    }
    let before = body.kinetic_energy();
    body.vel *= factor.max(0.0);
    (before - body.kinetic_energy()).max(0.0)
}

/// Launch speed for a pull of `pull_length`: square-root response, so short
/// pulls still move the body.
pub fn launch_speed(pull_length: f64, max_pull: f64, max_speed: f64) -> f64 {
    if !(pull_length > 0.0) || !(max_pull > 0.0) || !max_speed.is_finite() {
        return 0.0;
    }
    max_speed * (pull_length / max_pull).clamp(0.0, 1.0).sqrt()
}

/// Velocity for an aim vector (pointer to body). Zero for a zero-length aim.
pub fn launch_velocity(aim: DVec2, max_pull: f64, max_speed: f64) -> DVec2 {
    let direction = aim.normalize_or_zero();
    if direction == DVec2::ZERO {
        return DVec2::ZERO;
    }
    direction * launch_speed(aim.length(), max_pull, max_speed)
}
