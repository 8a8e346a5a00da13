//! Energy accounting for one shot, and the bounded sample history the chart reads.

use std::collections::VecDeque;

use widgets_core::RollingWindow;

use crate::physics::StepLosses;

/// Largest residual left uncorrected, in energy units.
pub const CONSERVATION_TOLERANCE: f64 = 1e-6;

/// Running account of one shot: `e_trans + w_friction + w_inelastic == e0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyLedger {
    /// Kinetic energy at launch.
    pub e0: f64,
    /// Current kinetic energy.
    pub e_trans: f64,
    /// Dissipated by friction so far.
    pub w_friction: f64,
    /// Dissipated by lossy wall contacts so far.
    pub w_inelastic: f64,
}

impl EnergyLedger {
    pub fn launch(e0: f64) -> Self {
        Self {
            e0,
            e_trans: e0,
            w_friction: 0.0,
            w_inelastic: 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.e_trans + self.w_friction + self.w_inelastic
    }

    pub fn residual(&self) -> f64 {
        self.e0 - self.total()
    }

    /// Book one step's losses and the body's kinetic energy after it.
    pub fn record(&mut self, losses: &StepLosses, e_trans: f64) {
        self.w_friction += losses.friction;
        self.w_inelastic += losses.inelastic;
        self.e_trans = e_trans;
        self.correct();
    }

    /// The body stopped: whatever kinetic energy is left went to friction.
    pub fn settle(&mut self) {
        self.w_friction += self.e_trans;
        self.e_trans = 0.0;
        self.correct();
    }

    /// Fold floating-point drift into friction so the sum is exact.
    ///
    /// Friction never goes negative; a deficit it cannot absorb comes out of
    /// the inelastic term, and as a last resort out of the kinetic term.
    fn correct(&mut self) {
        let corr = self.residual();
        if corr.abs() <= CONSERVATION_TOLERANCE {
            return;
        }
        let friction = self.w_friction + corr;
        if friction >= 0.0 {
            self.w_friction = friction;
            return;
        }
        self.w_friction = 0.0;
        let inelastic = self.w_inelastic + friction;
        if inelastic >= 0.0 {
            self.w_inelastic = inelastic;
            return;
        }
        self.w_inelastic = 0.0;
        self.e_trans = self.e0.max(0.0);
    }

    pub fn sample(&self, t: f64) -> Sample {
        Sample {
            t,
            e_trans: self.e_trans,
            w_friction: self.w_friction,
            w_inelastic: self.w_inelastic,
        }
    }
}

/// One chart column: time since launch and the three energy terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub e_trans: f64,
    pub w_friction: f64,
    pub w_inelastic: f64,
}

impl Sample {
    pub fn total(&self) -> f64 {
        self.e_trans + self.w_friction + self.w_inelastic
    }

    /// Bottom-to-top stacking order of the chart bands.
    pub fn layers(&self) -> [f64; 3] {
        [self.w_friction, self.w_inelastic, self.e_trans]
    }
}

/// Samples in time order, oldest dropped first once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Samples on screen at `now`.
    pub fn visible<'a>(
        &'a self,
        window: &'a RollingWindow,
        now: f64,
    ) -> impl Iterator<Item = &'a Sample> + 'a {
        self.samples.iter().filter(move |s| window.contains(s.t, now))
    }
}
