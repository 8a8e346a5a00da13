//! Pool-table widget: one body, a pull-back cue and an energy ledger.
//!
//! State machine:
//!
//! ```text
//! idle ──down on body──▶ draggingBody ──up/cancel──▶ idle
//! idle ──down elsewhere──▶ aiming ──up, pull > 5px──▶ strikeAnimating
//!                            └─up, short pull / cancel──▶ idle
//! strikeAnimating ──N steps──▶ moving ──speed < 0.01──▶ idle
//! ```
//!
//! A pointer-down while moving stops the shot and starts a new drag or aim.
//! Nothing can be grabbed during the strike animation.

use glam::DVec2;
use widgets_core::{
    ease, ControlBinder, Easing, InputEvent, RenderContext, ValueTransform, Widget, WidgetConfig,
    WidgetContext, WidgetError, WidgetEvent,
};

use crate::config::{clamp_param, PoolConfig, FRICTION_RANGE, RESTITUTION_RANGE};
use crate::draw::{self, CuePose};
use crate::layout::TableLayout;
use crate::ledger::{EnergyLedger, SampleBuffer};
use crate::physics::{self, Body, Environment};

/// Shortest pull that arms a shot, in pixels.
const ARM_THRESHOLD: f64 = 5.0;
/// Cue draw-back at full pull, in pixels.
const CUE_MAX_RETRACT: f64 = 48.0;

/// Bound control kinds (host sliders / number boxes).
pub mod controls {
    /// "Friction amount", 0 to 0.10. Model value is `1 - amount`.
    pub const FRICTION: u32 = 1;
    /// "Bounce loss", 0 to 0.40. Model value is `1 - loss`.
    pub const RESTITUTION: u32 = 2;
}

/// Custom event kinds from the host page.
pub mod events {
    pub const RESET: u32 = 1;
}

/// Events sent to the host once per frame.
pub mod widget_events {
    /// a = kinetic energy, b = friction loss, c = inelastic loss
    pub const LEDGER: u32 = 1;
    /// a = mode index, b = speed, c = launch energy
    pub const MODE: u32 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    DraggingBody,
    Aiming,
    StrikeAnimating,
    Moving,
}

impl Mode {
    pub fn index(self) -> u32 {
        match self {
            Mode::Idle => 0,
            Mode::DraggingBody => 1,
            Mode::Aiming => 2,
            Mode::StrikeAnimating => 3,
            Mode::Moving => 4,
        }
    }
}

pub struct PoolTable {
    config: PoolConfig,
    layout: TableLayout,
    body: Body,
    placed: bool,
    mode: Mode,
    /// Pointer to body, table-local. Zero outside aiming and the strike.
    aim: DVec2,
    /// Body minus pointer at grab time, so the body does not jump under the cursor.
    grab_offset: DVec2,
    strike_step: u32,
    env: Environment,
    friction: ControlBinder,
    restitution: ControlBinder,
    ledger: EnergyLedger,
    samples: SampleBuffer,
    /// Seconds since the current shot launched.
    elapsed: f64,
}

impl PoolTable {
    pub fn new(config: PoolConfig) -> Self {
        let friction = ControlBinder::new(0.0, 0.10, ValueTransform::ONE_MINUS, config.friction);
        let restitution =
            ControlBinder::new(0.0, 0.40, ValueTransform::ONE_MINUS, config.restitution);
        Self {
            layout: TableLayout::new(Default::default()),
            body: Body::new(DVec2::ZERO, config.radius, config.mass()),
            placed: false,
            mode: Mode::Idle,
            aim: DVec2::ZERO,
            grab_offset: DVec2::ZERO,
            strike_step: 0,
            env: Environment {
                friction: config.friction,
                restitution: config.restitution,
            },
            friction,
            restitution,
            ledger: EnergyLedger::default(),
            samples: SampleBuffer::new(config.sample_capacity),
            elapsed: 0.0,
            config,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn ledger(&self) -> &EnergyLedger {
        &self.ledger
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    pub fn environment(&self) -> Environment {
        self.env
    }

    /// First layout centers the body; later ones keep it inside the new bounds.
    fn apply_layout(&mut self, ctx: &WidgetContext) {
        self.layout = TableLayout::new(ctx.surface);
        let bounds = self.layout.bounds;
        self.body.pos = if self.placed {
            bounds.clamp(self.body.pos, self.body.radius)
        } else {
            bounds.clamp(bounds.center(), self.body.radius)
        };
        self.placed = true;
    }

    fn reset(&mut self) {
        self.body.pos = self.layout.bounds.clamp(self.layout.bounds.center(), self.body.radius);
        self.body.vel = DVec2::ZERO;
        self.aim = DVec2::ZERO;
        self.strike_step = 0;
        self.ledger = EnergyLedger::default();
        self.samples.clear();
        self.elapsed = 0.0;
        self.mode = Mode::Idle;
        log::debug!("pool-table: reset");
    }

    /// Stop a running shot without announcing it; the ledger still balances.
    fn interrupt(&mut self) {
        if self.mode == Mode::Moving {
            self.body.vel = DVec2::ZERO;
            self.ledger.settle();
            self.samples.push(self.ledger.sample(self.elapsed));
        }
    }

    fn on_drag_start(&mut self, pos: DVec2) {
        if self.mode == Mode::StrikeAnimating {
            return;
        }
        self.interrupt();
        let pointer = self.layout.to_table(pos);
        self.body.vel = DVec2::ZERO;
        if pointer.distance(self.body.pos) <= self.body.radius + self.config.hit_slop {
            self.grab_offset = self.body.pos - pointer;
            self.aim = DVec2::ZERO;
            self.mode = Mode::DraggingBody;
        } else {
            self.aim = self.body.pos - pointer;
            self.mode = Mode::Aiming;
        }
    }

    fn on_drag_move(&mut self, pos: DVec2) {
        let pointer = self.layout.to_table(pos);
        match self.mode {
            Mode::DraggingBody => {
                self.body.pos = self
                    .layout
                    .bounds
                    .clamp(pointer + self.grab_offset, self.body.radius);
            }
            Mode::Aiming => self.aim = self.body.pos - pointer,
            _ => {}
        }
    }

    fn on_drag_end(&mut self, ctx: &mut WidgetContext, pos: DVec2) {
        match self.mode {
            Mode::DraggingBody => self.mode = Mode::Idle,
            Mode::Aiming => {
                self.on_drag_move(pos);
                if self.aim.length() > ARM_THRESHOLD {
                    self.strike_step = 0;
                    self.mode = Mode::StrikeAnimating;
                    ctx.announce("Shot armed");
                } else {
                    self.aim = DVec2::ZERO;
                    self.mode = Mode::Idle;
                }
            }
            _ => {}
        }
    }

    fn on_drag_cancel(&mut self) {
        if matches!(self.mode, Mode::DraggingBody | Mode::Aiming) {
            self.aim = DVec2::ZERO;
            self.mode = Mode::Idle;
        }
    }

    fn on_control(&mut self, kind: u32, ui_value: f64) {
        match kind {
            controls::FRICTION => {
                if let Some(model) = self.friction.set_ui(ui_value) {
                    self.env.friction =
                        clamp_param("friction", model, FRICTION_RANGE, self.env.friction);
                }
            }
            controls::RESTITUTION => {
                if let Some(model) = self.restitution.set_ui(ui_value) {
                    self.env.restitution =
                        clamp_param("restitution", model, RESTITUTION_RANGE, self.env.restitution);
                }
            }
            _ => log::debug!("pool-table: unknown control {}", kind),
        }
    }

    /// Turn the armed aim into velocity and open a new ledger.
    fn launch(&mut self, ctx: &mut WidgetContext) {
        let velocity =
            physics::launch_velocity(self.aim, self.config.max_pull, self.config.max_speed);
        self.aim = DVec2::ZERO;
        if velocity == DVec2::ZERO {
            self.mode = Mode::Idle;
            return;
        }
        self.body.vel = velocity;
        self.ledger = EnergyLedger::launch(self.body.kinetic_energy());
        self.samples.clear();
        self.elapsed = 0.0;
        self.samples.push(self.ledger.sample(0.0));
        self.mode = Mode::Moving;
        log::debug!(
            "pool-table: launch at {:.2} px/step, E0 = {:.3}",
            velocity.length(),
            self.ledger.e0
        );
        ctx.announce("Shot fired");
    }

    fn advance(&mut self, ctx: &mut WidgetContext, dt: f64) {
        self.elapsed += dt;
        let losses = physics::integrate(&mut self.body, self.layout.bounds, self.env);
        self.ledger.record(&losses, self.body.kinetic_energy());
        self.samples.push(self.ledger.sample(self.elapsed));

        if self.body.is_resting() {
            self.body.vel = DVec2::ZERO;
            self.ledger.settle();
            self.samples.push(self.ledger.sample(self.elapsed));
            self.mode = Mode::Idle;
            ctx.announce("Ball came to rest");
        }
    }

    fn cue_pose(&self) -> Option<CuePose> {
        let shot_dir = self.aim.normalize_or_zero();
        let pulled = (self.aim.length() / self.config.max_pull).clamp(0.0, 1.0) * CUE_MAX_RETRACT;
        match self.mode {
            Mode::Aiming => Some(CuePose { shot_dir, retract: pulled }),
            Mode::StrikeAnimating => {
                let progress = if self.config.strike_frames == 0 {
                    1.0
                } else {
                    self.strike_step as f64 / self.config.strike_frames as f64
                };
                Some(CuePose {
                    shot_dir,
                    retract: ease(pulled, 0.0, progress, Easing::BackIn),
                })
            }
            _ => None,
        }
    }

    /// Reference height for the chart: the launch energy.
    fn chart_reference(&self) -> f64 {
        self.ledger.e0
    }
}

impl Widget for PoolTable {
    fn from_config_json(json: &str) -> Result<Self, WidgetError> {
        Ok(Self::new(PoolConfig::from_json(json)?))
    }

    fn config(&self) -> WidgetConfig {
        WidgetConfig {
            surface: self.config.surface,
            ..WidgetConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut WidgetContext) {
        self.apply_layout(ctx);
        log::info!(
            "pool-table: {}x{} table, radius {}, friction {}, restitution {}",
            self.layout.bounds.width,
            self.layout.bounds.height,
            self.body.radius,
            self.env.friction,
            self.env.restitution
        );
    }

    fn resize(&mut self, ctx: &mut WidgetContext) {
        self.apply_layout(ctx);
    }

    fn hit_test(&self, pos: DVec2) -> bool {
        self.mode != Mode::StrikeAnimating && self.layout.on_table(pos)
    }

    fn handle_input(&mut self, ctx: &mut WidgetContext, input: &[InputEvent]) {
        for event in input {
            match *event {
                InputEvent::Custom { kind, .. } if kind == events::RESET => self.reset(),
                InputEvent::DragStart { pos } => self.on_drag_start(pos),
                InputEvent::DragMove { pos } => self.on_drag_move(pos),
                InputEvent::DragEnd { pos } => self.on_drag_end(ctx, pos),
                InputEvent::DragCancel => self.on_drag_cancel(),
                InputEvent::Control { kind, value } => self.on_control(kind, value),
                InputEvent::Custom { .. } => {}
            }
        }
    }

    fn step(&mut self, ctx: &mut WidgetContext, dt: f64) {
        match self.mode {
            Mode::StrikeAnimating => {
                self.strike_step += 1;
                if self.strike_step >= self.config.strike_frames {
                    self.launch(ctx);
                }
            }
            Mode::Moving => self.advance(ctx, dt),
            _ => {}
        }
    }

    fn end_frame(&mut self, ctx: &mut WidgetContext) {
        let ledger = self.ledger;
        ctx.emit_event(WidgetEvent::new(
            widget_events::LEDGER,
            ledger.e_trans,
            ledger.w_friction,
            ledger.w_inelastic,
        ));
        ctx.emit_event(WidgetEvent::new(
            widget_events::MODE,
            self.mode.index() as f64,
            self.body.speed(),
            ledger.e0,
        ));
    }

    fn render(&self, ctx: &mut RenderContext) {
        let palette = ctx.palette;
        let painter = &mut *ctx.painter;

        draw::background(painter, palette, ctx.surface.css_width, ctx.surface.css_height);
        draw::table(painter, palette, &self.layout);

        if let Some(pose) = self.cue_pose() {
            if self.mode == Mode::Aiming {
                let speed = physics::launch_speed(
                    self.aim.length(),
                    self.config.max_pull,
                    self.config.max_speed,
                );
                draw::aim_guide(
                    painter,
                    palette,
                    &self.layout,
                    &self.body,
                    pose.shot_dir,
                    speed * 12.0,
                );
            }
            draw::cue(painter, palette, &self.layout, &self.body, pose);
        }
        draw::body(painter, palette, &self.layout, &self.body);

        draw::chart(
            painter,
            palette,
            self.layout.chart,
            &self.config.chart,
            &self.samples,
            self.chart_reference(),
            self.elapsed,
        );
    }

    fn control_value(&self, kind: u32) -> Option<f64> {
        match kind {
            controls::FRICTION => Some(self.friction.ui_value()),
            controls::RESTITUTION => Some(self.restitution.ui_value()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CONSERVATION_TOLERANCE;
    use crate::physics::Bounds;
    use proptest::prelude::*;
    use widgets_core::{Painter, Palette, SurfaceSpec};

    fn ctx() -> WidgetContext {
        WidgetContext::new(SurfaceSpec::default().layout(Some(600.0), 1.0))
    }

    fn table_with(config: PoolConfig) -> (PoolTable, WidgetContext) {
        let mut ctx = ctx();
        let mut table = PoolTable::new(config);
        table.init(&mut ctx);
        (table, ctx)
    }

    fn table() -> (PoolTable, WidgetContext) {
        table_with(PoolConfig::default())
    }

    /// Surface position of a table-local point.
    fn at(table: &PoolTable, local: DVec2) -> DVec2 {
        table.layout.to_surface(local)
    }

    /// Aim from behind the body and release so the final aim vector is `aim`.
    fn shoot(table: &mut PoolTable, ctx: &mut WidgetContext, aim: DVec2) {
        let body = table.body.pos;
        let start = at(table, body - aim * 0.1 - aim.normalize() * 30.0);
        let end = at(table, body - aim);
        table.handle_input(
            ctx,
            &[InputEvent::DragStart { pos: start }, InputEvent::DragEnd { pos: end }],
        );
    }

    fn run_strike(table: &mut PoolTable, ctx: &mut WidgetContext) {
        for _ in 0..table.config.strike_frames {
            table.step(ctx, 1.0 / 60.0);
        }
    }

    /// Launch directly with a velocity on a 300x200 felt.
    fn launched(vel: DVec2, friction: f64, restitution: f64) -> (PoolTable, WidgetContext) {
        let bounds = Bounds::new(300.0, 200.0);
        let (mut table, ctx) = table();
        table.layout.bounds = bounds;
        table.body.pos = bounds.center();
        table.env = Environment { friction, restitution };
        table.body.vel = vel;
        table.ledger = EnergyLedger::launch(table.body.kinetic_energy());
        table.samples.push(table.ledger.sample(0.0));
        table.mode = Mode::Moving;
        (table, ctx)
    }

    #[test]
    fn first_layout_centers_body() {
        let (table, _) = table();
        assert_eq!(table.body.pos, table.layout.bounds.center());
        assert_eq!(table.mode, Mode::Idle);
    }

    #[test]
    fn relayout_keeps_body_inside() {
        let (mut table, mut ctx) = table();
        table.body.pos = DVec2::new(560.0, 230.0);
        ctx.surface = SurfaceSpec::default().layout(Some(300.0), 1.0);
        table.resize(&mut ctx);
        assert!(table.layout.bounds.contains(table.body.pos, table.body.radius));
        assert_ne!(table.body.pos, table.layout.bounds.center());
    }

    #[test]
    fn pointer_down_on_body_drags_it() {
        let (mut table, mut ctx) = table();
        let body = table.body.pos;
        let grab = at(&table, body + DVec2::new(3.0, 0.0));
        table.handle_input(&mut ctx, &[InputEvent::DragStart { pos: grab }]);
        assert_eq!(table.mode, Mode::DraggingBody);

        let off_table = at(&table, DVec2::new(-500.0, 40.0));
        table.handle_input(&mut ctx, &[InputEvent::DragMove { pos: off_table }]);
        assert_eq!(table.body.pos.x, table.body.radius);
        assert_eq!(table.body.vel, DVec2::ZERO);

        table.handle_input(&mut ctx, &[InputEvent::DragEnd { pos: DVec2::ZERO }]);
        assert_eq!(table.mode, Mode::Idle);
        assert_eq!(table.ledger, EnergyLedger::default());
    }

    #[test]
    fn short_pull_returns_to_idle() {
        let (mut table, mut ctx) = table();
        let body = table.body.pos;
        table.handle_input(
            &mut ctx,
            &[
                InputEvent::DragStart { pos: at(&table, body + DVec2::new(40.0, 0.0)) },
                InputEvent::DragMove { pos: at(&table, body + DVec2::new(20.0, 0.0)) },
            ],
        );
        assert_eq!(table.mode, Mode::Aiming);
        assert_eq!(table.aim, DVec2::new(-20.0, 0.0));

        let release = at(&table, body + DVec2::new(0.0, 4.0));
        table.handle_input(&mut ctx, &[InputEvent::DragEnd { pos: release }]);
        assert_eq!(table.mode, Mode::Idle);
        assert_eq!(table.aim, DVec2::ZERO);
        assert_eq!(ctx.take_announcement(), None);
    }

    #[test]
    fn full_shot_cycle() {
        let (mut table, mut ctx) = table();
        shoot(&mut table, &mut ctx, DVec2::new(140.0, 0.0));
        assert_eq!(table.mode, Mode::StrikeAnimating);
        assert_eq!(ctx.take_announcement().as_deref(), Some("Shot armed"));
        assert!(!table.hit_test(at(&table, table.body.pos)));

        run_strike(&mut table, &mut ctx);
        assert_eq!(table.mode, Mode::Moving);
        assert_eq!(table.body.vel, DVec2::new(14.0, 0.0));
        assert_eq!(table.ledger.e0, 0.5 * 14.0 * 14.0);
        assert_eq!(table.aim, DVec2::ZERO);
        assert_eq!(ctx.take_announcement().as_deref(), Some("Shot fired"));

        let mut steps = 0;
        while table.mode == Mode::Moving {
            table.step(&mut ctx, 1.0 / 60.0);
            steps += 1;
            assert!(steps < 10_000, "shot never settled");
        }
        assert_eq!(table.mode, Mode::Idle);
        assert_eq!(table.body.vel, DVec2::ZERO);
        assert_eq!(ctx.take_announcement().as_deref(), Some("Ball came to rest"));
        assert_eq!(table.ledger.e_trans, 0.0);
        assert!(table.ledger.residual().abs() <= CONSERVATION_TOLERANCE);
        let last = table.samples.latest().copied().unwrap();
        assert_eq!(last.e_trans, 0.0);
    }

    #[test]
    fn pointer_down_while_moving_stops_the_shot() {
        let (mut table, mut ctx) = launched(DVec2::new(6.0, 2.0), 0.99, 0.9);
        table.step(&mut ctx, 1.0 / 60.0);
        let far = at(&table, table.body.pos + DVec2::new(80.0, 0.0));
        table.handle_input(&mut ctx, &[InputEvent::DragStart { pos: far }]);
        assert_eq!(table.mode, Mode::Aiming);
        assert_eq!(table.body.vel, DVec2::ZERO);
        assert!(table.ledger.residual().abs() <= CONSERVATION_TOLERANCE);
        assert_eq!(table.ledger.e_trans, 0.0);
    }

    #[test]
    fn controls_map_ui_to_model() {
        let (mut table, mut ctx) = table();
        table.handle_input(
            &mut ctx,
            &[
                InputEvent::Control { kind: controls::FRICTION, value: 0.05 },
                InputEvent::Control { kind: controls::RESTITUTION, value: 0.9 },
            ],
        );
        assert!((table.env.friction - 0.95).abs() < 1e-12);
        assert!((table.env.restitution - 0.60).abs() < 1e-12);
        assert!((table.control_value(controls::FRICTION).unwrap() - 0.05).abs() < 1e-12);
        assert!((table.control_value(controls::RESTITUTION).unwrap() - 0.40).abs() < 1e-12);
        assert_eq!(table.control_value(99), None);
    }

    #[test]
    fn initial_control_values_mirror_config() {
        let (table, _) = table();
        assert!((table.control_value(controls::FRICTION).unwrap() - 0.01).abs() < 1e-12);
        assert!((table.control_value(controls::RESTITUTION).unwrap() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_everything() {
        let (mut table, mut ctx) = launched(DVec2::new(6.0, 2.0), 0.99, 0.9);
        for _ in 0..5 {
            table.step(&mut ctx, 1.0 / 60.0);
        }
        table.layout = TableLayout::new(ctx.surface);
        let reset = InputEvent::Custom { kind: events::RESET, a: 0.0, b: 0.0, c: 0.0 };
        table.handle_input(&mut ctx, &[reset]);
        assert_eq!(table.mode, Mode::Idle);
        assert_eq!(table.body.vel, DVec2::ZERO);
        assert_eq!(table.body.pos, table.layout.bounds.center());
        assert!(table.samples.is_empty());
        assert_eq!(table.ledger, EnergyLedger::default());
    }

    #[test]
    fn end_frame_reports_ledger_and_mode() {
        let (mut table, mut ctx) = launched(DVec2::new(8.0, 0.0), 1.0, 0.8);
        table.step(&mut ctx, 1.0 / 60.0);
        table.end_frame(&mut ctx);
        assert_eq!(ctx.events.len(), 2);
        assert_eq!(ctx.events[0].kind, widget_events::LEDGER as f32);
        assert_eq!(ctx.events[1].a, Mode::Moving.index() as f32);
        assert_eq!(ctx.events[1].c, 32.0);
    }

    #[test]
    fn render_is_pure() {
        let (mut table, mut ctx) = table();
        shoot(&mut table, &mut ctx, DVec2::new(-100.0, 30.0));
        table.step(&mut ctx, 1.0 / 60.0);

        let draw = |table: &PoolTable| {
            let mut painter = Painter::new();
            let palette = Palette::default();
            let mut render_ctx = RenderContext {
                painter: &mut painter,
                palette: &palette,
                surface: ctx.surface,
            };
            table.render(&mut render_ctx);
            painter.vertices().to_vec()
        };
        let first = draw(&table);
        assert!(!first.is_empty());
        assert_eq!(first, draw(&table));
    }

    // Scenario: perfectly elastic, frictionless table.
    #[test]
    fn elastic_frictionless_keeps_all_energy() {
        let (mut table, mut ctx) = launched(DVec2::new(8.0, 0.0), 1.0, 1.0);
        let e0 = table.ledger.e0;
        let mut left_hits = 0;
        let mut right_hits = 0;
        for _ in 0..600 {
            let before = table.body.vel.x;
            table.step(&mut ctx, 1.0 / 60.0);
            if before != table.body.vel.x {
                if table.body.vel.x > 0.0 {
                    left_hits += 1;
                } else {
                    right_hits += 1;
                }
            }
        }
        assert_eq!(table.mode, Mode::Moving);
        assert!(left_hits >= 3 && right_hits >= 3);
        for sample in table.samples.iter() {
            assert!((sample.e_trans - e0).abs() <= CONSERVATION_TOLERANCE);
            assert_eq!(sample.w_friction, 0.0);
            assert_eq!(sample.w_inelastic, 0.0);
        }
    }

    // Scenario: one lossy wall hit, no friction.
    #[test]
    fn lossy_hit_books_exact_inelastic_loss() {
        let (mut table, mut ctx) = launched(DVec2::new(8.0, 0.0), 1.0, 0.8);
        let expected = 0.5 * 1.0 * 64.0 * (1.0 - 0.8 * 0.8);
        let mut previous = 0.0;
        let mut hits = 0;
        for _ in 0..30 {
            table.step(&mut ctx, 1.0 / 60.0);
            let now = table.ledger.w_inelastic;
            if now != previous {
                hits += 1;
                assert!((now - previous - expected).abs() < 1e-9);
            }
            previous = now;
        }
        // Center 150, right limit 288: first contact on step 18, the next one much later.
        assert_eq!(hits, 1);
        assert_eq!(table.ledger.w_friction, 0.0);
    }

    // Scenario: the chart window scrolls once full.
    #[test]
    fn rolling_window_drops_old_samples() {
        let (mut table, mut ctx) = launched(DVec2::new(5.0, 3.0), 1.0, 1.0);
        let window = table.config.chart;
        for _ in 0..(60.0 * (window.window_sec + 1.0)) as usize {
            table.step(&mut ctx, 1.0 / 60.0);
        }
        let now = table.elapsed;
        assert!(window.is_full(now));
        assert!(table
            .samples
            .visible(&window, now)
            .all(|s| s.t >= now - window.window_sec));
        assert!(table.samples.iter().any(|s| !window.contains(s.t, now)));
        let width = table.layout.chart.width;
        assert!((window.now_x(now, width) - window.now_frac * width).abs() < 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn ledger_balances_and_losses_never_shrink(
            angle in 0.0f64..std::f64::consts::TAU,
            speed in 0.5f64..14.0,
            friction in 0.90f64..=1.0,
            restitution in 0.60f64..=1.0,
        ) {
            let vel = DVec2::from_angle(angle) * speed;
            let (mut table, mut ctx) = launched(vel, friction, restitution);
            let mut last = table.ledger;
            for _ in 0..900 {
                if table.mode != Mode::Moving {
                    break;
                }
                table.step(&mut ctx, 1.0 / 60.0);
                let ledger = table.ledger;
                prop_assert!(ledger.residual().abs() <= CONSERVATION_TOLERANCE);
                prop_assert!(ledger.w_friction >= last.w_friction - 1e-9);
                prop_assert!(ledger.w_inelastic >= last.w_inelastic - 1e-9);
                prop_assert!(table.layout.bounds.contains(table.body.pos, table.body.radius));
                if friction == 1.0 {
                    prop_assert_eq!(ledger.w_friction, 0.0);
                }
                if restitution == 1.0 {
                    prop_assert_eq!(ledger.w_inelastic, 0.0);
                }
                last = ledger;
            }
            for sample in table.samples.iter() {
                prop_assert!((sample.total() - table.ledger.e0).abs() <= CONSERVATION_TOLERANCE);
            }
        }

        #[test]
        fn friction_always_brings_the_body_to_rest(
            angle in 0.0f64..std::f64::consts::TAU,
            speed in 0.5f64..14.0,
            friction in 0.90f64..0.999,
            restitution in 0.60f64..=1.0,
        ) {
            let vel = DVec2::from_angle(angle) * speed;
            let (mut table, mut ctx) = launched(vel, friction, restitution);
            // speed * f^n < 0.01  =>  n > ln(0.01 / speed) / ln(f)
            let bound = ((0.01 / speed).ln() / friction.ln()).ceil() as usize + 2;
            let mut steps = 0;
            while table.mode == Mode::Moving {
                table.step(&mut ctx, 1.0 / 60.0);
                steps += 1;
                prop_assert!(steps <= bound);
            }
            prop_assert_eq!(table.mode, Mode::Idle);
            prop_assert_eq!(table.ledger.e_trans, 0.0);
        }
    }
}
