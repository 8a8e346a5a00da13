//! Table and energy-chart drawing. Everything here reads state and paints;
//! nothing mutates the simulation.

use glam::DVec2;
use widgets_core::{stack_bands, Painter, Palette, PlotRect, RollingWindow, Token};

use crate::layout::{TableLayout, RAIL};
use crate::ledger::SampleBuffer;
use crate::physics::Body;

const CUE_LENGTH: f64 = 150.0;
const CUE_WIDTH: f64 = 5.0;
/// Gap between the body's edge and the cue tip at rest.
const CUE_GAP: f64 = 3.0;
const TICK_LENGTH: f64 = 5.0;

/// Where the cue sits for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuePose {
    /// Direction the body will travel (unit length).
    pub shot_dir: DVec2,
    /// Distance the tip is drawn back from its resting gap.
    pub retract: f64,
}

pub fn background(painter: &mut Painter, palette: &Palette, width: f64, height: f64) {
    painter.fill_rect(DVec2::ZERO, width, height, palette.get(Token::Background));
}

/// Rails, then felt on top.
pub fn table(painter: &mut Painter, palette: &Palette, layout: &TableLayout) {
    let frame = layout.table;
    painter.fill_rect(frame.origin, frame.width, frame.height, palette.get(Token::Rail));
    painter.fill_rect(
        layout.felt_origin,
        layout.bounds.width,
        layout.bounds.height,
        palette.get(Token::Felt),
    );
    // Inner cushion line
    let (w, h) = (layout.bounds.width, layout.bounds.height);
    if w > 0.0 && h > 0.0 {
        let o = layout.felt_origin;
        painter.stroke_polyline(
            &[o, o + DVec2::new(w, 0.0), o + DVec2::new(w, h), o + DVec2::new(0.0, h), o],
            RAIL * 0.15,
            palette.get(Token::BodyOutline).with_alpha(0.35),
        );
    }
}

pub fn body(painter: &mut Painter, palette: &Palette, layout: &TableLayout, body: &Body) {
    let center = layout.to_surface(body.pos);
    painter.fill_circle(center, body.radius, palette.get(Token::Body));
    painter.stroke_circle(center, body.radius, 1.5, palette.get(Token::BodyOutline));
}

/// Dotted line showing where the body will go, longer for faster shots.
pub fn aim_guide(
    painter: &mut Painter,
    palette: &Palette,
    layout: &TableLayout,
    body: &Body,
    shot_dir: DVec2,
    length: f64,
) {
    if shot_dir == DVec2::ZERO || !(length > 0.0) {
        return;
    }
    let color = palette.get(Token::AimGuide);
    let start = layout.to_surface(body.pos) + shot_dir * (body.radius + CUE_GAP);
    let dash = 6.0;
    let mut along = 0.0;
    while along < length {
        let end = (along + dash).min(length);
        painter.stroke_polyline(&[start + shot_dir * along, start + shot_dir * end], 1.5, color);
        along += dash * 2.0;
    }
}

/// Cue stick behind the body, opposite the shot direction.
pub fn cue(
    painter: &mut Painter,
    palette: &Palette,
    layout: &TableLayout,
    body: &Body,
    pose: CuePose,
) {
    if pose.shot_dir == DVec2::ZERO {
        return;
    }
    let back = -pose.shot_dir;
    let center = layout.to_surface(body.pos);
    let tip = center + back * (body.radius + CUE_GAP + pose.retract.max(-CUE_GAP));
    let butt = tip + back * CUE_LENGTH;
    let color = palette.get(Token::Cue);
    painter.stroke_polyline(&[tip, butt], CUE_WIDTH, color);
    // Chalked tip
    painter.stroke_polyline(
        &[tip, tip + back * 6.0],
        CUE_WIDTH - 1.0,
        palette.get(Token::AimGuide),
    );
}

/// Stacked energy bands over a rolling time axis.
///
/// With no shot yet (`reference <= 0`) or fewer than two visible samples only
/// the axis, ticks and "now" marker are drawn.
pub fn chart(
    painter: &mut Painter,
    palette: &Palette,
    plot: PlotRect,
    window: &RollingWindow,
    samples: &SampleBuffer,
    reference: f64,
    now: f64,
) {
    if plot.width <= 0.0 || plot.height <= 0.0 {
        return;
    }

    let columns: Vec<(f64, [f64; 3])> = samples
        .visible(window, now)
        .map(|s| (window.x_of(s.t, now, plot.width), s.layers()))
        .collect();
    let [friction, inelastic, kinetic] = stack_bands(&columns, reference, plot);
    painter.fill_polygon(&friction, palette.get(Token::FrictionLoss));
    painter.fill_polygon(&inelastic, palette.get(Token::InelasticLoss));
    painter.fill_polygon(&kinetic, palette.get(Token::Kinetic));

    let axis = palette.get(Token::Axis);
    let baseline = plot.bottom();
    painter.stroke_polyline(
        &[
            DVec2::new(plot.origin.x, baseline),
            DVec2::new(plot.origin.x + plot.width, baseline),
        ],
        1.0,
        axis,
    );
    for tick in window.ticks(now, plot.width) {
        let x = plot.origin.x + tick.x;
        painter.stroke_polyline(
            &[DVec2::new(x, baseline), DVec2::new(x, baseline - TICK_LENGTH)],
            1.0,
            axis,
        );
    }

    let now_x = plot.origin.x + window.now_x(now, plot.width);
    painter.stroke_polyline(
        &[DVec2::new(now_x, plot.origin.y), DVec2::new(now_x, baseline)],
        1.5,
        palette.get(Token::NowMarker),
    );
}
