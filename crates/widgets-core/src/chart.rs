//! Rolling-window time-series geometry.
//!
//! The visible range is a fixed duration that advances with "now". Once
//! enough time has passed, "now" stays pinned at `now_frac` of the plot
//! width: history scrolls in from the right and exits on the left, with a
//! small empty margin ahead of "now".

use glam::DVec2;
use serde::Deserialize;

/// A fixed-duration sliding time window.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RollingWindow {
    /// Visible duration in seconds.
    pub window_sec: f64,
    /// Horizontal position of "now" as a fraction of the plot width.
    pub now_frac: f64,
    /// Spacing of tick marks in seconds.
    pub tick_sec: f64,
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self {
            window_sec: 3.0,
            now_frac: 2.0 / 3.0,
            tick_sec: 0.5,
        }
    }
}

/// A tick mark: its time and x offset inside the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub t: f64,
    pub x: f64,
}

impl RollingWindow {
    /// Replace out-of-range parameters with the defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            window_sec: if self.window_sec.is_finite() && self.window_sec > 0.0 {
                self.window_sec
            } else {
                defaults.window_sec
            },
            now_frac: if self.now_frac.is_finite() && (0.0..=1.0).contains(&self.now_frac) {
                self.now_frac
            } else {
                defaults.now_frac
            },
            tick_sec: if self.tick_sec.is_finite() && self.tick_sec > 0.0 {
                self.tick_sec
            } else {
                defaults.tick_sec
            },
        }
    }

    /// Visible `(t_start, t_end)` at time `now`.
    pub fn span(&self, now: f64) -> (f64, f64) {
        let t_start = (now - self.now_frac * self.window_sec).max(0.0);
        (t_start, t_start + self.window_sec)
    }

    /// Whether enough time has passed for "now" to sit at `now_frac`.
    pub fn is_full(&self, now: f64) -> bool {
        now >= self.now_frac * self.window_sec
    }

    /// X offset of time `t` in a plot `plot_width` wide.
    pub fn x_of(&self, t: f64, now: f64, plot_width: f64) -> f64 {
        let (t_start, _) = self.span(now);
        (t - t_start) / self.window_sec * plot_width
    }

    /// X offset of the "now" marker.
    pub fn now_x(&self, now: f64, plot_width: f64) -> f64 {
        self.x_of(now, now, plot_width)
    }

    /// Whether a sample taken at `t` is on screen.
    pub fn contains(&self, t: f64, now: f64) -> bool {
        let (t_start, t_end) = self.span(now);
        t >= t_start && t <= t_end.min(now)
    }

    /// Tick marks at whole multiples of `tick_sec` inside the span.
    /// Independent of how many samples exist.
    pub fn ticks(&self, now: f64, plot_width: f64) -> Vec<Tick> {
        let (t_start, t_end) = self.span(now);
        let first = (t_start / self.tick_sec).ceil() as i64;
        let last = (t_end / self.tick_sec).floor() as i64;
        (first..=last)
            .map(|i| i as f64 * self.tick_sec)
            .map(|t| Tick {
                t,
                x: self.x_of(t, now, plot_width),
            })
            .collect()
    }
}

/// Screen rectangle a chart is drawn into (CSS pixels, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub origin: DVec2,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.height
    }
}

/// Build stacked, non-overlapping area polygons.
///
/// `columns` are `(x, [layer values...])` in increasing x (x relative to
/// the plot). Layer 0 sits on the baseline; each following layer sits on the
/// sum of those below it. Heights are `value / reference * plot.height`.
/// Returns one closed polygon per layer, or empty polygons when there are
/// fewer than two columns or `reference` is not positive.
pub fn stack_bands<const N: usize>(
    columns: &[(f64, [f64; N])],
    reference: f64,
    plot: PlotRect,
) -> [Vec<DVec2>; N] {
    let mut bands: [Vec<DVec2>; N] = std::array::from_fn(|_| Vec::new());
    if columns.len() < 2 || !(reference > 0.0) || !reference.is_finite() {
        return bands;
    }

    let scale = plot.height / reference;
    let y_of = |energy: f64| plot.bottom() - (energy.max(0.0) * scale).min(plot.height);

    for (layer, band) in bands.iter_mut().enumerate() {
        let mut upper = Vec::with_capacity(columns.len());
        let mut lower = Vec::with_capacity(columns.len());
        for (x, values) in columns {
            let below: f64 = values[..layer].iter().map(|v| v.max(0.0)).sum();
            let top = below + values[layer].max(0.0);
            let sx = plot.origin.x + x;
            upper.push(DVec2::new(sx, y_of(top)));
            lower.push(DVec2::new(sx, y_of(below)));
        }
        band.extend(upper);
        band.extend(lower.into_iter().rev());
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> RollingWindow {
        RollingWindow {
            window_sec: 3.0,
            now_frac: 2.0 / 3.0,
            tick_sec: 0.5,
        }
    }

    #[test]
    fn now_marker_pinned_once_full() {
        let w = window();
        for now in [2.0, 2.5, 10.0, 123.456] {
            assert!(w.is_full(now));
            let x = w.now_x(now, 300.0);
            assert!((x - 200.0).abs() < 1e-9, "now={} x={}", now, x);
        }
    }

    #[test]
    fn now_marker_walks_in_before_full() {
        let w = window();
        assert!(!w.is_full(1.0));
        assert!((w.now_x(1.0, 300.0) - 100.0).abs() < 1e-9);
        assert_eq!(w.now_x(0.0, 300.0), 0.0);
    }

    #[test]
    fn old_samples_are_not_visible() {
        let w = window();
        let now = 10.0;
        assert!(!w.contains(now - w.window_sec - 0.01, now));
        assert!(!w.contains(now - 2.5, now));
        assert!(w.contains(now - 1.0, now));
        assert!(w.contains(now, now));
        assert!(!w.contains(now + 0.1, now));
    }

    #[test]
    fn ticks_follow_interval_not_samples() {
        let w = window();
        let ticks = w.ticks(10.0, 300.0);
        // span is [8, 11]
        let times: Vec<f64> = ticks.iter().map(|t| t.t).collect();
        assert_eq!(times, vec![8.0, 8.5, 9.0, 9.5, 10.0, 10.5, 11.0]);
        assert_eq!(ticks[0].x, 0.0);
        assert!((ticks.last().unwrap().x - 300.0).abs() < 1e-9);
    }

    #[test]
    fn sanitized_replaces_bad_values() {
        let w = RollingWindow {
            window_sec: 0.0,
            now_frac: 2.0,
            tick_sec: f64::NAN,
        }
        .sanitized();
        assert_eq!(w, RollingWindow::default());
    }

    #[test]
    fn bands_stack_without_overlap() {
        let plot = PlotRect::new(0.0, 0.0, 100.0, 100.0);
        let columns = [(0.0, [10.0, 20.0, 70.0]), (50.0, [30.0, 20.0, 50.0])];
        let [friction, inelastic, kinetic] = stack_bands(&columns, 100.0, plot);

        // Each band: 2 upper points then 2 lower points.
        assert_eq!(friction.len(), 4);
        assert_eq!(friction[0], DVec2::new(0.0, 90.0));
        assert_eq!(friction[3], DVec2::new(0.0, 100.0));
        // Inelastic bottom edge equals friction top edge.
        assert_eq!(inelastic[3], friction[0]);
        // Total stack reaches the top of the plot when the sum equals the reference.
        assert_eq!(kinetic[0], DVec2::new(0.0, 0.0));
        assert_eq!(kinetic[1], DVec2::new(50.0, 0.0));
    }

    #[test]
    fn bands_empty_without_data() {
        let plot = PlotRect::new(0.0, 0.0, 100.0, 100.0);
        let bands = stack_bands::<3>(&[(0.0, [1.0, 1.0, 1.0])], 3.0, plot);
        assert!(bands.iter().all(|b| b.is_empty()));
        let bands = stack_bands::<3>(&[(0.0, [1.0; 3]), (1.0, [1.0; 3])], 0.0, plot);
        assert!(bands.iter().all(|b| b.is_empty()));
    }
}
