use serde::Deserialize;

/// How a widget wants its drawing surface sized.
/// Width tracks the container, clamped to `[min_width, max_width]`; height follows `aspect`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceSpec {
    /// Width divided by height.
    pub aspect: f64,
    /// Narrowest CSS width in pixels.
    pub min_width: f64,
    /// Widest CSS width in pixels. Also the width used when the container is unknown.
    pub max_width: f64,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            aspect: 3.0 / 2.0,
            min_width: 240.0,
            max_width: 720.0,
        }
    }
}

/// Result of a layout pass. Drawing happens in CSS pixels;
/// the backing store is `pixel_ratio` times larger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
    pub backing_width: u32,
    pub backing_height: u32,
}

impl SurfaceSize {
    /// A zero-area surface (detached or not yet laid out).
    pub const EMPTY: Self = Self {
        css_width: 0.0,
        css_height: 0.0,
        pixel_ratio: 1.0,
        backing_width: 0,
        backing_height: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.backing_width == 0 || self.backing_height == 0
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl SurfaceSpec {
    /// Compute the surface size for the container's current width.
    ///
    /// A missing, zero or non-finite container width falls back to `max_width`.
    /// A bad device pixel ratio falls back to 1.
    pub fn layout(&self, container_width: Option<f64>, device_pixel_ratio: f64) -> SurfaceSize {
        let spec = self.sanitized();
        let available = container_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(spec.max_width);
        let css_width = available.clamp(spec.min_width, spec.max_width).floor();
        let css_height = (css_width / spec.aspect).round();

        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        SurfaceSize {
            css_width,
            css_height,
            pixel_ratio,
            backing_width: (css_width * pixel_ratio).round() as u32,
            backing_height: (css_height * pixel_ratio).round() as u32,
        }
    }

    fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            defaults.aspect
        };
        let min_width = if self.min_width.is_finite() && self.min_width > 0.0 {
            self.min_width
        } else {
            defaults.min_width
        };
        let max_width = if self.max_width.is_finite() && self.max_width >= min_width {
            self.max_width
        } else {
            min_width.max(defaults.max_width)
        };
        Self {
            aspect,
            min_width,
            max_width,
        }
    }
}
