//! Splits the surface into the table (top) and the energy chart (bottom).

use glam::DVec2;
use widgets_core::{PlotRect, SurfaceSize};

use crate::physics::Bounds;

/// Rail thickness around the felt, CSS pixels.
pub const RAIL: f64 = 14.0;
/// Share of the surface height given to the table.
const TABLE_SHARE: f64 = 0.68;
const CHART_GAP: f64 = 12.0;
const CHART_INSET: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    /// Table including rails, in surface coordinates.
    pub table: PlotRect,
    /// Top-left corner of the felt, in surface coordinates.
    pub felt_origin: DVec2,
    /// Playing area the physics runs in, table-local.
    pub bounds: Bounds,
    pub chart: PlotRect,
}

impl TableLayout {
    pub fn new(surface: SurfaceSize) -> Self {
        let width = surface.css_width.max(0.0);
        let height = surface.css_height.max(0.0);
        let table_height = (height * TABLE_SHARE).floor();
        let chart_top = table_height + CHART_GAP;

        Self {
            table: PlotRect::new(0.0, 0.0, width, table_height),
            felt_origin: DVec2::splat(RAIL),
            bounds: Bounds::new(width - 2.0 * RAIL, table_height - 2.0 * RAIL),
            chart: PlotRect::new(
                CHART_INSET,
                chart_top,
                (width - 2.0 * CHART_INSET).max(0.0),
                (height - chart_top - CHART_INSET).max(0.0),
            ),
        }
    }

    /// Surface coordinates to table-local.
    pub fn to_table(&self, pos: DVec2) -> DVec2 {
        pos - self.felt_origin
    }

    /// Table-local coordinates to surface.
    pub fn to_surface(&self, pos: DVec2) -> DVec2 {
        pos + self.felt_origin
    }

    /// Whether a surface point lies on the table (rails included).
    pub fn on_table(&self, pos: DVec2) -> bool {
        pos.x >= self.table.origin.x
            && pos.x <= self.table.origin.x + self.table.width
            && pos.y >= self.table.origin.y
            && pos.y <= self.table.bottom()
    }
}
