//! Two-way binding between a UI control and a model value.
//!
//! The slider and the number box both show UI units; the widget sees model
//! units. e.g. "friction amount 0..0.1" in the UI is "decay multiplier
//! 1.0..0.9" in the model.

/// Converts between UI units and model units.
#[derive(Debug, Clone, Copy)]
pub struct ValueTransform {
    pub to_model: fn(f64) -> f64,
    pub from_model: fn(f64) -> f64,
}

impl ValueTransform {
    /// `model = 1 - ui`, its own inverse.
    pub const ONE_MINUS: Self = Self {
        to_model: one_minus,
        from_model: one_minus,
    };
}

fn one_minus(v: f64) -> f64 {
    1.0 - v
}

/// Keeps one model value and the UI controls representing it in sync.
#[derive(Debug, Clone)]
pub struct ControlBinder {
    ui_min: f64,
    ui_max: f64,
    transform: ValueTransform,
    ui_value: f64,
}

impl ControlBinder {
    /// Bind a control with UI range `[ui_min, ui_max]` starting at `model_value`.
    pub fn new(ui_min: f64, ui_max: f64, transform: ValueTransform, model_value: f64) -> Self {
        let (ui_min, ui_max) = if ui_min <= ui_max {
            (ui_min, ui_max)
        } else {
            (ui_max, ui_min)
        };
        let mut binder = Self {
            ui_min,
            ui_max,
            transform,
            ui_value: ui_min,
        };
        binder.set_model(model_value);
        binder
    }

    /// A control edit. Returns the new model value, or `None` if the input was not a number.
    pub fn set_ui(&mut self, ui_value: f64) -> Option<f64> {
        if !ui_value.is_finite() {
            return None;
        }
        self.ui_value = ui_value.clamp(self.ui_min, self.ui_max);
        Some(self.model_value())
    }

    /// The model changed underneath the controls (reset, config). Returns the UI value to show.
    pub fn set_model(&mut self, model_value: f64) -> f64 {
        let ui = (self.transform.from_model)(model_value);
        if ui.is_finite() {
            self.ui_value = ui.clamp(self.ui_min, self.ui_max);
        }
        self.ui_value
    }

    /// Value for both the slider and the numeric display.
    pub fn ui_value(&self) -> f64 {
        self.ui_value
    }

    pub fn model_value(&self) -> f64 {
        (self.transform.to_model)(self.ui_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_edit_maps_to_model() {
        let mut friction = ControlBinder::new(0.0, 0.1, ValueTransform::ONE_MINUS, 1.0);
        assert_eq!(friction.ui_value(), 0.0);
        let model = friction.set_ui(0.05).unwrap();
        assert!((model - 0.95).abs() < 1e-12);
    }

    #[test]
    fn ui_edit_is_clamped() {
        let mut friction = ControlBinder::new(0.0, 0.1, ValueTransform::ONE_MINUS, 1.0);
        let model = friction.set_ui(0.5).unwrap();
        assert!((model - 0.9).abs() < 1e-12);
        assert_eq!(friction.ui_value(), 0.1);
    }

    #[test]
    fn model_change_updates_ui() {
        let mut binder = ControlBinder::new(0.0, 0.4, ValueTransform::ONE_MINUS, 1.0);
        let ui = binder.set_model(0.8);
        assert!((ui - 0.2).abs() < 1e-12);
        assert!((binder.ui_value() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn non_numeric_input_is_ignored() {
        let mut binder = ControlBinder::new(0.0, 0.4, ValueTransform::ONE_MINUS, 0.7);
        assert_eq!(binder.set_ui(f64::NAN), None);
        assert!((binder.ui_value() - 0.3).abs() < 1e-12);
        binder.set_model(f64::INFINITY);
        assert!((binder.ui_value() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn reversed_range_is_normalized() {
        let mut binder = ControlBinder::new(0.4, 0.0, ValueTransform::ONE_MINUS, 0.8);
        assert!((binder.ui_value() - 0.2).abs() < 1e-12);
        binder.set_ui(1.0);
        assert_eq!(binder.ui_value(), 0.4);
        binder.set_ui(-1.0);
        assert_eq!(binder.ui_value(), 0.0);
    }
}
