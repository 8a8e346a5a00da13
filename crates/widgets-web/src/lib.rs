pub mod registry;
pub mod runner;

use std::cell::RefCell;

use widgets_core::ThemeResolver;

pub use js_sys;
pub use widgets_core;
pub use registry::InstanceRegistry;
pub use runner::WidgetRunner;

thread_local! {
    /// One resolver per page; every instance subscribes to it.
    static THEME: RefCell<ThemeResolver> = RefCell::new(ThemeResolver::default());
}

/// Run `f` against the page-wide theme resolver.
///
/// Subscribers run inside this borrow, so they must not call back into it.
/// The runners only flip a dirty flag.
pub fn with_theme<R>(f: impl FnOnce(&mut ThemeResolver) -> R) -> R {
    THEME.with(|cell| f(&mut cell.borrow_mut()))
}

/// Treat zero, negative and non-finite container widths as "no container".
pub fn container_width(raw: f64) -> Option<f64> {
    (raw.is_finite() && raw > 0.0).then_some(raw)
}

/// Generate all `#[wasm_bindgen]` exports for a widget.
///
/// Generates a per-type instance registry plus exports for lifecycle
/// (`widget_create`, `widget_dispose`, `widget_tick`, `widget_redraw`,
/// `widget_relayout`), input (`widget_pointer`, `widget_control`,
/// `widget_custom`), host reads (`widget_frame_ptr`, `widget_frame_len`,
/// `widget_control_value`, `widget_take_announcement`, `widget_cursor`) and
/// the page theme (`theme_set_scheme`, `theme_set_token`, `theme_clear_tokens`).
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod table;
/// use table::PoolTable;
///
/// widgets_web::export_widget!(PoolTable, "pool-table");
/// ```
///
/// # Arguments
///
/// - `$widget_type`: The widget struct type that implements `widgets_core::Widget`
/// - `$widget_name`: A string literal used in log messages
#[macro_export]
macro_rules! export_widget {
    ($widget_type:ty, $widget_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static REGISTRY: RefCell<$crate::InstanceRegistry<$widget_type>> =
                RefCell::new($crate::InstanceRegistry::new());
        }

        fn with_instance<R>(
            handle: u32,
            f: impl FnOnce(&mut $crate::WidgetRunner<$widget_type>) -> R,
        ) -> Option<R> {
            REGISTRY.with(|cell| match cell.borrow_mut().with(handle, f) {
                Ok(result) => Some(result),
                Err(err) => {
                    log::warn!("{}: {}", $widget_name, err);
                    None
                }
            })
        }

        /// Returns the new instance handle, or 0 if the instance could not start.
        #[wasm_bindgen]
        pub fn widget_create(
            config_json: &str,
            surface_present: bool,
            container_width: f64,
            device_pixel_ratio: f64,
        ) -> u32 {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let created = REGISTRY.with(|cell| {
                cell.borrow_mut().create(
                    $widget_name,
                    config_json,
                    surface_present,
                    $crate::container_width(container_width),
                    device_pixel_ratio,
                )
            });
            match created {
                Ok(handle) => {
                    log::info!("{}: instance {} initialized", $widget_name, handle);
                    handle
                }
                Err(err) => {
                    log::error!("{}: {}", $widget_name, err);
                    0
                }
            }
        }

        /// Returns the pointer id to release, or -1.
        #[wasm_bindgen]
        pub fn widget_dispose(handle: u32) -> i32 {
            let disposed = REGISTRY.with(|cell| cell.borrow_mut().dispose(handle));
            match disposed {
                Ok(released) => released.unwrap_or(-1),
                Err(err) => {
                    log::warn!("{}: {}", $widget_name, err);
                    -1
                }
            }
        }

        /// Returns `false` once the host should stop requesting frames.
        #[wasm_bindgen]
        pub fn widget_tick(handle: u32, frame_dt: f64) -> bool {
            with_instance(handle, |r| r.tick(frame_dt)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn widget_redraw(handle: u32) {
            with_instance(handle, |r| r.redraw());
        }

        #[wasm_bindgen]
        pub fn widget_relayout(handle: u32, container_width: f64, device_pixel_ratio: f64) {
            with_instance(handle, |r| {
                r.relayout($crate::container_width(container_width), device_pixel_ratio)
            });
        }

        /// `phase`: 0 down, 1 move, 2 up, 3 cancel.
        /// Returns `[release, capture]`, each a pointer id or null.
        #[wasm_bindgen]
        pub fn widget_pointer(
            handle: u32,
            pointer_id: i32,
            phase: u32,
            x: f64,
            y: f64,
        ) -> $crate::js_sys::Array {
            let out = $crate::js_sys::Array::new();
            let Some(phase) = $crate::widgets_core::PointerPhase::from_code(phase) else {
                log::warn!("{}: unknown pointer phase {}", $widget_name, phase);
                return out;
            };
            let event = $crate::widgets_core::PointerEvent::new(pointer_id, phase, x, y);
            let change = with_instance(handle, |r| r.push_pointer(event)).unwrap_or_default();
            let to_js = |id: Option<i32>| id.map_or(JsValue::NULL, JsValue::from);
            out.push(&to_js(change.release));
            out.push(&to_js(change.capture));
            out
        }

        #[wasm_bindgen]
        pub fn widget_control(handle: u32, kind: u32, ui_value: f64) {
            with_instance(handle, |r| r.push_control(kind, ui_value));
        }

        /// Current UI value of a bound control, NaN if unknown.
        #[wasm_bindgen]
        pub fn widget_control_value(handle: u32, kind: u32) -> f64 {
            with_instance(handle, |r| r.control_value(kind))
                .flatten()
                .unwrap_or(f64::NAN)
        }

        #[wasm_bindgen]
        pub fn widget_custom(handle: u32, kind: u32, a: f64, b: f64, c: f64) {
            with_instance(handle, |r| r.push_custom(kind, a, b, c));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn widget_frame_ptr(handle: u32) -> *const f32 {
            with_instance(handle, |r| r.frame_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn widget_frame_len(handle: u32) -> u32 {
            with_instance(handle, |r| r.frame_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn widget_take_announcement(handle: u32) -> Option<String> {
            with_instance(handle, |r| r.take_announcement()).flatten()
        }

        #[wasm_bindgen]
        pub fn widget_cursor(handle: u32) -> String {
            with_instance(handle, |r| r.cursor())
                .unwrap_or_default()
                .css()
                .to_string()
        }

        // ---- Theme ----

        #[wasm_bindgen]
        pub fn theme_set_scheme(dark: bool) {
            $crate::with_theme(|theme| {
                theme.set_scheme($crate::widgets_core::Scheme::from_dark(dark))
            });
        }

        /// Override one token for one scheme. Returns `false` for unknown
        /// names and unparseable colors.
        #[wasm_bindgen]
        pub fn theme_set_token(dark: bool, name: &str, value: &str) -> bool {
            $crate::with_theme(|theme| {
                theme.set_token($crate::widgets_core::Scheme::from_dark(dark), name, value)
            })
        }

        #[wasm_bindgen]
        pub fn theme_clear_tokens() {
            $crate::with_theme(|theme| theme.clear_tokens());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_width_rejects_degenerate_values() {
        assert_eq!(container_width(480.0), Some(480.0));
        assert_eq!(container_width(0.0), None);
        assert_eq!(container_width(-5.0), None);
        assert_eq!(container_width(f64::NAN), None);
    }
}
