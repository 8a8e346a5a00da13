use std::collections::HashMap;

use widgets_core::{SubscriptionId, Widget, WidgetError};

use crate::runner::WidgetRunner;
use crate::with_theme;

struct Instance<W: Widget> {
    runner: WidgetRunner<W>,
    subscription: SubscriptionId,
}

/// All live instances of one widget type on the page, keyed by opaque handle.
///
/// Handles start at 1; 0 is what the exports return when creation failed.
/// A failing instance never affects the others.
pub struct InstanceRegistry<W: Widget> {
    instances: HashMap<u32, Instance<W>>,
    next_handle: u32,
}

impl<W: Widget> InstanceRegistry<W> {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Build, lay out and initialize a new instance and subscribe it to theme changes.
    pub fn create(
        &mut self,
        name: &str,
        config_json: &str,
        surface_present: bool,
        container_width: Option<f64>,
        device_pixel_ratio: f64,
    ) -> Result<u32, WidgetError> {
        if !surface_present {
            return Err(WidgetError::MissingSurface(name.to_string()));
        }
        let json = if config_json.trim().is_empty() { "{}" } else { config_json };
        let widget = W::from_config_json(json)?;
        let handle = self.allocate_handle().ok_or(WidgetError::HandlesExhausted)?;

        let palette = with_theme(|theme| theme.palette());
        let runner = WidgetRunner::new(widget, container_width, device_pixel_ratio, palette);
        let dirty = runner.theme_dirty_flag();
        let subscription = with_theme(|theme| theme.subscribe(move |_| dirty.set(true)));

        self.instances.insert(handle, Instance { runner, subscription });
        Ok(handle)
    }

    /// Next handle not held by a live instance. Wraps past `u32::MAX` back to 1.
    fn allocate_handle(&mut self) -> Option<u32> {
        for _ in 0..=self.instances.len() {
            let handle = self.next_handle;
            self.next_handle = self.next_handle.checked_add(1).unwrap_or(1);
            if !self.instances.contains_key(&handle) {
                return Some(handle);
            }
        }
        None
    }

    /// Run `f` against a live instance.
    pub fn with<R>(
        &mut self,
        handle: u32,
        f: impl FnOnce(&mut WidgetRunner<W>) -> R,
    ) -> Result<R, WidgetError> {
        self.instances
            .get_mut(&handle)
            .map(|instance| f(&mut instance.runner))
            .ok_or(WidgetError::UnknownInstance(handle))
    }

    /// Stop and drop an instance. Returns the pointer the host must release, if any.
    pub fn dispose(&mut self, handle: u32) -> Result<Option<i32>, WidgetError> {
        let mut instance = self
            .instances
            .remove(&handle)
            .ok_or(WidgetError::UnknownInstance(handle))?;
        let released = instance.runner.stop();
        with_theme(|theme| theme.unsubscribe(instance.subscription));
        Ok(released)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<W: Widget> Default for InstanceRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widgets_core::{InputEvent, Palette, RenderContext, Scheme, WidgetContext};

    struct Strict {
        ready: bool,
    }

    impl Widget for Strict {
        fn from_config_json(json: &str) -> Result<Self, WidgetError> {
            let value: serde_json::Value = serde_json::from_str(json)?;
            Ok(Self { ready: value.is_object() })
        }

        fn init(&mut self, _ctx: &mut WidgetContext) {}

        fn handle_input(&mut self, _ctx: &mut WidgetContext, _events: &[InputEvent]) {}

        fn step(&mut self, _ctx: &mut WidgetContext, _dt: f64) {}

        fn render(&self, _ctx: &mut RenderContext) {}
    }

    #[test]
    fn failed_instance_does_not_block_others() {
        let mut registry = InstanceRegistry::<Strict>::new();
        assert!(registry.create("strict", "{}", false, None, 1.0).is_err());
        assert!(registry.create("strict", "garbage", true, None, 1.0).is_err());
        let handle = registry.create("strict", "", true, None, 1.0).unwrap();
        assert_eq!(handle, 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.with(handle, |r| r.widget().ready).unwrap());
    }

    #[test]
    fn unknown_handles_are_errors() {
        let mut registry = InstanceRegistry::<Strict>::new();
        assert!(matches!(registry.with(42, |_| ()), Err(WidgetError::UnknownInstance(42))));
        assert!(registry.dispose(42).is_err());
    }

    #[test]
    fn dispose_unsubscribes_from_theme() {
        let mut registry = InstanceRegistry::<Strict>::new();
        let before = with_theme(|t| t.subscriber_count());
        let handle = registry.create("strict", "{}", true, Some(300.0), 2.0).unwrap();
        assert_eq!(with_theme(|t| t.subscriber_count()), before + 1);

        with_theme(|t| t.set_scheme(Scheme::Dark));
        registry.with(handle, |r| r.redraw()).unwrap();

        assert_eq!(registry.dispose(handle).unwrap(), None);
        assert_eq!(with_theme(|t| t.subscriber_count()), before);
        assert!(registry.is_empty());
        with_theme(|t| t.set_scheme(Scheme::Light));
    }

    #[test]
    fn theme_change_reaches_every_live_instance() {
        with_theme(|t| t.set_scheme(Scheme::Light));
        let mut registry = InstanceRegistry::<Strict>::new();
        let a = registry.create("strict", "{}", true, Some(300.0), 1.0).unwrap();
        let b = registry.create("strict", "{}", true, Some(400.0), 2.0).unwrap();

        with_theme(|t| t.set_scheme(Scheme::Dark));
        registry.with(a, |r| r.tick(1.0 / 60.0)).unwrap();
        registry.with(b, |r| r.redraw()).unwrap();
        for handle in [a, b] {
            let palette = registry.with(handle, |r| *r.palette()).unwrap();
            assert_eq!(palette, Palette::defaults(Scheme::Dark));
        }

        let disposed_flag = registry.with(b, |r| r.theme_dirty_flag()).unwrap();
        registry.dispose(b).unwrap();
        with_theme(|t| t.set_scheme(Scheme::Light));
        assert!(!disposed_flag.get());
        assert!(registry.with(a, |r| r.theme_dirty_flag().get()).unwrap());
        registry.with(a, |r| r.redraw()).unwrap();
        assert_eq!(
            registry.with(a, |r| *r.palette()).unwrap(),
            Palette::defaults(Scheme::Light)
        );
    }

    #[test]
    fn wrapped_handles_skip_live_instances() {
        let mut registry = InstanceRegistry::<Strict>::new();
        let before = with_theme(|t| t.subscriber_count());
        let first = registry.create("strict", "{}", true, None, 1.0).unwrap();
        assert_eq!(first, 1);

        registry.next_handle = u32::MAX;
        assert_eq!(registry.create("strict", "{}", true, None, 1.0).unwrap(), u32::MAX);
        assert_eq!(registry.create("strict", "{}", true, None, 1.0).unwrap(), 2);
        assert_eq!(registry.len(), 3);
        assert_eq!(with_theme(|t| t.subscriber_count()), before + 3);
    }
}
