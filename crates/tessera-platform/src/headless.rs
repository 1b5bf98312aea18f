//! In-memory window system
//!
//! Behaves like a real platform from the point of view of the window layer
//! but keeps every window as plain data. A [`HeadlessController`] obtained
//! before the platform is handed over can inspect that data, queue events and
//! make class registration or window creation fail.

use crate::native::{NativeEvent, NativePlatform, NativeWindowDesc};
use crate::PlatformError;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use tessera_core::logging::targets;
use tessera_core::{NativeHandle, Rect};

/// State of one headless window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub title: String,
    pub bounds: Rect,
    pub visible: bool,
    pub updates: u32,
    pub paints: u32,
    pub painting: bool,
}

#[derive(Debug, Default)]
struct HeadlessState {
    windows: BTreeMap<NativeHandle, HeadlessWindow>,
    events: VecDeque<NativeEvent>,
    next_handle: u64,
    class_registered: bool,
    class_registrations: u32,
    fail_register: bool,
    fail_create: bool,
    destroyed: Vec<NativeHandle>,
}

/// Window system without a display.
#[derive(Debug)]
pub struct HeadlessPlatform {
    state: Rc<RefCell<HeadlessState>>,
}

/// Test-side view of a [`HeadlessPlatform`].
#[derive(Debug, Clone)]
pub struct HeadlessController {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                next_handle: 1,
                ..HeadlessState::default()
            })),
        }
    }

    pub fn controller(&self) -> HeadlessController {
        HeadlessController {
            state: Rc::clone(&self.state),
        }
    }

    fn with_window(&self, handle: NativeHandle, f: impl FnOnce(&mut HeadlessWindow)) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&handle) {
            f(window);
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl NativePlatform for HeadlessPlatform {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn register_class(&mut self) -> Result<(), PlatformError> {
        let mut state = self.state.borrow_mut();
        if state.fail_register {
            return Err(PlatformError::ClassRegistration(
                "registration refused".to_string(),
            ));
        }
        state.class_registered = true;
        state.class_registrations += 1;
        Ok(())
    }

    fn unregister_class(&mut self) {
        self.state.borrow_mut().class_registered = false;
    }

    fn create_window(&mut self, desc: &NativeWindowDesc) -> Result<NativeHandle, PlatformError> {
        let mut state = self.state.borrow_mut();
        if !state.class_registered {
            return Err(PlatformError::WindowCreation(
                "window class is not registered".to_string(),
            ));
        }
        if state.fail_create {
            return Err(PlatformError::WindowCreation(format!(
                "cannot create '{}'",
                desc.title
            )));
        }
        let handle = NativeHandle(state.next_handle);
        state.next_handle += 1;
        state.windows.insert(
            handle,
            HeadlessWindow {
                title: desc.title.clone(),
                bounds: desc.bounds,
                visible: false,
                updates: 0,
                paints: 0,
                painting: false,
            },
        );
        tracing::trace!(target: targets::PLATFORM, %handle, "headless window created");
        Ok(handle)
    }

    fn destroy_window(&mut self, handle: NativeHandle) {
        let mut state = self.state.borrow_mut();
        if state.windows.remove(&handle).is_some() {
            state.destroyed.push(handle);
            // Queued events for a dead window are dropped
            state.events.retain(|event| event.handle() != Some(handle));
        }
    }

    fn set_title(&mut self, handle: NativeHandle, title: &str) {
        self.with_window(handle, |w| w.title = title.to_string());
    }

    fn set_bounds(&mut self, handle: NativeHandle, bounds: Rect) {
        self.with_window(handle, |w| w.bounds = bounds);
    }

    fn set_visible(&mut self, handle: NativeHandle, visible: bool) {
        self.with_window(handle, |w| w.visible = visible);
    }

    fn update(&mut self, handle: NativeHandle) {
        self.with_window(handle, |w| w.updates += 1);
    }

    fn begin_paint(&mut self, handle: NativeHandle) -> Result<(), PlatformError> {
        let mut state = self.state.borrow_mut();
        let window = state
            .windows
            .get_mut(&handle)
            .ok_or_else(|| PlatformError::WindowCreation(format!("no window {}", handle)))?;
        window.painting = true;
        Ok(())
    }

    fn end_paint(&mut self, handle: NativeHandle) {
        self.with_window(handle, |w| {
            if w.painting {
                w.painting = false;
                w.paints += 1;
            }
        });
    }

    fn poll_events(&mut self) -> Vec<NativeEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }
}

impl HeadlessController {
    /// Queue an event for the next `poll_events`.
    pub fn push_event(&self, event: NativeEvent) {
        self.state.borrow_mut().events.push_back(event);
    }

    pub fn fail_class_registration(&self, fail: bool) {
        self.state.borrow_mut().fail_register = fail;
    }

    pub fn fail_window_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_create = fail;
    }

    pub fn window(&self, handle: NativeHandle) -> Option<HeadlessWindow> {
        self.state.borrow().windows.get(&handle).cloned()
    }

    pub fn window_count(&self) -> usize {
        self.state.borrow().windows.len()
    }

    pub fn is_class_registered(&self) -> bool {
        self.state.borrow().class_registered
    }

    /// How many times the class was registered over the platform's life
    pub fn class_registrations(&self) -> u32 {
        self.state.borrow().class_registrations
    }

    /// Handles destroyed so far, in order
    pub fn destroyed(&self) -> Vec<NativeHandle> {
        self.state.borrow().destroyed.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(title: &str) -> NativeWindowDesc {
        NativeWindowDesc {
            title: title.to_string(),
            bounds: Rect::new(0, 0, 100, 100),
        }
    }

    #[test]
    fn test_create_requires_registered_class() {
        let mut platform = HeadlessPlatform::new();
        assert!(platform.create_window(&desc("a")).is_err());

        platform.register_class().unwrap();
        let handle = platform.create_window(&desc("a")).unwrap();
        assert!(!handle.is_null());

        let window = platform.controller().window(handle).unwrap();
        assert_eq!(window.title, "a");
        assert!(!window.visible);
    }

    #[test]
    fn test_destroy_drops_pending_events() {
        let mut platform = HeadlessPlatform::new();
        let controller = platform.controller();
        platform.register_class().unwrap();
        let a = platform.create_window(&desc("a")).unwrap();
        let b = platform.create_window(&desc("b")).unwrap();

        controller.push_event(NativeEvent::Moved { handle: a, x: 1, y: 1 });
        controller.push_event(NativeEvent::CloseRequested { handle: b });
        platform.destroy_window(a);

        assert_eq!(
            platform.poll_events(),
            vec![NativeEvent::CloseRequested { handle: b }]
        );
        assert!(platform.poll_events().is_empty());
        assert_eq!(controller.destroyed(), vec![a]);
    }

    #[test]
    fn test_paint_counts_complete_pairs() {
        let mut platform = HeadlessPlatform::new();
        platform.register_class().unwrap();
        let handle = platform.create_window(&desc("a")).unwrap();

        platform.end_paint(handle);
        platform.begin_paint(handle).unwrap();
        platform.end_paint(handle);
        assert_eq!(platform.controller().window(handle).unwrap().paints, 1);
        assert!(platform.begin_paint(NativeHandle(99)).is_err());
    }
}
