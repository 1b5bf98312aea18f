//! A single native window

use crate::native::NativeWindowDesc;
use crate::system::SharedWindowSystem;
use crate::PlatformError;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tessera_core::logging::targets;
use tessera_core::{ErrorContext, NativeHandle, Rect, TesseraError};
use thiserror::Error;

/// Process-unique window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        WindowId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("a window named '{0}' already exists")]
    DuplicateName(String),

    #[error("no window named '{0}'")]
    NotFound(String),

    #[error("invalid window operation: {0}")]
    Invalid(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl From<WindowError> for TesseraError {
    fn from(err: WindowError) -> Self {
        let message = err.to_string();
        let context = ErrorContext::new("window", "platform");
        match err {
            WindowError::DuplicateName(_) | WindowError::Invalid(_) => {
                TesseraError::invalid_usage(message).with_context(context)
            }
            WindowError::NotFound(_) => TesseraError::not_found(message).with_context(context),
            WindowError::Platform(_) => TesseraError::window(message).with_context(context),
        }
    }
}

/// On-screen window with position, size and visibility.
///
/// A window starts out invalid. [`create`](Window::create) backs it with a
/// native window and [`destroy`](Window::destroy) releases that again; both
/// the native object and the state here are updated together, so every
/// setter takes effect immediately.
pub struct Window {
    id: WindowId,
    system: SharedWindowSystem,
    title: String,
    bounds: Rect,
    visible: bool,
    handle: Option<NativeHandle>,
    rendering: bool,
}

impl Window {
    /// An invalid window attached to `system`.
    pub fn new(system: &SharedWindowSystem) -> Self {
        Self {
            id: WindowId::next(),
            system: Rc::clone(system),
            title: String::new(),
            bounds: Rect::EMPTY,
            visible: false,
            handle: None,
            rendering: false,
        }
    }

    /// Create the native window. The window starts hidden.
    pub fn create(
        &mut self,
        title: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), WindowError> {
        if self.is_valid() {
            return Err(WindowError::Invalid(format!("{} already created", self.id)));
        }
        if width < 0 || height < 0 {
            return Err(WindowError::Invalid(format!(
                "negative size {}x{}",
                width, height
            )));
        }

        let bounds = Rect::new(x, y, width, height);
        let desc = NativeWindowDesc {
            title: title.to_string(),
            bounds,
        };
        let handle = self.system.borrow_mut().create_native(self.id, &desc)?;

        self.title = desc.title;
        self.bounds = bounds;
        self.visible = false;
        self.handle = Some(handle);
        tracing::debug!(
            target: targets::WINDOW,
            id = %self.id,
            %handle,
            bounds = %bounds,
            "window created"
        );
        Ok(())
    }

    /// Release the native window. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.handle.take() {
            if self.rendering {
                self.system.borrow_mut().end_paint(handle);
                self.rendering = false;
            }
            self.system.borrow_mut().destroy_native(handle);
            self.visible = false;
            tracing::debug!(target: targets::WINDOW, id = %self.id, "window destroyed");
        }
    }

    pub fn show(&mut self) {
        if let Some(handle) = self.handle {
            self.system.borrow_mut().set_visible(handle, true);
            self.visible = true;
        }
    }

    pub fn hide(&mut self) {
        if let Some(handle) = self.handle {
            self.system.borrow_mut().set_visible(handle, false);
            self.visible = false;
        }
    }

    /// Ask the native window to repaint.
    pub fn update(&mut self) {
        if let Some(handle) = self.handle {
            self.system.borrow_mut().update(handle);
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        if let Some(handle) = self.handle {
            self.system.borrow_mut().set_title(handle, title);
        }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.bounds = self.bounds.with_origin(x, y);
        self.push_bounds();
    }

    /// Negative sizes are clamped to zero.
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.bounds = self.bounds.with_size(width.max(0), height.max(0));
        self.push_bounds();
    }

    fn push_bounds(&mut self) {
        if let Some(handle) = self.handle {
            self.system.borrow_mut().set_bounds(handle, self.bounds);
        }
    }

    /// Record a move the native side already performed.
    pub(crate) fn sync_position(&mut self, x: i32, y: i32) {
        self.bounds = self.bounds.with_origin(x, y);
    }

    /// Record a resize the native side already performed.
    pub(crate) fn sync_size(&mut self, width: i32, height: i32) {
        self.bounds = self.bounds.with_size(width.max(0), height.max(0));
    }

    /// Start a render pass on this window.
    pub fn begin_render(&mut self) -> Result<(), WindowError> {
        let handle = self
            .handle
            .ok_or_else(|| WindowError::Invalid(format!("{} has no native window", self.id)))?;
        if self.rendering {
            return Err(WindowError::Invalid(format!(
                "{} is already rendering",
                self.id
            )));
        }
        self.system.borrow_mut().begin_paint(handle)?;
        self.rendering = true;
        Ok(())
    }

    /// End the render pass started by [`begin_render`](Window::begin_render).
    pub fn end_render(&mut self) {
        if let (Some(handle), true) = (self.handle, self.rendering) {
            self.system.borrow_mut().end_paint(handle);
        }
        self.rendering = false;
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn position(&self) -> (i32, i32) {
        self.bounds.origin()
    }

    pub fn size(&self) -> (i32, i32) {
        (self.bounds.width, self.bounds.height)
    }

    pub fn x(&self) -> i32 {
        self.bounds.x
    }

    pub fn y(&self) -> i32 {
        self.bounds.y
    }

    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// Native handle, [`NativeHandle::NULL`] once destroyed
    pub fn native_handle(&self) -> NativeHandle {
        self.handle.unwrap_or(NativeHandle::NULL)
    }

    pub fn system(&self) -> &SharedWindowSystem {
        &self.system
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("bounds", &self.bounds)
            .field("visible", &self.visible)
            .field("handle", &self.handle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::WindowSystem;

    #[test]
    fn test_create_and_destroy() {
        let (system, controller) = WindowSystem::headless();
        let mut window = Window::new(&system);
        assert!(!window.is_valid());
        assert!(window.native_handle().is_null());

        window.create("Main", 10, 20, 300, 200).unwrap();
        assert!(window.is_valid());
        assert!(!window.is_visible());
        assert_eq!(window.bounds(), Rect::new(10, 20, 300, 200));
        assert!(window.create("Again", 0, 0, 1, 1).is_err());

        let handle = window.native_handle();
        window.destroy();
        window.destroy();
        assert!(!window.is_valid());
        assert_eq!(controller.destroyed(), vec![handle]);
    }

    #[test]
    fn test_setters_reach_the_native_window() {
        let (system, controller) = WindowSystem::headless();
        let mut window = Window::new(&system);
        window.create("Main", 0, 0, 100, 100).unwrap();
        let handle = window.native_handle();

        window.set_position(40, 50);
        window.set_size(120, 80);
        window.set_title("Renamed");
        window.show();

        let native = controller.window(handle).unwrap();
        assert_eq!(native.bounds, Rect::new(40, 50, 120, 80));
        assert_eq!(native.title, "Renamed");
        assert!(native.visible);
        assert_eq!((window.x(), window.y()), (40, 50));
    }

    #[test]
    fn test_failed_create_keeps_window_invalid() {
        let (system, controller) = WindowSystem::headless();
        controller.fail_window_creation(true);
        let mut window = Window::new(&system);

        let err = window.create("Main", 0, 0, 10, 10).unwrap_err();
        assert!(matches!(err, WindowError::Platform(_)));
        assert!(!window.is_valid());
        assert!(window.create("Bad", 0, 0, -1, 10).is_err());
    }

    #[test]
    fn test_render_pass_requires_valid_window() {
        let (system, controller) = WindowSystem::headless();
        let mut window = Window::new(&system);
        assert!(window.begin_render().is_err());

        window.create("Main", 0, 0, 10, 10).unwrap();
        window.begin_render().unwrap();
        assert!(window.begin_render().is_err());
        window.end_render();
        assert_eq!(controller.window(window.native_handle()).unwrap().paints, 1);
    }

    #[test]
    fn test_drop_destroys_native_window() {
        let (system, controller) = WindowSystem::headless();
        {
            let mut window = Window::new(&system);
            window.create("Scoped", 0, 0, 10, 10).unwrap();
            assert_eq!(controller.window_count(), 1);
        }
        assert_eq!(controller.window_count(), 0);
        assert!(!system.borrow().is_class_registered());
    }
}
