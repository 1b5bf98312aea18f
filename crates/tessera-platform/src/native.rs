//! Boundary to the operating system's window system

use crate::PlatformError;
use tessera_core::{NativeHandle, Rect};

/// Everything needed to create one native window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeWindowDesc {
    pub title: String,
    pub bounds: Rect,
}

/// Event reported by the native window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeEvent {
    /// The user or the system moved a window
    Moved { handle: NativeHandle, x: i32, y: i32 },
    /// The user or the system resized a window
    Resized {
        handle: NativeHandle,
        width: i32,
        height: i32,
    },
    /// The close button of a window was pressed
    CloseRequested { handle: NativeHandle },
    /// The application was asked to quit
    Quit,
}

impl NativeEvent {
    /// Window the event is about, `None` for application-wide events
    pub fn handle(&self) -> Option<NativeHandle> {
        match *self {
            NativeEvent::Moved { handle, .. }
            | NativeEvent::Resized { handle, .. }
            | NativeEvent::CloseRequested { handle } => Some(handle),
            NativeEvent::Quit => None,
        }
    }
}

/// Operations a native window system provides.
///
/// Implementations never see a [`Window`](crate::Window); they deal in
/// [`NativeHandle`]s only. Mapping handles back to their owners is the job of
/// [`WindowSystem`](crate::WindowSystem).
pub trait NativePlatform {
    fn name(&self) -> &'static str;

    /// Register the window class shared by every window of the process.
    fn register_class(&mut self) -> Result<(), PlatformError>;

    /// Undo [`register_class`](Self::register_class) once no window is left.
    fn unregister_class(&mut self);

    /// Create a hidden window. Never returns [`NativeHandle::NULL`].
    fn create_window(&mut self, desc: &NativeWindowDesc) -> Result<NativeHandle, PlatformError>;

    fn destroy_window(&mut self, handle: NativeHandle);

    fn set_title(&mut self, handle: NativeHandle, title: &str);

    /// Move and resize in one step.
    fn set_bounds(&mut self, handle: NativeHandle, bounds: Rect);

    fn set_visible(&mut self, handle: NativeHandle, visible: bool);

    /// Ask for the window contents to be repainted.
    fn update(&mut self, handle: NativeHandle);

    /// Start painting into a window. Paired with [`end_paint`](Self::end_paint).
    fn begin_paint(&mut self, handle: NativeHandle) -> Result<(), PlatformError>;

    fn end_paint(&mut self, handle: NativeHandle);

    /// Drain the events queued since the last call, without blocking.
    fn poll_events(&mut self) -> Vec<NativeEvent>;
}
