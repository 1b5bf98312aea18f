//! Desktop platform implementation on winit
//!
//! winit has no window classes; registration only gates window creation so
//! the desktop platform follows the same rules as every other. Events are
//! pumped without blocking, which keeps the caller in charge of the loop.

use crate::native::{NativeEvent, NativePlatform, NativeWindowDesc};
use crate::PlatformError;
use std::collections::HashMap;
use std::time::Duration;
use tessera_core::logging::targets;
use tessera_core::{NativeHandle, Rect};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{Event as WinitEvent, WindowEvent as WinitWindowEvent};
use winit::event_loop::{EventLoop, EventLoopBuilder};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};

/// Desktop platform implementation
pub struct DesktopPlatform {
    event_loop: EventLoop<()>,
    windows: HashMap<NativeHandle, winit::window::Window>,
    class_registered: bool,
}

fn handle_of(id: winit::window::WindowId) -> NativeHandle {
    NativeHandle(u64::from(id))
}

impl DesktopPlatform {
    /// Create the desktop platform. Only one may exist per process.
    pub fn new() -> Result<Self, PlatformError> {
        let event_loop = EventLoopBuilder::new()
            .build()
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;
        Ok(Self {
            event_loop,
            windows: HashMap::new(),
            class_registered: false,
        })
    }
}

impl NativePlatform for DesktopPlatform {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn register_class(&mut self) -> Result<(), PlatformError> {
        self.class_registered = true;
        Ok(())
    }

    fn unregister_class(&mut self) {
        self.class_registered = false;
    }

    fn create_window(&mut self, desc: &NativeWindowDesc) -> Result<NativeHandle, PlatformError> {
        if !self.class_registered {
            return Err(PlatformError::WindowCreation(
                "window class is not registered".to_string(),
            ));
        }
        let bounds = desc.bounds;
        let window = winit::window::WindowBuilder::new()
            .with_title(&desc.title)
            .with_inner_size(PhysicalSize::new(
                bounds.width.max(1) as u32,
                bounds.height.max(1) as u32,
            ))
            .with_position(PhysicalPosition::new(bounds.x, bounds.y))
            .with_visible(false)
            .build(&self.event_loop)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        let handle = handle_of(window.id());
        tracing::debug!(target: targets::PLATFORM, %handle, title = %desc.title, "winit window created");
        self.windows.insert(handle, window);
        Ok(handle)
    }

    fn destroy_window(&mut self, handle: NativeHandle) {
        // Dropping the winit window closes it
        self.windows.remove(&handle);
    }

    fn set_title(&mut self, handle: NativeHandle, title: &str) {
        if let Some(window) = self.windows.get(&handle) {
            window.set_title(title);
        }
    }

    fn set_bounds(&mut self, handle: NativeHandle, bounds: Rect) {
        if let Some(window) = self.windows.get(&handle) {
            window.set_outer_position(PhysicalPosition::new(bounds.x, bounds.y));
            let _ = window.request_inner_size(PhysicalSize::new(
                bounds.width.max(1) as u32,
                bounds.height.max(1) as u32,
            ));
        }
    }

    fn set_visible(&mut self, handle: NativeHandle, visible: bool) {
        if let Some(window) = self.windows.get(&handle) {
            window.set_visible(visible);
        }
    }

    fn update(&mut self, handle: NativeHandle) {
        if let Some(window) = self.windows.get(&handle) {
            window.request_redraw();
        }
    }

    fn begin_paint(&mut self, handle: NativeHandle) -> Result<(), PlatformError> {
        if self.windows.contains_key(&handle) {
            Ok(())
        } else {
            Err(PlatformError::WindowCreation(format!("no window {}", handle)))
        }
    }

    fn end_paint(&mut self, handle: NativeHandle) {
        if let Some(window) = self.windows.get(&handle) {
            window.pre_present_notify();
        }
    }

    fn poll_events(&mut self) -> Vec<NativeEvent> {
        let mut events = Vec::new();
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _target| match event {
                WinitEvent::WindowEvent { window_id, event } => {
                    let handle = handle_of(window_id);
                    match event {
                        WinitWindowEvent::Moved(position) => events.push(NativeEvent::Moved {
                            handle,
                            x: position.x,
                            y: position.y,
                        }),
                        WinitWindowEvent::Resized(size) => events.push(NativeEvent::Resized {
                            handle,
                            width: size.width as i32,
                            height: size.height as i32,
                        }),
                        WinitWindowEvent::CloseRequested => {
                            events.push(NativeEvent::CloseRequested { handle })
                        }
                        _ => {}
                    }
                }
                WinitEvent::LoopExiting => events.push(NativeEvent::Quit),
                _ => {}
            });

        if let PumpStatus::Exit(code) = status {
            tracing::debug!(target: targets::PLATFORM, code, "event loop exited");
            if !events.contains(&NativeEvent::Quit) {
                events.push(NativeEvent::Quit);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires a display server
    fn test_desktop_window_roundtrip() {
        let mut platform = DesktopPlatform::new().unwrap();
        platform.register_class().unwrap();
        let handle = platform
            .create_window(&NativeWindowDesc {
                title: "Tessera".to_string(),
                bounds: Rect::new(100, 100, 320, 240),
            })
            .unwrap();
        assert!(!handle.is_null());
        platform.set_visible(handle, true);
        platform.poll_events();
        platform.destroy_window(handle);
    }
}
