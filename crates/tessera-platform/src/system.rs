//! Process-wide window system service
//!
//! One [`WindowSystem`] owns the native platform for the whole process. It
//! registers the shared window class when the first window is created and
//! unregisters it when the last one is destroyed, and it keeps the registry
//! from native handles back to the [`WindowId`] that owns them so platform
//! events can be routed without the native side knowing about windows.

use crate::headless::{HeadlessController, HeadlessPlatform};
use crate::native::{NativeEvent, NativePlatform, NativeWindowDesc};
use crate::window::WindowId;
use crate::PlatformError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tessera_core::logging::targets;
use tessera_core::{NativeHandle, Rect};
use tracing::{debug, info};

/// The window system as shared by every window.
pub type SharedWindowSystem = Rc<RefCell<WindowSystem>>;

pub struct WindowSystem {
    platform: Box<dyn NativePlatform>,
    class_registered: bool,
    owners: HashMap<NativeHandle, WindowId>,
}

impl WindowSystem {
    pub fn new(platform: Box<dyn NativePlatform>) -> Self {
        Self {
            platform,
            class_registered: false,
            owners: HashMap::new(),
        }
    }

    pub fn shared(platform: Box<dyn NativePlatform>) -> SharedWindowSystem {
        Rc::new(RefCell::new(Self::new(platform)))
    }

    /// A shared headless system and the controller of its platform.
    pub fn headless() -> (SharedWindowSystem, HeadlessController) {
        let platform = HeadlessPlatform::new();
        let controller = platform.controller();
        (Self::shared(Box::new(platform)), controller)
    }

    pub fn platform_name(&self) -> &'static str {
        self.platform.name()
    }

    pub fn is_class_registered(&self) -> bool {
        self.class_registered
    }

    /// Native windows currently alive
    pub fn live_windows(&self) -> usize {
        self.owners.len()
    }

    /// Window that owns `handle`, if it is still alive
    pub fn owner_of(&self, handle: NativeHandle) -> Option<WindowId> {
        self.owners.get(&handle).copied()
    }

    /// Create a native window on behalf of `owner`.
    ///
    /// Registers the window class first if no window exists. If creation
    /// fails nothing is left behind, including the class registration.
    pub fn create_native(
        &mut self,
        owner: WindowId,
        desc: &NativeWindowDesc,
    ) -> Result<NativeHandle, PlatformError> {
        if !self.class_registered {
            self.platform.register_class()?;
            self.class_registered = true;
            info!(
                target: targets::PLATFORM,
                platform = self.platform.name(),
                "window class registered"
            );
        }

        let created = self.platform.create_window(desc).and_then(|handle| {
            if handle.is_null() {
                Err(PlatformError::WindowCreation(
                    "platform returned a null handle".to_string(),
                ))
            } else {
                Ok(handle)
            }
        });
        match created {
            Ok(handle) => {
                self.owners.insert(handle, owner);
                debug!(target: targets::PLATFORM, %handle, owner = %owner, "native window created");
                Ok(handle)
            }
            Err(err) => {
                self.release_class_if_unused();
                Err(err)
            }
        }
    }

    /// Destroy a native window. Unknown handles are ignored.
    pub fn destroy_native(&mut self, handle: NativeHandle) {
        if self.owners.remove(&handle).is_none() {
            return;
        }
        self.platform.destroy_window(handle);
        debug!(target: targets::PLATFORM, %handle, "native window destroyed");
        self.release_class_if_unused();
    }

    fn release_class_if_unused(&mut self) {
        if self.class_registered && self.owners.is_empty() {
            self.platform.unregister_class();
            self.class_registered = false;
            info!(target: targets::PLATFORM, "window class unregistered");
        }
    }

    pub fn set_title(&mut self, handle: NativeHandle, title: &str) {
        self.platform.set_title(handle, title);
    }

    pub fn set_bounds(&mut self, handle: NativeHandle, bounds: Rect) {
        self.platform.set_bounds(handle, bounds);
    }

    pub fn set_visible(&mut self, handle: NativeHandle, visible: bool) {
        self.platform.set_visible(handle, visible);
    }

    pub fn update(&mut self, handle: NativeHandle) {
        self.platform.update(handle);
    }

    pub fn begin_paint(&mut self, handle: NativeHandle) -> Result<(), PlatformError> {
        self.platform.begin_paint(handle)
    }

    pub fn end_paint(&mut self, handle: NativeHandle) {
        self.platform.end_paint(handle);
    }

    /// Pending native events, without blocking
    pub fn poll_events(&mut self) -> Vec<NativeEvent> {
        self.platform.poll_events()
    }
}

impl std::fmt::Debug for WindowSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowSystem")
            .field("platform", &self.platform.name())
            .field("class_registered", &self.class_registered)
            .field("live_windows", &self.owners.len())
            .finish()
    }
}
