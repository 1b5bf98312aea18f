//! Named window collection with overlap-aware rendering

use crate::compositor::{self, OverlapRegions};
use crate::headless::HeadlessController;
use crate::native::NativeEvent;
use crate::system::{SharedWindowSystem, WindowSystem};
use crate::window::{Window, WindowError, WindowId};
use std::collections::BTreeMap;
use tessera_core::logging::targets;
use tessera_core::{NativeHandle, Rect};
use tracing::{debug, info, warn};

/// One window's slot in a rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPass {
    pub name: String,
    pub id: WindowId,
    pub bounds: Rect,
    /// Merged regions covered by other visible windows
    pub overlaps: OverlapRegions,
}

/// Result of [`WindowManager::render_all_windows`]: passes in painting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub passes: Vec<WindowPass>,
}

impl FrameReport {
    /// Window names in the order they were painted
    pub fn order(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn pass(&self, name: &str) -> Option<&WindowPass> {
        self.passes.iter().find(|p| p.name == name)
    }

    pub fn total_overlaps(&self) -> usize {
        self.passes.iter().map(|p| p.overlaps.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Owns windows by unique name and drives their per-frame render passes.
#[derive(Debug)]
pub struct WindowManager {
    system: SharedWindowSystem,
    windows: BTreeMap<String, Window>,
    running: bool,
}

impl WindowManager {
    pub fn new(system: &SharedWindowSystem) -> Self {
        Self {
            system: SharedWindowSystem::clone(system),
            windows: BTreeMap::new(),
            running: true,
        }
    }

    /// Manager over a fresh headless window system.
    pub fn headless() -> (Self, HeadlessController) {
        let (system, controller) = WindowSystem::headless();
        (Self::new(&system), controller)
    }

    pub fn system(&self) -> &SharedWindowSystem {
        &self.system
    }

    /// Create a window and register it under `name`.
    ///
    /// Fails without touching the collection if the name is taken or the
    /// native window cannot be created.
    pub fn create_window(
        &mut self,
        name: &str,
        title: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<&mut Window, WindowError> {
        if self.windows.contains_key(name) {
            warn!(target: targets::WINDOW, name, "duplicate window name rejected");
            return Err(WindowError::DuplicateName(name.to_string()));
        }

        let mut window = Window::new(&self.system);
        if let Err(err) = window.create(title, x, y, width, height) {
            warn!(target: targets::WINDOW, name, error = %err, "window creation failed");
            return Err(err);
        }

        info!(
            target: targets::WINDOW,
            name,
            id = %window.id(),
            bounds = %window.bounds(),
            "window registered"
        );
        Ok(self.windows.entry(name.to_string()).or_insert(window))
    }

    /// Destroy the window called `name`. Returns false if there is none.
    pub fn destroy_window(&mut self, name: &str) -> bool {
        match self.windows.remove(name) {
            Some(mut window) => {
                window.destroy();
                info!(target: targets::WINDOW, name, "window removed");
                true
            }
            None => false,
        }
    }

    /// Destroy a window by identity rather than by name.
    pub fn destroy_window_by_id(&mut self, id: WindowId) -> bool {
        match self.name_of(id) {
            Some(name) => self.destroy_window(&name),
            None => false,
        }
    }

    fn name_of(&self, id: WindowId) -> Option<String> {
        self.windows
            .iter()
            .find(|(_, window)| window.id() == id)
            .map(|(name, _)| name.clone())
    }

    fn owner_name(&self, handle: NativeHandle) -> Option<String> {
        let owner = self.system.borrow().owner_of(handle)?;
        self.name_of(owner)
    }

    pub fn get_window(&self, name: &str) -> Option<&Window> {
        self.windows.get(name)
    }

    pub fn get_window_mut(&mut self, name: &str) -> Option<&mut Window> {
        self.windows.get_mut(name)
    }

    pub fn update_all_windows(&mut self) {
        self.windows.values_mut().for_each(Window::update);
    }

    pub fn show_all_windows(&mut self) {
        self.windows.values_mut().for_each(Window::show);
    }

    pub fn hide_all_windows(&mut self) {
        self.windows.values_mut().for_each(Window::hide);
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Names of all windows, sorted
    pub fn window_names(&self) -> Vec<String> {
        self.windows.keys().cloned().collect()
    }

    pub fn has_window(&self, name: &str) -> bool {
        self.windows.contains_key(name)
    }

    fn visible_bounds(&self) -> impl Iterator<Item = (&str, Rect)> + '_ {
        self.windows
            .iter()
            .filter(|(_, window)| window.is_visible() && window.is_valid())
            .map(|(name, window)| (name.as_str(), window.bounds()))
    }

    /// Merged regions of `name` covered by other visible windows, exactly as
    /// the next frame's render pass reports them.
    pub fn overlapping_areas(&self, name: &str) -> OverlapRegions {
        let Some(target) = self.windows.get(name) else {
            return OverlapRegions::new();
        };
        let order = compositor::z_order(self.visible_bounds());
        overlaps_in_order(&order, name, target.bounds())
    }

    pub fn is_window_overlapping(&self, name: &str) -> bool {
        !self.overlapping_areas(name).is_empty()
    }

    /// Render every visible window back to front.
    pub fn render_all_windows(&mut self) -> FrameReport {
        self.render_all_windows_with(|_, _| {})
    }

    /// Render every visible window back to front, calling `paint` inside
    /// each window's render pass.
    pub fn render_all_windows_with<F>(&mut self, mut paint: F) -> FrameReport
    where
        F: FnMut(&WindowPass, &mut Window),
    {
        let order = compositor::z_order(self.visible_bounds());
        let planned: Vec<WindowPass> = order
            .iter()
            .map(|(name, bounds)| WindowPass {
                name: name.to_string(),
                id: self.windows[*name].id(),
                bounds: *bounds,
                overlaps: overlaps_in_order(&order, name, *bounds),
            })
            .collect();

        let mut report = FrameReport::default();
        for pass in planned {
            let Some(window) = self.windows.get_mut(&pass.name) else {
                continue;
            };
            if let Err(err) = window.begin_render() {
                warn!(target: targets::COMPOSITOR, name = %pass.name, error = %err, "render pass skipped");
                continue;
            }
            paint(&pass, window);
            window.end_render();
            debug!(
                target: targets::COMPOSITOR,
                name = %pass.name,
                bounds = %pass.bounds,
                overlaps = pass.overlaps.len(),
                "window rendered"
            );
            report.passes.push(pass);
        }
        report
    }

    /// Handle pending native events.
    ///
    /// Moves and resizes are mirrored into the owning window, a close request
    /// destroys the window, and a quit request (or closing the last window)
    /// stops the manager. Events after a quit request are discarded.
    pub fn process_messages(&mut self) {
        let events = self.system.borrow_mut().poll_events();
        for event in events {
            match event {
                NativeEvent::Quit => {
                    info!(target: targets::PLATFORM, "quit requested");
                    self.running = false;
                    break;
                }
                NativeEvent::Moved { handle, x, y } => {
                    if let Some(window) = self.window_for(handle) {
                        window.sync_position(x, y);
                    }
                }
                NativeEvent::Resized {
                    handle,
                    width,
                    height,
                } => {
                    if let Some(window) = self.window_for(handle) {
                        window.sync_size(width, height);
                    }
                }
                NativeEvent::CloseRequested { handle } => {
                    if let Some(name) = self.owner_name(handle) {
                        self.destroy_window(&name);
                        if self.windows.is_empty() {
                            self.running = false;
                        }
                    }
                }
            }
        }
    }

    fn window_for(&mut self, handle: NativeHandle) -> Option<&mut Window> {
        let name = self.owner_name(handle)?;
        self.windows.get_mut(&name)
    }

    /// Stop running and destroy every window.
    pub fn exit(&mut self) {
        self.running = false;
        for window in self.windows.values_mut() {
            window.destroy();
        }
        self.windows.clear();
        info!(target: targets::WINDOW, "window manager exited");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Overlaps of `bounds` against every other window of `order`, fed to the
/// merge in painting order.
fn overlaps_in_order(order: &[(&str, Rect)], name: &str, bounds: Rect) -> OverlapRegions {
    compositor::overlapping_areas(
        bounds,
        order
            .iter()
            .filter(|(other, _)| *other != name)
            .map(|(_, other)| *other),
    )
}
