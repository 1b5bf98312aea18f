//! A window paired with the renderer that draws into it

use crate::system::SharedWindowSystem;
use crate::window::{Window, WindowError};
use tessera_core::logging::targets;
use tessera_core::{SurfaceTarget, TesseraError};
use tessera_renderer::{create_renderer, RenderDevice, RenderError, RendererType};

/// Owns one [`Window`] and one renderer bound to its native handle.
///
/// The renderer is declared first so it is torn down before the window it
/// draws into.
#[derive(Default)]
pub struct RenderWindow {
    renderer: Option<Box<dyn RenderDevice>>,
    window: Option<Window>,
    name: String,
}

impl RenderWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a window and a renderer of the requested kind for it.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        system: &SharedWindowSystem,
        name: &str,
        title: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        kind: RendererType,
    ) -> tessera_core::Result<()> {
        let mut window = Window::new(system);
        window.create(title, x, y, width, height)?;
        self.attach(window, kind)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Take over a window that was created elsewhere.
    pub fn initialize_with_existing_window(
        &mut self,
        window: Window,
        kind: RendererType,
    ) -> tessera_core::Result<()> {
        if !window.is_valid() {
            return Err(WindowError::Invalid(format!("{} has no native window", window.id())).into());
        }
        self.attach(window, kind)
    }

    fn attach(&mut self, window: Window, kind: RendererType) -> tessera_core::Result<()> {
        let (width, height) = window.size();
        let target = SurfaceTarget::new(
            window.native_handle(),
            width.max(0) as u32,
            height.max(0) as u32,
        );
        let mut renderer = create_renderer(kind);
        renderer.initialize(target)?;
        tracing::debug!(
            target: targets::WINDOW,
            id = %window.id(),
            renderer = renderer.backend_name(),
            "renderer attached"
        );
        // Replace the renderer before the window it belonged to
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    /// Render an empty frame.
    pub fn render(&mut self) -> tessera_core::Result<()> {
        self.render_with(|_| Ok(()))
    }

    /// Render one frame, letting `draw` issue draw calls between
    /// `begin_frame` and `end_frame`. Does nothing if not initialized.
    ///
    /// A window resized since the last frame gets its surface resized first.
    pub fn render_with<F>(&mut self, draw: F) -> tessera_core::Result<()>
    where
        F: FnOnce(&mut dyn RenderDevice) -> Result<(), RenderError>,
    {
        let (Some(window), Some(renderer)) = (self.window.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };

        let (width, height) = window.size();
        let state = renderer.state();
        if width > 0
            && height > 0
            && (state.surface_width != width as u32 || state.surface_height != height as u32)
        {
            renderer.set_surface(width as u32, height as u32)?;
        }

        window.begin_render()?;
        let frame = renderer.begin_frame().and_then(|()| {
            let drawn = draw(renderer.as_mut());
            let ended = renderer.end_frame();
            drawn.and(ended)
        });
        window.end_render();
        frame.map_err(TesseraError::from)
    }

    pub fn update(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.update();
        }
    }

    pub fn show(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.show();
        }
    }

    pub fn hide(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.hide();
        }
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> Option<&mut Window> {
        self.window.as_mut()
    }

    pub fn renderer(&self) -> Option<&dyn RenderDevice> {
        self.renderer.as_deref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut (dyn RenderDevice + 'static)> {
        self.renderer.as_deref_mut()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// True when both the window and its renderer are usable.
    pub fn is_valid(&self) -> bool {
        let window_ok = self.window.as_ref().is_some_and(Window::is_valid);
        let renderer_ok = self
            .renderer
            .as_ref()
            .is_some_and(|renderer| renderer.is_initialized());
        window_ok && renderer_ok
    }
}

impl std::fmt::Debug for RenderWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWindow")
            .field("name", &self.name)
            .field("window", &self.window)
            .field("renderer", &self.renderer.as_ref().map(|r| r.backend_name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::WindowSystem;
    use tessera_core::{Color, TesseraError};
    use tessera_renderer::Lifecycle;

    #[test]
    fn test_render_window_frame() {
        let (system, controller) = WindowSystem::headless();
        let mut rw = RenderWindow::new();
        rw.initialize(&system, "main", "Main", 0, 0, 64, 48, RendererType::Software)
            .unwrap();
        assert!(rw.is_valid());
        assert_eq!(rw.name(), "main");

        rw.render_with(|r| {
            r.set_draw_color(Color::RED);
            r.draw_quad(0.0, 0.0, 8.0, 8.0)
        })
        .unwrap();

        let renderer = rw.renderer().unwrap();
        assert_eq!(renderer.stats().frames_presented, 1);
        assert_eq!(renderer.lifecycle(), Lifecycle::Initialized);
        let handle = rw.window().unwrap().native_handle();
        assert_eq!(controller.window(handle).unwrap().paints, 1);
    }

    #[test]
    fn test_surface_follows_window_size() {
        let (system, _) = WindowSystem::headless();
        let mut rw = RenderWindow::new();
        rw.initialize(&system, "main", "Main", 0, 0, 64, 48, RendererType::Recording)
            .unwrap();

        rw.window_mut().unwrap().set_size(100, 80);
        rw.render().unwrap();
        let state = rw.renderer().unwrap().state();
        assert_eq!((state.surface_width, state.surface_height), (100, 80));
    }

    #[test]
    fn test_existing_window_must_be_valid() {
        let (system, _) = WindowSystem::headless();
        let mut rw = RenderWindow::new();
        let err = rw
            .initialize_with_existing_window(Window::new(&system), RendererType::Software)
            .unwrap_err();
        assert!(matches!(err, TesseraError::InvalidUsage { .. }));
        assert!(!rw.is_valid());
        rw.render().unwrap();
    }

    #[test]
    fn test_existing_window_keeps_name() {
        let (system, _) = WindowSystem::headless();
        let mut window = Window::new(&system);
        window.create("Borrowed", 5, 5, 20, 20).unwrap();

        let mut rw = RenderWindow::new();
        rw.set_name("borrowed");
        rw.initialize_with_existing_window(window, RendererType::Recording)
            .unwrap();
        assert!(rw.is_valid());
        assert_eq!(rw.name(), "borrowed");
        assert_eq!(rw.renderer().unwrap().backend_name(), "recording");
    }
}
