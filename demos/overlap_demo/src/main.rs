//! Three overlapping windows, rendered back to front with their overlap
//! regions outlined, drifting a little every 30 frames.
//!
//! Usage: `overlap_demo [config.json]`

use std::collections::HashMap;
use std::time::Duration;
use tessera_core::config::{init_config_with, TesseraConfig};
use tessera_core::{logging, Color, SurfaceTarget};
use tessera_platform::{create_window_system, WindowManager, WindowPass};
use tessera_renderer::{RenderDevice, RenderError, RendererConfig};
use tracing::{info, warn};

const WINDOW_WIDTH: i32 = 400;
const WINDOW_HEIGHT: i32 = 300;
const DEFAULT_MAX_FRAMES: u32 = 100;
const BORDER: f32 = 2.0;

/// (name, title, x, y, drift per step)
const WINDOWS: [(&str, &str, i32, i32, (i32, i32)); 3] = [
    ("window1", "Window 1", 100, 100, (5, 2)),
    ("window2", "Window 2", 300, 200, (-3, 4)),
    ("window3", "Window 3", 500, 150, (-2, -3)),
];

fn load_config() -> anyhow::Result<TesseraConfig> {
    match std::env::args().nth(1) {
        Some(path) => Ok(TesseraConfig::load(path)?),
        None => {
            let mut config = TesseraConfig::default();
            config.windowing.max_frames = DEFAULT_MAX_FRAMES;
            Ok(config)
        }
    }
}

/// Window background plus a border and a center marker for every overlap region.
fn paint_pass(
    renderer: &mut dyn RenderDevice,
    pass: &WindowPass,
    segments: u32,
) -> Result<(), RenderError> {
    renderer.begin_frame()?;
    renderer.set_draw_color(Color::rgb(0.2, 0.2, 0.25));
    renderer.draw_quad(0.0, 0.0, pass.bounds.width as f32, pass.bounds.height as f32)?;

    renderer.set_draw_color(Color::RED);
    for region in &pass.overlaps {
        let x = (region.x - pass.bounds.x) as f32;
        let y = (region.y - pass.bounds.y) as f32;
        let (w, h) = (region.width as f32, region.height as f32);
        renderer.draw_quad(x, y, w, BORDER)?;
        renderer.draw_quad(x, y + h - BORDER, w, BORDER)?;
        renderer.draw_quad(x, y, BORDER, h)?;
        renderer.draw_quad(x + w - BORDER, y, BORDER, h)?;
        renderer.draw_circle(x + w / 2.0, y + h / 2.0, 4.0, segments)?;
    }
    renderer.end_frame()
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    logging::init_with_config(&config.logging)?;
    let config = init_config_with(config).get_config();
    info!("Window overlap example");

    let system = create_window_system(&config.windowing)?;
    let mut wm = WindowManager::new(&system);
    let renderer_config = RendererConfig::from_settings(&config.renderer)?;
    let mut renderers: HashMap<&str, Box<dyn RenderDevice>> = HashMap::new();

    for (name, title, x, y, _) in WINDOWS {
        let window = wm.create_window(name, title, x, y, WINDOW_WIDTH, WINDOW_HEIGHT)?;
        let mut renderer = renderer_config.create();
        renderer.initialize(SurfaceTarget::new(
            window.native_handle(),
            WINDOW_WIDTH as u32,
            WINDOW_HEIGHT as u32,
        ))?;
        renderers.insert(name, renderer);
    }
    wm.show_all_windows();

    let max_frames = config.windowing.max_frames;
    let interval = Duration::from_millis(config.windowing.frame_interval_ms);
    let mut frame: u32 = 0;

    while (max_frames == 0 || frame < max_frames) && wm.window_count() > 0 && wm.is_running() {
        wm.process_messages();

        if frame % 10 == 0 {
            let segments = renderer_config.circle_segments;
            let report = wm.render_all_windows_with(|pass, _window| {
                if let Some(renderer) = renderers.get_mut(pass.name.as_str()) {
                    if let Err(err) = paint_pass(renderer.as_mut(), pass, segments) {
                        warn!(window = %pass.name, error = %err, "paint failed");
                    }
                }
            });
            info!(frame, order = ?report.order(), "frame rendered");
            for pass in &report.passes {
                for region in &pass.overlaps {
                    info!(window = %pass.name, region = %region, "overlap");
                }
            }
        }

        if frame % 30 == 0 {
            for (name, _, _, _, (dx, dy)) in WINDOWS {
                if let Some(window) = wm.get_window_mut(name) {
                    let (x, y) = window.position();
                    window.set_position(x + dx, y + dy);
                }
            }
        }

        std::thread::sleep(interval);
        frame += 1;
    }

    // Surfaces go before the windows they draw into
    renderers.clear();
    wm.exit();
    info!(frames = frame, "example completed");
    Ok(())
}
