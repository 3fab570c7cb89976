//! Headless display demo.
//!
//! Parses a line of styled markup, paints a banner in the color of its first
//! styled run, then runs the compositor while a cursor and the banner move
//! across the screen. Configuration comes from `LUMEN_*` environment
//! variables; set `RUST_LOG=debug` to watch the frame loop.

use core::time::Duration;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use anyhow::{Context as _, Result};
use display::{
    DisplayCompositor, DisplayConfig, Layer, LayerStack, Pixmap, Point, Rect, Rgba8, Screen,
    Size, SpriteCursor, create_backend,
};
use log::info;
use text_style::{StyledRun, parse_markup};

const GREETING: &str = "Hello <color=#f80>warm <size=18pt>world</size></color>, <color=32,96,255>cool</color> screen!";

/// Pause between two animation steps.
const STEP: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::init();

    let config = DisplayConfig::from_env();
    info!("starting with {config:?}");

    let runs = parse_markup(GREETING);
    log_runs(&runs);

    let size = config.screen_size();
    let (stack, banner) = build_scene(size, banner_color(&runs));
    let scene = Arc::new(Mutex::new(stack));
    let cursor = Arc::new(SpriteCursor::new(Pixmap::filled(
        Size::new(12, 12),
        Rgba8::new(255, 255, 255, 200),
    )));

    let mut compositor = DisplayCompositor::new(
        Screen::new(create_backend(config.backend)),
        Arc::<Mutex<LayerStack>>::clone(&scene),
    )
    .with_cursor(Arc::<SpriteCursor>::clone(&cursor))
    .with_frame_budget(config.frame_budget());
    compositor
        .start(size, config.mode)
        .context("failed to start the display")?;

    let started = Instant::now();
    let mut step: i32 = 0;
    while started.elapsed() < config.run_time() {
        step = step.wrapping_add(1);
        let center = compositor.center();
        let target = Point::new(center.x + step % 200 - 100, center.y + step % 120 - 60);
        for rect in cursor.move_to(target) {
            compositor.invalidate_area(Some(rect))?;
        }
        slide_banner(&compositor, &scene, banner, step)?;
        thread::sleep(STEP);
    }

    info!(
        "ran {step} animation steps in {:?} at {:.1} fps",
        started.elapsed(),
        compositor.fps()
    );
    compositor.stop().context("failed to stop the display")?;
    Ok(())
}

fn log_runs(runs: &[StyledRun]) {
    for run in runs {
        match &run.style {
            Some(style) => info!(
                "run {:?}: color #{:02x}{:02x}{:02x}, {}px",
                run.text,
                style.fore_color.red,
                style.fore_color.green,
                style.fore_color.blue,
                style.pixel_size
            ),
            None => info!("run {:?}: default style", run.text),
        }
    }
}

fn banner_color(runs: &[StyledRun]) -> Rgba8 {
    runs.iter()
        .find_map(|run| run.style.as_ref())
        .map_or(Rgba8::WHITE, |style| {
            let color = style.fore_color;
            Rgba8::opaque(color.red, color.green, color.blue)
        })
}

/// Dark background, a translucent frame and the banner layer on top.
fn build_scene(size: Size, banner_color: Rgba8) -> (LayerStack, usize) {
    let mut stack = LayerStack::new(Rgba8::opaque(24, 24, 32));
    stack.push(Layer {
        bounds: Rect::new(16, 16, size.width.saturating_sub(32), size.height.saturating_sub(32)),
        color: Rgba8::new(80, 80, 120, 96),
    });
    let banner = stack.push(Layer {
        bounds: Rect::new(0, 40, 160, 24),
        color: banner_color,
    });
    (stack, banner)
}

fn slide_banner(
    compositor: &DisplayCompositor,
    scene: &Mutex<LayerStack>,
    banner: usize,
    step: i32,
) -> Result<()> {
    let moved = {
        let mut stack = scene.lock().unwrap_or_else(PoisonError::into_inner);
        stack.layer_mut(banner).map(|layer| {
            let old = layer.bounds;
            layer.bounds.x = step.wrapping_mul(4) % 480;
            (old, layer.bounds)
        })
    };
    if let Some((old, new)) = moved {
        compositor.invalidate_area(Some(old))?;
        compositor.invalidate_area(Some(new))?;
    }
    Ok(())
}
