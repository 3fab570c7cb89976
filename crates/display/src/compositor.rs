//! The display compositor and its frame loop.
//!
//! A [`DisplayCompositor`] owns the output [`Screen`], the
//! [`DirtyRegionTracker`] and a handle on the scene tree. Once started it runs
//! a dedicated thread that, every frame, recomposes exactly the dirty
//! rectangles, overlays the cursor, writes them to the surface and syncs,
//! then sleeps out the rest of the frame budget.
//!
//! Shutdown is cooperative. [`DisplayCompositor::stop`] flips the shared
//! [`RunToken`], the loop notices at the top of its next iteration, and the
//! caller joins the thread before the surface is destroyed.

use core::mem;
use core::time::Duration;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use tracing::info_span;

use crate::backend::{DisplayMode, Screen, ScreenInfo, SurfaceError};
use crate::config::DEFAULT_FRAME_BUDGET;
use crate::damage::DirtyRegionTracker;
use crate::error::DisplayError;
use crate::geometry::{Point, Rect, Size};
use crate::pixmap::Pixmap;
use crate::scene::{CursorOverlay, SharedScene};
use crate::scheduler::{FpsGauge, FrameScheduler};

/// Lifecycle of a [`DisplayCompositor`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Never started.
    Uninitialized = 0,
    /// The frame loop is running.
    Running = 1,
    /// Stop was requested; the loop finishes its current frame.
    Stopping = 2,
    /// The loop has been joined and the surface released.
    Stopped = 3,
}

impl RunState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Stopping,
            3 => Self::Stopped,
            _ => Self::Uninitialized,
        }
    }
}

/// Run state shared between the compositor and its frame loop.
#[derive(Debug, Clone)]
pub struct RunToken {
    state: Arc<AtomicU8>,
}

impl Default for RunToken {
    fn default() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(RunState::Uninitialized as u8)),
        }
    }
}

impl RunToken {
    /// Current state.
    #[inline]
    #[must_use]
    pub fn get(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    fn set(&self, state: RunState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Whether the loop should keep running.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.get() == RunState::Running
    }
}

/// Work run at the start of every frame, before dirty regions are drained.
///
/// Hooks stand in for the toolkit's widget pass: they may invalidate regions
/// on the tracker and report whether they did anything that must be
/// presented even if no region ends up dirty.
pub trait FrameHook: Send {
    /// Run the hook; return `true` if the frame must be synced.
    fn before_frame(&mut self, tracker: &DirtyRegionTracker) -> bool;
}

/// What one frame pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Number of dirty rectangles recomposed.
    pub regions: usize,
    /// Whether any hook reported work.
    pub hooks_did_work: bool,
    /// Whether the surface was synced successfully.
    pub synced: bool,
}

/// One frame's worth of compositing, independent of the loop thread.
#[derive(Clone)]
pub struct FramePass {
    tracker: Arc<DirtyRegionTracker>,
    scene: SharedScene,
    cursor: Option<Arc<dyn CursorOverlay>>,
    screen: Arc<Mutex<Screen>>,
}

impl FramePass {
    /// Assemble a frame pass from its collaborators.
    #[must_use]
    pub fn new(
        tracker: Arc<DirtyRegionTracker>,
        scene: SharedScene,
        cursor: Option<Arc<dyn CursorOverlay>>,
        screen: Arc<Mutex<Screen>>,
    ) -> Self {
        Self {
            tracker,
            scene,
            cursor,
            screen,
        }
    }

    fn lock_screen(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run hooks, recompose every dirty rectangle, write it out and sync.
    ///
    /// Surface failures are logged and the frame carries on.
    pub fn run(&self, hooks: &mut [Box<dyn FrameHook>]) -> FrameReport {
        let _span = info_span!("display.frame").entered();
        let mut hooks_did_work = false;
        for hook in hooks.iter_mut() {
            hooks_did_work |= hook.before_frame(&self.tracker);
        }

        let rects = self.tracker.drain_all();
        for rect in &rects {
            let pixels = self.compose_region(*rect);
            if let Err(err) = self.lock_screen().put_pixels(&pixels, rect.origin()) {
                report_surface_error("put_pixels", &err);
            }
        }

        let mut synced = false;
        if !rects.is_empty() || hooks_did_work {
            match self.lock_screen().sync() {
                Ok(()) => synced = true,
                Err(err) => report_surface_error("sync", &err),
            }
        }
        FrameReport {
            regions: rects.len(),
            hooks_did_work,
            synced,
        }
    }

    /// Compose the on-screen content of `rect`: scene first, cursor on top.
    ///
    /// The scene-tree lock is held only while the scene composes.
    #[must_use]
    pub fn compose_region(&self, rect: Rect) -> Pixmap {
        let _span = info_span!(
            "display.compose_region",
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height
        )
        .entered();
        let mut pixels = Pixmap::new(rect.size());
        {
            let scene = self.scene.lock().unwrap_or_else(PoisonError::into_inner);
            scene.compose(&mut pixels, rect);
        }
        if let Some(cursor) = self.cursor.as_deref() {
            if cursor.is_visible() && cursor.intersects(rect) {
                let offset = cursor.position().relative_to(rect.origin());
                cursor.blend_into(&mut pixels, offset);
            }
        }
        pixels
    }
}

fn report_surface_error(operation: &str, err: &SurfaceError) {
    if *err == SurfaceError::Unavailable {
        debug!(target: "display::compositor", "{operation} skipped: {err}");
    } else {
        warn!(target: "display::compositor", "{operation} failed: {err}");
    }
}

fn frame_loop(
    pass: FramePass,
    token: RunToken,
    mut scheduler: FrameScheduler,
    mut hooks: Vec<Box<dyn FrameHook>>,
) -> Vec<Box<dyn FrameHook>> {
    info!(
        target: "display::compositor",
        "frame loop started, budget {:?}",
        scheduler.budget()
    );
    while token.is_running() {
        pass.run(&mut hooks);
        scheduler.wait_remainder();
    }
    info!(
        target: "display::compositor",
        "frame loop exiting at {:.1} fps, {} overrun frames",
        scheduler.current_fps(),
        scheduler.overruns()
    );
    hooks
}

/// Owner of the display: screen, dirty regions, scene handle and frame loop.
pub struct DisplayCompositor {
    pass: FramePass,
    token: RunToken,
    frame_budget: Duration,
    hooks: Vec<Box<dyn FrameHook>>,
    thread: Option<JoinHandle<Vec<Box<dyn FrameHook>>>>,
    fps: FpsGauge,
}

impl DisplayCompositor {
    /// Create a stopped compositor drawing `scene` onto `screen`.
    #[must_use]
    pub fn new(screen: Screen, scene: SharedScene) -> Self {
        let size = screen.info().size;
        Self {
            pass: FramePass::new(
                Arc::new(DirtyRegionTracker::new(size)),
                scene,
                None,
                Arc::new(Mutex::new(screen)),
            ),
            token: RunToken::default(),
            frame_budget: DEFAULT_FRAME_BUDGET,
            hooks: Vec::new(),
            thread: None,
            fps: FpsGauge::default(),
        }
    }

    /// Draw `cursor` over the scene.
    #[must_use]
    pub fn with_cursor(mut self, cursor: Arc<dyn CursorOverlay>) -> Self {
        self.pass.cursor = Some(cursor);
        self
    }

    /// Use `budget` as the minimum frame duration from the next start.
    #[must_use]
    pub fn with_frame_budget(mut self, budget: Duration) -> Self {
        self.frame_budget = budget;
        self
    }

    /// Register a per-frame hook. Hooks added while running apply from the
    /// next start.
    pub fn add_hook(&mut self, hook: Box<dyn FrameHook>) {
        self.hooks.push(hook);
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.token.get()
    }

    fn require_running(&self, operation: &'static str) -> Result<(), DisplayError> {
        match self.token.get() {
            RunState::Running => Ok(()),
            state => Err(DisplayError::InvalidState { operation, state }),
        }
    }

    fn lock_screen(&self) -> MutexGuard<'_, Screen> {
        self.pass.lock_screen()
    }

    /// Forget rectangles left from a previous run and mark all of `size` dirty.
    fn reset_damage(&self, size: Size) {
        self.pass.tracker.clear();
        self.pass.tracker.resize(size);
        self.pass.tracker.invalidate(None);
    }

    /// Initialize the surface at `size` and `mode` and start the frame loop.
    ///
    /// The whole screen is marked dirty so the first frame paints
    /// everything. A screen without backend still starts; its surface calls
    /// fail and are logged each frame.
    ///
    /// # Errors
    /// Returns [`DisplayError::InvalidState`] if already running,
    /// [`DisplayError::Surface`] if the backend fails to initialize and
    /// [`DisplayError::Spawn`] if the thread cannot be created.
    pub fn start(&mut self, size: Size, mode: DisplayMode) -> Result<(), DisplayError> {
        let state = self.token.get();
        if matches!(state, RunState::Running | RunState::Stopping) {
            return Err(DisplayError::InvalidState {
                operation: "start",
                state,
            });
        }

        match self.lock_screen().init(size, mode) {
            Ok(()) => {}
            Err(SurfaceError::Unavailable) => {
                warn!(target: "display::compositor", "starting without a surface backend");
            }
            Err(err) => return Err(err.into()),
        }
        self.reset_damage(size);

        let scheduler = FrameScheduler::new(self.frame_budget);
        self.fps = scheduler.fps_gauge();
        let pass = self.pass.clone();
        let token = self.token.clone();
        let hooks = mem::take(&mut self.hooks);

        self.token.set(RunState::Running);
        let spawned = thread::Builder::new()
            .name("display-compositor".to_owned())
            .spawn(move || frame_loop(pass, token, scheduler, hooks));
        match spawned {
            Ok(handle) => {
                self.thread = Some(handle);
                info!(
                    target: "display::compositor",
                    "display started at {}x{} {mode:?}",
                    size.width,
                    size.height
                );
                Ok(())
            }
            Err(err) => {
                self.token.set(RunState::Stopped);
                if let Err(destroy_err) = self.lock_screen().destroy() {
                    report_surface_error("destroy", &destroy_err);
                }
                Err(DisplayError::Spawn(err))
            }
        }
    }

    /// Stop the frame loop, wait for it to exit and release the surface.
    ///
    /// # Errors
    /// Returns [`DisplayError::InvalidState`] if not running,
    /// [`DisplayError::LoopPanicked`] if the loop thread panicked and
    /// [`DisplayError::Surface`] if the backend fails to release. The
    /// compositor ends up stopped in every case but the first.
    pub fn stop(&mut self) -> Result<(), DisplayError> {
        self.require_running("stop")?;
        self.token.set(RunState::Stopping);

        let mut result = Ok(());
        if let Some(handle) = self.thread.take() {
            match handle.join() {
                Ok(hooks) => self.hooks = hooks,
                Err(_) => result = Err(DisplayError::LoopPanicked),
            }
        }

        match self.lock_screen().destroy() {
            Ok(()) | Err(SurfaceError::Unavailable) => {}
            Err(err) => {
                if result.is_ok() {
                    result = Err(err.into());
                }
            }
        }
        self.token.set(RunState::Stopped);
        info!(target: "display::compositor", "display stopped");
        result
    }

    /// Mark a region dirty; `None` marks the whole screen.
    ///
    /// Returns whether anything was queued after clamping.
    ///
    /// # Errors
    /// Returns [`DisplayError::InvalidState`] if the display is not running.
    pub fn invalidate_area(&self, rect: Option<Rect>) -> Result<bool, DisplayError> {
        self.require_running("invalidate")?;
        Ok(self.pass.tracker.invalidate(rect))
    }

    /// Shared handle on the dirty region tracker for other threads.
    ///
    /// Unlike [`invalidate_area`](Self::invalidate_area) this does not check
    /// the run state.
    #[must_use]
    pub fn tracker(&self) -> Arc<DirtyRegionTracker> {
        Arc::clone(&self.pass.tracker)
    }

    /// Shared handle on the scene tree.
    ///
    /// The handle only composes. Mutators keep their own typed
    /// `Arc<Mutex<S>>` and pass a clone of it as the [`SharedScene`]; both
    /// lock the same mutex.
    #[must_use]
    pub fn scene(&self) -> SharedScene {
        Arc::clone(&self.pass.scene)
    }

    /// Change the surface size and mode, then repaint everything.
    ///
    /// # Errors
    /// Returns [`DisplayError::InvalidState`] if not running and
    /// [`DisplayError::Surface`] if the backend refuses the mode.
    pub fn set_mode(&self, size: Size, mode: DisplayMode) -> Result<(), DisplayError> {
        self.require_running("set mode")?;
        self.lock_screen().set_mode(size, mode)?;
        self.pass.tracker.resize(size);
        self.pass.tracker.invalidate(None);
        Ok(())
    }

    /// Read back what the surface currently holds for `rect`.
    ///
    /// # Errors
    /// Returns [`DisplayError::InvalidState`] if not running and
    /// [`DisplayError::Surface`] if the backend cannot read back.
    pub fn catch_pixels(&self, rect: Rect) -> Result<Pixmap, DisplayError> {
        self.require_running("read back")?;
        Ok(self.lock_screen().catch_pixels(rect)?)
    }

    /// Snapshot of the screen info.
    #[must_use]
    pub fn screen_info(&self) -> ScreenInfo {
        self.lock_screen().info()
    }

    /// Replace the screen info snapshot; clamping follows the new size.
    pub fn set_screen_info(&self, info: ScreenInfo) {
        self.lock_screen().set_info(info);
        self.pass.tracker.resize(info.size);
    }

    /// Screen width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.screen_info().size.width
    }

    /// Screen height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.screen_info().size.height
    }

    /// Screen size in pixels.
    #[must_use]
    pub fn size(&self) -> Size {
        self.screen_info().size
    }

    /// Bits per pixel of the surface.
    #[must_use]
    pub fn bits(&self) -> u32 {
        self.screen_info().bits
    }

    /// Presentation mode.
    #[must_use]
    pub fn mode(&self) -> DisplayMode {
        self.screen_info().mode
    }

    /// Center of the screen.
    #[must_use]
    pub fn center(&self) -> Point {
        self.screen_info().center()
    }

    /// Frames per second achieved by the running loop.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps.get()
    }

    /// Handle for reading the FPS from other threads; valid until the next start.
    #[must_use]
    pub fn fps_gauge(&self) -> FpsGauge {
        self.fps.clone()
    }
}

impl Drop for DisplayCompositor {
    fn drop(&mut self) {
        if self.token.is_running() {
            if let Err(err) = self.stop() {
                warn!(target: "display::compositor", "failed to stop display on drop: {err}");
            }
        }
    }
}
