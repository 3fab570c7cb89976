//! Display compositor with dirty-region repainting.
//!
//! Callers mark screen rectangles dirty through a [`DirtyRegionTracker`].
//! A [`DisplayCompositor`] thread wakes once per frame budget, recomposes
//! only those rectangles from the [`SceneGraph`], draws the cursor on top
//! and pushes the result to a [`Surface`] backend.

pub mod backend;
pub mod backends;
pub mod compositor;
pub mod config;
pub mod damage;
pub mod error;
pub mod geometry;
pub mod pixmap;
pub mod scene;
pub mod scheduler;

pub use backend::{BackendKind, DisplayMode, Screen, ScreenInfo, Surface, SurfaceError, create_backend};
pub use compositor::{DisplayCompositor, FrameHook, FramePass, FrameReport, RunState, RunToken};
pub use config::{DEFAULT_FRAME_BUDGET, DisplayConfig};
pub use damage::DirtyRegionTracker;
pub use error::DisplayError;
pub use geometry::{Point, Rect, Size};
pub use pixmap::{Pixmap, Rgba8};
pub use scene::{CursorOverlay, Layer, LayerStack, SceneGraph, SharedScene, SpriteCursor, share_scene};
pub use scheduler::{FpsGauge, FrameScheduler};
