//! Scene graph and cursor overlay contracts consumed by the compositor.
//!
//! The real layer tree and cursor tracking live outside this crate. The
//! [`LayerStack`] and [`SpriteCursor`] types are small reference
//! implementations used by headless runs and tests.

use std::sync::{Arc, Mutex, PoisonError};

use crate::geometry::{Point, Rect};
use crate::pixmap::{Pixmap, Rgba8};

/// Source of composed pixel content.
pub trait SceneGraph {
    /// Fill `target` with the composed content of `rect`.
    ///
    /// `target` has the size of `rect`; its pixel `(0, 0)` maps to
    /// `rect.origin()` on screen.
    fn compose(&self, target: &mut Pixmap, rect: Rect);
}

/// The scene tree shared between its mutators and the compositor.
///
/// The mutex is the scene-tree lock: the compositor holds it only while it
/// composes a region.
pub type SharedScene = Arc<Mutex<dyn SceneGraph + Send>>;

/// Wrap a scene for sharing with a compositor.
pub fn share_scene(scene: impl SceneGraph + Send + 'static) -> SharedScene {
    Arc::new(Mutex::new(scene))
}

/// Pointer overlay drawn on top of the scene.
pub trait CursorOverlay: Send + Sync {
    /// Whether the cursor is currently drawn.
    fn is_visible(&self) -> bool;

    /// Top-left corner of the cursor image on screen.
    fn position(&self) -> Point;

    /// Whether the cursor image overlaps `rect`.
    fn intersects(&self, rect: Rect) -> bool;

    /// Blend the cursor image into `target` with its corner at `offset`.
    fn blend_into(&self, target: &mut Pixmap, offset: Point);
}

/// A solid layer of a [`LayerStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    /// Screen area covered.
    pub bounds: Rect,
    /// Fill color, composited over the layers below.
    pub color: Rgba8,
}

/// Flat scene of solid layers over a background, bottom to top.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    background: Rgba8,
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Create an empty scene showing `background`.
    #[must_use]
    pub const fn new(background: Rgba8) -> Self {
        Self {
            background,
            layers: Vec::new(),
        }
    }

    /// Add a layer on top, returning its index.
    pub fn push(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Mutable access to a layer by index.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Layers from bottom to top.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Change the background.
    pub fn set_background(&mut self, background: Rgba8) {
        self.background = background;
    }
}

impl SceneGraph for LayerStack {
    fn compose(&self, target: &mut Pixmap, rect: Rect) {
        target.fill(self.background);
        for layer in &self.layers {
            let Some(visible) = layer.bounds.intersection(rect) else {
                continue;
            };
            let local = Rect::from_origin_size(
                visible.origin().relative_to(rect.origin()),
                visible.size(),
            );
            target.blend_rect(local, layer.color);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CursorState {
    position: Point,
    visible: bool,
}

/// Cursor drawn from a sprite at a movable position.
#[derive(Debug)]
pub struct SpriteCursor {
    sprite: Pixmap,
    state: Mutex<CursorState>,
}

impl SpriteCursor {
    /// Create a visible cursor at the origin.
    #[must_use]
    pub const fn new(sprite: Pixmap) -> Self {
        Self {
            sprite,
            state: Mutex::new(CursorState {
                position: Point::new(0, 0),
                visible: true,
            }),
        }
    }

    fn state(&self) -> CursorState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the cursor, returning the screen areas to repaint: the old and
    /// the new sprite rectangle.
    pub fn move_to(&self, position: Point) -> [Rect; 2] {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let old = Rect::from_origin_size(state.position, self.sprite.size());
        state.position = position;
        [old, Rect::from_origin_size(position, self.sprite.size())]
    }

    /// Show or hide the cursor.
    pub fn set_visible(&self, visible: bool) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .visible = visible;
    }

    /// Screen area currently covered by the sprite.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.state().position, self.sprite.size())
    }
}

impl CursorOverlay for SpriteCursor {
    fn is_visible(&self) -> bool {
        self.state().visible
    }

    fn position(&self) -> Point {
        self.state().position
    }

    fn intersects(&self, rect: Rect) -> bool {
        self.bounds().intersects(rect)
    }

    fn blend_into(&self, target: &mut Pixmap, offset: Point) {
        target.blend_from(&self.sprite, offset);
    }
}
