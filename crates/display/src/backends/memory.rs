use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use crate::backend::{DisplayMode, Surface, SurfaceError};
use crate::geometry::{Point, Rect, Size};
use crate::pixmap::{Pixmap, Rgba8};

#[derive(Debug, Default)]
struct Presented {
    frame: Pixmap,
    syncs: u64,
}

/// Read handle on the last frame a [`MemorySurface`] presented.
///
/// Clones share the same frame, so a handle taken before the surface is
/// moved into a compositor keeps observing it.
#[derive(Debug, Clone, Default)]
pub struct PresentedFrame {
    inner: Arc<Mutex<Presented>>,
}

impl PresentedFrame {
    /// Copy of the last presented frame.
    #[must_use]
    pub fn snapshot(&self) -> Pixmap {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frame
            .clone()
    }

    /// Pixel of the last presented frame.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frame
            .pixel(x, y)
    }

    /// Number of syncs so far.
    #[must_use]
    pub fn sync_count(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .syncs
    }
}

/// Software frame buffer.
///
/// Writes go to a back buffer; [`Surface::sync`] publishes it to the
/// [`PresentedFrame`].
#[derive(Debug, Default)]
pub struct MemorySurface {
    back: Option<Pixmap>,
    presented: PresentedFrame,
}

impl MemorySurface {
    /// Create an uninitialized surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the presented frame.
    #[must_use]
    pub fn presented(&self) -> PresentedFrame {
        self.presented.clone()
    }

    fn back_mut(&mut self) -> Result<&mut Pixmap, SurfaceError> {
        self.back.as_mut().ok_or(SurfaceError::Uninitialized)
    }
}

impl Surface for MemorySurface {
    fn init(&mut self, size: Size, mode: DisplayMode) -> Result<(), SurfaceError> {
        debug!(target: "display::memory", "init {}x{} {mode:?}", size.width, size.height);
        self.back = Some(Pixmap::filled(size, Rgba8::BLACK));
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), SurfaceError> {
        if self.back.take().is_none() {
            return Err(SurfaceError::Uninitialized);
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<(), SurfaceError> {
        let frame = self.back.as_ref().ok_or(SurfaceError::Uninitialized)?.clone();
        let mut presented = self
            .presented
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        presented.frame = frame;
        presented.syncs = presented.syncs.saturating_add(1);
        Ok(())
    }

    fn put_pixels(&mut self, pixels: &Pixmap, pos: Point) -> Result<(), SurfaceError> {
        self.back_mut()?.copy_from(pixels, pos);
        Ok(())
    }

    fn mix_pixels(&mut self, pixels: &Pixmap, pos: Point) -> Result<(), SurfaceError> {
        self.back_mut()?.blend_from(pixels, pos);
        Ok(())
    }

    fn catch_pixels(&self, rect: Rect) -> Result<Pixmap, SurfaceError> {
        self.back
            .as_ref()
            .map(|back| back.region(rect))
            .ok_or(SurfaceError::Uninitialized)
    }

    fn set_mode(&mut self, size: Size, mode: DisplayMode) -> Result<(), SurfaceError> {
        let old = self.back.take().ok_or(SurfaceError::Uninitialized)?;
        debug!(target: "display::memory", "set_mode {}x{} {mode:?}", size.width, size.height);
        let mut resized = Pixmap::filled(size, Rgba8::BLACK);
        resized.copy_from(&old, Point::default());
        self.back = Some(resized);
        Ok(())
    }

    fn bits_per_pixel(&self) -> u32 {
        32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that writes only become visible on sync.
    ///
    /// # Panics
    /// Panics if the presented frame changes before sync or misses the write.
    #[test]
    fn writes_publish_on_sync() {
        let mut surface = MemorySurface::new();
        let presented = surface.presented();
        assert_eq!(
            surface.sync(),
            Err(SurfaceError::Uninitialized)
        );

        assert_eq!(surface.init(Size::new(4, 4), DisplayMode::Windowed), Ok(()));
        let red = Pixmap::filled(Size::new(2, 2), Rgba8::opaque(255, 0, 0));
        assert_eq!(surface.put_pixels(&red, Point::new(1, 1)), Ok(()));
        assert_eq!(presented.sync_count(), 0);

        assert_eq!(surface.sync(), Ok(()));
        assert_eq!(presented.sync_count(), 1);
        assert_eq!(presented.pixel(1, 1), Some(Rgba8::opaque(255, 0, 0)));
        assert_eq!(presented.pixel(0, 0), Some(Rgba8::BLACK));
    }

    /// Test that re-moding keeps the overlapping content.
    ///
    /// # Panics
    /// Panics if content is lost or the size is wrong.
    #[test]
    fn set_mode_keeps_content() {
        let mut surface = MemorySurface::new();
        assert_eq!(surface.init(Size::new(2, 2), DisplayMode::Windowed), Ok(()));
        let white = Pixmap::filled(Size::new(1, 1), Rgba8::WHITE);
        assert_eq!(surface.put_pixels(&white, Point::default()), Ok(()));
        assert_eq!(surface.set_mode(Size::new(3, 3), DisplayMode::Fullscreen), Ok(()));

        let content = surface.catch_pixels(Rect::new(0, 0, 3, 3));
        assert_eq!(content.as_ref().map(Pixmap::size), Ok(Size::new(3, 3)));
        assert_eq!(
            content.ok().and_then(|pixels| pixels.pixel(0, 0)),
            Some(Rgba8::WHITE)
        );
    }
}
