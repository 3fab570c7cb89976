use crate::backend::{DisplayMode, Surface, SurfaceError};
use crate::geometry::{Point, Rect, Size};
use crate::pixmap::Pixmap;

/// Headless backend that accepts every call and keeps no pixels.
#[derive(Debug, Default)]
pub struct NullSurface {
    size: Size,
    syncs: u64,
}

impl NullSurface {
    /// Size the surface was last initialized or re-moded to.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Number of frames presented so far.
    #[inline]
    #[must_use]
    pub const fn sync_count(&self) -> u64 {
        self.syncs
    }
}

impl Surface for NullSurface {
    fn init(&mut self, size: Size, _mode: DisplayMode) -> Result<(), SurfaceError> {
        self.size = size;
        Ok(())
    }

    fn destroy(&mut self) -> Result<(), SurfaceError> {
        self.size = Size::default();
        Ok(())
    }

    fn sync(&mut self) -> Result<(), SurfaceError> {
        self.syncs = self.syncs.saturating_add(1);
        Ok(())
    }

    fn put_pixels(&mut self, _pixels: &Pixmap, _pos: Point) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn mix_pixels(&mut self, _pixels: &Pixmap, _pos: Point) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn catch_pixels(&self, rect: Rect) -> Result<Pixmap, SurfaceError> {
        Ok(Pixmap::new(rect.size()))
    }

    fn set_mode(&mut self, size: Size, _mode: DisplayMode) -> Result<(), SurfaceError> {
        self.size = size;
        Ok(())
    }

    fn bits_per_pixel(&self) -> u32 {
        32
    }
}
