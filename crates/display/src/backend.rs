//! Output surface abstraction.
//!
//! A [`Surface`] is the platform side of the display: it owns the frame
//! buffer the compositor writes into. [`Screen`] wraps an optional backend
//! together with the [`ScreenInfo`] snapshot, and reports
//! [`SurfaceError::Unavailable`] for every call made without one.

use core::fmt;
use core::str::FromStr;
use std::error::Error;

use crate::backends::{MemorySurface, NullSurface};
use crate::geometry::{Point, Rect, Size};
use crate::pixmap::Pixmap;

/// How the surface is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// A decorated window.
    #[default]
    Windowed,
    /// The whole screen.
    Fullscreen,
    /// An undecorated window blended with the desktop.
    Seamless,
}

impl FromStr for DisplayMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "windowed" | "window" => Ok(Self::Windowed),
            "fullscreen" => Ok(Self::Fullscreen),
            "seamless" => Ok(Self::Seamless),
            _ => Err(()),
        }
    }
}

/// Snapshot of the screen geometry and format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenInfo {
    /// Surface size in pixels.
    pub size: Size,
    /// Bits per pixel.
    pub bits: u32,
    /// Presentation mode.
    pub mode: DisplayMode,
}

impl ScreenInfo {
    /// Center of the screen, rounded down.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            i32::try_from(self.size.width / 2).unwrap_or(i32::MAX),
            i32::try_from(self.size.height / 2).unwrap_or(i32::MAX),
        )
    }
}

/// Surface errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// No backend is installed.
    Unavailable,
    /// The backend has not been initialized.
    Uninitialized,
    /// The backend rejected the call.
    Backend(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(formatter, "No surface backend available"),
            Self::Uninitialized => write!(formatter, "Surface is not initialized"),
            Self::Backend(msg) => write!(formatter, "Surface backend error: {msg}"),
        }
    }
}

impl Error for SurfaceError {}

/// Trait for output surface backends.
pub trait Surface: fmt::Debug + Send {
    /// Create the frame buffer at the given size and mode.
    fn init(&mut self, size: Size, mode: DisplayMode) -> Result<(), SurfaceError>;

    /// Release the frame buffer.
    fn destroy(&mut self) -> Result<(), SurfaceError>;

    /// Present everything written since the last sync.
    fn sync(&mut self) -> Result<(), SurfaceError>;

    /// Overwrite the frame buffer with `pixels` at `pos`.
    fn put_pixels(&mut self, pixels: &Pixmap, pos: Point) -> Result<(), SurfaceError>;

    /// Composite `pixels` over the frame buffer at `pos`.
    fn mix_pixels(&mut self, pixels: &Pixmap, pos: Point) -> Result<(), SurfaceError>;

    /// Read back the frame buffer content of `rect`.
    fn catch_pixels(&self, rect: Rect) -> Result<Pixmap, SurfaceError>;

    /// Change the frame buffer size and mode.
    fn set_mode(&mut self, size: Size, mode: DisplayMode) -> Result<(), SurfaceError>;

    /// Bits per pixel of the frame buffer.
    fn bits_per_pixel(&self) -> u32;
}

/// Backend variants selectable at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// Software frame buffer in memory.
    #[default]
    Memory,
    /// Discards every frame.
    Null,
}

impl FromStr for BackendKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "memory" | "software" => Ok(Self::Memory),
            "null" | "headless" => Ok(Self::Null),
            _ => Err(()),
        }
    }
}

/// Instantiate the backend for `kind`.
#[must_use]
pub fn create_backend(kind: BackendKind) -> Box<dyn Surface> {
    match kind {
        BackendKind::Memory => Box::new(MemorySurface::new()),
        BackendKind::Null => Box::new(NullSurface::default()),
    }
}

/// The output screen: an optional backend plus the current [`ScreenInfo`].
#[derive(Debug, Default)]
pub struct Screen {
    backend: Option<Box<dyn Surface>>,
    info: ScreenInfo,
}

impl Screen {
    /// Create a screen driven by `backend`.
    #[must_use]
    pub fn new(backend: Box<dyn Surface>) -> Self {
        Self {
            backend: Some(backend),
            info: ScreenInfo::default(),
        }
    }

    /// Create a screen with no backend; every surface call fails.
    #[must_use]
    pub fn without_backend() -> Self {
        Self::default()
    }

    /// Whether a backend is installed.
    #[inline]
    #[must_use]
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    fn backend_mut(&mut self) -> Result<&mut Box<dyn Surface>, SurfaceError> {
        self.backend.as_mut().ok_or(SurfaceError::Unavailable)
    }

    /// Initialize the backend and record the resulting screen info.
    ///
    /// The size and mode are recorded even when the backend is missing, so
    /// geometry queries and invalidation keep working headless.
    ///
    /// # Errors
    /// Returns the backend's error, or [`SurfaceError::Unavailable`].
    pub fn init(&mut self, size: Size, mode: DisplayMode) -> Result<(), SurfaceError> {
        self.info.size = size;
        self.info.mode = mode;
        let backend = self.backend_mut()?;
        backend.init(size, mode)?;
        self.info.bits = backend.bits_per_pixel();
        Ok(())
    }

    /// Release the backend's frame buffer.
    ///
    /// # Errors
    /// Returns the backend's error, or [`SurfaceError::Unavailable`].
    pub fn destroy(&mut self) -> Result<(), SurfaceError> {
        self.backend_mut()?.destroy()
    }

    /// Present the frame.
    ///
    /// # Errors
    /// Returns the backend's error, or [`SurfaceError::Unavailable`].
    pub fn sync(&mut self) -> Result<(), SurfaceError> {
        self.backend_mut()?.sync()
    }

    /// Write pixels at `pos`.
    ///
    /// # Errors
    /// Returns the backend's error, or [`SurfaceError::Unavailable`].
    pub fn put_pixels(&mut self, pixels: &Pixmap, pos: Point) -> Result<(), SurfaceError> {
        self.backend_mut()?.put_pixels(pixels, pos)
    }

    /// Composite pixels at `pos`.
    ///
    /// # Errors
    /// Returns the backend's error, or [`SurfaceError::Unavailable`].
    pub fn mix_pixels(&mut self, pixels: &Pixmap, pos: Point) -> Result<(), SurfaceError> {
        self.backend_mut()?.mix_pixels(pixels, pos)
    }

    /// Read back `rect` from the frame buffer.
    ///
    /// # Errors
    /// Returns the backend's error, or [`SurfaceError::Unavailable`].
    pub fn catch_pixels(&self, rect: Rect) -> Result<Pixmap, SurfaceError> {
        self.backend
            .as_deref()
            .ok_or(SurfaceError::Unavailable)?
            .catch_pixels(rect)
    }

    /// Change the size and mode, updating the screen info on success.
    ///
    /// # Errors
    /// Returns the backend's error, or [`SurfaceError::Unavailable`].
    pub fn set_mode(&mut self, size: Size, mode: DisplayMode) -> Result<(), SurfaceError> {
        let backend = self.backend_mut()?;
        backend.set_mode(size, mode)?;
        let bits = backend.bits_per_pixel();
        self.info = ScreenInfo { size, bits, mode };
        Ok(())
    }

    /// Current screen info snapshot.
    #[inline]
    #[must_use]
    pub const fn info(&self) -> ScreenInfo {
        self.info
    }

    /// Replace the screen info snapshot without touching the backend.
    #[inline]
    pub fn set_info(&mut self, info: ScreenInfo) {
        self.info = info;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that every call on a screen without backend reports unavailability.
    ///
    /// # Panics
    /// Panics if any call succeeds.
    #[test]
    fn missing_backend_is_unavailable() {
        let mut screen = Screen::without_backend();
        let pixels = Pixmap::new(Size::new(1, 1));
        assert_eq!(
            screen.init(Size::new(10, 10), DisplayMode::Windowed),
            Err(SurfaceError::Unavailable)
        );
        assert_eq!(screen.info().size, Size::new(10, 10));
        assert_eq!(screen.sync(), Err(SurfaceError::Unavailable));
        assert_eq!(
            screen.put_pixels(&pixels, Point::default()),
            Err(SurfaceError::Unavailable)
        );
        assert_eq!(
            screen.mix_pixels(&pixels, Point::default()),
            Err(SurfaceError::Unavailable)
        );
        assert_eq!(
            screen.catch_pixels(Rect::new(0, 0, 1, 1)),
            Err(SurfaceError::Unavailable)
        );
        assert_eq!(screen.destroy(), Err(SurfaceError::Unavailable));
    }

    /// Test mode and backend names parse case-insensitively.
    ///
    /// # Panics
    /// Panics if a known name fails to parse.
    #[test]
    fn names_parse() {
        assert_eq!("FullScreen".parse(), Ok(DisplayMode::Fullscreen));
        assert_eq!("null".parse(), Ok(BackendKind::Null));
        assert_eq!("vulkan".parse::<BackendKind>(), Err(()));
    }

    /// Test the center point of an odd-sized screen.
    ///
    /// # Panics
    /// Panics if the center is not rounded down.
    #[test]
    fn center_rounds_down() {
        let info = ScreenInfo {
            size: Size::new(801, 601),
            bits: 32,
            mode: DisplayMode::Windowed,
        };
        assert_eq!(info.center(), Point::new(400, 300));
    }
}
