//! Owned RGBA pixel buffers with minimal blit and blend support.

use bytemuck::{Pod, Zeroable};

use crate::geometry::{Point, Rect, Size};

/// One 8-bit RGBA pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba8 {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Straight (non-premultiplied) alpha.
    pub alpha: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Create a pixel from all four channels.
    #[inline]
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create an opaque pixel.
    #[inline]
    #[must_use]
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Composite `self` over `dst` (straight alpha, source-over).
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        let src_alpha = u32::from(self.alpha);
        if src_alpha == 255 {
            return self;
        }
        if src_alpha == 0 {
            return dst;
        }
        let inv = 255 - src_alpha;
        let mix = |src: u8, dst_channel: u8| -> u8 {
            ((u32::from(src) * src_alpha + u32::from(dst_channel) * inv + 127) / 255) as u8
        };
        Self {
            red: mix(self.red, dst.red),
            green: mix(self.green, dst.green),
            blue: mix(self.blue, dst.blue),
            alpha: (src_alpha + (u32::from(dst.alpha) * inv + 127) / 255) as u8,
        }
    }
}

/// A rectangular buffer of [`Rgba8`] pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pixmap {
    size: Size,
    pixels: Vec<Rgba8>,
}

impl Pixmap {
    /// Create a transparent pixmap.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self::filled(size, Rgba8::TRANSPARENT)
    }

    /// Create a pixmap filled with `color`.
    #[must_use]
    pub fn filled(size: Size, color: Rgba8) -> Self {
        Self {
            size,
            pixels: vec![color; size.area() as usize],
        }
    }

    /// Dimensions of the buffer.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height
    }

    /// Raw pixels, row-major.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Pixels viewed as RGBA bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    /// Overwrite the pixel at `(x, y)`; ignored outside the buffer.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Fill the whole buffer.
    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    /// Composite a solid `color` over the part of `rect` inside the buffer.
    pub fn blend_rect(&mut self, rect: Rect, color: Rgba8) {
        let Some(area) = rect.clamp_to(self.size) else {
            return;
        };
        for row in area.y..area.bottom() {
            let start = self.row_offset(row as u32) + area.x as usize;
            for dst in &mut self.pixels[start..start + area.width as usize] {
                *dst = color.over(*dst);
            }
        }
    }

    /// Copy `src` into this buffer with its top-left corner at `at`, clipped.
    pub fn copy_from(&mut self, src: &Self, at: Point) {
        self.combine(src, at, |src_pixel, _| src_pixel);
    }

    /// Composite `src` over this buffer with its top-left corner at `at`, clipped.
    pub fn blend_from(&mut self, src: &Self, at: Point) {
        self.combine(src, at, Rgba8::over);
    }

    /// Copy out the region `rect`; parts outside the buffer come back transparent.
    #[must_use]
    pub fn region(&self, rect: Rect) -> Self {
        let mut out = Self::new(rect.size());
        out.copy_from(self, Point::new(0, 0).relative_to(rect.origin()));
        out
    }

    fn combine(&mut self, src: &Self, at: Point, op: impl Fn(Rgba8, Rgba8) -> Rgba8) {
        let placed = Rect::from_origin_size(at, src.size);
        let Some(area) = placed.clamp_to(self.size) else {
            return;
        };
        let src_x = (area.x - at.x) as usize;
        for row in area.y..area.bottom() {
            let src_row = (row - at.y) as u32;
            let dst_start = self.row_offset(row as u32) + area.x as usize;
            let src_start = src.row_offset(src_row) + src_x;
            let width = area.width as usize;
            let dst_span = &mut self.pixels[dst_start..dst_start + width];
            let src_span = &src.pixels[src_start..src_start + width];
            for (dst, &src_pixel) in dst_span.iter_mut().zip(src_span) {
                *dst = op(src_pixel, *dst);
            }
        }
    }

    #[inline]
    fn row_offset(&self, row: u32) -> usize {
        row as usize * self.size.width as usize
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height).then(|| self.row_offset(y) + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that copies are clipped at every edge.
    ///
    /// # Panics
    /// Panics if pixels land outside the overlap or the overlap is missed.
    #[test]
    fn copy_clips_to_destination() {
        let mut dst = Pixmap::new(Size::new(4, 4));
        let src = Pixmap::filled(Size::new(3, 3), Rgba8::WHITE);
        dst.copy_from(&src, Point::new(-1, 2));
        assert_eq!(dst.pixel(0, 2), Some(Rgba8::WHITE));
        assert_eq!(dst.pixel(1, 3), Some(Rgba8::WHITE));
        assert_eq!(dst.pixel(2, 2), Some(Rgba8::TRANSPARENT));
        assert_eq!(dst.pixel(0, 1), Some(Rgba8::TRANSPARENT));
    }

    /// Test source-over blending of a half transparent pixel.
    ///
    /// # Panics
    /// Panics if the blended channels are off.
    #[test]
    fn half_alpha_blend() {
        let out = Rgba8::new(255, 0, 0, 128).over(Rgba8::opaque(0, 0, 255));
        assert_eq!(out, Rgba8::new(128, 0, 127, 255));
    }

    /// Test that reading a region partly outside the buffer pads with transparency.
    ///
    /// # Panics
    /// Panics if the region content is wrong.
    #[test]
    fn region_pads_outside() {
        let src = Pixmap::filled(Size::new(2, 2), Rgba8::BLACK);
        let out = src.region(Rect::new(1, 1, 2, 2));
        assert_eq!(out.pixel(0, 0), Some(Rgba8::BLACK));
        assert_eq!(out.pixel(1, 1), Some(Rgba8::TRANSPARENT));
        assert_eq!(out.as_bytes().len(), 16);
    }
}
