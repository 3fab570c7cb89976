//! Pixel-or-point size values used by the `size` tag.

use cssparser::{Parser, ParserInput, Token};

/// Pixels per typographic point at 96 DPI.
const PIXELS_PER_POINT: f32 = 96.0 / 72.0;

/// A length given either in device pixels or typographic points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelOrPoint {
    /// Device pixels.
    Pixels(f32),
    /// Typographic points (1/72 inch).
    Points(f32),
}

impl PixelOrPoint {
    /// The value converted to whole pixels, rounded to nearest.
    #[inline]
    #[must_use]
    pub fn to_pixels(self) -> u32 {
        let px = match self {
            Self::Pixels(value) => value,
            Self::Points(value) => value * PIXELS_PER_POINT,
        };
        px.round().max(0.0) as u32
    }
}

/// Error returned when a size payload is not a pixel-or-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSize;

/// Parse `20`, `20px` or `15pt` into a [`PixelOrPoint`].
///
/// Bare numbers are pixels. Unit names are ASCII case-insensitive.
///
/// # Errors
/// Returns [`InvalidSize`] for negative values, other units, or trailing input.
pub fn parse_pixel_or_point(text: &str) -> Result<PixelOrPoint, InvalidSize> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let token = parser.next().map_err(|_| InvalidSize)?.clone();
    let size = match token {
        Token::Number { value, .. } => PixelOrPoint::Pixels(value),
        Token::Dimension { value, unit, .. } => {
            match unit.as_ref().to_ascii_lowercase().as_str() {
                "px" => PixelOrPoint::Pixels(value),
                "pt" => PixelOrPoint::Points(value),
                _ => return Err(InvalidSize),
            }
        }
        _ => return Err(InvalidSize),
    };
    parser.expect_exhausted().map_err(|_| InvalidSize)?;
    let (PixelOrPoint::Pixels(value) | PixelOrPoint::Points(value)) = size;
    if !value.is_finite() || value < 0.0 {
        return Err(InvalidSize);
    }
    Ok(size)
}
