//! Inline style tags and their payload decoding.

use crate::style::Color;
use crate::units::PixelOrPoint;

/// The category of a style tag, deciding which style field it sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTagKind {
    /// `<color=...>`, sets the foreground color.
    Color,
    /// `<size=...>`, sets the pixel size.
    Size,
}

impl StyleTagKind {
    /// Every kind the stack resolves.
    pub const ALL: [Self; 2] = [Self::Color, Self::Size];

    /// Tag name as written in markup.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Size => "size",
        }
    }

    /// Look up a kind by its exact, case-sensitive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Look up a kind by name ignoring ASCII case.
    #[must_use]
    pub fn from_name_ignore_case(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Position of this kind in [`Self::ALL`].
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Color => 0,
            Self::Size => 1,
        }
    }
}

/// An opened style tag with its decoded payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleTag {
    /// Foreground color.
    Color(Color),
    /// Glyph size.
    Size(PixelOrPoint),
}

impl StyleTag {
    /// The kind of this tag.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> StyleTagKind {
        match self {
            Self::Color(_) => StyleTagKind::Color,
            Self::Size(_) => StyleTagKind::Size,
        }
    }
}

/// Decode a `color` tag payload.
///
/// Accepted forms are `r,g,b` in decimal, `#RGB` where each digit becomes the
/// high nibble of its channel, and `#RRGGBB`. Anything else is black.
/// Decimal channels are clamped to `0..=255`.
#[must_use]
pub fn parse_color_payload(payload: &str) -> Color {
    if payload.matches(',').count() == 2 {
        return parse_decimal_triple(payload).unwrap_or(Color::BLACK);
    }
    payload
        .strip_prefix('#')
        .and_then(parse_hex)
        .unwrap_or(Color::BLACK)
}

fn parse_decimal_triple(payload: &str) -> Option<Color> {
    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(payload.split(',')) {
        let value: i64 = part.trim().parse().ok()?;
        *slot = value.clamp(0, 255) as u8;
    }
    let [red, green, blue] = channels;
    Some(Color::new(red, green, blue))
}

fn parse_hex(digits: &str) -> Option<Color> {
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (slot, idx) in channels.iter_mut().zip(0..3) {
                *slot = u8::from_str_radix(&digits[idx..=idx], 16).ok()? << 4u8;
            }
            let [red, green, blue] = channels;
            Some(Color::new(red, green, blue))
        }
        6 => {
            let red = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let green = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let blue = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some(Color::new(red, green, blue))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the short hex form shifts each nibble instead of doubling it.
    ///
    /// # Panics
    /// Panics if the decoded color differs.
    #[test]
    fn short_hex_shifts_nibbles() {
        assert_eq!(parse_color_payload("#f0a"), Color::new(240, 0, 160));
        assert_eq!(parse_color_payload("#FFF"), Color::new(240, 240, 240));
    }

    /// Test long hex, decimal triples and the black fallback.
    ///
    /// # Panics
    /// Panics if a payload decodes to the wrong color.
    #[test]
    fn long_hex_decimal_and_fallback() {
        assert_eq!(parse_color_payload("#ff00aa"), Color::new(255, 0, 170));
        assert_eq!(parse_color_payload("0,255,0"), Color::new(0, 255, 0));
        assert_eq!(parse_color_payload("300,-5,7"), Color::new(255, 0, 7));
        assert_eq!(parse_color_payload("#ff00a"), Color::BLACK);
        assert_eq!(parse_color_payload("#gg0000"), Color::BLACK);
        assert_eq!(parse_color_payload("red"), Color::BLACK);
        assert_eq!(parse_color_payload("1,2"), Color::BLACK);
        assert_eq!(parse_color_payload("1,x,3"), Color::BLACK);
    }

    /// Test that tag names resolve case-sensitively or not, as asked.
    ///
    /// # Panics
    /// Panics if a name resolves to the wrong kind.
    #[test]
    fn kind_lookup() {
        assert_eq!(StyleTagKind::from_name("size"), Some(StyleTagKind::Size));
        assert_eq!(StyleTagKind::from_name("Size"), None);
        assert_eq!(
            StyleTagKind::from_name_ignore_case("COLOR"),
            Some(StyleTagKind::Color)
        );
    }
}
