//! Text style values carried by a text run.
//!
//! A [`TextStyle`] starts out with toolkit defaults. Each setter writes one
//! field and records that the field was set explicitly, so later passes can
//! tell an inherited default from a value chosen by markup.

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its three channels.
    #[inline]
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Identifier of a font family in the font library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

impl FontId {
    /// The font library's default family.
    pub const DEFAULT: Self = Self(0);
}

impl Default for FontId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Slant of the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic glyphs.
    Italic,
    /// Mechanically slanted upright glyphs.
    Oblique,
}

/// Stroke weight of the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Line decoration drawn with the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontDecoration {
    /// No decoration.
    #[default]
    None,
    /// A line below the baseline.
    Underline,
    /// A line above the glyphs.
    Overline,
    /// A line through the middle of the glyphs.
    LineThrough,
}

/// Which fields of a [`TextStyle`] were set explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "One flag per style field is the data model"
)]
pub struct ExplicitFields {
    /// `font_id` was set.
    pub family: bool,
    /// `pixel_size` was set.
    pub pixel_size: bool,
    /// `style` was set.
    pub style: bool,
    /// `weight` was set.
    pub weight: bool,
    /// `decoration` was set.
    pub decoration: bool,
    /// `fore_color` was set.
    pub fore_color: bool,
    /// `back_color` was set.
    pub back_color: bool,
}

/// The resolved attributes of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextStyle {
    /// Font family.
    pub font_id: FontId,
    /// Glyph size in pixels.
    pub pixel_size: u32,
    /// Glyph slant.
    pub style: FontStyle,
    /// Glyph weight.
    pub weight: FontWeight,
    /// Line decoration.
    pub decoration: FontDecoration,
    /// Glyph color.
    pub fore_color: Color,
    /// Color painted behind the glyphs.
    pub back_color: Color,
    /// Fields that were set explicitly rather than defaulted.
    pub explicit: ExplicitFields,
}

impl TextStyle {
    /// Pixel size used when nothing sets one.
    pub const DEFAULT_PIXEL_SIZE: u32 = 12;

    /// Set the font family and mark it explicit.
    #[inline]
    pub fn set_font_family(&mut self, font_id: FontId) {
        self.font_id = font_id;
        self.explicit.family = true;
    }

    /// Set the pixel size and mark it explicit.
    #[inline]
    pub fn set_pixel_size(&mut self, pixel_size: u32) {
        self.pixel_size = pixel_size;
        self.explicit.pixel_size = true;
    }

    /// Set the glyph slant and mark it explicit.
    #[inline]
    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
        self.explicit.style = true;
    }

    /// Set the glyph weight and mark it explicit.
    #[inline]
    pub fn set_weight(&mut self, weight: FontWeight) {
        self.weight = weight;
        self.explicit.weight = true;
    }

    /// Set the line decoration and mark it explicit.
    #[inline]
    pub fn set_decoration(&mut self, decoration: FontDecoration) {
        self.decoration = decoration;
        self.explicit.decoration = true;
    }

    /// Set the glyph color and mark it explicit.
    #[inline]
    pub fn set_fore_color(&mut self, color: Color) {
        self.fore_color = color;
        self.explicit.fore_color = true;
    }

    /// Set the background color and mark it explicit.
    #[inline]
    pub fn set_back_color(&mut self, color: Color) {
        self.back_color = color;
        self.explicit.back_color = true;
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_id: FontId::DEFAULT,
            pixel_size: Self::DEFAULT_PIXEL_SIZE,
            style: FontStyle::Normal,
            weight: FontWeight::Normal,
            decoration: FontDecoration::None,
            fore_color: Color::BLACK,
            back_color: Color::WHITE,
            explicit: ExplicitFields::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that a fresh style carries the toolkit defaults and no explicit flags.
    ///
    /// # Panics
    /// Panics if a default value or flag differs.
    #[test]
    fn defaults_are_not_explicit() {
        let style = TextStyle::default();
        assert_eq!(style.pixel_size, 12);
        assert_eq!(style.fore_color, Color::BLACK);
        assert_eq!(style.back_color, Color::WHITE);
        assert_eq!(style.explicit, ExplicitFields::default());
    }

    /// Test that every setter flips only its own flag.
    ///
    /// # Panics
    /// Panics if a setter leaves its flag unset or touches another one.
    #[test]
    fn setters_mark_fields() {
        let mut style = TextStyle::default();
        style.set_decoration(FontDecoration::Underline);
        assert!(style.explicit.decoration);
        assert!(!style.explicit.weight);

        style.set_weight(FontWeight::Bold);
        style.set_back_color(Color::new(1, 2, 3));
        assert_eq!(style.weight, FontWeight::Bold);
        assert_eq!(style.back_color, Color::new(1, 2, 3));
        assert!(style.explicit.weight);
        assert!(style.explicit.back_color);
        assert!(!style.explicit.fore_color);
    }
}
