//! Inline style markup for text runs.
//!
//! Text may embed `<color=...>` and `<size=...>` tags. The scanner recognizes
//! them in a character stream, the [`StyleTagStack`] tracks which are open,
//! and [`parse_markup`] turns a whole string into styled runs.

#![forbid(unsafe_code)]

pub mod markup;
pub mod scanner;
pub mod stack;
pub mod style;
pub mod tag;
pub mod units;

pub use markup::{StyledRun, parse_markup};
pub use scanner::{MAX_NAME_LEN, MAX_PAYLOAD_LEN, ScanError, scan_closing_tag, scan_opening_tag};
pub use stack::StyleTagStack;
pub use style::{Color, ExplicitFields, FontDecoration, FontId, FontStyle, FontWeight, TextStyle};
pub use tag::{StyleTag, StyleTagKind, parse_color_payload};
pub use units::{InvalidSize, PixelOrPoint, parse_pixel_or_point};
