//! Recognition of inline style tags in a character stream.
//!
//! Both scanners are pure: they read an immutable `&[char]` from a cursor and
//! return the decoded tag plus the position right after its closing `>`.
//! Any failure means "this is not a tag here"; callers keep the `<` as
//! literal text and move on by one character.

use core::fmt;
use std::error::Error;

use crate::tag::{StyleTag, StyleTagKind, parse_color_payload};
use crate::units::parse_pixel_or_point;

/// Largest attribute payload accepted, in characters.
pub const MAX_PAYLOAD_LEN: usize = 256;

/// Largest tag name accepted, in characters.
pub const MAX_NAME_LEN: usize = 32;

/// Reason a scan did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// Input at the cursor is not `<` followed by something other than `/`.
    NotAnOpeningTag,
    /// Input at the cursor does not start with `</`.
    NotAClosingTag,
    /// The tag name contains an inner space or a stray `>`.
    MalformedName,
    /// The tag has no name.
    EmptyName,
    /// The tag name is longer than [`MAX_NAME_LEN`].
    NameTooLong,
    /// The tag name is not a known style tag.
    UnknownTag,
    /// Input ended before the tag was closed.
    Unterminated,
    /// The attribute payload is longer than [`MAX_PAYLOAD_LEN`].
    PayloadTooLong,
    /// A `size` payload is not a pixel-or-point value.
    InvalidSize,
}

impl fmt::Display for ScanError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotAnOpeningTag => "not an opening tag",
            Self::NotAClosingTag => "not a closing tag",
            Self::MalformedName => "malformed tag name",
            Self::EmptyName => "empty tag name",
            Self::NameTooLong => "tag name too long",
            Self::UnknownTag => "unknown style tag",
            Self::Unterminated => "tag is not terminated by '>'",
            Self::PayloadTooLong => "tag payload too long",
            Self::InvalidSize => "invalid size value",
        };
        formatter.write_str(message)
    }
}

impl Error for ScanError {}

/// Scan an opening tag such as `<color=#ff0000>` or `<size = 20px>` at `cursor`.
///
/// Spaces may surround the name but not split it. The payload runs from `=`
/// to the first `>`, with spaces dropped.
///
/// # Errors
/// Returns a [`ScanError`] describing why the input is not a recognized
/// opening tag.
pub fn scan_opening_tag(input: &[char], cursor: usize) -> Result<(StyleTag, usize), ScanError> {
    let rest = input.get(cursor..).unwrap_or_default();
    if rest.first() != Some(&'<') || rest.get(1) == Some(&'/') {
        return Err(ScanError::NotAnOpeningTag);
    }

    let mut name = String::new();
    let mut name_len = 0usize;
    let mut name_ended = false;
    let mut idx = 1usize;
    loop {
        let &ch = rest.get(idx).ok_or(ScanError::Unterminated)?;
        idx += 1;
        match ch {
            '=' => break,
            ' ' => {
                if name_len > 0 {
                    name_ended = true;
                }
            }
            '>' => return Err(ScanError::MalformedName),
            _ if name_ended => return Err(ScanError::MalformedName),
            _ => {
                if name_len == MAX_NAME_LEN {
                    return Err(ScanError::NameTooLong);
                }
                name.push(ch);
                name_len += 1;
            }
        }
    }
    if name.is_empty() {
        return Err(ScanError::EmptyName);
    }
    let kind = StyleTagKind::from_name(&name).ok_or(ScanError::UnknownTag)?;

    let mut payload = String::new();
    let mut payload_len = 0usize;
    loop {
        let &ch = rest.get(idx).ok_or(ScanError::Unterminated)?;
        idx += 1;
        match ch {
            '>' => break,
            ' ' => {}
            _ => {
                if payload_len == MAX_PAYLOAD_LEN {
                    return Err(ScanError::PayloadTooLong);
                }
                payload.push(ch);
                payload_len += 1;
            }
        }
    }

    let tag = match kind {
        StyleTagKind::Color => StyleTag::Color(parse_color_payload(&payload)),
        StyleTagKind::Size => StyleTag::Size(
            parse_pixel_or_point(&payload).map_err(|_| ScanError::InvalidSize)?,
        ),
    };
    Ok((tag, cursor + idx))
}

/// Scan a closing tag such as `</color>` at `cursor`, returning its name.
///
/// Spaces anywhere inside the tag are ignored. The name is returned as
/// written; matching it against a kind is up to the caller.
///
/// # Errors
/// Returns a [`ScanError`] if the input does not start with `</`, has no `>`,
/// or the name is empty or too long.
pub fn scan_closing_tag(input: &[char], cursor: usize) -> Result<(String, usize), ScanError> {
    let rest = input.get(cursor..).unwrap_or_default();
    if !rest.starts_with(&['<', '/']) {
        return Err(ScanError::NotAClosingTag);
    }

    let mut name = String::new();
    let mut name_len = 0usize;
    let mut idx = 2usize;
    loop {
        let &ch = rest.get(idx).ok_or(ScanError::Unterminated)?;
        idx += 1;
        match ch {
            '>' => break,
            ' ' => {}
            _ => {
                if name_len == MAX_NAME_LEN {
                    return Err(ScanError::NameTooLong);
                }
                name.push(ch);
                name_len += 1;
            }
        }
    }
    if name.is_empty() {
        return Err(ScanError::EmptyName);
    }
    Ok((name, cursor + idx))
}
