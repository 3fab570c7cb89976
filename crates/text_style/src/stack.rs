//! Stack of currently open style tags.

use log::debug;

use crate::scanner::{ScanError, scan_closing_tag, scan_opening_tag};
use crate::style::TextStyle;
use crate::tag::{StyleTag, StyleTagKind};

/// Open style tags in the order they were opened.
///
/// The innermost tag of each kind decides that kind's field in the
/// effective style. Closing a tag removes the innermost open tag of its kind,
/// which need not be the top of the stack.
///
/// The stack is not synchronized; share it across threads only behind a
/// lock held by a single mutator at a time.
#[derive(Debug, Clone, Default)]
pub struct StyleTagStack {
    tags: Vec<StyleTag>,
}

impl StyleTagStack {
    /// Create an empty stack.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Open a tag.
    #[inline]
    pub fn push(&mut self, tag: StyleTag) {
        self.tags.push(tag);
    }

    /// Close the innermost open tag of `kind`, returning it.
    ///
    /// Does nothing and returns `None` when no tag of that kind is open.
    pub fn pop_matching(&mut self, kind: StyleTagKind) -> Option<StyleTag> {
        let idx = self.tags.iter().rposition(|tag| tag.kind() == kind)?;
        Some(self.tags.remove(idx))
    }

    /// Resolve the style produced by the open tags.
    ///
    /// Returns `None` when no open tag contributes a field.
    #[must_use]
    pub fn effective_style(&self) -> Option<TextStyle> {
        let mut style = TextStyle::default();
        let mut resolved = [false; StyleTagKind::ALL.len()];
        let mut resolved_count = 0usize;

        for tag in self.tags.iter().rev() {
            let slot = &mut resolved[tag.kind().index()];
            if *slot {
                continue;
            }
            *slot = true;
            resolved_count += 1;
            match *tag {
                StyleTag::Color(color) => style.set_fore_color(color),
                StyleTag::Size(size) => style.set_pixel_size(size.to_pixels()),
            }
            if resolved_count == StyleTagKind::ALL.len() {
                break;
            }
        }

        (resolved_count > 0).then_some(style)
    }

    /// Scan an opening tag at `cursor` and open it on success.
    ///
    /// # Errors
    /// Returns the [`ScanError`] from the scanner; the stack is unchanged.
    pub fn scan_opening_tag(&mut self, input: &[char], cursor: usize) -> Result<usize, ScanError> {
        let (tag, next) = scan_opening_tag(input, cursor)?;
        debug!(target: "text_style", "open {tag:?} at {cursor}");
        self.push(tag);
        Ok(next)
    }

    /// Scan a closing tag at `cursor` and close the matching kind on success.
    ///
    /// Names match their kind ignoring ASCII case. Closing a kind that has no
    /// open tag still consumes the closing tag.
    ///
    /// # Errors
    /// Returns the scanner's [`ScanError`], or [`ScanError::UnknownTag`] when
    /// the name is not a style tag; the stack is unchanged.
    pub fn scan_closing_tag(&mut self, input: &[char], cursor: usize) -> Result<usize, ScanError> {
        let (name, next) = scan_closing_tag(input, cursor)?;
        let kind = StyleTagKind::from_name_ignore_case(&name).ok_or(ScanError::UnknownTag)?;
        let closed = self.pop_matching(kind);
        debug!(target: "text_style", "close {name} at {cursor}: {closed:?}");
        Ok(next)
    }

    /// Number of open tags.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no tag is open.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Open tags from outermost to innermost.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &StyleTag> {
        self.tags.iter()
    }

    /// Close every tag.
    #[inline]
    pub fn clear(&mut self) {
        self.tags.clear();
    }
}
