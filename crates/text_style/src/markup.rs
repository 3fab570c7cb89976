//! Splitting marked-up text into uniformly styled runs.

use core::mem;

use crate::stack::StyleTagStack;
use crate::style::TextStyle;

/// Literal text sharing one effective style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    /// The text with all recognized tags removed.
    pub text: String,
    /// The effective style, or `None` when no tag was open.
    pub style: Option<TextStyle>,
}

/// Split `text` into runs, interpreting `color` and `size` tags.
///
/// A `<` that does not start a recognized tag is kept as a literal character.
/// Tags left open at the end are ignored.
#[must_use]
pub fn parse_markup(text: &str) -> Vec<StyledRun> {
    let chars: Vec<char> = text.chars().collect();
    let mut stack = StyleTagStack::new();
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut style = None;
    let mut cursor = 0;

    while let Some(&ch) = chars.get(cursor) {
        if ch == '<' {
            let scanned = if chars.get(cursor + 1) == Some(&'/') {
                stack.scan_closing_tag(&chars, cursor)
            } else {
                stack.scan_opening_tag(&chars, cursor)
            };
            if let Ok(next) = scanned {
                cursor = next;
                let resolved = stack.effective_style();
                if resolved != style {
                    flush(&mut runs, &mut current, style);
                    style = resolved;
                }
                continue;
            }
        }
        current.push(ch);
        cursor += 1;
    }
    flush(&mut runs, &mut current, style);
    runs
}

fn flush(runs: &mut Vec<StyledRun>, current: &mut String, style: Option<TextStyle>) {
    if current.is_empty() {
        return;
    }
    runs.push(StyledRun {
        text: mem::take(current),
        style,
    });
}
