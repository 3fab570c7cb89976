//! Effective style resolution and markup runs through the public API.

use text_style::{
    Color, PixelOrPoint, StyleTag, StyleTagKind, StyleTagStack, StyledRun, TextStyle,
    parse_markup, scan_closing_tag, scan_opening_tag,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn open(stack: &mut StyleTagStack, markup: &str) {
        let input = chars(markup);
        assert_eq!(stack.scan_opening_tag(&input, 0), Ok(input.len()), "{markup}");
    }

    fn fore_and_size(stack: &StyleTagStack) -> Option<(Color, u32)> {
        stack
            .effective_style()
            .map(|style| (style.fore_color, style.pixel_size))
    }

    /// Test that the most recent tag of each kind decides the style.
    ///
    /// # Panics
    /// Panics if an older tag shadows a newer one or a pop does not restore it.
    #[test]
    fn innermost_tag_of_each_kind_wins() {
        let mut stack = StyleTagStack::new();
        open(&mut stack, "<color=#FF0000>");
        open(&mut stack, "<size=20>");

        let explicit = stack
            .effective_style()
            .map(|style| (style.explicit.fore_color, style.explicit.pixel_size));
        assert_eq!(explicit, Some((true, true)));
        assert_eq!(fore_and_size(&stack), Some((Color::new(255, 0, 0), 20)));

        open(&mut stack, "<color=0,255,0>");
        assert_eq!(fore_and_size(&stack), Some((Color::new(0, 255, 0), 20)));

        assert_eq!(
            stack.pop_matching(StyleTagKind::Color),
            Some(StyleTag::Color(Color::new(0, 255, 0)))
        );
        assert_eq!(fore_and_size(&stack), Some((Color::new(255, 0, 0), 20)));
    }

    /// Test that an empty stack yields no style.
    ///
    /// # Panics
    /// Panics if a style is reported without open tags.
    #[test]
    fn empty_stack_has_no_style() {
        let mut stack = StyleTagStack::new();
        assert_eq!(stack.effective_style(), None);

        stack.push(StyleTag::Size(PixelOrPoint::Pixels(10.0)));
        assert_eq!(
            stack.pop_matching(StyleTagKind::Size),
            Some(StyleTag::Size(PixelOrPoint::Pixels(10.0)))
        );
        assert!(stack.is_empty());
        assert_eq!(stack.effective_style(), None);
    }

    /// Test that closing tag names match their kind ignoring case.
    ///
    /// # Panics
    /// Panics if `</SIZE>` does not close a `size` tag.
    #[test]
    fn closing_tags_match_ignoring_case() {
        let mut stack = StyleTagStack::new();
        open(&mut stack, "<size=14px>");
        let input = chars("</SIZE>tail");
        assert_eq!(stack.scan_closing_tag(&input, 0), Ok(7));
        assert!(stack.is_empty());
    }

    /// Test the free scanners on the documented inputs.
    ///
    /// # Panics
    /// Panics if a scanner decodes or positions wrongly.
    #[test]
    fn free_scanners_follow_the_documented_examples() {
        let opening = chars("<color=#00ff00>rest");
        assert_eq!(
            scan_opening_tag(&opening, 0),
            Ok((StyleTag::Color(Color::new(0, 255, 0)), 15))
        );
        assert_eq!(opening[15..].iter().collect::<String>(), "rest");

        let closing = chars("</color>rest");
        assert_eq!(scan_closing_tag(&closing, 0), Ok(("color".to_owned(), 8)));
        assert_eq!(closing[8..].iter().collect::<String>(), "rest");

        assert!(matches!(scan_closing_tag(&chars("<color>"), 0), Err(_)));
    }

    /// Test that markup is split into runs wherever the style changes.
    ///
    /// # Panics
    /// Panics if the runs differ from the expected split.
    #[test]
    fn markup_splits_runs_at_style_changes() {
        let runs = parse_markup("plain <color=#f00>red <size=20>big</size></color> a<b");

        let mut red = TextStyle::default();
        red.set_fore_color(Color::new(240, 0, 0));
        let mut red_big = red;
        red_big.set_pixel_size(20);

        assert_eq!(
            runs,
            vec![
                StyledRun {
                    text: "plain ".to_owned(),
                    style: None,
                },
                StyledRun {
                    text: "red ".to_owned(),
                    style: Some(red),
                },
                StyledRun {
                    text: "big".to_owned(),
                    style: Some(red_big),
                },
                StyledRun {
                    text: " a<b".to_owned(),
                    style: None,
                },
            ]
        );
    }

    /// Test that text that only looks like a tag stays literal.
    ///
    /// # Panics
    /// Panics if an invalid or unknown tag is consumed.
    #[test]
    fn markup_keeps_unmatched_tags_literal() {
        assert_eq!(
            parse_markup("<size=oops>x</font>"),
            vec![StyledRun {
                text: "<size=oops>x</font>".to_owned(),
                style: None,
            }]
        );
    }
}
