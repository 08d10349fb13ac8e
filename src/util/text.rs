use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Terminal cells taken by `s`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Shorten `s` to at most `max_cells` cells, ending in `…` when cut.
/// Graphemes are never split.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let Some(room) = max_cells.checked_sub(1) else {
        return String::new();
    };

    let mut used = 0;
    let mut out: String = s
        .graphemes(true)
        .take_while(|g| {
            used += display_width(g);
            used <= room
        })
        .collect();
    out.push(ELLIPSIS);
    out
}

/// Column cell: truncated, then right-padded with spaces to exactly `cells`.
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let cut = truncate_to_width(s, cells);
    let pad = cells.saturating_sub(display_width(&cut));
    format!("{}{}", cut, " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_chars_take_two_cells() {
        assert_eq!(display_width("todo"), 4);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("milk", 10), "milk");
        assert_eq!(truncate_to_width("", 0), "");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        assert_eq!(truncate_to_width("Buy oat milk", 5), "Buy \u{2026}");
        assert_eq!(truncate_to_width("Buy", 1), "\u{2026}");
        assert_eq!(truncate_to_width("Buy", 0), "");
    }

    #[test]
    fn wide_char_that_does_not_fit_is_dropped() {
        // Room for 3 cells before the ellipsis: one 2-cell char fits, the next does not
        assert_eq!(truncate_to_width("日本語", 4), "日\u{2026}");
    }

    #[test]
    fn fit_pads_to_exact_width() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("日本語", 4), "日\u{2026} ");
        assert_eq!(display_width(&fit_to_width("a rather long title", 8)), 8);
    }
}
