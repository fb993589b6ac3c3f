//! Greedy line wrapping for overlay text.
//!
//! Widths are measured in characters, not bytes: taglines routinely carry
//! en-dashes and other multi-byte punctuation, and the renderer lays out
//! glyphs. Pixel metrics are out of scope; the configured widths are tuned
//! to the fonts in use.

/// Split `text` into display lines of at most `max_width` characters.
///
/// Before wrapping, the first `": "` becomes `" - "`. Colon-separated
/// titles ("Topic: Subtitle") read better as a dash clause on a lower
/// third, and the raw colon would otherwise need escaping in the
/// renderer's mini-language.
///
/// Break selection per line, in priority order:
///
/// 1. The right-most `"– "` or `"- "` pair in the window. The dash ends
///    the emitted line; the space after it is consumed.
/// 2. The right-most plain space. The space is consumed, not emitted.
/// 3. No break point at all (a single word wider than the window): cut
///    at exactly `max_width`, consuming nothing.
///
/// A dash break wins even when a plain space sits further right in the
/// window. Lines are never empty; a space in the window's first position
/// is not a usable break and falls through to the hard cut.
///
/// Empty input yields no lines. A `max_width` of zero disables wrapping
/// and returns the text whole; the composer rejects zero widths before
/// calling.
#[must_use]
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let normalized = text.replacen(": ", " - ", 1);
    let chars: Vec<char> = normalized.chars().collect();
    let mut lines = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let rest = &chars[pos..];
        if max_width == 0 || rest.len() <= max_width {
            lines.push(rest.iter().collect());
            break;
        }

        let window = &rest[..max_width];
        match break_index(window) {
            Some(cut) => {
                lines.push(window[..cut].iter().collect());
                pos += cut + 1;
            }
            None => {
                lines.push(window.iter().collect());
                pos += max_width;
            }
        }
    }

    lines
}

/// Index to cut the window at, or `None` for an unsplittable window.
///
/// When `Some(cut)` is returned, `window[cut]` is a space and the break
/// consumes it.
fn break_index(window: &[char]) -> Option<usize> {
    let dash = window
        .windows(2)
        .rposition(|pair| (pair[0] == '–' || pair[0] == '-') && pair[1] == ' ')
        .map(|i| i + 1);
    if dash.is_some() {
        return dash;
    }

    match window.iter().rposition(|&c| c == ' ') {
        // A break here would leave an empty line behind.
        Some(0) | None => None,
        sp => sp,
    }
}
