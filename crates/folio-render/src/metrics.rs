//! # Font Metrics
//!
//! Advance widths for the built-in Helvetica faces (Adobe AFM, units of
//! 1/1000 em) so the layout can right-align and clip without loading a font
//! file. Only printable ASCII is measured; [`sanitize`] maps everything else
//! onto it before text reaches the page.

/// The faces the invoice uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
}

/// Helvetica, chars 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :;<=>?@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [\]^_`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {|}~
];

/// Helvetica-Bold, chars 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :;<=>?@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [\]^_`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {|}~
];

/// Marker appended to clipped text.
pub const ELLIPSIS: &str = "...";

fn advance(c: char, face: FontFace) -> u16 {
    let table = match face {
        FontFace::Regular | FontFace::Oblique => &HELVETICA,
        FontFace::Bold => &HELVETICA_BOLD,
    };
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        // Sanitized text never gets here; measure as '?'.
        table[('?' as u32 - 0x20) as usize]
    }
}

/// Width of `text` in points at `size`.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| advance(c, face) as u32).sum();
    units as f32 * size / 1000.0
}

/// Cuts `text` so it fits in `max_width`, ending in `...` when anything
/// was removed. Never wraps.
pub fn clip_to_width(text: &str, face: FontFace, size: f32, max_width: f32) -> String {
    if text_width(text, face, size) <= max_width {
        return text.to_string();
    }

    let budget = max_width - text_width(ELLIPSIS, face, size);
    if budget <= 0.0 {
        return String::new();
    }

    let mut clipped = String::new();
    let mut used = 0.0;
    for c in text.chars() {
        let w = advance(c, face) as f32 * size / 1000.0;
        if used + w > budget {
            break;
        }
        used += w;
        clipped.push(c);
    }

    let mut clipped = clipped.trim_end().to_string();
    clipped.push_str(ELLIPSIS);
    clipped
}

/// Maps text onto the printable ASCII the built-in fonts can show.
///
/// Whitespace runs collapse to one space, common currency symbols become
/// their codes, and anything else unprintable becomes `?`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !last_space && !out.is_empty() {
                out.push(' ');
            }
            last_space = true;
            continue;
        }
        last_space = false;

        match c {
            ' '..='~' => out.push(c),
            '€' => out.push_str("EUR"),
            '£' => out.push_str("GBP"),
            '₹' => out.push_str("INR"),
            '¥' => out.push_str("JPY"),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            '–' | '—' => out.push('-'),
            '…' => out.push_str(ELLIPSIS),
            _ if c.is_control() => {}
            _ => out.push('?'),
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        // "INVOICE" bold: I278 N722 V667 O778 I278 C722 E667 = 4112
        let w = text_width("INVOICE", FontFace::Bold, 10.0);
        assert!((w - 41.12).abs() < 1e-3);
        assert!((text_width(" ", FontFace::Regular, 1000.0) - 278.0).abs() < 1e-3);
        assert_eq!(text_width("", FontFace::Regular, 12.0), 0.0);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Colour grading and final export";
        assert!(text_width(text, FontFace::Bold, 9.0) > text_width(text, FontFace::Regular, 9.0));
        assert_eq!(
            text_width(text, FontFace::Oblique, 9.0),
            text_width(text, FontFace::Regular, 9.0)
        );
    }

    #[test]
    fn test_clip_leaves_short_text_alone() {
        assert_eq!(clip_to_width("Edit", FontFace::Regular, 9.0, 200.0), "Edit");
    }

    #[test]
    fn test_clip_fits_and_marks() {
        let long = "A very long service description that cannot possibly fit";
        let clipped = clip_to_width(long, FontFace::Regular, 9.0, 80.0);

        assert!(clipped.ends_with(ELLIPSIS));
        assert!(text_width(&clipped, FontFace::Regular, 9.0) <= 80.0);
        assert!(long.starts_with(clipped.trim_end_matches(ELLIPSIS)));
    }

    #[test]
    fn test_clip_too_narrow_is_empty() {
        assert_eq!(clip_to_width("Hello", FontFace::Regular, 9.0, 2.0), "");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("€ 120"), "EUR 120");
        assert_eq!(sanitize("Café\n  Résumé"), "Caf? R?sum?");
        assert_eq!(sanitize("  Tab\tbed  "), "Tab bed");
        assert_eq!(sanitize("“quoted” – ok"), "\"quoted\" - ok");
    }
}
