//! Terminal text sanitization for server-provided strings.
//!
//! Topics, masked phrases, player names and error messages all arrive over
//! the network. Terminal emulators act on escape sequences (OSC 52 clipboard
//! writes, OSC 8 hyperlinks, CSI cursor movement), so every sequence and
//! every other control character is removed before display. Line breaks and
//! tabs collapse into a single space: everything the game shows is one line.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
/// C1 single-character equivalents of `ESC [`, `ESC ]` and ST.
const C1_CSI: char = '\u{009b}';
const C1_OSC: char = '\u{009d}';
const C1_ST: char = '\u{009c}';

#[derive(Clone, Copy)]
enum Scan {
    Text,
    /// Saw ESC, deciding which sequence follows.
    Escape,
    /// Charset designation and similar: exactly one more char to drop.
    Designator,
    /// CSI parameters up to a final byte in `@`..=`~`.
    Csi,
    /// OSC/DCS/PM/APC payload, ended by BEL or ST.
    Payload,
    /// ESC seen inside a payload; `\` completes ST.
    PayloadEscape,
}

/// Strip escape sequences and control characters for safe one-line display.
///
/// Returns `Cow::Borrowed` when the input is already clean.
///
/// ```
/// use fortuna_types::sanitize_terminal_text;
///
/// assert_eq!(sanitize_terminal_text("Famous\x1b[2J quotes"), "Famous quotes");
/// assert_eq!(sanitize_terminal_text("two\nlines"), "two lines");
/// ```
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(char::is_control) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut state = Scan::Text;
    for c in input.chars() {
        state = match state {
            Scan::Text => match c {
                ESC => Scan::Escape,
                C1_CSI => Scan::Csi,
                C1_OSC | '\u{0090}' | '\u{009e}' | '\u{009f}' => Scan::Payload,
                '\n' | '\r' | '\t' => {
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    Scan::Text
                }
                c if c.is_control() => Scan::Text,
                c => {
                    out.push(c);
                    Scan::Text
                }
            },
            Scan::Escape => match c {
                '[' => Scan::Csi,
                ']' | 'P' | '^' | '_' | 'X' => Scan::Payload,
                '(' | ')' | '*' | '+' | '#' | '%' => Scan::Designator,
                _ => Scan::Text,
            },
            Scan::Designator => Scan::Text,
            Scan::Csi => {
                if ('@'..='~').contains(&c) {
                    Scan::Text
                } else {
                    Scan::Csi
                }
            }
            Scan::Payload => match c {
                BEL | C1_ST => Scan::Text,
                ESC => Scan::PayloadEscape,
                _ => Scan::Payload,
            },
            Scan::PayloadEscape => match c {
                '\\' => Scan::Text,
                _ => Scan::Payload,
            },
        };
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::sanitize_terminal_text;

    #[test]
    fn clean_text_is_borrowed() {
        let clean = "Proverbi italiani";
        assert!(matches!(sanitize_terminal_text(clean), Cow::Borrowed(_)));
    }

    #[test]
    fn strips_csi_sequences() {
        assert_eq!(sanitize_terminal_text("\x1b[31mRED\x1b[0m"), "RED");
        assert_eq!(sanitize_terminal_text("a\u{9b}2Jb"), "ab");
    }

    #[test]
    fn strips_osc_clipboard_and_hyperlinks() {
        assert_eq!(
            sanitize_terminal_text("x\x1b]52;c;SGVsbG8=\x07y"),
            "xy"
        );
        assert_eq!(
            sanitize_terminal_text("\x1b]8;;http://evil\x1b\\link\x1b]8;;\x1b\\"),
            "link"
        );
    }

    #[test]
    fn collapses_line_breaks() {
        assert_eq!(sanitize_terminal_text("a\r\n\tb"), "a b");
        assert_eq!(sanitize_terminal_text("\nlead"), "lead");
    }

    #[test]
    fn drops_bare_controls() {
        assert_eq!(sanitize_terminal_text("be\x07ll\x7f"), "bell");
        assert_eq!(sanitize_terminal_text("\x1b(Bok"), "ok");
    }

    #[test]
    fn keeps_unicode() {
        assert_eq!(sanitize_terminal_text("città\x1b[1m è"), "città è");
    }
}
