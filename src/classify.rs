//! Printability rules for decoded values.
//!
//! A value at or below 127 gets the historical strings(1) ASCII treatment:
//! graphic characters, space and tab, with backspace and the rest of the
//! whitespace family admitted by option. Anything higher is judged by its
//! Unicode general category, where everything outside the Other and
//! Separator groups counts as printable.

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::config::Encoding;

/// Whether `value` extends a printable run under `encoding`.
pub fn is_printable(
    value: u32,
    encoding: Encoding,
    include_backspaces: bool,
    include_whitespaces: bool,
) -> bool {
    printable_char(value, encoding, include_backspaces, include_whitespaces).is_some()
}

/// Like [`is_printable`], but hands back the character a run would grow by.
pub(crate) fn printable_char(
    value: u32,
    encoding: Encoding,
    include_backspaces: bool,
    include_whitespaces: bool,
) -> Option<char> {
    if value <= 127 {
        let byte = value as u8;
        let keep = byte.is_ascii_graphic()
            || matches!(byte, b' ' | b'\t')
            || (include_backspaces && byte == 0x08)
            || (include_whitespaces && matches!(byte, b'\n' | 0x0B | 0x0C | b'\r' | 0x08));
        return keep.then_some(byte as char);
    }
    match encoding {
        // Latin-1: byte values map straight onto the first Unicode block.
        Encoding::EightBit if value <= 255 => {
            let c = char::from(value as u8);
            category_printable(c).then_some(c)
        }
        Encoding::Wide16Le
        | Encoding::Wide16Be
        | Encoding::Wide32Le
        | Encoding::Wide32Be
        | Encoding::Utf8 => {
            // Surrogate halves and out-of-range values are not scalars and
            // never printable.
            let c = char::from_u32(value)?;
            category_printable(c).then_some(c)
        }
        _ => None,
    }
}

/// Printable by Unicode general category. The ASCII space is the one
/// conventional exception inside the Separator group.
fn category_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::SpaceSeparator
    )
}
