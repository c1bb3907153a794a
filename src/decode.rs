//! Unit decoding for the seven supported encodings.
//!
//! Fixed-width modes read whole units and assemble the value with the
//! declared endianness. UTF-8 reads a lead byte, pulls the number of
//! continuation bytes the lead announces, and falls back to the lead byte
//! alone when the group is not a valid sequence. The continuation
//! candidates of a failed group go back to the cursor and are re-read as
//! fresh lead bytes, so no byte is ever consumed twice or skipped.

use std::io::{self, Read};

use crate::config::Encoding;
use crate::cursor::ByteCursor;

/// One decoded value: the codepoint, where its first byte sat, and how
/// many source bytes it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodedUnit {
    /// Decoded value. A Unicode scalar whenever the encoding promises one;
    /// a raw byte or raw fixed-width integer otherwise.
    pub(crate) value: u32,
    /// Absolute offset of the unit's first byte.
    pub(crate) offset: u64,
    /// Source bytes consumed, continuation bytes included.
    pub(crate) len: usize,
}

pub(crate) struct Decoder {
    encoding: Encoding,
}

impl Decoder {
    pub(crate) fn new(encoding: Encoding) -> Self {
        Decoder { encoding }
    }

    /// Decode the next unit, or `None` at the end of the segment.
    ///
    /// A trailing group shorter than one fixed-width unit counts as end of
    /// segment; its bytes are never decoded. A UTF-8 lead whose
    /// continuation bytes run out resolves by resynchronization instead.
    pub(crate) fn next_unit<R: Read>(
        &self,
        cursor: &mut ByteCursor<R>,
    ) -> io::Result<Option<DecodedUnit>> {
        let offset = cursor.position();
        let width = self.encoding.unit_width();
        let mut buf = [0u8; 4];
        let got = cursor.fill(&mut buf[..width])?;
        if got < width {
            return Ok(None);
        }
        if self.encoding == Encoding::Utf8 {
            return self.finish_utf8(cursor, offset, buf[0]).map(Some);
        }
        Ok(Some(DecodedUnit {
            value: unit_value(self.encoding, &buf),
            offset,
            len: width,
        }))
    }

    /// Complete a UTF-8 unit from its lead byte.
    fn finish_utf8<R: Read>(
        &self,
        cursor: &mut ByteCursor<R>,
        offset: u64,
        lead: u8,
    ) -> io::Result<DecodedUnit> {
        let continuations = match lead {
            0xC0..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF7 => 3,
            _ => 0,
        };
        if continuations == 0 {
            // ASCII decodes as itself; a stray continuation or invalid lead
            // byte surfaces as a raw one-byte unit.
            return Ok(DecodedUnit {
                value: u32::from(lead),
                offset,
                len: 1,
            });
        }
        let mut group = [lead, 0, 0, 0];
        let got = cursor.fill(&mut group[1..=continuations])?;
        if let Some(c) = decode_group(&group[..1 + got]) {
            return Ok(DecodedUnit {
                value: u32::from(c),
                offset,
                len: 1 + got,
            });
        }
        cursor.push_back(&group[1..1 + got]);
        Ok(DecodedUnit {
            value: u32::from(lead),
            offset,
            len: 1,
        })
    }
}

/// Assemble a fixed-width unit value. The buffer always holds at least
/// `unit_width` valid bytes.
#[inline]
fn unit_value(encoding: Encoding, bytes: &[u8; 4]) -> u32 {
    match encoding {
        Encoding::SevenBit | Encoding::EightBit | Encoding::Utf8 => u32::from(bytes[0]),
        Encoding::Wide16Le => u32::from(u16::from_le_bytes([bytes[0], bytes[1]])),
        Encoding::Wide16Be => u32::from(u16::from_be_bytes([bytes[0], bytes[1]])),
        Encoding::Wide32Le => u32::from_le_bytes(*bytes),
        Encoding::Wide32Be => u32::from_be_bytes(*bytes),
    }
}

/// Decode a byte group as exactly one UTF-8 character.
fn decode_group(bytes: &[u8]) -> Option<char> {
    let s = std::str::from_utf8(bytes).ok()?;
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    fn units(encoding: Encoding, data: &[u8]) -> Vec<DecodedUnit> {
        let decoder = Decoder::new(encoding);
        let mut cursor = ByteCursor::new(data, Segment { offset: 0, length: None });
        let mut out = Vec::new();
        while let Some(unit) = decoder.next_unit(&mut cursor).unwrap() {
            out.push(unit);
        }
        out
    }

    #[test]
    fn test_seven_bit_units() {
        let got = units(Encoding::SevenBit, b"AB");
        assert_eq!(
            got,
            vec![
                DecodedUnit { value: 0x41, offset: 0, len: 1 },
                DecodedUnit { value: 0x42, offset: 1, len: 1 },
            ]
        );
    }

    #[test]
    fn test_wide16_endianness() {
        // The same two bytes read differently under each byte order.
        let le = units(Encoding::Wide16Le, &[0x41, 0x00]);
        assert_eq!(le, vec![DecodedUnit { value: 0x0041, offset: 0, len: 2 }]);

        let be = units(Encoding::Wide16Be, &[0x41, 0x00]);
        assert_eq!(be, vec![DecodedUnit { value: 0x4100, offset: 0, len: 2 }]);
    }

    #[test]
    fn test_wide32_endianness() {
        let le = units(Encoding::Wide32Le, &[0x41, 0x00, 0x00, 0x00]);
        assert_eq!(le, vec![DecodedUnit { value: 0x41, offset: 0, len: 4 }]);

        let be = units(Encoding::Wide32Be, &[0x41, 0x00, 0x00, 0x00]);
        assert_eq!(be, vec![DecodedUnit { value: 0x4100_0000, offset: 0, len: 4 }]);
    }

    #[test]
    fn test_partial_trailing_unit_ends_segment() {
        let got = units(Encoding::Wide16Le, &[0x41, 0x00, 0x42]);
        assert_eq!(got, vec![DecodedUnit { value: 0x0041, offset: 0, len: 2 }]);

        assert!(units(Encoding::Wide32Le, &[0x41, 0x42, 0x43]).is_empty());
    }

    #[test]
    fn test_utf8_ascii_and_multibyte() {
        // "Aé€": one, two and three byte characters back to back.
        let got = units(Encoding::Utf8, "Aé€".as_bytes());
        assert_eq!(
            got,
            vec![
                DecodedUnit { value: 0x41, offset: 0, len: 1 },
                DecodedUnit { value: 0xE9, offset: 1, len: 2 },
                DecodedUnit { value: 0x20AC, offset: 3, len: 3 },
            ]
        );
    }

    #[test]
    fn test_utf8_four_byte_character() {
        let got = units(Encoding::Utf8, "𝄞".as_bytes());
        assert_eq!(got, vec![DecodedUnit { value: 0x1D11E, offset: 0, len: 4 }]);
    }

    #[test]
    fn test_utf8_resync_emits_lead_alone() {
        // 0xC3 announces one continuation byte, but 0x41 is not one. The
        // lead comes out as a raw unit and 0x41 is re-read as itself.
        let got = units(Encoding::Utf8, &[0xC3, 0x41]);
        assert_eq!(
            got,
            vec![
                DecodedUnit { value: 0xC3, offset: 0, len: 1 },
                DecodedUnit { value: 0x41, offset: 1, len: 1 },
            ]
        );
    }

    #[test]
    fn test_utf8_resync_replays_all_continuation_candidates() {
        let got = units(Encoding::Utf8, &[0xE0, 0x41, 0x42]);
        assert_eq!(
            got,
            vec![
                DecodedUnit { value: 0xE0, offset: 0, len: 1 },
                DecodedUnit { value: 0x41, offset: 1, len: 1 },
                DecodedUnit { value: 0x42, offset: 2, len: 1 },
            ]
        );
    }

    #[test]
    fn test_utf8_invalid_lead_resyncs() {
        // 0xF5 can never start a valid sequence; the three candidates it
        // pulled in must all come back out.
        let got = units(Encoding::Utf8, &[0xF5, 0x80, 0x80, 0x80]);
        assert_eq!(got[0], DecodedUnit { value: 0xF5, offset: 0, len: 1 });
        assert_eq!(got.len(), 4);
        assert_eq!(got[3], DecodedUnit { value: 0x80, offset: 3, len: 1 });
    }

    #[test]
    fn test_utf8_overlong_rejected() {
        let got = units(Encoding::Utf8, &[0xC0, 0xAF]);
        assert_eq!(
            got,
            vec![
                DecodedUnit { value: 0xC0, offset: 0, len: 1 },
                DecodedUnit { value: 0xAF, offset: 1, len: 1 },
            ]
        );
    }

    #[test]
    fn test_utf8_bare_continuation_is_raw_unit() {
        let got = units(Encoding::Utf8, &[0x80]);
        assert_eq!(got, vec![DecodedUnit { value: 0x80, offset: 0, len: 1 }]);
    }

    #[test]
    fn test_utf8_truncated_sequence_at_end() {
        let got = units(Encoding::Utf8, &[0x41, 0xC3]);
        assert_eq!(
            got,
            vec![
                DecodedUnit { value: 0x41, offset: 0, len: 1 },
                DecodedUnit { value: 0xC3, offset: 1, len: 1 },
            ]
        );
    }
}
