//! Segment selection: resolving a window into scannable byte ranges.

use crate::config::Window;

/// An absolute byte range of the source designated for one scanning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Offset of the first byte to scan.
    pub offset: u64,
    /// Number of bytes to scan, or `None` to run to the end of the source.
    pub length: Option<u64>,
}

impl Segment {
    pub(crate) fn whole() -> Segment {
        Segment {
            offset: 0,
            length: None,
        }
    }
}

/// Resolve a window into the ordered list of segments to scan.
///
/// Selection is pure: it never touches the source, so callers can plan
/// seeks before any byte is read. [`Window::ObjectSections`] is accepted
/// for compatibility but has no section walker behind it; it degrades to
/// scanning the whole source.
pub fn select_segments(window: &Window) -> Vec<Segment> {
    match window {
        Window::Whole => vec![Segment::whole()],
        Window::Part { offset, length } => vec![Segment {
            offset: *offset,
            length: *length,
        }],
        Window::ObjectSections(format) => {
            tracing::debug!(
                ?format,
                "object section enumeration not implemented, scanning whole source"
            );
            vec![Segment::whole()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObjectFormat;

    #[test]
    fn test_whole_window_is_one_unbounded_segment() {
        let segments = select_segments(&Window::Whole);
        assert_eq!(segments, vec![Segment { offset: 0, length: None }]);
    }

    #[test]
    fn test_part_window_keeps_offset_and_length() {
        let segments = select_segments(&Window::Part {
            offset: 128,
            length: Some(64),
        });
        assert_eq!(
            segments,
            vec![Segment {
                offset: 128,
                length: Some(64)
            }]
        );

        let open_ended = select_segments(&Window::Part {
            offset: 32,
            length: None,
        });
        assert_eq!(
            open_ended,
            vec![Segment {
                offset: 32,
                length: None
            }]
        );
    }

    #[test]
    fn test_object_sections_fall_back_to_whole_source() {
        for format in [ObjectFormat::Elf, ObjectFormat::Aout, ObjectFormat::Coff] {
            let segments = select_segments(&Window::ObjectSections(format));
            assert_eq!(segments, vec![Segment { offset: 0, length: None }]);
        }
    }
}
