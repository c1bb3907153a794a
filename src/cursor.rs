//! Sequential byte access with pushback, shared by all decoders.
//!
//! The cursor covers three needs: exact small reads, a per-segment byte
//! budget, and a lookahead queue so bytes pulled in as UTF-8 continuation
//! candidates can be handed back and re-read as fresh lead bytes. Seekable
//! and forward-only sources go through the same path; only the initial
//! window positioning differs (seek vs. read-and-discard).

use std::collections::VecDeque;
use std::io::{self, Read};

use crate::segment::Segment;

pub(crate) struct ByteCursor<R> {
    source: R,
    /// Bytes returned by a failed multi-byte decode, served before the
    /// source is read again.
    pushback: VecDeque<u8>,
    /// Absolute offset of the next byte this cursor hands out.
    position: u64,
    /// Bytes still allowed out under the segment budget. `None` means
    /// unbounded.
    remaining: Option<u64>,
}

impl<R: Read> ByteCursor<R> {
    /// Cursor over `segment`. The source must already be positioned at
    /// `segment.offset`.
    pub(crate) fn new(source: R, segment: Segment) -> Self {
        ByteCursor {
            source,
            pushback: VecDeque::new(),
            position: segment.offset,
            remaining: segment.length,
        }
    }

    /// Absolute offset of the next byte to be handed out.
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    /// Fill `buf` as far as the source and the segment budget allow.
    ///
    /// Reads are retried until the buffer is full, so a short count means
    /// the segment is exhausted, not that the source was slow. Pushback
    /// bytes are served first.
    pub(crate) fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = match self.remaining {
            Some(remaining) if (buf.len() as u64) > remaining => remaining as usize,
            _ => buf.len(),
        };
        let mut filled = 0;
        while filled < want {
            if let Some(byte) = self.pushback.pop_front() {
                buf[filled] = byte;
                filled += 1;
                continue;
            }
            let n = self.source.read(&mut buf[filled..want])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        self.position += filled as u64;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= filled as u64;
        }
        Ok(filled)
    }

    /// Hand bytes back to the cursor. They come out again in the given
    /// order, ahead of anything further from the source, and the position
    /// and budget rewind accordingly.
    pub(crate) fn push_back(&mut self, bytes: &[u8]) {
        for &byte in bytes.iter().rev() {
            self.pushback.push_front(byte);
        }
        self.position -= bytes.len() as u64;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining += bytes.len() as u64;
        }
    }

    /// Recover the source once the segment is done, along with the
    /// absolute offset the next segment would start reading from.
    pub(crate) fn into_parts(self) -> (R, u64) {
        (self.source, self.position)
    }
}

/// Discard `count` bytes from a forward-only source. The return is short
/// only when the source ends first.
pub(crate) fn skip_forward<R: Read>(source: &mut R, count: u64) -> io::Result<u64> {
    io::copy(&mut source.by_ref().take(count), &mut io::sink())
}
