//! The scanning pipeline: segments in, printable runs out.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::config::{ConfigError, ScanConfig};
use crate::cursor::{skip_forward, ByteCursor};
use crate::decode::Decoder;
use crate::extract::{Run, RunExtractor};
use crate::segment::{select_segments, Segment};

/// Lazy iterator over the printable runs of one source.
///
/// Nothing is read until the first call to `next`, and no more of the
/// source is consumed than the runs asked for require. Runs come out in
/// strictly increasing offset order; dropping the scanner closes the
/// source.
pub struct Scanner<R> {
    segments: std::vec::IntoIter<Segment>,
    state: State<R>,
    config: ScanConfig,
}

enum State<R> {
    /// Between segments; the source sits at `position`.
    Idle { source: R, position: u64 },
    /// Mid-segment.
    Active {
        cursor: ByteCursor<R>,
        decoder: Decoder,
        extractor: RunExtractor,
    },
    /// All segments finished, the source failed, or it never opened.
    Drained,
}

impl<R: Read> Scanner<R> {
    fn start(source: R, position: u64, segments: Vec<Segment>, config: ScanConfig) -> Scanner<R> {
        Scanner {
            segments: segments.into_iter(),
            state: State::Idle { source, position },
            config,
        }
    }

    fn drained(config: ScanConfig) -> Scanner<R> {
        Scanner {
            segments: Vec::new().into_iter(),
            state: State::Drained,
            config,
        }
    }
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        loop {
            match std::mem::replace(&mut self.state, State::Drained) {
                State::Drained => return None,
                State::Idle {
                    mut source,
                    position,
                } => {
                    let segment = self.segments.next()?;
                    if segment.offset < position {
                        tracing::debug!(
                            segment_offset = segment.offset,
                            position,
                            "segment starts behind the cursor, ending scan"
                        );
                        return None;
                    }
                    let gap = segment.offset - position;
                    if gap > 0 {
                        match skip_forward(&mut source, gap) {
                            Ok(skipped) if skipped == gap => {}
                            // The source ends before the segment begins.
                            Ok(_) => return None,
                            Err(err) => {
                                tracing::debug!(%err, "positioning for segment failed, ending scan");
                                return None;
                            }
                        }
                    }
                    self.state = State::Active {
                        cursor: ByteCursor::new(source, segment),
                        decoder: Decoder::new(self.config.encoding),
                        extractor: RunExtractor::new(self.config.clone()),
                    };
                }
                State::Active {
                    mut cursor,
                    decoder,
                    mut extractor,
                } => match decoder.next_unit(&mut cursor) {
                    Ok(Some(unit)) => {
                        let emitted = extractor.feed(unit);
                        self.state = State::Active {
                            cursor,
                            decoder,
                            extractor,
                        };
                        if let Some(run) = emitted {
                            return Some(run);
                        }
                    }
                    Ok(None) => {
                        let emitted = extractor.finish();
                        let (source, position) = cursor.into_parts();
                        self.state = State::Idle { source, position };
                        if let Some(run) = emitted {
                            return Some(run);
                        }
                    }
                    Err(err) => {
                        // A read failure ends the pass quietly; whatever was
                        // pending gets its end-of-segment flush first.
                        tracing::debug!(%err, "read failed mid-scan, ending pass");
                        match extractor.finish() {
                            Some(run) => return Some(run),
                            None => return None,
                        }
                    }
                },
            }
        }
    }
}

/// Scan a file for printable runs.
///
/// A path that cannot be opened yields an empty scanner rather than an
/// error; only an invalid configuration is refused. Seekable sources jump
/// straight to the first segment, with read-and-discard as the fallback.
pub fn scan_file<P: AsRef<Path>>(
    path: P,
    config: &ScanConfig,
) -> Result<Scanner<BufReader<File>>, ConfigError> {
    config.validate()?;
    let file = match File::open(path.as_ref()) {
        Ok(file) => file,
        Err(err) => {
            tracing::debug!(
                path = %path.as_ref().display(),
                %err,
                "cannot open source, yielding no runs"
            );
            return Ok(Scanner::drained(config.clone()));
        }
    };
    let mut reader = BufReader::new(file);
    let segments = select_segments(&config.window);
    let position = match segments.first() {
        Some(segment) if segment.offset > 0 => reader
            .seek(SeekFrom::Start(segment.offset))
            .unwrap_or(0),
        _ => 0,
    };
    Ok(Scanner::start(reader, position, segments, config.clone()))
}

/// Scan a forward-only byte stream, such as standard input or a pipe.
///
/// Window positioning happens by reading and discarding; the UTF-8
/// lookahead is buffered internally, so the source is never sought.
pub fn scan_reader<R: Read>(source: R, config: &ScanConfig) -> Result<Scanner<R>, ConfigError> {
    config.validate()?;
    let segments = select_segments(&config.window);
    Ok(Scanner::start(source, 0, segments, config.clone()))
}

/// Scan an in-memory buffer.
pub fn scan_bytes<'d>(data: &'d [u8], config: &ScanConfig) -> Result<Scanner<&'d [u8]>, ConfigError> {
    scan_reader(data, config)
}
