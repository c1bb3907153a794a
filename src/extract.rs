//! Printable-run accumulation and the emission tests.

use serde::Serialize;

use crate::classify::printable_char;
use crate::config::ScanConfig;
use crate::decode::DecodedUnit;

/// A maximal run of printable characters found in a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    /// Absolute byte offset of the run's first character.
    pub offset: u64,
    /// The decoded text.
    pub text: String,
}

/// State machine that grows runs from decoded units and decides which
/// finished runs deserve emission.
///
/// A run is reported when it reaches the minimum length and the unit that
/// ended it is an accepted terminator. An empty terminator list accepts
/// anything, the end of the segment included; a non-empty list never
/// accepts the end of the segment, since there is no terminator value to
/// compare.
pub(crate) struct RunExtractor {
    config: ScanConfig,
    pending: Option<PendingRun>,
}

struct PendingRun {
    offset: u64,
    text: String,
    chars: usize,
}

impl RunExtractor {
    pub(crate) fn new(config: ScanConfig) -> Self {
        RunExtractor {
            config,
            pending: None,
        }
    }

    /// Advance by one unit. Returns a run when this unit ended one that
    /// passes the emission tests.
    pub(crate) fn feed(&mut self, unit: DecodedUnit) -> Option<Run> {
        let printable = printable_char(
            unit.value,
            self.config.encoding,
            self.config.include_backspaces,
            self.config.include_whitespaces,
        );
        match printable {
            Some(c) => {
                let pending = self.pending.get_or_insert_with(|| PendingRun {
                    offset: unit.offset,
                    text: String::new(),
                    chars: 0,
                });
                pending.text.push(c);
                pending.chars += 1;
                None
            }
            None => {
                let finished = self.pending.take()?;
                self.emit(finished, Some(unit.value))
            }
        }
    }

    /// Flush at the end of a segment.
    pub(crate) fn finish(&mut self) -> Option<Run> {
        let finished = self.pending.take()?;
        self.emit(finished, None)
    }

    fn emit(&self, run: PendingRun, terminator: Option<u32>) -> Option<Run> {
        if run.chars < self.config.min_length {
            return None;
        }
        let qualified = if self.config.terminators.is_empty() {
            true
        } else {
            matches!(terminator, Some(value) if self.config.terminators.contains(&value))
        };
        qualified.then(|| Run {
            offset: run.offset,
            text: run.text,
        })
    }
}
