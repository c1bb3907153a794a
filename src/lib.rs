//! # strungs - printable-run extraction from binary streams
//!
//! An encoding-aware rework of the classic strings(1) engine. A scan walks
//! a byte source, decodes it under one of seven character encodings, and
//! yields every maximal run of printable characters as an `(offset, text)`
//! pair, lazily and in offset order.
//!
//! The engine understands single 7-bit and 8-bit bytes, 16-bit and 32-bit
//! units in either byte order, and UTF-8 with resynchronization: a
//! malformed sequence surfaces its lead byte as a raw unit and re-reads
//! the following bytes as fresh leads, so a single bad byte costs exactly
//! one unit, never the rest of the string.
//!
//! ## Quick start
//!
//! ```
//! use strungs::{scan_bytes, ScanConfig};
//!
//! let data = b"\x7fELF\x02\x01\x01\x00hello, world\x00";
//! let runs: Vec<_> = scan_bytes(data, &ScanConfig::default())
//!     .expect("valid configuration")
//!     .collect();
//!
//! assert_eq!(runs.len(), 1);
//! assert_eq!(runs[0].offset, 8);
//! assert_eq!(runs[0].text, "hello, world");
//! ```
//!
//! ## Tuning a scan
//!
//! Everything the classic tool exposes as flags lives on [`ScanConfig`]:
//! the encoding, the minimum run length, the terminator values a run must
//! end in to count, and the byte [`Window`] of the source to cover.
//!
//! ```
//! use strungs::{scan_bytes, Encoding, ScanConfig};
//!
//! // UTF-16LE "HI!!" followed by a 16-bit NUL.
//! let data = [0x48, 0x00, 0x49, 0x00, 0x21, 0x00, 0x21, 0x00, 0x00, 0x00];
//! let config = ScanConfig::new(4).with_encoding(Encoding::Wide16Le);
//! let runs: Vec<_> = scan_bytes(&data, &config).unwrap().collect();
//!
//! assert_eq!(runs[0].offset, 0);
//! assert_eq!(runs[0].text, "HI!!");
//! ```

mod classify;
mod config;
mod cursor;
mod decode;
mod extract;
mod flavour;
mod scan;
mod segment;

pub use classify::is_printable;
pub use config::{ConfigError, Encoding, ObjectFormat, ScanConfig, Window, DEFAULT_MIN_LENGTH};
pub use extract::Run;
pub use flavour::Flavour;
pub use scan::{scan_bytes, scan_file, scan_reader, Scanner};
pub use segment::{select_segments, Segment};
