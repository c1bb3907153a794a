//! Scan configuration: encodings, windows, and the per-scan option set.

use thiserror::Error;

/// Default minimum run length, matching the historical strings(1) default.
pub const DEFAULT_MIN_LENGTH: usize = 4;

/// Character encodings the decoder understands.
///
/// The single-letter names follow the classic `-e` option of strings(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// `s`: single 7-bit bytes (printable ASCII). The default.
    #[default]
    SevenBit,
    /// `S`: single 8-bit bytes, adding the Latin-1 range.
    EightBit,
    /// `l`: 16-bit units, little-endian.
    Wide16Le,
    /// `b`: 16-bit units, big-endian.
    Wide16Be,
    /// `L`: 32-bit units, little-endian.
    Wide32Le,
    /// `B`: 32-bit units, big-endian.
    Wide32Be,
    /// `u`: UTF-8, resynchronizing on malformed sequences.
    Utf8,
}

impl Encoding {
    /// Map one of the `-e` selector letters to an encoding.
    pub fn from_flag(flag: char) -> Option<Encoding> {
        match flag {
            's' => Some(Encoding::SevenBit),
            'S' => Some(Encoding::EightBit),
            'l' => Some(Encoding::Wide16Le),
            'b' => Some(Encoding::Wide16Be),
            'L' => Some(Encoding::Wide32Le),
            'B' => Some(Encoding::Wide32Be),
            'u' => Some(Encoding::Utf8),
            _ => None,
        }
    }

    /// The selector letter for this encoding.
    pub fn flag(self) -> char {
        match self {
            Encoding::SevenBit => 's',
            Encoding::EightBit => 'S',
            Encoding::Wide16Le => 'l',
            Encoding::Wide16Be => 'b',
            Encoding::Wide32Le => 'L',
            Encoding::Wide32Be => 'B',
            Encoding::Utf8 => 'u',
        }
    }

    /// Bytes in one unit. For UTF-8 this is the lead byte alone; the
    /// decoder pulls continuation bytes on demand.
    pub(crate) fn unit_width(self) -> usize {
        match self {
            Encoding::SevenBit | Encoding::EightBit | Encoding::Utf8 => 1,
            Encoding::Wide16Le | Encoding::Wide16Be => 2,
            Encoding::Wide32Le | Encoding::Wide32Be => 4,
        }
    }
}

/// The byte range of a source one scan should cover.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Window {
    /// Everything, from the first byte to the end of the source.
    #[default]
    Whole,
    /// `length` bytes starting at `offset`, or to the end when `length`
    /// is `None`.
    Part {
        offset: u64,
        length: Option<u64>,
    },
    /// The relevant sections of a recognized object format.
    ///
    /// Section enumeration has never been implemented anywhere in the
    /// strings(1) lineage; selection falls back to the whole source.
    ObjectSections(ObjectFormat),
}

/// Object formats a caller may target with [`Window::ObjectSections`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFormat {
    Elf,
    Aout,
    Coff,
}

/// Options controlling one scan.
///
/// A config is plain data: build one up with the `with_*` methods (or
/// mutate the fields directly), hand it to [`scan_file`](crate::scan_file)
/// and friends, and reuse it across as many sources as you like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// How the raw bytes decode into characters.
    pub encoding: Encoding,
    /// Minimum number of characters a run needs to be reported.
    pub min_length: usize,
    /// Let backspace (0x08) extend a run.
    pub include_backspaces: bool,
    /// Let the whole ASCII whitespace family extend a run.
    pub include_whitespaces: bool,
    /// Unit values that qualify a finished run for emission. An empty
    /// list accepts any terminator, including the end of the source.
    pub terminators: Vec<u32>,
    /// Byte range of the source to scan.
    pub window: Window,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            encoding: Encoding::SevenBit,
            min_length: DEFAULT_MIN_LENGTH,
            include_backspaces: false,
            include_whitespaces: false,
            terminators: Vec::new(),
            window: Window::Whole,
        }
    }
}

impl ScanConfig {
    /// Config with the given minimum run length and defaults for the rest.
    pub fn new(min_length: usize) -> Self {
        ScanConfig {
            min_length,
            ..ScanConfig::default()
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_backspaces(mut self, include: bool) -> Self {
        self.include_backspaces = include;
        self
    }

    pub fn with_whitespaces(mut self, include: bool) -> Self {
        self.include_whitespaces = include;
        self
    }

    pub fn with_terminators(mut self, terminators: Vec<u32>) -> Self {
        self.terminators = terminators;
        self
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Check the config for values the scanner refuses to run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length < 1 {
            return Err(ConfigError::MinLength(self.min_length));
        }
        Ok(())
    }
}

/// Configuration errors reported before a scan starts.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("minimum run length must be at least 1, got {0}")]
    MinLength(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_flag_roundtrip() {
        for flag in ['s', 'S', 'l', 'b', 'L', 'B', 'u'] {
            let encoding = Encoding::from_flag(flag).unwrap();
            assert_eq!(encoding.flag(), flag);
        }
        assert_eq!(Encoding::from_flag('x'), None);
        assert_eq!(Encoding::from_flag('U'), None);
    }

    #[test]
    fn test_unit_widths() {
        assert_eq!(Encoding::SevenBit.unit_width(), 1);
        assert_eq!(Encoding::EightBit.unit_width(), 1);
        assert_eq!(Encoding::Utf8.unit_width(), 1);
        assert_eq!(Encoding::Wide16Le.unit_width(), 2);
        assert_eq!(Encoding::Wide16Be.unit_width(), 2);
        assert_eq!(Encoding::Wide32Le.unit_width(), 4);
        assert_eq!(Encoding::Wide32Be.unit_width(), 4);
    }

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.encoding, Encoding::SevenBit);
        assert_eq!(config.min_length, DEFAULT_MIN_LENGTH);
        assert!(!config.include_backspaces);
        assert!(!config.include_whitespaces);
        assert!(config.terminators.is_empty());
        assert_eq!(config.window, Window::Whole);
    }

    #[test]
    fn test_builder_chain() {
        let config = ScanConfig::new(6)
            .with_encoding(Encoding::Wide16Le)
            .with_backspaces(true)
            .with_whitespaces(true)
            .with_terminators(vec![0, 10])
            .with_window(Window::Part {
                offset: 16,
                length: Some(256),
            });
        assert_eq!(config.min_length, 6);
        assert_eq!(config.encoding, Encoding::Wide16Le);
        assert!(config.include_backspaces);
        assert!(config.include_whitespaces);
        assert_eq!(config.terminators, vec![0, 10]);
        assert_eq!(
            config.window,
            Window::Part {
                offset: 16,
                length: Some(256)
            }
        );
    }

    #[test]
    fn test_validate_rejects_zero_min_length() {
        let config = ScanConfig::new(0);
        assert_eq!(config.validate(), Err(ConfigError::MinLength(0)));
        assert!(ScanConfig::new(1).validate().is_ok());
    }
}
