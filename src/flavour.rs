//! Command flavours: the historical strings(1) dialects.
//!
//! The tool grew several option dialects over the decades (POSIX, research
//! Unix, BSD, GNU, Plan 9). A flavour never changes how bytes decode or how
//! runs accumulate; it only pre-fills a [`ScanConfig`] that explicit options
//! are then applied on top of.

use crate::config::{Encoding, ScanConfig};

/// A strings(1) dialect selected through the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flavour {
    /// The superset dialect: every option available, engine defaults. This
    /// is what you get when the environment selects nothing else.
    #[default]
    Pnu,
    /// POSIX: runs must end in NUL or newline.
    Posix,
    /// Research Unix (v10): POSIX termination plus backspace runs.
    Unix,
    /// BSD: engine defaults.
    Bsd,
    /// GNU binutils: engine defaults.
    Gnu,
    /// Plan 9: UTF-8, six-character minimum, decimal offsets.
    Plan9,
    /// Inferno: same preset as Plan 9.
    Inferno,
}

impl Flavour {
    /// Parse a flavour tag as found in `FLAVOUR` or `STRINGS_FLAVOUR`.
    /// Tags are matched lower-case; `None` means the tag is not a dialect
    /// this tool knows how to imitate.
    pub fn from_tag(tag: &str) -> Option<Flavour> {
        match tag {
            "pnu" => Some(Flavour::Pnu),
            "posix" => Some(Flavour::Posix),
            "unix" | "unix:v10" => Some(Flavour::Unix),
            "bsd" | "bsd:freebsd" => Some(Flavour::Bsd),
            "gnu" | "gnu:linux" | "linux" => Some(Flavour::Gnu),
            "plan9" => Some(Flavour::Plan9),
            "inferno" => Some(Flavour::Inferno),
            _ => None,
        }
    }

    /// The scan configuration this flavour starts from, before explicit
    /// options are applied.
    pub fn scan_preset(self) -> ScanConfig {
        let mut config = ScanConfig::default();
        match self {
            Flavour::Pnu | Flavour::Bsd | Flavour::Gnu => {}
            Flavour::Posix => {
                config.terminators = vec![0, u32::from(b'\n')];
            }
            Flavour::Unix => {
                config.include_backspaces = true;
                config.terminators = vec![0, u32::from(b'\n')];
            }
            Flavour::Plan9 | Flavour::Inferno => {
                config.min_length = 6;
                config.encoding = Encoding::Utf8;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MIN_LENGTH;

    #[test]
    fn test_tag_parsing() {
        assert_eq!(Flavour::from_tag("pnu"), Some(Flavour::Pnu));
        assert_eq!(Flavour::from_tag("posix"), Some(Flavour::Posix));
        assert_eq!(Flavour::from_tag("unix"), Some(Flavour::Unix));
        assert_eq!(Flavour::from_tag("unix:v10"), Some(Flavour::Unix));
        assert_eq!(Flavour::from_tag("bsd"), Some(Flavour::Bsd));
        assert_eq!(Flavour::from_tag("bsd:freebsd"), Some(Flavour::Bsd));
        assert_eq!(Flavour::from_tag("gnu"), Some(Flavour::Gnu));
        assert_eq!(Flavour::from_tag("gnu:linux"), Some(Flavour::Gnu));
        assert_eq!(Flavour::from_tag("linux"), Some(Flavour::Gnu));
        assert_eq!(Flavour::from_tag("plan9"), Some(Flavour::Plan9));
        assert_eq!(Flavour::from_tag("inferno"), Some(Flavour::Inferno));
        assert_eq!(Flavour::from_tag("solaris"), None);
        assert_eq!(Flavour::from_tag(""), None);
    }

    #[test]
    fn test_default_flavour_is_pnu() {
        assert_eq!(Flavour::default(), Flavour::Pnu);
        assert_eq!(Flavour::Pnu.scan_preset(), ScanConfig::default());
    }

    #[test]
    fn test_posix_preset_terminators() {
        let config = Flavour::Posix.scan_preset();
        assert_eq!(config.terminators, vec![0, 10]);
        assert!(!config.include_backspaces);
        assert_eq!(config.min_length, DEFAULT_MIN_LENGTH);
    }

    #[test]
    fn test_unix_preset_adds_backspaces() {
        let config = Flavour::Unix.scan_preset();
        assert_eq!(config.terminators, vec![0, 10]);
        assert!(config.include_backspaces);
    }

    #[test]
    fn test_plan9_preset() {
        for flavour in [Flavour::Plan9, Flavour::Inferno] {
            let config = flavour.scan_preset();
            assert_eq!(config.min_length, 6);
            assert_eq!(config.encoding, Encoding::Utf8);
            assert!(config.terminators.is_empty());
        }
    }

    #[test]
    fn test_bsd_and_gnu_presets_are_engine_defaults() {
        assert_eq!(Flavour::Bsd.scan_preset(), ScanConfig::default());
        assert_eq!(Flavour::Gnu.scan_preset(), ScanConfig::default());
    }
}
