/// DMS format constants, compression modes and header flags

/// Format constants
pub mod constants;
/// Archive info bits
pub mod infobits;
/// Source machine descriptors
pub mod machine;

pub use constants::*;
pub use infobits::InfoBits;
pub use machine::{CpuCopro, DisketteType, MachineCpu, MachineType};

use crate::error::{DmsError, Result};

/// Track compression mode
///
/// DMS defines ten modes; this library produces and extracts only `NoComp`
/// and `Simple`. The remaining values are recognized so that archives using
/// them are rejected explicitly instead of being misread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmode {
    /// Tracks stored uncompressed
    NoComp,
    /// Run-length encoding
    Simple,
    /// Quick mode (not implemented)
    Quick,
    /// Medium mode (not implemented)
    Medium,
    /// Deep mode (not implemented)
    Deep,
    /// Heavy mode, level 1 (not implemented)
    Heavy1,
    /// Heavy mode, level 2 (not implemented)
    Heavy2,
    /// Heavy mode, level 3 (not implemented)
    Heavy3,
    /// Heavy mode, level 4 (not implemented)
    Heavy4,
    /// Heavy mode, level 5 (not implemented)
    Heavy5,
}

impl Cmode {
    /// Decode a raw mode value from an archive
    pub fn from_raw(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Cmode::NoComp),
            1 => Ok(Cmode::Simple),
            2 => Ok(Cmode::Quick),
            3 => Ok(Cmode::Medium),
            4 => Ok(Cmode::Deep),
            5 => Ok(Cmode::Heavy1),
            6 => Ok(Cmode::Heavy2),
            7 => Ok(Cmode::Heavy3),
            8 => Ok(Cmode::Heavy4),
            9 => Ok(Cmode::Heavy5),
            mode => Err(DmsError::UnsupportedCompression { mode }),
        }
    }

    /// Check whether this library can pack and extract tracks in this mode
    pub fn is_supported(&self) -> bool {
        matches!(self, Cmode::NoComp | Cmode::Simple)
    }

    /// Get a human-readable name for this mode
    pub fn name(&self) -> &'static str {
        match self {
            Cmode::NoComp => "none",
            Cmode::Simple => "simple",
            Cmode::Quick => "quick",
            Cmode::Medium => "medium",
            Cmode::Deep => "deep",
            Cmode::Heavy1 => "heavy1",
            Cmode::Heavy2 => "heavy2",
            Cmode::Heavy3 => "heavy3",
            Cmode::Heavy4 => "heavy4",
            Cmode::Heavy5 => "heavy5",
        }
    }
}

impl From<Cmode> for u8 {
    fn from(mode: Cmode) -> Self {
        match mode {
            Cmode::NoComp => 0,
            Cmode::Simple => 1,
            Cmode::Quick => 2,
            Cmode::Medium => 3,
            Cmode::Deep => 4,
            Cmode::Heavy1 => 5,
            Cmode::Heavy2 => 6,
            Cmode::Heavy3 => 7,
            Cmode::Heavy4 => 8,
            Cmode::Heavy5 => 9,
        }
    }
}

/// Check whether a byte buffer starts with the DMS archive signature
pub fn is_archive(data: &[u8]) -> bool {
    data.starts_with(ARCHIVE_SIGNATURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmode_round_trip() {
        for raw in 0..=9u8 {
            let mode = Cmode::from_raw(raw).unwrap();
            assert_eq!(u8::from(mode), raw);
        }
    }

    #[test]
    fn test_cmode_unknown_value() {
        let result = Cmode::from_raw(10);
        assert!(matches!(
            result,
            Err(DmsError::UnsupportedCompression { mode: 10 })
        ));
    }

    #[test]
    fn test_cmode_support() {
        assert!(Cmode::NoComp.is_supported());
        assert!(Cmode::Simple.is_supported());
        assert!(!Cmode::Quick.is_supported());
        assert!(!Cmode::Heavy5.is_supported());
    }

    #[test]
    fn test_is_archive() {
        assert!(is_archive(b"DMS!\0\0\0\0rest"));
        assert!(!is_archive(b"DOS\0"));
        assert!(!is_archive(b"DM"));
    }
}
