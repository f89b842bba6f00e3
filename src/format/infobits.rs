/// Archive info bits
///
/// Bit positions defined by the DMS archive header.

use std::fmt;

/// Info bit flags from the archive header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoBits(pub u32);

impl InfoBits {
    /// No Zero (NOZERO) - Bit 0
    /// Empty tracks were skipped when the archive was created
    pub const NOZERO: u32 = 0x0001;

    /// Encrypted (ENCRYPT) - Bit 1
    /// Track data is password encrypted
    pub const ENCRYPT: u32 = 0x0002;

    /// Appended (APPENDS) - Bit 2
    /// Archive contains appended partial disks
    pub const APPENDS: u32 = 0x0004;

    /// Banner (BANNER) - Bit 3
    /// A banner track precedes the disk tracks
    pub const BANNER: u32 = 0x0008;

    /// High Density (HIGHDENSITY) - Bit 4
    /// Source diskette was high density
    pub const HIGHDENSITY: u32 = 0x0010;

    /// PC Diskette (PC) - Bit 5
    /// Source diskette came from a PC drive
    pub const PC: u32 = 0x0020;

    /// Device Fix (DMS_DEVICE_FIX) - Bit 6
    /// Archive needs the DMS device workaround on extraction
    pub const DEVICE_FIX: u32 = 0x0040;

    /// FILE_ID.DIZ (FILE_ID_DIZ) - Bit 8
    /// A FILE_ID.DIZ track follows the disk tracks
    pub const FILE_ID_DIZ: u32 = 0x0100;

    /// Create a new InfoBits from a raw value
    #[inline]
    pub fn new(value: u32) -> Self {
        InfoBits(value)
    }

    /// Check if the banner bit is set
    #[inline]
    pub fn has_banner(&self) -> bool {
        (self.0 & Self::BANNER) != 0
    }

    /// Check if the FILE_ID.DIZ bit is set
    #[inline]
    pub fn has_file_id(&self) -> bool {
        (self.0 & Self::FILE_ID_DIZ) != 0
    }

    /// Check if the encrypted bit is set
    #[inline]
    pub fn is_encrypted(&self) -> bool {
        (self.0 & Self::ENCRYPT) != 0
    }

    /// Check if the high density bit is set
    #[inline]
    pub fn is_high_density(&self) -> bool {
        (self.0 & Self::HIGHDENSITY) != 0
    }

    /// Set the given flag bits
    #[inline]
    pub fn set(&mut self, bits: u32) {
        self.0 |= bits;
    }
}

impl fmt::Display for InfoBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "none")?;
        } else {
            let mut flags = Vec::new();
            if (self.0 & Self::NOZERO) != 0 {
                flags.push("NOZERO");
            }
            if (self.0 & Self::ENCRYPT) != 0 {
                flags.push("ENCRYPT");
            }
            if (self.0 & Self::APPENDS) != 0 {
                flags.push("APPENDS");
            }
            if (self.0 & Self::BANNER) != 0 {
                flags.push("BANNER");
            }
            if (self.0 & Self::HIGHDENSITY) != 0 {
                flags.push("HIGHDENSITY");
            }
            if (self.0 & Self::PC) != 0 {
                flags.push("PC");
            }
            if (self.0 & Self::DEVICE_FIX) != 0 {
                flags.push("DEVICE_FIX");
            }
            if (self.0 & Self::FILE_ID_DIZ) != 0 {
                flags.push("FILE_ID_DIZ");
            }
            write!(f, "{}", flags.join("|"))?;
        }
        Ok(())
    }
}
