/// Archive header: the 56-byte block opening every DMS file

use crate::checksum::crc16;
use crate::error::{DmsError, Result};
use crate::format::constants::{
    ARCHIVE_HEADER_SIZE, ARCHIVE_SIGNATURE, CREATOR_VERSION, NEEDED_VERSION,
};
use crate::format::{Cmode, CpuCopro, DisketteType, InfoBits, MachineCpu, MachineType};

/// Archive-wide metadata with a trailing CRC
///
/// All fields are stored big-endian. The CRC covers everything between the
/// `DMS!` signature and the CRC field itself. The machine descriptor fields
/// record the creating environment; this library writes fixed defaults for
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Info bit flags
    pub info_bits: InfoBits,
    /// Creation date as unix seconds
    pub date: u32,
    /// Lowest track number in the archive
    pub low_track: u16,
    /// Highest track number in the archive
    pub high_track: u16,
    /// Total packed size of all main tracks
    pub total_packed: u32,
    /// Total unpacked size of all main tracks
    pub total_unpacked: u32,
    /// Creating OS version
    pub os_version: u16,
    /// Creating OS revision
    pub os_revision: u16,
    /// CPU of the creating machine
    pub machine_cpu: MachineCpu,
    /// Coprocessor of the creating machine
    pub cpu_copro: CpuCopro,
    /// Kind of creating machine
    pub machine_type: MachineType,
    /// Secondary diskette type field
    pub extra_diskette_type: DisketteType,
    /// CPU speed in 10 kHz units
    pub cpu_speed: u16,
    /// Seconds taken to create the archive
    pub time_elapsed: u32,
    /// Version of the creating tool
    pub creator_version: u16,
    /// Lowest tool version able to extract this archive
    pub needed_version: u16,
    /// Filesystem of the source diskette
    pub diskette_type: DisketteType,
    /// Compression mode used for the main tracks
    pub cmode: Cmode,
}

impl ArchiveHeader {
    /// Build a header from the values accumulated by a pack run
    ///
    /// Machine descriptor fields are filled with this library's fixed
    /// defaults: a plain 68000 Amiga OFS diskette and zero speed/version
    /// figures.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        info_bits: InfoBits,
        date: u32,
        low_track: u16,
        high_track: u16,
        total_packed: u32,
        total_unpacked: u32,
        time_elapsed: u32,
        cmode: Cmode,
    ) -> Self {
        Self {
            info_bits,
            date,
            low_track,
            high_track,
            total_packed,
            total_unpacked,
            os_version: 0,
            os_revision: 0,
            machine_cpu: MachineCpu::M68000,
            cpu_copro: CpuCopro::None,
            machine_type: MachineType::Unknown,
            extra_diskette_type: DisketteType::Unknown,
            cpu_speed: 0,
            time_elapsed,
            creator_version: CREATOR_VERSION,
            needed_version: NEEDED_VERSION,
            diskette_type: DisketteType::AmigaOs1Ofs,
            cmode,
        }
    }

    /// Number of main tracks the inclusive low/high range describes
    pub fn track_count(&self) -> usize {
        (self.high_track - self.low_track) as usize + 1
    }

    /// Serialize the header to its 56-byte wire form
    ///
    /// The trailing CRC is computed over bytes 4..54 during serialization.
    pub fn to_bytes(&self) -> [u8; ARCHIVE_HEADER_SIZE] {
        let mut bytes = [0u8; ARCHIVE_HEADER_SIZE];
        bytes[0..4].copy_from_slice(ARCHIVE_SIGNATURE);
        // bytes 4..8 are a reserved header marker and stay zero
        bytes[8..12].copy_from_slice(&self.info_bits.0.to_be_bytes());
        bytes[12..16].copy_from_slice(&self.date.to_be_bytes());
        bytes[16..18].copy_from_slice(&self.low_track.to_be_bytes());
        bytes[18..20].copy_from_slice(&self.high_track.to_be_bytes());
        bytes[20..24].copy_from_slice(&self.total_packed.to_be_bytes());
        bytes[24..28].copy_from_slice(&self.total_unpacked.to_be_bytes());
        bytes[28..30].copy_from_slice(&self.os_version.to_be_bytes());
        bytes[30..32].copy_from_slice(&self.os_revision.to_be_bytes());
        bytes[32..34].copy_from_slice(&u16::from(self.machine_cpu).to_be_bytes());
        bytes[34..36].copy_from_slice(&u16::from(self.cpu_copro).to_be_bytes());
        bytes[36..38].copy_from_slice(&u16::from(self.machine_type).to_be_bytes());
        bytes[38..40].copy_from_slice(&u16::from(self.extra_diskette_type).to_be_bytes());
        bytes[40..42].copy_from_slice(&self.cpu_speed.to_be_bytes());
        bytes[42..46].copy_from_slice(&self.time_elapsed.to_be_bytes());
        bytes[46..48].copy_from_slice(&self.creator_version.to_be_bytes());
        bytes[48..50].copy_from_slice(&self.needed_version.to_be_bytes());
        bytes[50..52].copy_from_slice(&u16::from(self.diskette_type).to_be_bytes());
        bytes[52..54].copy_from_slice(&(u8::from(self.cmode) as u16).to_be_bytes());

        let crc = crc16(&bytes[4..ARCHIVE_HEADER_SIZE - 2]);
        bytes[54..56].copy_from_slice(&crc.to_be_bytes());
        bytes
    }

    /// Parse and verify a header from its wire form
    ///
    /// Fails on a missing signature, a CRC mismatch, or a compression mode
    /// value outside the defined DMS modes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ARCHIVE_HEADER_SIZE {
            return Err(DmsError::parse(bytes.len(), "Archive header too short"));
        }
        if &bytes[0..4] != ARCHIVE_SIGNATURE {
            return Err(DmsError::invalid_format("Missing DMS! signature"));
        }

        let stored_crc = u16::from_be_bytes([bytes[54], bytes[55]]);
        let computed_crc = crc16(&bytes[4..ARCHIVE_HEADER_SIZE - 2]);
        if stored_crc != computed_crc {
            return Err(DmsError::integrity(format!(
                "Archive header CRC mismatch: stored {:04X}, computed {:04X}",
                stored_crc, computed_crc
            )));
        }

        let raw_cmode = u16::from_be_bytes([bytes[52], bytes[53]]);
        let raw_cmode = u8::try_from(raw_cmode).map_err(|_| {
            DmsError::invalid_format(format!("Compression mode {} out of range", raw_cmode))
        })?;

        Ok(ArchiveHeader {
            info_bits: InfoBits::new(u32::from_be_bytes([
                bytes[8], bytes[9], bytes[10], bytes[11],
            ])),
            date: u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            low_track: u16::from_be_bytes([bytes[16], bytes[17]]),
            high_track: u16::from_be_bytes([bytes[18], bytes[19]]),
            total_packed: u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]),
            total_unpacked: u32::from_be_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            os_version: u16::from_be_bytes([bytes[28], bytes[29]]),
            os_revision: u16::from_be_bytes([bytes[30], bytes[31]]),
            machine_cpu: u16::from_be_bytes([bytes[32], bytes[33]]).into(),
            cpu_copro: u16::from_be_bytes([bytes[34], bytes[35]]).into(),
            machine_type: u16::from_be_bytes([bytes[36], bytes[37]]).into(),
            extra_diskette_type: u16::from_be_bytes([bytes[38], bytes[39]]).into(),
            cpu_speed: u16::from_be_bytes([bytes[40], bytes[41]]),
            time_elapsed: u32::from_be_bytes([bytes[42], bytes[43], bytes[44], bytes[45]]),
            creator_version: u16::from_be_bytes([bytes[46], bytes[47]]),
            needed_version: u16::from_be_bytes([bytes[48], bytes[49]]),
            diskette_type: u16::from_be_bytes([bytes[50], bytes[51]]).into(),
            cmode: Cmode::from_raw(raw_cmode)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> ArchiveHeader {
        ArchiveHeader::new(
            InfoBits::new(InfoBits::BANNER),
            1_650_000_000,
            0,
            79,
            500_000,
            901_120,
            3,
            Cmode::Simple,
        )
    }

    #[test]
    fn test_header_size() {
        let header = sample_header();
        assert_eq!(header.to_bytes().len(), ARCHIVE_HEADER_SIZE);
    }

    #[test]
    fn test_round_trip() {
        let header = sample_header();
        let parsed = ArchiveHeader::parse(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_track_count() {
        let header = sample_header();
        assert_eq!(header.track_count(), 80);
    }

    #[test]
    fn test_defaults() {
        let header = sample_header();
        assert_eq!(header.creator_version, CREATOR_VERSION);
        assert_eq!(header.needed_version, NEEDED_VERSION);
        assert_eq!(header.diskette_type, DisketteType::AmigaOs1Ofs);
        assert_eq!(header.machine_cpu, MachineCpu::M68000);
    }

    #[test]
    fn test_parse_bad_signature() {
        let mut bytes = sample_header().to_bytes();
        bytes[0] = b'X';
        assert!(matches!(
            ArchiveHeader::parse(&bytes),
            Err(DmsError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_detects_corruption() {
        let mut bytes = sample_header().to_bytes();
        bytes[25] ^= 0x10; // total unpacked size
        assert!(matches!(
            ArchiveHeader::parse(&bytes),
            Err(DmsError::IntegrityError(_))
        ));
    }

    #[test]
    fn test_parse_short_buffer() {
        let bytes = sample_header().to_bytes();
        assert!(ArchiveHeader::parse(&bytes[..40]).is_err());
    }

    #[test]
    fn test_crc_excludes_signature() {
        // The CRC covers bytes 4..54, so it must match the CRC of that
        // exact slice
        let bytes = sample_header().to_bytes();
        let crc = u16::from_be_bytes([bytes[54], bytes[55]]);
        assert_eq!(crc, crc16(&bytes[4..54]));
    }
}
