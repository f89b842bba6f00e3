/// DMS archive writer

use crate::archive::track::pack_track;
use crate::archive::ArchiveHeader;
use crate::error::{DmsError, Result};
use crate::format::constants::{BANNER_TRACK, FILE_ID_TRACK, TRACK_LENGTH};
use crate::format::{Cmode, InfoBits};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Options controlling a pack run
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Compression mode for the main tracks
    pub cmode: Cmode,
    /// Banner text stored before the main tracks
    pub banner: Option<Vec<u8>>,
    /// FILE_ID.DIZ text stored after the main tracks
    pub file_id: Option<Vec<u8>>,
    /// Archive date as unix seconds; the current time when `None`
    pub date: Option<u32>,
}

impl PackOptions {
    /// Create options packing with the given compression mode
    pub fn new(cmode: Cmode) -> Self {
        Self {
            cmode,
            banner: None,
            file_id: None,
            date: None,
        }
    }

    /// Create options storing tracks uncompressed
    pub fn store() -> Self {
        Self::new(Cmode::NoComp)
    }

    /// Attach a banner
    pub fn with_banner(mut self, banner: Vec<u8>) -> Self {
        self.banner = Some(banner);
        self
    }

    /// Attach a FILE_ID.DIZ
    pub fn with_file_id(mut self, file_id: Vec<u8>) -> Self {
        self.file_id = Some(file_id);
        self
    }

    /// Set the archive date
    pub fn with_date(mut self, date: u32) -> Self {
        self.date = Some(date);
        self
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self::new(Cmode::Simple)
    }
}

/// Pack an ADF image into a complete DMS archive
///
/// Splits the image into fixed-length tracks, frames each one in order,
/// then prepends the archive header built from the accumulated totals.
/// The banner goes between the header and the first main track, the
/// FILE_ID.DIZ after the last one; both are always stored uncompressed.
/// The whole archive is assembled in memory, so a failure never produces
/// partial output.
pub fn pack_archive(adf: &[u8], options: &PackOptions) -> Result<Vec<u8>> {
    let started = Instant::now();

    if adf.is_empty() {
        return Err(DmsError::invalid_format("Image is empty"));
    }
    if adf.len() % TRACK_LENGTH != 0 {
        return Err(DmsError::invalid_format(format!(
            "Image length {} is not a multiple of the {} byte track length",
            adf.len(),
            TRACK_LENGTH
        )));
    }
    if adf.len() / TRACK_LENGTH > FILE_ID_TRACK as usize {
        return Err(DmsError::invalid_format(format!(
            "Image has {} tracks, maximum is {}",
            adf.len() / TRACK_LENGTH,
            FILE_ID_TRACK
        )));
    }
    if !options.cmode.is_supported() {
        return Err(DmsError::UnsupportedCompression {
            mode: options.cmode.into(),
        });
    }

    let mut body = Vec::with_capacity(adf.len() / 2);
    let mut total_packed: u32 = 0;
    let mut total_unpacked: u32 = 0;
    let mut track_count: u16 = 0;

    for (number, track_data) in adf.chunks_exact(TRACK_LENGTH).enumerate() {
        let (header, payload) = pack_track(track_data, number as u16, options.cmode)?;
        body.extend_from_slice(&header.to_bytes());
        body.extend_from_slice(&payload);

        total_packed += payload.len() as u32;
        total_unpacked += track_data.len() as u32;
        track_count += 1;
    }

    let mut info_bits = InfoBits::default();
    if options.banner.is_some() {
        info_bits.set(InfoBits::BANNER);
    }
    if options.file_id.is_some() {
        info_bits.set(InfoBits::FILE_ID_DIZ);
    }

    let date = match options.date {
        Some(date) => date,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0),
    };

    let header = ArchiveHeader::new(
        info_bits,
        date,
        0,
        track_count - 1,
        total_packed,
        total_unpacked,
        started.elapsed().as_secs() as u32,
        options.cmode,
    );

    let mut archive = Vec::with_capacity(header.to_bytes().len() + body.len());
    archive.extend_from_slice(&header.to_bytes());

    if let Some(banner) = &options.banner {
        let (header, payload) = pack_track(banner, BANNER_TRACK, Cmode::NoComp)?;
        archive.extend_from_slice(&header.to_bytes());
        archive.extend_from_slice(&payload);
    }

    archive.extend_from_slice(&body);

    if let Some(file_id) = &options.file_id {
        let (header, payload) = pack_track(file_id, FILE_ID_TRACK, Cmode::NoComp)?;
        archive.extend_from_slice(&header.to_bytes());
        archive.extend_from_slice(&payload);
    }

    Ok(archive)
}

/// Pack an ADF image and write the archive to a file
pub fn write_dms<P: AsRef<Path>>(adf: &[u8], options: &PackOptions, path: P) -> Result<()> {
    let archive = pack_archive(adf, options)?;
    let mut file = File::create(path)?;
    file.write_all(&archive)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::{ARCHIVE_HEADER_SIZE, TRACK_HEADER_SIZE};

    #[test]
    fn test_pack_rejects_empty_image() {
        let result = pack_archive(&[], &PackOptions::default());
        assert!(matches!(result, Err(DmsError::InvalidFormat(_))));
    }

    #[test]
    fn test_pack_rejects_partial_track() {
        let adf = vec![0u8; TRACK_LENGTH + 100];
        let result = pack_archive(&adf, &PackOptions::default());
        assert!(matches!(result, Err(DmsError::InvalidFormat(_))));
    }

    #[test]
    fn test_pack_rejects_unimplemented_mode() {
        let adf = vec![0u8; TRACK_LENGTH];
        let result = pack_archive(&adf, &PackOptions::new(Cmode::Heavy3));
        assert!(matches!(
            result,
            Err(DmsError::UnsupportedCompression { mode: 7 })
        ));
    }

    #[test]
    fn test_pack_zero_image() {
        // Two all-zero tracks compress to a five-byte long-run escape each
        let adf = vec![0u8; 2 * TRACK_LENGTH];
        let archive = pack_archive(&adf, &PackOptions::default()).unwrap();

        assert_eq!(
            archive.len(),
            ARCHIVE_HEADER_SIZE + 2 * (TRACK_HEADER_SIZE + 5)
        );

        let header = ArchiveHeader::parse(&archive).unwrap();
        assert_eq!(header.low_track, 0);
        assert_eq!(header.high_track, 1);
        assert_eq!(header.track_count(), 2);
        assert_eq!(header.total_packed, 10);
        assert_eq!(header.total_unpacked, 2 * TRACK_LENGTH as u32);
        assert_eq!(header.cmode, Cmode::Simple);
    }

    #[test]
    fn test_pack_banner_precedes_main_tracks() {
        let adf = vec![0u8; TRACK_LENGTH];
        let options = PackOptions::default().with_banner(b"greetings".to_vec());
        let archive = pack_archive(&adf, &options).unwrap();

        let header = ArchiveHeader::parse(&archive).unwrap();
        assert!(header.info_bits.has_banner());
        assert!(!header.info_bits.has_file_id());

        // First track block after the header is the banner
        let block = &archive[ARCHIVE_HEADER_SIZE..];
        assert_eq!(&block[0..2], b"TR");
        assert_eq!(u16::from_be_bytes([block[2], block[3]]), BANNER_TRACK);
    }

    #[test]
    fn test_pack_date_override() {
        let adf = vec![0u8; TRACK_LENGTH];
        let options = PackOptions::default().with_date(1_234_567);
        let archive = pack_archive(&adf, &options).unwrap();

        let header = ArchiveHeader::parse(&archive).unwrap();
        assert_eq!(header.date, 1_234_567);
    }

    #[test]
    fn test_store_mode_totals_match_image() {
        let adf = vec![0u8; 2 * TRACK_LENGTH];
        let archive = pack_archive(&adf, &PackOptions::store()).unwrap();

        let header = ArchiveHeader::parse(&archive).unwrap();
        assert_eq!(header.cmode, Cmode::NoComp);
        assert_eq!(header.total_packed, header.total_unpacked);
    }
}
