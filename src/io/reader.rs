/// DMS archive reader

use crate::archive::track::{unpack_track, TrackHeader};
use crate::archive::{ArchiveHeader, DmsArchive, Track};
use crate::error::{DmsError, Result};
use crate::format::constants::{
    ARCHIVE_HEADER_SIZE, BANNER_TRACK, FILE_ID_TRACK, TRACK_HEADER_SIZE, TRACK_LENGTH,
};
use std::fs;
use std::path::Path;

/// Read and fully verify a DMS archive from disk
pub fn read_dms<P: AsRef<Path>>(path: P) -> Result<DmsArchive> {
    let bytes = fs::read(&path)?;
    let mut archive = parse_archive(&bytes)?;
    archive.filename = path
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(archive)
}

/// Parse and fully verify a DMS archive from a byte buffer
///
/// Verifies the archive header, then walks the track blocks: each header
/// CRC, payload CRC, unpacked length and checksum must hold. Main tracks
/// must appear in order and cover exactly the header's low..=high range;
/// the reserved banner and FILE_ID.DIZ numbers are captured as attachments.
pub fn parse_archive(bytes: &[u8]) -> Result<DmsArchive> {
    let header = ArchiveHeader::parse(bytes)?;

    let mut tracks = Vec::with_capacity(header.track_count());
    let mut banner = None;
    let mut file_id = None;
    let mut expected = header.low_track as u32;
    let mut pos = ARCHIVE_HEADER_SIZE;

    while pos < bytes.len() {
        if pos + TRACK_HEADER_SIZE > bytes.len() {
            return Err(DmsError::parse(pos, "Truncated track header"));
        }
        let track_header = TrackHeader::parse(&bytes[pos..pos + TRACK_HEADER_SIZE])?;
        pos += TRACK_HEADER_SIZE;

        let packed = track_header.packed_length as usize;
        if pos + packed > bytes.len() {
            return Err(DmsError::parse(pos, "Truncated track payload"));
        }
        let data = unpack_track(&track_header, &bytes[pos..pos + packed])?;
        pos += packed;

        let number = track_header.number;
        if number >= header.low_track && number <= header.high_track {
            if number as u32 != expected {
                return Err(DmsError::invalid_format(format!(
                    "Track {} out of order, expected {}",
                    number, expected
                )));
            }
            if data.len() != TRACK_LENGTH {
                return Err(DmsError::invalid_format(format!(
                    "Track {} is {} bytes, expected {}",
                    number,
                    data.len(),
                    TRACK_LENGTH
                )));
            }
            expected += 1;
            tracks.push(Track::new(
                number,
                track_header.cmode,
                track_header.packed_length,
                data,
            ));
        } else if number == BANNER_TRACK {
            banner = Some(data);
        } else if number == FILE_ID_TRACK {
            file_id = Some(data);
        } else {
            return Err(DmsError::invalid_format(format!(
                "Unexpected track number {}",
                number
            )));
        }
    }

    if tracks.len() != header.track_count() {
        return Err(DmsError::invalid_format(format!(
            "Archive contains {} tracks, header declares {}",
            tracks.len(),
            header.track_count()
        )));
    }

    Ok(DmsArchive {
        header,
        tracks,
        banner,
        file_id,
        filename: None,
    })
}
