/// DMS archive data structures

/// Archive header build and parse
pub mod header;
/// Track framing, packing and unpacking
pub mod track;

pub use header::ArchiveHeader;
pub use track::{pack_track, unpack_track, TrackHeader};

use crate::error::Result;
use crate::format::Cmode;
use std::path::Path;

/// One decoded main track of the disk image
#[derive(Debug, Clone)]
pub struct Track {
    /// Track number
    pub number: u16,
    /// Compression mode the track was stored with
    pub cmode: Cmode,
    /// Packed size the track occupied in the archive
    pub packed_length: u16,
    /// Unpacked track data
    data: Vec<u8>,
}

impl Track {
    /// Create a track from its number, stored mode and unpacked data
    pub fn new(number: u16, cmode: Cmode, packed_length: u16, data: Vec<u8>) -> Self {
        Self {
            number,
            cmode,
            packed_length,
            data,
        }
    }

    /// Get the unpacked track data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the unpacked length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the track holds no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A parsed DMS archive
///
/// Holds the verified archive header, the decoded main tracks in order,
/// and any banner or FILE_ID.DIZ attachments found alongside them.
#[derive(Debug, Clone)]
pub struct DmsArchive {
    /// Verified archive header
    pub(crate) header: ArchiveHeader,
    /// Decoded main tracks in track number order
    pub(crate) tracks: Vec<Track>,
    /// Banner attachment
    pub(crate) banner: Option<Vec<u8>>,
    /// FILE_ID.DIZ attachment
    pub(crate) file_id: Option<Vec<u8>>,
    /// Original filename if loaded from disk
    pub(crate) filename: Option<String>,
}

impl DmsArchive {
    /// Open and fully verify a DMS archive from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::io::reader::read_dms(path)
    }

    /// Parse and fully verify a DMS archive from a byte buffer
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        crate::io::reader::parse_archive(bytes)
    }

    /// Get the archive header
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Get the decoded main tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Get the number of main tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Get a main track by its number
    pub fn get_track(&self, number: u16) -> Option<&Track> {
        self.tracks.iter().find(|t| t.number == number)
    }

    /// Get the banner attachment
    pub fn banner(&self) -> Option<&[u8]> {
        self.banner.as_deref()
    }

    /// Get the FILE_ID.DIZ attachment
    pub fn file_id(&self) -> Option<&[u8]> {
        self.file_id.as_deref()
    }

    /// Get the original filename if loaded from disk
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Total unpacked size of all main tracks
    pub fn total_unpacked(&self) -> usize {
        self.tracks.iter().map(|t| t.len()).sum()
    }

    /// Reassemble the raw ADF image from the decoded tracks
    pub fn to_adf(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.total_unpacked());
        for track in &self.tracks {
            data.extend_from_slice(track.data());
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Cmode, InfoBits};

    fn sample_archive() -> DmsArchive {
        DmsArchive {
            header: ArchiveHeader::new(InfoBits::default(), 0, 0, 1, 20, 40, 0, Cmode::NoComp),
            tracks: vec![
                Track::new(0, Cmode::NoComp, 20, vec![0xAA; 20]),
                Track::new(1, Cmode::NoComp, 20, vec![0xBB; 20]),
            ],
            banner: Some(b"hello".to_vec()),
            file_id: None,
            filename: None,
        }
    }

    #[test]
    fn test_track_accessors() {
        let track = Track::new(3, Cmode::Simple, 3, vec![1, 2, 3]);
        assert_eq!(track.number, 3);
        assert_eq!(track.cmode, Cmode::Simple);
        assert_eq!(track.data(), &[1, 2, 3]);
        assert_eq!(track.len(), 3);
        assert!(!track.is_empty());
    }

    #[test]
    fn test_get_track() {
        let archive = sample_archive();
        assert!(archive.get_track(1).is_some());
        assert!(archive.get_track(5).is_none());
    }

    #[test]
    fn test_to_adf_concatenates_in_order() {
        let archive = sample_archive();
        let adf = archive.to_adf();
        assert_eq!(adf.len(), 40);
        assert!(adf[..20].iter().all(|&b| b == 0xAA));
        assert!(adf[20..].iter().all(|&b| b == 0xBB));
    }

    #[test]
    fn test_attachments() {
        let archive = sample_archive();
        assert_eq!(archive.banner(), Some(b"hello".as_slice()));
        assert!(archive.file_id().is_none());
    }
}
