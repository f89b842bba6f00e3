/*!
# dmspacker

A Rust library for packing ADF disk images into DMS (DiskMasher) archives
and reading them back.

## Features

- Pack raw ADF images into track-framed DMS archives
- Store or run-length compress tracks, with automatic store fallback
- Full integrity verification: additive checksums plus CRC-16 on every
  track payload, track header and the archive header
- Banner and FILE_ID.DIZ attachments on reserved track numbers
- Idiomatic Rust API with comprehensive error handling

## Quick Start

```rust,no_run
use dmspacker::{pack_archive, write_dms, Cmode, DmsArchive, PackOptions};

// Pack an ADF image into a DMS archive in memory
let adf = std::fs::read("disk.adf")?;
let archive_bytes = pack_archive(&adf, &PackOptions::default())?;

// Or write it straight to a file, attaching a banner
let options = PackOptions::new(Cmode::Simple).with_banner(b"packed in Rust".to_vec());
write_dms(&adf, &options, "disk.dms")?;

// Read an archive back, verifying every checksum and CRC
let archive = DmsArchive::open("disk.dms")?;
println!("{} tracks", archive.track_count());
let restored = archive.to_adf();
# Ok::<(), dmspacker::DmsError>(())
```

## DMS Format

A DMS archive is a 56-byte header followed by framed tracks. Every track
carries a 20-byte header with its own CRC, the CRC of the packed payload
and an additive checksum of the unpacked data. Tracks are 11264 bytes
unpacked, one Amiga cylinder. Banner and FILE_ID.DIZ texts travel as
tracks with reserved numbers.

## Modules

- `checksum`: Additive checksum and CRC-16/ARC routines
- `rle`: Run-length codec for the Simple compression mode
- `format`: Compression modes, info bits and format constants
- `archive`: Archive and track header framing (DmsArchive, TrackHeader)
- `io`: Reading and writing whole archives
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// DMS archive data structures (headers, tracks, DmsArchive)
pub mod archive;
/// Additive checksum and CRC-16/ARC routines
pub mod checksum;
/// Error types and Result alias
pub mod error;
/// Compression modes, info bits and format constants
pub mod format;
/// I/O operations for reading and writing archives
pub mod io;
/// Run-length codec
pub mod rle;

// Re-export common types
pub use archive::{
    pack_track, unpack_track, ArchiveHeader, DmsArchive, Track, TrackHeader,
};
pub use checksum::{additive_checksum, crc16};
pub use error::{DmsError, Result};
pub use format::{
    is_archive, Cmode, CpuCopro, DisketteType, InfoBits, MachineCpu, MachineType,
};
pub use io::{pack_archive, parse_archive, read_dms, write_dms, PackOptions};
