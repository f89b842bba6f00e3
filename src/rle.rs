/// Run-length codec for the Simple compression mode
///
/// Runs of a repeated byte are escaped with the 0x90 marker. Three wire
/// encodings exist:
///
/// - `90 00` - a literal 0x90 byte
/// - `90 rr vv` - value `vv` repeated `rr` times (3..=254)
/// - `90 FF vv hh ll` - value `vv` repeated `hhll` times (big-endian u16)
///
/// Runs too short to benefit from an escape are emitted literally, except
/// for the marker byte itself which must always be escaped. Runs longer
/// than 65535 are split across multiple escape sequences.
use crate::error::{DmsError, Result};

/// Escape marker byte reserved by the compressed stream
pub const RLE_MARKER: u8 = 0x90;

/// Shortest run emitted as a three-byte escape
const SHORT_RUN_MIN: usize = 3;

/// Shortest run emitted as a five-byte escape
const LONG_RUN_MIN: usize = 255;

/// Longest run a single five-byte escape can carry
const LONG_RUN_MAX: usize = 65535;

/// Compress a byte buffer
///
/// Never returns an error: any input has a valid encoding. The output may
/// be larger than the input when the data is dominated by isolated marker
/// bytes; callers that cannot tolerate expansion should compare lengths
/// and fall back to storing the input unmodified.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut pos = 0;

    while pos < data.len() {
        let value = data[pos];
        let mut run = 1;
        while pos + run < data.len() && data[pos + run] == value {
            run += 1;
        }
        pos += run;
        emit_run(&mut out, value, run);
    }

    out
}

/// Emit one run, splitting it across escapes where it exceeds u16 range
fn emit_run(out: &mut Vec<u8>, value: u8, mut run: usize) {
    while run > 0 {
        if run >= LONG_RUN_MIN {
            let take = run.min(LONG_RUN_MAX);
            out.push(RLE_MARKER);
            out.push(0xFF);
            out.push(value);
            out.extend_from_slice(&(take as u16).to_be_bytes());
            run -= take;
        } else if run >= SHORT_RUN_MIN {
            out.push(RLE_MARKER);
            out.push(run as u8);
            out.push(value);
            run = 0;
        } else if value == RLE_MARKER {
            // An isolated marker can never appear bare in the stream
            for _ in 0..run {
                out.push(RLE_MARKER);
                out.push(0x00);
            }
            run = 0;
        } else {
            for _ in 0..run {
                out.push(value);
            }
            run = 0;
        }
    }
}

/// Decompress a byte buffer
///
/// Fails with a parse error when an escape sequence runs past the end of
/// the input. A control byte in 1..=254 is always interpreted as a run
/// length even though the compressor only emits 3..=254.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    let mut pos = 0;

    while pos < data.len() {
        let byte = data[pos];
        pos += 1;

        if byte != RLE_MARKER {
            out.push(byte);
            continue;
        }

        let control = *data
            .get(pos)
            .ok_or_else(|| DmsError::parse(pos, "Truncated escape sequence"))?;
        pos += 1;

        match control {
            0x00 => out.push(RLE_MARKER),
            0xFF => {
                if pos + 3 > data.len() {
                    return Err(DmsError::parse(pos, "Truncated long run sequence"));
                }
                let value = data[pos];
                let run = u16::from_be_bytes([data[pos + 1], data[pos + 2]]) as usize;
                pos += 3;
                out.resize(out.len() + run, value);
            }
            run => {
                let value = *data
                    .get(pos)
                    .ok_or_else(|| DmsError::parse(pos, "Truncated short run sequence"))?;
                pos += 1;
                out.resize(out.len() + run as usize, value);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compress_empty() {
        assert_eq!(compress(b""), b"");
        assert_eq!(decompress(b"").unwrap(), b"");
    }

    #[test]
    fn test_compress_no_runs() {
        let data = b"abcdef";
        assert_eq!(compress(data), data);
    }

    #[test]
    fn test_compress_short_run_is_literal() {
        // Runs of 1 or 2 of an ordinary value are cheaper kept literal
        assert_eq!(compress(b"aabb"), b"aabb");
    }

    #[test]
    fn test_compress_short_escape() {
        assert_eq!(compress(b"aaa"), [0x90, 3, b'a']);
        assert_eq!(compress(&[b'x'; 254]), [0x90, 254, b'x']);
    }

    #[test]
    fn test_compress_long_escape() {
        assert_eq!(compress(&[0u8; 255]), [0x90, 0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(compress(&[0u8; 11264]), [0x90, 0xFF, 0x00, 0x2C, 0x00]);
    }

    #[test]
    fn test_compress_isolated_marker() {
        assert_eq!(compress(&[0x90]), [0x90, 0x00]);
        // The documented worst case: a pair of markers costs four bytes
        assert_eq!(compress(&[0x90, 0x90]), [0x90, 0x00, 0x90, 0x00]);
    }

    #[test]
    fn test_compress_marker_run() {
        // Three or more markers use the ordinary run escape
        assert_eq!(compress(&[0x90; 5]), [0x90, 5, 0x90]);
    }

    #[test]
    fn test_compress_splits_oversized_run() {
        let data = vec![7u8; 70000];
        let packed = compress(&data);
        assert_eq!(
            packed,
            [0x90, 0xFF, 7, 0xFF, 0xFF, 0x90, 0xFF, 7, 0x11, 0x71]
        );
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn test_decompress_literal_marker() {
        assert_eq!(decompress(&[0x41, 0x90, 0x00, 0x42]).unwrap(), b"A\x90B");
    }

    #[test]
    fn test_decompress_accepts_tiny_run_lengths() {
        // The compressor never emits these but the control byte is a length
        assert_eq!(decompress(&[0x90, 1, b'z']).unwrap(), b"z");
        assert_eq!(decompress(&[0x90, 2, b'z']).unwrap(), b"zz");
    }

    #[test]
    fn test_decompress_truncated_escape() {
        assert!(decompress(&[0x41, 0x90]).is_err());
        assert!(decompress(&[0x90, 5]).is_err());
        assert!(decompress(&[0x90, 0xFF, 7]).is_err());
        assert!(decompress(&[0x90, 0xFF, 7, 0x01]).is_err());
    }

    #[test]
    fn test_round_trip_mixed() {
        let mut data = Vec::new();
        data.extend_from_slice(b"header");
        data.extend_from_slice(&[0u8; 1000]);
        data.push(0x90);
        data.extend_from_slice(&[0x90; 2]);
        data.extend_from_slice(&[0xE5; 300]);
        data.extend_from_slice(b"trailer");

        let packed = compress(&data);
        assert!(packed.len() < data.len());
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    proptest! {
        #[test]
        fn prop_round_trip_arbitrary(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let packed = compress(&data);
            prop_assert_eq!(decompress(&packed).unwrap(), data);
        }

        #[test]
        fn prop_round_trip_run_heavy(
            runs in proptest::collection::vec((0x8Eu8..=0x92, 0usize..600), 0..24)
        ) {
            // Buffers built from runs around the marker byte hit every
            // escape form including the split and isolated-marker cases
            let mut data = Vec::new();
            for (value, length) in runs {
                data.resize(data.len() + length, value);
            }
            let packed = compress(&data);
            prop_assert_eq!(decompress(&packed).unwrap(), data);
        }
    }
}
