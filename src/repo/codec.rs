//! Gzip framing for stored release artifacts.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{self, BufReader, Read, Write};

/// Compress a raw binary for storage
pub fn compress(raw: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw)?;
    encoder.finish()
}

/// Inflate a stored artifact back to the raw binary.
///
/// Any error comes from the stream itself being badly framed; callers that
/// read from disk should separate open/read failures from this one.
pub fn decompress<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(BufReader::new(reader));
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    Ok(raw)
}
