use std::io::{self, Cursor};

use qbsdiff::Bsdiff;

/// Produces a patch turning `old` into `new`.
///
/// Implementations must fail rather than return a patch that does not
/// reproduce `new`.
pub trait DiffEngine: Send + Sync {
    fn diff(&self, old: &[u8], new: &[u8]) -> io::Result<Vec<u8>>;
}

/// BSDIFF40 patches, the format self-updating clients apply
#[derive(Debug, Default, Clone, Copy)]
pub struct BsdiffEngine;

impl DiffEngine for BsdiffEngine {
    fn diff(&self, old: &[u8], new: &[u8]) -> io::Result<Vec<u8>> {
        let mut patch = Vec::new();
        Bsdiff::new(old, new).compare(Cursor::new(&mut patch))?;
        Ok(patch)
    }
}
