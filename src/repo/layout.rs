use std::ffi::OsString;
use std::fs::{self, File, ReadDir};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{PublishError, Result};

/// Suffix of a compressed release artifact
pub const RELEASE_EXTENSION: &str = "gz";
/// Suffix of a per-platform manifest
pub const MANIFEST_EXTENSION: &str = "json";

/// On-disk addressing of a patch repository.
///
/// ```text
/// <root>/<platform>.json
/// <root>/<version>/<platform>.gz
/// <root>/<old_version>/<new_version>/<platform>
/// ```
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
}

/// A top-level entry of the repository root
#[derive(Debug, Clone)]
pub struct VersionEntry {
    pub name: OsString,
    pub is_dir: bool,
}

impl VersionEntry {
    /// The entry name as a version, if it is valid UTF-8
    pub fn version(&self) -> Option<&str> {
        self.name.to_str()
    }
}

impl Repository {
    /// Open the repository at `root`, creating the root directory if missing
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| PublishError::Write {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn release_path(&self, version: &str, platform: &str) -> PathBuf {
        self.root
            .join(version)
            .join(format!("{platform}.{RELEASE_EXTENSION}"))
    }

    /// Patches live under the old version so a client can find them by
    /// listing its own version directory.
    pub fn patch_path(&self, old_version: &str, new_version: &str, platform: &str) -> PathBuf {
        self.root.join(old_version).join(new_version).join(platform)
    }

    pub fn manifest_path(&self, platform: &str) -> PathBuf {
        self.root.join(format!("{platform}.{MANIFEST_EXTENSION}"))
    }

    pub fn has_release(&self, version: &str, platform: &str) -> bool {
        self.release_path(version, platform).is_file()
    }

    /// Lazily list the root's entries, in filesystem order
    pub fn version_entries(&self) -> Result<VersionEntries> {
        let inner = fs::read_dir(&self.root).map_err(|source| PublishError::Read {
            path: self.root.clone(),
            source,
        })?;
        Ok(VersionEntries {
            root: self.root.clone(),
            inner,
        })
    }

    /// Write `bytes` to `path`, creating parents, and flush to disk
    pub fn write_durable(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = File::create(path)?;
            file.write_all(bytes)?;
            file.sync_all()
        };
        write().map_err(|source| PublishError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Iterator returned by [`Repository::version_entries`]
#[derive(Debug)]
pub struct VersionEntries {
    root: PathBuf,
    inner: ReadDir,
}

impl Iterator for VersionEntries {
    type Item = Result<VersionEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        Some(
            entry
                .and_then(|entry| {
                    let is_dir = entry.file_type()?.is_dir();
                    Ok(VersionEntry {
                        name: entry.file_name(),
                        is_dir,
                    })
                })
                .map_err(|source| PublishError::Read {
                    path: self.root.clone(),
                    source,
                }),
        )
    }
}
