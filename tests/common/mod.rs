#![allow(dead_code)]

use anyhow::Result;
use qbsdiff::Bspatch;
use selfupdate_gen::{PublishConfig, PublishReport, Publisher};
use selfupdate_gen::utils::sha256_file;
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn write_file(root: &Path, relative: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// A fake executable whose bytes drift a little with every release
pub fn fake_binary(release: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = b"\x7fELF\x02\x01\x01\x00".to_vec();
    bytes.extend((0..8192).map(|i| ((i * 31 + (i / 512) * release) % 251) as u8));
    bytes.extend(format!("release-{release}").as_bytes());
    bytes
}

pub fn publish_bytes(
    root: &Path,
    version: &str,
    platform: &str,
    bytes: &[u8],
    workers: usize,
) -> Result<PublishReport> {
    let staging = tempfile::TempDir::new()?;
    let source = write_file(staging.path(), platform, bytes);
    let config = PublishConfig::new(root, version)?.with_workers(workers);
    Ok(Publisher::new(config)?.publish(&source, platform)?)
}

pub fn apply_patch(old: &[u8], patch: &[u8]) -> Result<Vec<u8>> {
    let mut new = Vec::new();
    Bspatch::new(patch)?.apply(old, Cursor::new(&mut new))?;
    Ok(new)
}

pub fn read_release(path: &Path) -> Result<Vec<u8>> {
    Ok(selfupdate_gen::repo::decompress(fs::File::open(path)?)?)
}

/// Every file under `dir`, keyed by relative path, with its hex SHA-256
pub fn snapshot(dir: &Path) -> Result<BTreeMap<PathBuf, String>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            let relative = entry.path().strip_prefix(dir)?.to_path_buf();
            files.insert(relative, hex::encode(sha256_file(entry.path())?));
        }
    }
    Ok(files)
}
