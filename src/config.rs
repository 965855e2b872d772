use std::path::{Path, PathBuf};

use crate::error::{PublishError, Result};

/// Upper bound on diff workers, whatever the host offers
pub const MAX_WORKERS: usize = 6;

/// Settings shared by every platform published in one run
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub root: PathBuf,
    pub version: String,
    pub workers: usize,
}

impl PublishConfig {
    pub fn new(root: impl Into<PathBuf>, version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        validate_identifier("version", &version)?;
        Ok(Self {
            root: root.into(),
            version,
            workers: default_workers(),
        })
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

pub fn default_workers() -> usize {
    num_cpus::get().clamp(1, MAX_WORKERS)
}

/// Versions and platforms become path components, so each must be exactly one.
pub fn validate_identifier(kind: &'static str, value: &str) -> Result<()> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || Path::new(value).components().count() != 1;

    if invalid {
        return Err(PublishError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// `$GOOS-$GOARCH` when both are set, otherwise the host in the same naming.
pub fn default_platform() -> String {
    match (std::env::var("GOOS"), std::env::var("GOARCH")) {
        (Ok(os), Ok(arch)) if !os.is_empty() && !arch.is_empty() => format!("{os}-{arch}"),
        _ => host_platform(),
    }
}

fn host_platform() -> String {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    };
    format!("{os}-{arch}")
}
