use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::layout::Repository;
use crate::error::{PublishError, Result};
use crate::utils::sha256_file;

/// What a client polls: the newest version for a platform and its digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "Version")]
    pub version: String,
    /// SHA-256 of the uncompressed binary
    #[serde(rename = "Sha256", with = "base64_bytes")]
    pub sha256: Vec<u8>,
}

impl Manifest {
    pub fn sha256_hex(&self) -> String {
        hex::encode(&self.sha256)
    }

    /// JSON with four-space indentation, no trailing newline
    pub fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }
}

/// Hash the raw binary at `source` and overwrite the platform's manifest
pub fn write_manifest(
    repo: &Repository,
    version: &str,
    platform: &str,
    source: &Path,
) -> Result<Manifest> {
    let sha256 = sha256_file(source).map_err(|source_err| PublishError::SourceUnreadable {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    let manifest = Manifest {
        version: version.to_string(),
        sha256,
    };

    let path = repo.manifest_path(platform);
    let bytes = manifest
        .to_pretty_json()
        .map_err(|source| PublishError::Manifest {
            path: path.clone(),
            source,
        })?;
    repo.write_durable(&path, &bytes)?;

    tracing::info!("Manifest {} -> {} ({})", platform, version, manifest.sha256_hex());
    Ok(manifest)
}

pub fn read_manifest(repo: &Repository, platform: &str) -> Result<Manifest> {
    let path = repo.manifest_path(platform);
    let bytes = fs::read(&path).map_err(|source| PublishError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| PublishError::Manifest { path, source })
}

mod base64_bytes {
    use super::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
