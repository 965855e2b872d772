use std::fs;
use std::path::Path;

use crate::error::{PublishError, Result};
use crate::repo::{PublishReport, Publisher};

/// Publish `input` as the configured version.
///
/// A single file is published for `default_platform`; a directory is treated
/// as one binary per platform, each named after its platform.
pub fn publish_path(
    publisher: &Publisher,
    input: &Path,
    default_platform: &str,
) -> Result<Vec<PublishReport>> {
    let metadata = fs::metadata(input).map_err(|source| PublishError::SourceUnreadable {
        path: input.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return Ok(vec![publisher.publish(input, default_platform)?]);
    }

    let read_err = |source: std::io::Error| PublishError::Read {
        path: input.to_path_buf(),
        source,
    };
    let mut binaries = Vec::new();
    for entry in fs::read_dir(input).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        // Follows symlinks, so linked build outputs are published too.
        let is_file = fs::metadata(&path)
            .map_err(|source| PublishError::SourceUnreadable {
                path: path.clone(),
                source,
            })?
            .is_file();
        if !is_file {
            tracing::warn!("{} is not a file, skipped", path.display());
            continue;
        }
        let Ok(platform) = entry.file_name().into_string() else {
            tracing::warn!("{} is not a valid platform name, skipped", path.display());
            continue;
        };
        binaries.push((platform, path));
    }

    if binaries.is_empty() {
        return Err(PublishError::InvalidInput(format!(
            "no binaries found in {}",
            input.display()
        )));
    }
    binaries.sort();

    binaries
        .iter()
        .map(|(platform, path)| publisher.publish(path, platform))
        .collect()
}
