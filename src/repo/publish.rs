use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::bounded;

use super::codec;
use super::engine::{BsdiffEngine, DiffEngine};
use super::layout::{Repository, VersionEntry};
use super::manifest::{Manifest, write_manifest};
use crate::config::{PublishConfig, validate_identifier};
use crate::error::{PublishError, Result};

/// Why an existing repository entry got no patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkipReason {
    NotADirectory,
    CurrentVersion,
    NoRelease,
    InvalidName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::NotADirectory => "is not a directory",
            SkipReason::CurrentVersion => "is the version being published",
            SkipReason::NoRelease => "has no release for this platform",
            SkipReason::InvalidName => "is not a valid version name",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Patched { version: String, patch: PathBuf },
    Skipped { entry: String, reason: SkipReason },
}

/// Result of publishing one platform
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub version: String,
    pub platform: String,
    pub release: PathBuf,
    pub manifest: Manifest,
    /// Old versions that received a patch, sorted
    pub patched: Vec<String>,
    /// Entries left alone, sorted by name
    pub skipped: Vec<(String, SkipReason)>,
}

/// Publishes releases into a repository and patches every older version up
/// to the one being published.
pub struct Publisher {
    repo: Repository,
    config: PublishConfig,
    engine: Arc<dyn DiffEngine>,
}

impl Publisher {
    pub fn new(config: PublishConfig) -> Result<Self> {
        Self::with_engine(config, Arc::new(BsdiffEngine))
    }

    pub fn with_engine(config: PublishConfig, engine: Arc<dyn DiffEngine>) -> Result<Self> {
        let repo = Repository::open(&config.root)?;
        Ok(Self {
            repo,
            config,
            engine,
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Store `source` as the current version for `platform`, generate the
    /// missing patches and rewrite the manifest.
    pub fn publish(&self, source: &Path, platform: &str) -> Result<PublishReport> {
        validate_identifier("platform", platform)?;
        let version = self.config.version.as_str();
        tracing::info!("Publishing {} for {}", version, platform);

        let raw = fs::read(source).map_err(|err| PublishError::SourceUnreadable {
            path: source.to_path_buf(),
            source: err,
        })?;
        let release = self.store_release(version, platform, &raw)?;
        drop(raw);

        // Diff against what landed on disk, not the buffer we wrote from.
        let new_raw = self
            .load_release(version, platform)
            .map_err(fresh_release_error)?;
        let outcomes = self.generate_patches(platform, &new_raw)?;

        let manifest = write_manifest(&self.repo, version, platform, source)?;

        let mut patched = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                EntryOutcome::Patched { version, .. } => patched.push(version),
                EntryOutcome::Skipped { entry, reason } => skipped.push((entry, reason)),
            }
        }
        patched.sort();
        skipped.sort();

        tracing::info!(
            "Published {} for {}: {} patched, {} skipped",
            version,
            platform,
            patched.len(),
            skipped.len()
        );

        Ok(PublishReport {
            version: version.to_string(),
            platform: platform.to_string(),
            release,
            manifest,
            patched,
            skipped,
        })
    }

    fn store_release(&self, version: &str, platform: &str, raw: &[u8]) -> Result<PathBuf> {
        let path = self.repo.release_path(version, platform);
        let compressed = codec::compress(raw).map_err(|source| PublishError::Write {
            path: path.clone(),
            source,
        })?;
        self.repo.write_durable(&path, &compressed)?;
        tracing::info!("Stored release {}", path.display());
        Ok(path)
    }

    /// Read and inflate a stored release
    pub fn load_release(&self, version: &str, platform: &str) -> Result<Vec<u8>> {
        let path = self.repo.release_path(version, platform);
        let compressed = fs::read(&path).map_err(|source| PublishError::Read {
            path: path.clone(),
            source,
        })?;
        codec::decompress(compressed.as_slice())
            .map_err(|source| PublishError::CorruptArtifact { path, source })
    }

    /// Fan the repository entries out to the worker pool.
    ///
    /// Every worker writes under a distinct old-version directory, so the
    /// only shared state is the cancellation flag.
    fn generate_patches(&self, platform: &str, new_raw: &[u8]) -> Result<Vec<EntryOutcome>> {
        let entries = self.repo.version_entries()?;
        let workers = self.config.workers.max(1);
        tracing::info!("Diffing with {} workers", workers);

        let cancelled = AtomicBool::new(false);
        let (tx, rx) = bounded::<VersionEntry>(0);

        let (dispatch_result, worker_results) = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let rx = rx.clone();
                    let cancelled = &cancelled;
                    scope.spawn(move || -> Result<Vec<EntryOutcome>> {
                        let mut outcomes = Vec::new();
                        for entry in rx.iter() {
                            if cancelled.load(Ordering::Acquire) {
                                break;
                            }
                            match self.process_entry(&entry, platform, new_raw) {
                                Ok(outcome) => outcomes.push(outcome),
                                Err(err) => {
                                    tracing::error!("{}", err);
                                    cancelled.store(true, Ordering::Release);
                                    return Err(err);
                                }
                            }
                        }
                        Ok(outcomes)
                    })
                })
                .collect();
            drop(rx);

            let mut dispatch_result = Ok(());
            for entry in entries {
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                match entry {
                    Ok(entry) => {
                        // Fails only once every worker has bailed out.
                        if tx.send(entry).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        cancelled.store(true, Ordering::Release);
                        dispatch_result = Err(err);
                        break;
                    }
                }
            }
            drop(tx);

            let worker_results: Vec<_> = handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect();
            (dispatch_result, worker_results)
        });

        dispatch_result?;
        let mut outcomes = Vec::new();
        for result in worker_results {
            outcomes.extend(result?);
        }
        Ok(outcomes)
    }

    fn process_entry(
        &self,
        entry: &VersionEntry,
        platform: &str,
        new_raw: &[u8],
    ) -> Result<EntryOutcome> {
        let entry_name = entry.name.to_string_lossy().into_owned();
        tracing::info!("Processing {}", entry_name);

        let skip = |reason: SkipReason| -> Result<EntryOutcome> {
            tracing::info!("{} {}, skipped", entry_name, reason);
            Ok(EntryOutcome::Skipped {
                entry: entry_name.clone(),
                reason,
            })
        };

        if !entry.is_dir {
            return skip(SkipReason::NotADirectory);
        }
        let Some(old_version) = entry.version() else {
            return skip(SkipReason::InvalidName);
        };
        if validate_identifier("version", old_version).is_err() {
            return skip(SkipReason::InvalidName);
        }
        let new_version = self.config.version.as_str();
        if old_version == new_version {
            return skip(SkipReason::CurrentVersion);
        }
        if !self.repo.has_release(old_version, platform) {
            return skip(SkipReason::NoRelease);
        }

        let old_raw = self.load_release(old_version, platform)?;
        let patch = self
            .engine
            .diff(&old_raw, new_raw)
            .map_err(|source| PublishError::DiffFailed {
                old_version: old_version.to_string(),
                new_version: new_version.to_string(),
                platform: platform.to_string(),
                source,
            })?;

        let patch_path = self.repo.patch_path(old_version, new_version, platform);
        self.repo.write_durable(&patch_path, &patch)?;
        tracing::info!("Done with {} ({} byte patch)", old_version, patch.len());

        Ok(EntryOutcome::Patched {
            version: old_version.to_string(),
            patch: patch_path,
        })
    }
}

/// A release written moments ago that fails to inflate is a storage problem
/// with the new release, not corruption in the repository's history.
fn fresh_release_error(err: PublishError) -> PublishError {
    match err {
        PublishError::CorruptArtifact { path, source } => PublishError::Read { path, source },
        other => other,
    }
}
