mod codec;
mod engine;
mod layout;
mod manifest;
mod publish;

pub use codec::{compress, decompress};
pub use engine::{BsdiffEngine, DiffEngine};
pub use layout::{
    MANIFEST_EXTENSION, RELEASE_EXTENSION, Repository, VersionEntries, VersionEntry,
};
pub use manifest::{Manifest, read_manifest, write_manifest};
pub use publish::{EntryOutcome, PublishReport, Publisher, SkipReason};
