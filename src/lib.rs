//! # selfupdate-gen
//!
//! Builds a repository of self-update artifacts.
//!
//! For every published version and platform it stores a gzip-compressed copy
//! of the binary, a bsdiff patch from every older version that shipped the
//! same platform, and a JSON manifest clients poll for the newest version.
//!
//! ```text
//! <root>/<platform>.json
//! <root>/<version>/<platform>.gz
//! <root>/<old_version>/<new_version>/<platform>
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use selfupdate_gen::{PublishConfig, Publisher};
//! use std::path::Path;
//!
//! let config = PublishConfig::new("public", "1.2").unwrap();
//! let publisher = Publisher::new(config).unwrap();
//! publisher.publish(Path::new("target/release/myapp"), "linux-amd64").unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod release;
pub mod repo;
pub mod utils;

pub use config::PublishConfig;
pub use error::{PublishError, Result};
pub use release::publish_path;
pub use repo::{Manifest, PublishReport, Publisher, SkipReason};
