use clap::Parser;
use std::path::PathBuf;

use crate::config::default_platform;

/// Build a self-update repository: compressed releases, bsdiff patches from
/// every older version, and a manifest per platform.
#[derive(Parser, Debug)]
#[command(name = "selfupdate-gen", version)]
#[command(
    about = "Generate self-update releases and patches",
    after_help = "Single platform:  selfupdate-gen myapp 1.2\nCross platform:   selfupdate-gen /tmp/mybinaries/ 1.2"
)]
pub struct Cli {
    /// Binary to publish, or a directory of binaries named OS-ARCH
    pub path: PathBuf,
    /// Version being published
    #[arg(value_name = "VERSION")]
    pub release_version: String,
    /// Repository root to write updates into
    #[arg(short, long, default_value = "public")]
    pub output: PathBuf,
    /// Target platform as OS-ARCH (defaults to $GOOS-$GOARCH or the host)
    #[arg(long, default_value_t = default_platform())]
    pub platform: String,
    /// Number of diff workers (defaults to the CPU count, at most 6)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}
