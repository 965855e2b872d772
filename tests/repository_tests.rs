mod common;

use anyhow::Result;
use selfupdate_gen::config::PublishConfig;
use selfupdate_gen::repo::{Repository, compress, decompress, read_manifest};
use selfupdate_gen::utils::sha256_file;
use selfupdate_gen::{PublishError, Publisher};
use std::collections::HashSet;
use std::path::PathBuf;
use tempfile::TempDir;

use common::{snapshot, write_file};

#[test]
fn sha256_file_matches_expected_value() -> Result<()> {
    let dir = TempDir::new()?;
    let file = write_file(dir.path(), "hash.txt", b"hello world");

    assert_eq!(
        hex::encode(sha256_file(&file)?),
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
    );
    Ok(())
}

#[test]
fn snapshot_collects_relative_paths_and_hashes() -> Result<()> {
    let dir = TempDir::new()?;
    let file_a = write_file(dir.path(), "a.json", b"one");
    write_file(dir.path(), "1.0/linux-amd64.gz", b"two");

    let files = snapshot(dir.path())?;

    assert_eq!(files.len(), 2);
    assert_eq!(files[&PathBuf::from("a.json")], hex::encode(sha256_file(&file_a)?));
    assert!(files.contains_key(&PathBuf::from("1.0/linux-amd64.gz")));
    Ok(())
}

#[test]
fn layout_addresses_releases_patches_and_manifests() -> Result<()> {
    let dir = TempDir::new()?;
    let repo = Repository::open(dir.path().join("public"))?;
    let root = repo.root().to_path_buf();

    assert!(root.is_dir());
    assert_eq!(
        repo.release_path("1.0", "linux-amd64"),
        root.join("1.0").join("linux-amd64.gz")
    );
    assert_eq!(
        repo.patch_path("1.0", "1.1", "linux-amd64"),
        root.join("1.0").join("1.1").join("linux-amd64")
    );
    assert_eq!(
        repo.manifest_path("linux-amd64"),
        root.join("linux-amd64.json")
    );
    Ok(())
}

#[test]
fn version_entries_report_names_and_kinds() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(dir.path(), "1.0/linux-amd64.gz", b"x");
    write_file(dir.path(), "1.1/linux-amd64.gz", b"y");
    write_file(dir.path(), "linux-amd64.json", b"{}");

    let repo = Repository::open(dir.path())?;
    let entries: HashSet<(String, bool)> = repo
        .version_entries()?
        .map(|entry| entry.map(|e| (e.name.to_string_lossy().into_owned(), e.is_dir)))
        .collect::<Result<_, _>>()?;

    let expected: HashSet<(String, bool)> = [
        ("1.0".to_string(), true),
        ("1.1".to_string(), true),
        ("linux-amd64.json".to_string(), false),
    ]
    .into_iter()
    .collect();
    assert_eq!(entries, expected);
    assert!(repo.has_release("1.0", "linux-amd64"));
    assert!(!repo.has_release("1.0", "windows-amd64"));
    Ok(())
}

#[test]
fn codec_round_trips_and_rejects_bad_framing() -> Result<()> {
    let raw = common::fake_binary(3);
    let packed = compress(&raw)?;

    assert_eq!(decompress(packed.as_slice())?, raw);
    assert!(decompress(&b"plain bytes, no gzip header"[..]).is_err());
    Ok(())
}

#[test]
fn manifest_is_indented_json_with_base64_digest() -> Result<()> {
    let dir = TempDir::new()?;
    let root = dir.path().join("public");
    let binary = b"0123456789";

    common::publish_bytes(&root, "1.0", "linux-amd64", binary, 1)?;

    let text = std::fs::read_to_string(root.join("linux-amd64.json"))?;
    // sha256("0123456789"), base64
    assert_eq!(
        text,
        "{\n    \"Version\": \"1.0\",\n    \"Sha256\": \"hNiYd/DUBB77a/kaFvAkjy/Vc+avBcGflr7bn4gveII=\"\n}"
    );

    let manifest = read_manifest(&Repository::open(&root)?, "linux-amd64")?;
    assert_eq!(manifest.version, "1.0");
    assert_eq!(
        manifest.sha256_hex(),
        "84d89877f0d4041efb6bf91a16f0248f2fd573e6af05c19f96bedb9f882f7882"
    );
    Ok(())
}

#[test]
fn identifiers_must_be_single_path_components() -> Result<()> {
    let dir = TempDir::new()?;

    let err = PublishConfig::new(dir.path(), "../escape").unwrap_err();
    assert!(matches!(err, PublishError::InvalidIdentifier { kind: "version", .. }));

    let source = write_file(dir.path(), "bin", b"binary");
    let publisher = Publisher::new(PublishConfig::new(dir.path().join("out"), "1.0")?)?;
    let err = publisher.publish(&source, "linux/amd64").unwrap_err();
    assert!(matches!(err, PublishError::InvalidIdentifier { kind: "platform", .. }));
    Ok(())
}
