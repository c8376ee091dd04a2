//! BLAKE3 fingerprints of module source trees

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, StackupError};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Directories produced by building or installing a module
const IGNORED_DIRS: &[&str] = &[".git", "__pycache__", ".pytest_cache", "build", "dist"];

fn is_ignored(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    IGNORED_DIRS.contains(&name.as_ref()) || name.ends_with(".egg-info")
}

fn update_from_file(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let read_failed = |e: std::io::Error| StackupError::IoError {
        message: format!("Failed to read {}: {}", path.display(), e),
    };

    let mut reader = BufReader::new(File::open(path).map_err(read_failed)?);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_failed)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(())
}

/// Calculate BLAKE3 hash of a module's source tree
///
/// Files are hashed recursively, sorted by path for deterministic
/// results. Build and cache directories are skipped so an install does
/// not change the fingerprint of the tree it was installed from.
pub fn hash_directory(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return Err(StackupError::IoError {
            message: format!("Not a directory: {}", path.display()),
        });
    }

    let mut hasher = Hasher::new();
    let files: Vec<_> = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .collect();

    for entry in files {
        let file_path = entry.path();

        // Include relative path in hash for uniqueness
        let relative_path = file_path
            .strip_prefix(path)
            .unwrap_or(file_path)
            .to_string_lossy()
            .replace('\\', "/");
        hasher.update(relative_path.as_bytes());
        hasher.update(b"\0");

        update_from_file(&mut hasher, file_path)?;
        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}
