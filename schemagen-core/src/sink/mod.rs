//! Artifact sinks
//!
//! Generated files are addressed by a relative, `/`-separated path such as
//! `posts.json` or `migrations/references/<ts>_add_references_to_posts_table.php`.
//! Writing the same path twice overwrites the earlier contents.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Destination for generated artifacts
pub trait ArtifactSink {
    fn put(&mut self, path: &str, contents: &str) -> io::Result<()>;
}

/// Reject paths that would escape the sink root
fn validate_path(path: &str) -> io::Result<()> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.starts_with('\\')
        || path.split(['/', '\\']).any(|segment| segment == "..")
        || Path::new(path).is_absolute();
    if invalid {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid artifact path: \"{}\"", path),
        ));
    }
    Ok(())
}

/// Writes artifacts below a root directory, creating parents as needed
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn put(&mut self, path: &str, contents: &str) -> io::Result<()> {
        validate_path(path)?;
        let dest = self.root.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, contents)?;
        log::debug!("Wrote {}", dest.display());
        Ok(())
    }
}

/// Keeps artifacts in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn put(&mut self, path: &str, contents: &str) -> io::Result<()> {
        validate_path(path)?;
        self.files.insert(path.to_string(), contents.to_string());
        Ok(())
    }
}
