//! The fixed allow-list of runnable scripts.
//!
//! [`ALLOWED_SCRIPTS`] is the only source of script names. Lookups compare
//! the requested name against that table before any path is built, so a
//! caller can never reach a file that is not listed here.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// One row of the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedScript {
    /// Public name used in URLs.
    pub name: &'static str,
    /// File name relative to the scripts directory.
    pub file_name: &'static str,
    pub description: &'static str,
}

/// The scripts this service may read or execute.
pub const ALLOWED_SCRIPTS: [AllowedScript; 2] = [
    AllowedScript {
        name: "hello_world",
        file_name: "hello_world.sh",
        description: "Prints a greeting from Kortex followed by the current timestamp.",
    },
    AllowedScript {
        name: "verify_hello_world",
        file_name: "verify_hello_world.sh",
        description: "Runs hello_world and checks the greeting and that its timestamp is recent.",
    },
];

/// Metadata for an allow-listed script, read fresh from the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDescriptor {
    pub name: String,
    pub file_path: String,
    pub description: String,
    pub modified_at: Timestamp,
    /// Size in bytes.
    pub file_size: u64,
}

/// Read-only view over the allow-list, rooted at a scripts directory.
#[derive(Debug, Clone)]
pub struct ScriptRegistry {
    scripts_dir: PathBuf,
    entries: Vec<AllowedScript>,
}

impl ScriptRegistry {
    /// Registry over [`ALLOWED_SCRIPTS`].
    pub fn new(scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
            entries: ALLOWED_SCRIPTS.to_vec(),
        }
    }

    /// Registry over a custom table. Names must be unique.
    pub fn with_entries(
        scripts_dir: impl Into<PathBuf>,
        entries: Vec<AllowedScript>,
    ) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name) {
                return Err(CoreError::Validation(format!(
                    "Duplicate script name in allow-list: {}",
                    entry.name
                )));
            }
        }
        Ok(Self {
            scripts_dir: scripts_dir.into(),
            entries,
        })
    }

    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Allow-listed names, in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// The allow-list row for `name`, if any.
    pub fn entry(&self, name: &str) -> Option<&AllowedScript> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Absolute or scripts-dir-relative path of an entry's file.
    pub fn path_of(&self, entry: &AllowedScript) -> PathBuf {
        self.scripts_dir.join(entry.file_name)
    }

    /// Descriptor for `name`.
    ///
    /// `NotFound` when the name is not allow-listed or its file is missing.
    pub async fn get(&self, name: &str) -> Result<ScriptDescriptor, CoreError> {
        let entry = self.entry(name).ok_or_else(|| not_found(name))?;
        self.describe(entry).await.map_err(|e| {
            tracing::warn!(script = name, error = %e, "Allow-listed script is unreadable");
            not_found(name)
        })
    }

    /// Descriptors for every allow-listed script present on disk.
    pub async fn list(&self) -> Vec<ScriptDescriptor> {
        let mut scripts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match self.describe(entry).await {
                Ok(descriptor) => scripts.push(descriptor),
                Err(e) => {
                    tracing::warn!(script = entry.name, error = %e, "Skipping missing script");
                }
            }
        }
        scripts
    }

    /// Scripts whose name or description contains `query`, ignoring case.
    pub async fn search(&self, query: &str) -> Vec<ScriptDescriptor> {
        let needle = query.trim().to_lowercase();
        let scripts = self.list().await;
        if needle.is_empty() {
            return scripts;
        }
        scripts
            .into_iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle)
                    || s.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Raw source text of an allow-listed script.
    pub async fn read_source(&self, name: &str) -> Result<String, CoreError> {
        let entry = self.entry(name).ok_or_else(|| not_found(name))?;
        let path = self.path_of(entry);
        match tokio::fs::read_to_string(&path).await {
            Ok(source) => Ok(source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found(name)),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn describe(&self, entry: &AllowedScript) -> std::io::Result<ScriptDescriptor> {
        let path = self.path_of(entry);
        let meta = tokio::fs::metadata(&path).await?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a file", path.display()),
            ));
        }
        Ok(ScriptDescriptor {
            name: entry.name.to_string(),
            file_path: path.display().to_string(),
            description: entry.description.to_string(),
            modified_at: Timestamp::from(meta.modified()?),
            file_size: meta.len(),
        })
    }
}

fn not_found(name: &str) -> CoreError {
    CoreError::NotFound {
        entity: "script",
        key: name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
