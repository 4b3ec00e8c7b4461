//! Character manifests
//!
//! A manifest is a plain text file of nine paths, one per line, in this
//! order: lower model, lower skin, upper model, upper skin, head model, head
//! skin, weapon model, weapon skin, animation description. Relative paths
//! are resolved against the directory holding the manifest.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Md3Error, Result};

/// Number of entries in a manifest
pub const MANIFEST_ENTRIES: usize = 9;

/// Model and skin of one body part
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct PartFiles {
    pub model: PathBuf,
    pub skin: PathBuf,
}

/// Files making up a player character
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterManifest {
    pub lower: PartFiles,
    pub upper: PartFiles,
    pub head: PartFiles,
    pub weapon: PartFiles,
    pub animation: PathBuf,
}

impl CharacterManifest {
    /// Parse manifest text; blank lines are skipped.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let entries: Vec<PathBuf> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| base_dir.join(line))
            .collect();

        if entries.len() < MANIFEST_ENTRIES {
            return Err(Md3Error::InvalidManifest(format!(
                "expected {MANIFEST_ENTRIES} entries, found {}",
                entries.len()
            )));
        }
        if entries.len() > MANIFEST_ENTRIES {
            log::warn!(
                "Ignoring {} trailing manifest entries",
                entries.len() - MANIFEST_ENTRIES
            );
        }

        let mut entries = entries.into_iter();
        let mut part = || PartFiles {
            model: entries.next().unwrap_or_default(),
            skin: entries.next().unwrap_or_default(),
        };
        let lower = part();
        let upper = part();
        let head = part();
        let weapon = part();

        Ok(Self {
            lower,
            upper,
            head,
            weapon,
            animation: entries.next().unwrap_or_default(),
        })
    }

    /// Read a manifest file, resolving entries next to it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading character manifest from {}", path.display());
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&fs::read_to_string(path)?, base_dir)
    }
}
