//! Locating constituent grid files under a data root.
//!
//! Products ship either one combined file per constituent (`m2.nc`) or a
//! separate amplitude and phase file (`m2_amplitude.nc`, `m2_phase.nc`),
//! anywhere below the root and in any letter case.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, StoreError};

/// File names that may hold the amplitude of `constituent`, preferred first.
pub fn amplitude_candidates(constituent: &str) -> [String; 3] {
    let c = constituent.to_lowercase();
    [format!("{c}.nc"), format!("{c}_amplitude.nc"), format!("{c}_amp.nc")]
}

/// File names that may hold the phase of `constituent`, preferred first.
pub fn phase_candidates(constituent: &str) -> [String; 3] {
    let c = constituent.to_lowercase();
    [format!("{c}.nc"), format!("{c}_phase.nc"), format!("{c}_pha.nc")]
}

/// Lower-cased file name to path for every file below a root.
///
/// When the same name appears in several directories the first one in
/// sorted walk order wins.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    files: HashMap<String, PathBuf>,
}

impl FileIndex {
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(StoreError::MissingDirectory(root.to_path_buf()));
        }

        let mut files = HashMap::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| StoreError::Directory {
                path: root.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_lowercase();
            files.entry(name).or_insert_with(|| entry.into_path());
        }

        debug!(root = %root.display(), files = files.len(), "Indexed grid directory");
        Ok(Self { files })
    }

    /// The first candidate present, in candidate order.
    pub fn find(&self, candidates: &[String]) -> Option<&Path> {
        candidates
            .iter()
            .find_map(|name| self.files.get(&name.to_lowercase()))
            .map(PathBuf::as_path)
    }

    /// Amplitude and phase files for `constituent`, if both exist.
    pub fn constituent_files(&self, constituent: &str) -> Option<(&Path, &Path)> {
        let amp = self.find(&amplitude_candidates(constituent))?;
        let pha = self.find(&phase_candidates(constituent))?;
        Some((amp, pha))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
