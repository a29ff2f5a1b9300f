// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::ViewMode;

pub const PREFS_FILENAME: &str = "myotome-prefs.json";

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// On-disk shape of the prefs document. The view mode is stored as a raw
/// string and re-validated on load so a hand-edited or stale file can never
/// poison startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PrefsDoc {
    #[serde(default)]
    view_mode: Option<String>,
}

/// A single JSON prefs file with atomic writes.
#[derive(Debug, Clone)]
pub struct PrefsFile {
    path: PathBuf,
}

impl PrefsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(PREFS_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted view mode. Missing file, unreadable file, broken
    /// JSON, and unknown values all load as simple; this never errors.
    pub fn load_view_mode(&self) -> ViewMode {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return ViewMode::Simple;
        };
        let Ok(doc) = serde_json::from_str::<PrefsDoc>(&raw) else {
            return ViewMode::Simple;
        };
        doc.view_mode
            .as_deref()
            .and_then(ViewMode::parse)
            .unwrap_or(ViewMode::Simple)
    }

    pub fn save_view_mode(&self, mode: ViewMode) -> Result<(), StoreError> {
        let doc = PrefsDoc {
            view_mode: Some(mode.as_str().to_owned()),
        };
        let body = serde_json::to_string_pretty(&doc).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, format!("{body}\n").as_bytes())
    }
}

/// Writes a temp file next to the target and renames it into place so a
/// crash mid-write can never leave a truncated prefs document behind.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = match parent {
        Some(parent) => parent.join(format!(
            ".myotome.tmp.{}.{}",
            file_name.to_string_lossy(),
            nanos
        )),
        None => PathBuf::from(format!(
            ".myotome.tmp.{}.{}",
            file_name.to_string_lossy(),
            nanos
        )),
    };

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    drop(file);

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
