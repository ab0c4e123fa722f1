//! Content-hash cached file writing.
//!
//! Every output file is rendered from scratch each run, but only written
//! when its content actually differs from what is on disk. Volatile
//! substrings (timestamps, serials) are masked out before hashing so they
//! alone never cause a rewrite. The comparison hash is recomputed from the
//! current on-disk content, so there is no index file to go stale.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Replacement token for masked volatile substrings.
const MASK_SENTINEL: &str = "-hash:omit-";

/// What happened to one output file during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// One changed output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// All file changes of one run, in event order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub changes: Vec<Change>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// Writer that skips files whose masked content hash is unchanged and
/// tracks which paths a run touched.
#[derive(Debug, Default)]
pub struct CachedWriter {
    processed: BTreeSet<PathBuf>,
    report: RunReport,
}

impl CachedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `content` to `path` unless the file already holds content
    /// hashing identically once `masks` are applied. Returns whether the
    /// file was (re)written.
    pub fn write(&mut self, path: &Path, content: &str, masks: &[Regex]) -> Result<bool, CoreError> {
        self.processed.insert(path.to_path_buf());

        let existing = match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                // Unreadable counts as absent and gets overwritten.
                warn!("could not read existing {}: {err}", path.display());
                None
            }
        };

        let new_hash = content_hash(content, masks);
        let fresh = existing
            .as_ref()
            .is_some_and(|text| content_hash(text, masks) == new_hash);
        if fresh {
            debug!("file fresh: {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| CoreError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;

        let kind = if existing.is_some() {
            ChangeKind::Updated
        } else {
            ChangeKind::Created
        };
        info!("{kind} {}", path.display());
        self.report.changes.push(Change {
            path: path.to_path_buf(),
            kind,
        });
        Ok(true)
    }

    /// Delete entries of `dir` that no [`write`](Self::write) call touched
    /// this run, recording each deletion.
    pub fn clean_directory(&mut self, dir: &Path) -> Result<(), CoreError> {
        let clean_err = |source| CoreError::CleanDirectory {
            path: dir.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(dir).map_err(clean_err)? {
            let path = entry.map_err(clean_err)?.path();
            if self.processed.contains(&path) {
                continue;
            }

            info!("removing stale file {}", path.display());
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(err) = removed {
                warn!("could not remove {}: {err}", path.display());
                continue;
            }
            self.report.changes.push(Change {
                path,
                kind: ChangeKind::Deleted,
            });
        }

        Ok(())
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }
}

fn content_hash(content: &str, masks: &[Regex]) -> String {
    let mut text = content.replace("\r\n", "\n").trim().to_owned();
    for mask in masks {
        text = mask.replace_all(&text, MASK_SENTINEL).into_owned();
    }
    format!("{:x}", Sha256::digest(text.as_bytes()))
}
