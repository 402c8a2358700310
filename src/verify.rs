use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::builder::{ArtifactDecoder, ARTIFACT_EXTENSION};
use crate::error::{GenerateError, Result};

/// Reads the identifier encoded in the artifact at `path`.
pub fn decode_artifact<D>(decoder: &D, path: impl AsRef<Path>) -> Result<String>
where
    D: ArtifactDecoder + ?Sized,
{
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| GenerateError::io(path, e))?;
    decoder
        .decode(&bytes)
        .map_err(|source| GenerateError::decode(path, source))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    Ok,
    Mismatch { decoded: String },
    Unreadable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCheck {
    pub path: PathBuf,
    pub expected: String,
    #[serde(flatten)]
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub checked: Vec<FileCheck>,
    pub missing: Vec<String>,
    pub unexpected: Vec<PathBuf>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.unexpected.is_empty()
            && self.checked.iter().all(|c| c.status == Status::Ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileCheck> {
        self.checked.iter().filter(|c| c.status != Status::Ok)
    }
}

/// `*.png` files directly inside `dir`, sorted by path. The extension match
/// is exact, as the generator only ever writes lowercase `.png`.
pub fn list_artifacts(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            GenerateError::io(path, e.into())
        })?;
        let is_png = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == ARTIFACT_EXTENSION);
        if entry.file_type().is_file() && is_png {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

/// Decodes every artifact in `dir` and checks it against its file name.
///
/// With `expected`, identifiers lacking a file land in `missing` and files
/// outside the list land in `unexpected` (they are still decoded).
pub fn verify_directory<D>(decoder: &D, dir: impl AsRef<Path>, expected: Option<&[String]>) -> Result<VerifyReport>
where
    D: ArtifactDecoder + ?Sized,
{
    let mut report = VerifyReport::default();
    let mut seen = BTreeSet::new();
    let wanted: Option<BTreeSet<&str>> = expected.map(|ids| ids.iter().map(String::as_str).collect());

    for path in list_artifacts(dir)? {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(wanted) = &wanted {
            if !wanted.contains(stem.as_str()) {
                report.unexpected.push(path.clone());
            }
        }

        let status = match decode_artifact(decoder, &path) {
            Ok(decoded) if decoded == stem => Status::Ok,
            Ok(decoded) => {
                warn!(path = %path.display(), expected = %stem, decoded = %decoded, "payload does not match file name");
                Status::Mismatch { decoded }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "artifact unreadable");
                Status::Unreadable {
                    reason: e.to_string(),
                }
            }
        };
        debug!(path = %path.display(), ?status, "checked");

        seen.insert(stem.clone());
        report.checked.push(FileCheck {
            path,
            expected: stem,
            status,
        });
    }

    if let Some(ids) = expected {
        report.missing = ids.iter().filter(|id| !seen.contains(*id)).cloned().collect();
    }

    Ok(report)
}
