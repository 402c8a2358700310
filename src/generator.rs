use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::builder::{ArtifactEncoder, ARTIFACT_EXTENSION, QrPng, RenderOptions};
use crate::error::{GenerateError, Result};
use crate::identifier::IdScheme;

pub const DEFAULT_OUTPUT_DIR: &str = "qrcodes";
pub const DEFAULT_FIRST: u64 = 1;
pub const DEFAULT_LAST: u64 = 100;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub output_dir: PathBuf,
    pub scheme: IdScheme,
    pub first: u64,
    pub last: u64,
    pub render: RenderOptions,
}

impl BatchConfig {
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn identifiers(&self) -> Result<impl Iterator<Item = String> + '_> {
        self.scheme.range(self.first, self.last)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            scheme: IdScheme::default(),
            first: DEFAULT_FIRST,
            last: DEFAULT_LAST,
            render: RenderOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub identifier: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub output_dir: PathBuf,
    pub artifacts: Vec<Artifact>,
}

impl BatchSummary {
    pub fn count(&self) -> usize {
        self.artifacts.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Written(Artifact),
    Finished { output_dir: PathBuf, count: usize },
}

/// Receives one `Written` per artifact, then a single `Finished`.
pub trait EventSink {
    fn emit(&mut self, event: &BatchEvent);
}

impl<F: FnMut(&BatchEvent)> EventSink for F {
    fn emit(&mut self, event: &BatchEvent) {
        self(event)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Written(artifact) => info!(
                identifier = %artifact.identifier,
                path = %artifact.path.display(),
                outcome = "written",
                "QR code generated"
            ),
            BatchEvent::Finished { output_dir, count } => info!(
                output_dir = %output_dir.display(),
                count,
                "Finished generating all QR codes"
            ),
        }
    }
}

/// Creates `path` (and missing parents) unless it is already a directory.
pub fn ensure_output_location(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| GenerateError::io(path, e))
}

pub fn artifact_path(output_dir: impl AsRef<Path>, identifier: &str) -> PathBuf {
    output_dir
        .as_ref()
        .join(format!("{identifier}.{ARTIFACT_EXTENSION}"))
}

/// Encodes `identifier` and writes it to `<output_dir>/<identifier>.png`,
/// replacing whatever was there. `sink` gets one `Written` once the file is
/// on disk.
pub fn generate_artifact<E>(
    encoder: &E,
    identifier: &str,
    output_dir: impl AsRef<Path>,
    sink: &mut dyn EventSink,
) -> Result<Artifact>
where
    E: ArtifactEncoder + ?Sized,
{
    let bytes = encoder.encode(identifier)?;
    let path = artifact_path(output_dir, identifier);
    fs::write(&path, bytes).map_err(|e| GenerateError::io(&path, e))?;
    let artifact = Artifact {
        identifier: identifier.to_string(),
        path,
    };
    sink.emit(&BatchEvent::Written(artifact.clone()));
    Ok(artifact)
}

pub struct Generator<E = QrPng> {
    encoder: E,
    config: BatchConfig,
}

impl Generator<QrPng> {
    pub fn new(config: BatchConfig) -> Self {
        let encoder = QrPng::new(config.render);
        Self { encoder, config }
    }
}

impl<E: ArtifactEncoder> Generator<E> {
    pub fn with_encoder(encoder: E, config: BatchConfig) -> Self {
        Self { encoder, config }
    }

    /// Writes every artifact in the configured range, stopping at the first
    /// error. Files written before a failure are left in place.
    pub fn run(&self, sink: &mut dyn EventSink) -> Result<BatchSummary> {
        let identifiers = self.config.identifiers()?;
        let output_dir = &self.config.output_dir;

        ensure_output_location(output_dir)?;

        let mut artifacts = Vec::new();
        for identifier in identifiers {
            artifacts.push(generate_artifact(&self.encoder, &identifier, output_dir, sink)?);
        }

        sink.emit(&BatchEvent::Finished {
            output_dir: output_dir.clone(),
            count: artifacts.len(),
        });

        Ok(BatchSummary {
            output_dir: output_dir.clone(),
            artifacts,
        })
    }
}
