//! Batch generator for identifier QR codes (`H001.png` .. `H100.png`).

pub mod builder;
pub mod error;
pub mod generator;
pub mod identifier;
pub mod sheet;
pub mod verify;

pub use builder::{ArtifactDecoder, ArtifactEncoder, DecodeFailure, QrPng, RenderOptions};
pub use error::{GenerateError, Result};
pub use generator::{
    ensure_output_location, generate_artifact, Artifact, BatchConfig, BatchEvent, BatchSummary, EventSink, Generator,
    TracingSink, DEFAULT_OUTPUT_DIR,
};
pub use identifier::{format_identifier, IdScheme};
pub use qrcode::EcLevel;
pub use verify::{decode_artifact, verify_directory, VerifyReport};

/// Installs the fmt subscriber used by the binaries; `RUST_LOG` overrides
/// the `info` default.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
