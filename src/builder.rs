use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Luma};
use qrcode::{EcLevel, QrCode};

use crate::error::{GenerateError, Result};

pub const ARTIFACT_EXTENSION: &str = "png";
pub const DEFAULT_MIN_SIZE: u32 = 200;

/// Turns a payload into the bytes of a scannable image.
///
/// Implementations must round-trip: decoding the returned image yields
/// `payload` byte for byte.
pub trait ArtifactEncoder {
    fn encode(&self, payload: &str) -> Result<Vec<u8>>;
}

/// Reads the payload back out of an encoded image.
pub trait ArtifactDecoder {
    fn decode(&self, png: &[u8]) -> std::result::Result<String, DecodeFailure>;
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeFailure {
    #[error("not a readable image: {0}")]
    Image(#[from] image::ImageError),
    #[error("no QR code found in image")]
    NoCode,
    #[error("QR code could not be read: {0}")]
    Damaged(#[from] rqrr::DeQRError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub ec_level: EcLevel,
    pub min_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

/// Grayscale PNG QR codes: `qrcode` + `image` to build, `rqrr` to read.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrPng {
    options: RenderOptions,
}

impl QrPng {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl ArtifactEncoder for QrPng {
    fn encode(&self, payload: &str) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.options.ec_level)
            .map_err(|source| GenerateError::Encode {
                payload: payload.to_string(),
                source,
            })?;

        let size = self.options.min_size;
        let image = code.render::<Luma<u8>>().min_dimensions(size, size).build();

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(image.as_raw(), image.width(), image.height(), ColorType::L8)
            .map_err(GenerateError::Render)?;
        Ok(png)
    }
}

impl ArtifactDecoder for QrPng {
    fn decode(&self, png: &[u8]) -> std::result::Result<String, DecodeFailure> {
        let luma = image::load_from_memory(png)?.to_luma8();

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            luma.width() as usize,
            luma.height() as usize,
            |x, y| luma.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        let grid = grids.first().ok_or(DecodeFailure::NoCode)?;

        let (_meta, content) = grid.decode()?;
        Ok(content)
    }
}
