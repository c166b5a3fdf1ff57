//! Decoder adapter for the `rqrr` crate

use image::GrayImage;

use qrmatrix_core::adapter::{AdapterFailure, QrDecoder};

/// Wraps the `rqrr` crate behind the decoder contract.
///
/// Only the first detected symbol is decoded; the matrix always renders a
/// single QR code per image.
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn name(&self) -> &str {
        "rqrr"
    }

    fn decode(&self, image: &GrayImage) -> Result<Vec<u8>, AdapterFailure> {
        let mut prepared = rqrr::PreparedImage::prepare(image.clone());
        let grids = prepared.detect_grids();
        let grid = grids
            .first()
            .ok_or_else(|| AdapterFailure::new("rqrr: no QR code found"))?;

        let (_meta, content) = grid
            .decode()
            .map_err(|e| AdapterFailure::new(format!("rqrr: decode failed: {e}")))?;
        Ok(content.into_bytes())
    }
}
