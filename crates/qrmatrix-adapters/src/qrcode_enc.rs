//! Encoder adapter for the `qrcode` crate

use image::GrayImage;
use image::imageops::{self, FilterType};
use qrcode::types::QrError;
use qrcode::{EcLevel as QrcodeEcLevel, QrCode, Version};

use qrmatrix_core::adapter::{AdapterFailure, Encoded, EncodeOptions, QrEncoder};
use qrmatrix_core::corpus::EcLevel;
use qrmatrix_core::geometry::QrVersion;

/// Wraps the `qrcode` crate behind the encoder contract.
///
/// The symbol is rendered at one pixel per module and then scaled to the
/// exact requested dimension with nearest-neighbor sampling, so target sizes
/// that are not an integer multiple of the module grid produce genuinely
/// fractional module rendering.
pub struct QrcodeEncoder;

impl QrEncoder for QrcodeEncoder {
    fn name(&self) -> &str {
        "qrcode"
    }

    fn encode(
        &self,
        payload: &[u8],
        opts: &EncodeOptions,
    ) -> Result<Encoded, AdapterFailure> {
        if opts.pixel_size == 0 {
            return Err(AdapterFailure::new("qrcode: pixel size must be positive"));
        }

        let ec = match opts.ec_level {
            EcLevel::L => QrcodeEcLevel::L,
            EcLevel::M => QrcodeEcLevel::M,
            EcLevel::Q => QrcodeEcLevel::Q,
            EcLevel::H => QrcodeEcLevel::H,
        };

        let code = QrCode::with_error_correction_level(payload, ec).map_err(|e| match e {
            QrError::DataTooLong => {
                AdapterFailure::capacity(format!("qrcode: data too long: {e:?}"))
            }
            other => AdapterFailure::new(format!("qrcode: encode failed: {other:?}")),
        })?;

        let version = match code.version() {
            Version::Normal(n) if (1..=40).contains(&n) => QrVersion::new(n as u8),
            _ => None,
        };

        let module_image: GrayImage = code
            .render::<image::Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(1, 1)
            .build();
        let image = imageops::resize(
            &module_image,
            opts.pixel_size,
            opts.pixel_size,
            FilterType::Nearest,
        );

        Ok(Encoded { image, version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_at_exact_pixel_size() {
        let opts = EncodeOptions {
            ec_level: EcLevel::M,
            pixel_size: 320,
        };
        let encoded = QrcodeEncoder.encode(b"HELLO WORLD", &opts).unwrap();
        assert_eq!(encoded.image.width(), 320);
        assert_eq!(encoded.image.height(), 320);
        assert!(encoded.version.is_some());
    }

    #[test]
    fn oversized_payload_is_a_capacity_failure() {
        let opts = EncodeOptions {
            ec_level: EcLevel::H,
            pixel_size: 320,
        };
        // Far beyond version 40 byte-mode capacity.
        let payload = vec![0xAB; 5000];
        let failure = QrcodeEncoder.encode(&payload, &opts).unwrap_err();
        assert!(QrcodeEncoder.is_capacity_failure(&failure));
    }
}
