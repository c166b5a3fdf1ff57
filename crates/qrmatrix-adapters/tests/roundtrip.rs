//! Real-library round trip through the matrix engine
//!
//! Exercises the qrcode encoder and rqrr decoder end to end. Pixel sizes
//! here are chosen to render cleanly so the assertion is about the plumbing,
//! not about either library's tolerance for fractional modules.

use std::sync::Arc;

use qrmatrix_adapters::{QrcodeEncoder, RqrrDecoder};
use qrmatrix_core::adapter::{EncodeOptions, QrDecoder, QrEncoder};
use qrmatrix_core::corpus::{ContentType, EcLevel, TestCase};
use qrmatrix_core::{MatrixConfig, MatrixRunner, Status};

#[test]
fn qrcode_to_rqrr_roundtrip() -> anyhow::Result<()> {
    let payload = b"0123456789";
    let opts = EncodeOptions {
        ec_level: EcLevel::L,
        // Version 1 with quiet zone renders 29 modules per side; 290px gives
        // clean 10px modules.
        pixel_size: 290,
    };

    let encoded = QrcodeEncoder.encode(payload, &opts)?;
    let decoded = RqrrDecoder.decode(&encoded.image)?;
    assert_eq!(decoded, payload);
    Ok(())
}

#[test]
fn real_adapters_through_the_runner() {
    let cases = vec![TestCase::new(ContentType::Numeric, 10, 290, EcLevel::L)];
    let runner = MatrixRunner::new(
        vec![Arc::new(QrcodeEncoder)],
        vec![Arc::new(RqrrDecoder)],
        cases,
        MatrixConfig {
            parallel: false,
            ..MatrixConfig::default()
        },
    );

    let matrix = runner.run_all().expect("run completes");
    assert_eq!(matrix.outcomes.len(), 1);
    let outcome = &matrix.outcomes[0];
    assert_eq!(outcome.status, Status::Success, "{:?}", outcome.status);
    // qrcode reports its chosen version, so geometry must be populated.
    assert!(outcome.geometry.is_some());
}
