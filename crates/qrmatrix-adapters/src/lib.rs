//! # qrmatrix-adapters
//!
//! Adapters wrapping real QR libraries behind the qrmatrix-core contracts.
//!
//! Each adapter lives behind a cargo feature so native or heavyweight
//! backends can be excluded at build time. The engine never consults any
//! global registry: callers assemble the enabled adapter lists once at
//! startup via [`builtin_encoders`] / [`builtin_decoders`] (or hand-build
//! their own) and pass them to the runner.

use std::sync::Arc;

use qrmatrix_core::{QrDecoder, QrEncoder};

#[cfg(feature = "enc-qrcode")]
mod qrcode_enc;
#[cfg(feature = "dec-rqrr")]
mod rqrr_dec;

#[cfg(feature = "enc-qrcode")]
pub use qrcode_enc::QrcodeEncoder;
#[cfg(feature = "dec-rqrr")]
pub use rqrr_dec::RqrrDecoder;

/// All encoder adapters enabled in this build.
pub fn builtin_encoders() -> Vec<Arc<dyn QrEncoder>> {
    #[allow(unused_mut)]
    let mut encoders: Vec<Arc<dyn QrEncoder>> = Vec::new();
    #[cfg(feature = "enc-qrcode")]
    encoders.push(Arc::new(QrcodeEncoder));
    encoders
}

/// All decoder adapters enabled in this build.
pub fn builtin_decoders() -> Vec<Arc<dyn QrDecoder>> {
    #[allow(unused_mut)]
    let mut decoders: Vec<Arc<dyn QrDecoder>> = Vec::new();
    #[cfg(feature = "dec-rqrr")]
    decoders.push(Arc::new(RqrrDecoder));
    decoders
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lists_match_enabled_features() {
        let encoders = builtin_encoders();
        let decoders = builtin_decoders();
        assert_eq!(encoders.len(), cfg!(feature = "enc-qrcode") as usize);
        assert_eq!(decoders.len(), cfg!(feature = "dec-rqrr") as usize);
    }
}
