//! Adapter contracts for pluggable QR libraries
//!
//! Every encoder/decoder library under test is wrapped behind one of these
//! capability traits. The engine never inspects adapter internals beyond the
//! name string, which is used only for grouping results.

use image::GrayImage;
use thiserror::Error;

use crate::corpus::EcLevel;
use crate::geometry::QrVersion;

/// A failure reported by an adapter.
///
/// Adapters must translate every internal library error into this value;
/// nothing may escape the adapter boundary as a panic on the happy path
/// (the runner additionally catches panics as a last resort).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AdapterFailure {
    message: String,
    capacity: bool,
}

impl AdapterFailure {
    /// A generic adapter failure with a descriptive message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            capacity: false,
        }
    }

    /// A capacity rejection: the payload does not fit the requested
    /// size/EC level. This is correct encoder behavior, not a defect.
    pub fn capacity(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            capacity: true,
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this failure is a capacity rejection.
    pub fn is_capacity(&self) -> bool {
        self.capacity
    }
}

/// Encoding parameters passed to every encoder invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Requested error correction level.
    pub ec_level: EcLevel,
    /// Target image dimension in pixels (width and height).
    ///
    /// The resulting pixels-per-module is
    /// `pixel_size / (module_count + quiet_zone)`; fractional values are the
    /// interoperability hazard the matrix exists to measure.
    pub pixel_size: u32,
}

/// A rendered QR symbol plus encoder-side metadata.
#[derive(Debug, Clone)]
pub struct Encoded {
    /// The rendered symbol, grayscale.
    pub image: GrayImage,
    /// The QR version the encoder chose, when it reports one.
    /// `None` is a legitimate state, not an error.
    pub version: Option<QrVersion>,
}

/// Capability contract for QR encoder libraries.
///
/// Implementations are stateless and safe to invoke concurrently.
pub trait QrEncoder: Send + Sync {
    /// Identifier used for grouping results, e.g. `"qrcode"`.
    fn name(&self) -> &str;

    /// Render `payload` as a QR symbol at the requested size and EC level.
    fn encode(&self, payload: &[u8], opts: &EncodeOptions) -> Result<Encoded, AdapterFailure>;

    /// Whether `failure` is a capacity rejection rather than a defect.
    /// Capacity rejections are excluded from success-rate denominators.
    fn is_capacity_failure(&self, failure: &AdapterFailure) -> bool {
        failure.is_capacity()
    }
}

/// Capability contract for QR decoder libraries.
///
/// Implementations are stateless and safe to invoke concurrently, and must
/// catch any abrupt failure inside the wrapped library: one misbehaving
/// adapter must never abort a matrix run.
pub trait QrDecoder: Send + Sync {
    /// Identifier used for grouping results, e.g. `"rqrr"`.
    fn name(&self) -> &str;

    /// Extract the payload from a rendered QR symbol.
    fn decode(&self, image: &GrayImage) -> Result<Vec<u8>, AdapterFailure>;
}
