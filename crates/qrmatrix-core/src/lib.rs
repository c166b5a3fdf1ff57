//! # qrmatrix-core
//!
//! Interoperability matrix testing engine for independently implemented QR
//! encoder and decoder libraries.
//!
//! Given N encoders and M decoders behind the [`adapter`] contracts, the
//! engine determines which combinations round-trip data correctly across a
//! grid of payload sizes, rendered dimensions, content encodings, and error
//! correction levels, and explains why combinations fail: capacity
//! exhaustion, decode defect, or silent corruption. A module-geometry model
//! ([`geometry`]) ties failures back to fractional pixels-per-module, the
//! root interoperability hazard.
//!
//! This crate performs no QR encoding or decoding of its own, no file I/O,
//! and no CLI handling; it consumes adapter lists and configuration and
//! produces plain data structures for downstream reporting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use qrmatrix_core::{
//!     CorpusSpec, ContentType, EcLevel, MatrixConfig, MatrixRunner, MatrixSummary,
//! };
//! # fn adapters() -> (Vec<Arc<dyn qrmatrix_core::QrEncoder>>, Vec<Arc<dyn qrmatrix_core::QrDecoder>>) { unimplemented!() }
//!
//! let spec = CorpusSpec {
//!     data_sizes: vec![100, 500],
//!     pixel_sizes: vec![320, 440, 480],
//!     content_types: vec![ContentType::Alphanumeric, ContentType::Utf8],
//!     ec_levels: vec![EcLevel::L, EcLevel::H],
//! };
//! let (encoders, decoders) = adapters();
//! let runner = MatrixRunner::new(encoders, decoders, spec.generate(), MatrixConfig::default());
//! let matrix = runner.run_all().unwrap();
//! let summary = MatrixSummary::from_matrix(&matrix);
//! ```

pub mod adapter;
pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod error;
pub mod geometry;
pub mod outcome;
pub mod runner;

pub use adapter::{AdapterFailure, Encoded, EncodeOptions, QrDecoder, QrEncoder};
pub use aggregate::{
    AdapterStats, ComboStats, FractionalCorrelation, MatrixSummary, NonMonotonicPattern,
    StatBucket, is_non_monotonic,
};
pub use config::MatrixConfig;
pub use corpus::{ContentType, CorpusSpec, EcLevel, TestCase};
pub use error::{Error, Result};
pub use geometry::{ModuleGeometry, QUIET_ZONE_MODULES, QrVersion};
pub use outcome::{CompatibilityMatrix, Outcome, Status};
pub use runner::{CancelToken, MatrixRunner};

/// Version of qrmatrix-core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
