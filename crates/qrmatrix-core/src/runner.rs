//! Matrix runner
//!
//! Drives one encode -> geometry probe -> decode -> validate cycle per
//! (encoder, decoder, test case) triple and classifies each outcome. Triples
//! are independent: a fault in one adapter invocation is confined to that
//! triple's outcome and never aborts the batch.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::adapter::{Encoded, EncodeOptions, QrDecoder, QrEncoder};
use crate::config::MatrixConfig;
use crate::corpus::TestCase;
use crate::error::{Error, Result};
use crate::geometry::ModuleGeometry;
use crate::outcome::{CompatibilityMatrix, Outcome, Status};

/// Shared flag for cancelling an in-flight run.
///
/// Once cancelled, the runner stops dispatching new triples promptly;
/// already-dispatched triples may finish or be abandoned, and no partial
/// results are committed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Orchestrates a complete matrix run over encoders x decoders x test cases.
pub struct MatrixRunner {
    encoders: Vec<Arc<dyn QrEncoder>>,
    decoders: Vec<Arc<dyn QrDecoder>>,
    cases: Vec<TestCase>,
    config: MatrixConfig,
    cancel: CancelToken,
}

impl MatrixRunner {
    pub fn new(
        encoders: Vec<Arc<dyn QrEncoder>>,
        decoders: Vec<Arc<dyn QrDecoder>>,
        cases: Vec<TestCase>,
        config: MatrixConfig,
    ) -> Self {
        Self {
            encoders,
            decoders,
            cases,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Token for cancelling this run from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Execute the complete matrix and return the assembled results.
    ///
    /// Fails fast on empty adapter or test case sets before any triple
    /// executes. On success every triple has exactly one outcome; a
    /// cancelled run returns [`Error::Cancelled`] and discards partial
    /// results.
    pub fn run_all(&self) -> Result<CompatibilityMatrix> {
        if self.encoders.is_empty() {
            return Err(Error::NoEncoders);
        }
        if self.decoders.is_empty() {
            return Err(Error::NoDecoders);
        }
        if self.cases.is_empty() {
            return Err(Error::NoTestCases);
        }
        self.config.validate()?;

        let mut triples = Vec::with_capacity(
            self.cases.len() * self.encoders.len() * self.decoders.len(),
        );
        for case in &self.cases {
            for encoder in &self.encoders {
                for decoder in &self.decoders {
                    triples.push((case, encoder, decoder));
                }
            }
        }

        let total = triples.len();
        let completed = AtomicUsize::new(0);
        let run_one = |&(case, encoder, decoder): &(
            &TestCase,
            &Arc<dyn QrEncoder>,
            &Arc<dyn QrDecoder>,
        )|
         -> Result<Outcome> {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let outcome = self.run_triple(case, encoder.as_ref(), Arc::clone(decoder));
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::debug!(
                case = %outcome.case_name,
                encoder = %outcome.encoder,
                decoder = %outcome.decoder,
                status = outcome.status.label(),
                completed = done,
                total,
                "triple complete"
            );
            Ok(outcome)
        };

        let outcomes: Result<Vec<Outcome>> = if self.config.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.max_workers)
                .build()
                .map_err(|e| Error::InvalidConfig(e.to_string()))?;
            pool.install(|| triples.par_iter().map(run_one).collect())
        } else {
            triples.iter().map(run_one).collect()
        };
        let outcomes = outcomes?;

        let successes = outcomes.iter().filter(|o| o.is_success()).count();
        let skips = outcomes.iter().filter(|o| o.is_capacity_skip()).count();
        tracing::info!(
            total,
            successes,
            capacity_skips = skips,
            failures = total - successes - skips,
            "matrix run complete"
        );

        let encoder_names = self.encoders.iter().map(|e| e.name().to_string()).collect();
        let decoder_names = self.decoders.iter().map(|d| d.name().to_string()).collect();
        Ok(CompatibilityMatrix::new(outcomes, encoder_names, decoder_names))
    }

    /// One encode -> probe -> decode -> validate cycle.
    fn run_triple(
        &self,
        case: &TestCase,
        encoder: &dyn QrEncoder,
        decoder: Arc<dyn QrDecoder>,
    ) -> Outcome {
        let mut outcome = Outcome {
            encoder: encoder.name().to_string(),
            decoder: decoder.name().to_string(),
            case_name: case.name.clone(),
            data_size: case.data_size,
            pixel_size: case.pixel_size,
            content_type: case.content_type,
            ec_level: case.ec_level,
            encode_time: Duration::ZERO,
            decode_time: Duration::ZERO,
            status: Status::Success,
            geometry: None,
        };

        let opts = EncodeOptions {
            ec_level: case.ec_level,
            pixel_size: case.pixel_size,
        };

        // Encode. A failure here terminates the triple; decode never runs.
        let encode_start = Instant::now();
        let encoded = panic::catch_unwind(AssertUnwindSafe(|| encoder.encode(&case.payload, &opts)));
        outcome.encode_time = encode_start.elapsed();

        let encoded: Encoded = match encoded {
            Ok(Ok(encoded)) => encoded,
            Ok(Err(failure)) => {
                outcome.status = Status::EncodeFailure {
                    capacity_exceeded: encoder.is_capacity_failure(&failure),
                    reason: failure.message().to_string(),
                };
                return outcome;
            }
            Err(payload) => {
                outcome.status = Status::EncodeFailure {
                    reason: format!("encoder panicked: {}", panic_message(&payload)),
                    capacity_exceeded: false,
                };
                return outcome;
            }
        };

        // Geometry probe, best effort. An encoder that reports no version
        // leaves the geometry unknown; that is not an error.
        outcome.geometry = encoded
            .version
            .map(|v| ModuleGeometry::for_render(v, case.pixel_size));

        // Decode under the per-invocation timeout.
        let (decode_time, decoded) =
            decode_with_timeout(decoder, encoded.image, self.config.decode_timeout);
        outcome.decode_time = decode_time;

        let decoded = match decoded {
            Ok(bytes) => bytes,
            Err(reason) => {
                outcome.status = Status::DecodeFailure { reason };
                return outcome;
            }
        };

        // Validate byte-for-byte.
        outcome.status = if decoded == case.payload {
            Status::Success
        } else {
            Status::DataMismatch {
                expected_len: case.payload.len(),
                actual_len: decoded.len(),
            }
        };
        outcome
    }
}

/// Run one decode on its own thread, bounded by `timeout`.
///
/// A decoder that hangs is abandoned and reported as a timeout failure; a
/// decoder that panics is reported as a decode failure. Either way the fault
/// stays scoped to this triple.
fn decode_with_timeout(
    decoder: Arc<dyn QrDecoder>,
    image: image::GrayImage,
    timeout: Duration,
) -> (Duration, std::result::Result<Vec<u8>, String>) {
    let (tx, rx) = mpsc::channel();
    let start = Instant::now();
    thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(&image)));
        // Receiver may be gone if the decode timed out; that is fine.
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(Ok(bytes))) => (start.elapsed(), Ok(bytes)),
        Ok(Ok(Err(failure))) => (start.elapsed(), Err(failure.to_string())),
        Ok(Err(payload)) => (
            start.elapsed(),
            Err(format!("decoder panicked: {}", panic_message(&payload))),
        ),
        Err(_) => (
            start.elapsed(),
            Err(format!("decode timed out after {timeout:?}")),
        ),
    }
}

/// Extract a readable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
