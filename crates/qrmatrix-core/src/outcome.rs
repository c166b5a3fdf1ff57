//! Outcome taxonomy and the compatibility matrix
//!
//! Every (encoder, decoder, test case) triple produces exactly one
//! [`Outcome`] carrying exactly one [`Status`]. The completed
//! [`CompatibilityMatrix`] is the sole artifact handed to downstream
//! reporting collaborators.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::corpus::{ContentType, EcLevel};
use crate::geometry::ModuleGeometry;

/// Classified result of one encode-decode-validate cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum Status {
    /// Decode succeeded and the bytes matched the original payload.
    Success,
    /// The encoder refused or failed; decode was never attempted.
    EncodeFailure {
        /// Descriptive message from the adapter.
        reason: String,
        /// True for a capacity rejection (payload too large for the
        /// requested size/EC level) -- expected behavior, not a defect.
        capacity_exceeded: bool,
    },
    /// The decoder failed, timed out, or panicked.
    DecodeFailure {
        /// Descriptive message from the adapter or fault boundary.
        reason: String,
    },
    /// Decode "succeeded" but returned bytes differing from the payload.
    /// Silent corruption, the worst class of interoperability defect.
    DataMismatch {
        /// Original payload length in bytes.
        expected_len: usize,
        /// Decoded output length in bytes.
        actual_len: usize,
    },
}

impl Status {
    /// Short label for logging and grouping.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::EncodeFailure {
                capacity_exceeded: true,
                ..
            } => "capacity-skip",
            Status::EncodeFailure { .. } => "encode-failure",
            Status::DecodeFailure { .. } => "decode-failure",
            Status::DataMismatch { .. } => "data-mismatch",
        }
    }
}

/// The record of one (encoder, decoder, test case) triple.
///
/// Produced once by the runner, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Encoder identifier.
    pub encoder: String,
    /// Decoder identifier.
    pub decoder: String,
    /// Test case name.
    pub case_name: String,
    /// Declared payload size in bytes.
    pub data_size: usize,
    /// Target rendered dimension in pixels.
    pub pixel_size: u32,
    /// Payload character class.
    pub content_type: ContentType,
    /// Error correction level requested.
    pub ec_level: EcLevel,
    /// Wall time spent in the encoder.
    pub encode_time: Duration,
    /// Wall time spent in the decoder. Zero when decode never ran.
    pub decode_time: Duration,
    /// The classified result.
    pub status: Status,
    /// Module geometry, present only when the encoder reported its version.
    pub geometry: Option<ModuleGeometry>,
}

impl Outcome {
    /// Whether this triple round-tripped successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.status, Status::Success)
    }

    /// Whether this is a capacity rejection, excluded from effective tests.
    pub fn is_capacity_skip(&self) -> bool {
        matches!(
            self.status,
            Status::EncodeFailure {
                capacity_exceeded: true,
                ..
            }
        )
    }

    /// Whether this counts as a genuine failure: any non-success outcome
    /// that is not a capacity rejection.
    pub fn is_failure(&self) -> bool {
        !self.is_success() && !self.is_capacity_skip()
    }
}

/// The complete ordered outcome collection for one matrix run, plus the
/// distinct dimensions observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityMatrix {
    /// One outcome per triple, in dispatch order.
    pub outcomes: Vec<Outcome>,
    /// Encoder names tested, in registry order.
    pub encoders: Vec<String>,
    /// Decoder names tested, in registry order.
    pub decoders: Vec<String>,
    /// Distinct payload sizes observed, ascending.
    pub data_sizes: Vec<usize>,
    /// Distinct pixel sizes observed, ascending.
    pub pixel_sizes: Vec<u32>,
}

impl CompatibilityMatrix {
    /// Assemble a matrix from completed outcomes and the adapter registry
    /// order. Size dimensions are collected from the outcomes themselves.
    pub fn new(outcomes: Vec<Outcome>, encoders: Vec<String>, decoders: Vec<String>) -> Self {
        let data_sizes: BTreeSet<usize> = outcomes.iter().map(|o| o.data_size).collect();
        let pixel_sizes: BTreeSet<u32> = outcomes.iter().map(|o| o.pixel_size).collect();
        Self {
            outcomes,
            encoders,
            decoders,
            data_sizes: data_sizes.into_iter().collect(),
            pixel_sizes: pixel_sizes.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: Status) -> Outcome {
        Outcome {
            encoder: "enc".into(),
            decoder: "dec".into(),
            case_name: "binary-16b-320px-ecM".into(),
            data_size: 16,
            pixel_size: 320,
            content_type: ContentType::Binary,
            ec_level: EcLevel::M,
            encode_time: Duration::from_millis(1),
            decode_time: Duration::from_millis(2),
            status,
            geometry: None,
        }
    }

    #[test]
    fn capacity_skip_is_not_a_failure() {
        let o = outcome(Status::EncodeFailure {
            reason: "too long".into(),
            capacity_exceeded: true,
        });
        assert!(o.is_capacity_skip());
        assert!(!o.is_failure());
        assert!(!o.is_success());
        assert_eq!(o.status.label(), "capacity-skip");
    }

    #[test]
    fn mismatch_is_a_failure() {
        let o = outcome(Status::DataMismatch {
            expected_len: 16,
            actual_len: 12,
        });
        assert!(o.is_failure());
        assert_eq!(o.status.label(), "data-mismatch");
    }

    #[test]
    fn matrix_collects_sorted_distinct_dimensions() {
        let mut a = outcome(Status::Success);
        a.data_size = 500;
        a.pixel_size = 480;
        let b = outcome(Status::Success);
        let c = outcome(Status::Success);
        let m = CompatibilityMatrix::new(vec![a, b, c], vec!["enc".into()], vec!["dec".into()]);
        assert_eq!(m.data_sizes, vec![16, 500]);
        assert_eq!(m.pixel_sizes, vec![320, 480]);
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_string(&Status::DataMismatch {
            expected_len: 10,
            actual_len: 8,
        })
        .unwrap();
        assert!(json.contains("\"result\":\"data-mismatch\""), "{json}");
    }
}
