//! Aggregation over synthetic compatibility matrices
//!
//! Builds outcome lists by hand to pin down the aggregation policies:
//! effective-test denominators, best-combination tie breaking, non-monotonic
//! failure detection, and fractional-geometry correlation.

use std::time::Duration;

use qrmatrix_core::corpus::{ContentType, EcLevel};
use qrmatrix_core::geometry::{ModuleGeometry, QrVersion};
use qrmatrix_core::outcome::{CompatibilityMatrix, Outcome, Status};
use qrmatrix_core::MatrixSummary;

fn outcome(encoder: &str, decoder: &str, data_size: usize, pixel_size: u32, status: Status) -> Outcome {
    Outcome {
        encoder: encoder.to_string(),
        decoder: decoder.to_string(),
        case_name: format!("binary-{data_size}b-{pixel_size}px-ecM"),
        data_size,
        pixel_size,
        content_type: ContentType::Binary,
        ec_level: EcLevel::M,
        encode_time: Duration::from_millis(2),
        decode_time: Duration::from_millis(4),
        status,
        geometry: None,
    }
}

fn with_geometry(mut o: Outcome, version: u8) -> Outcome {
    let version = QrVersion::new(version).unwrap();
    o.geometry = Some(ModuleGeometry::for_render(version, o.pixel_size));
    o
}

fn success() -> Status {
    Status::Success
}

fn decode_failure() -> Status {
    Status::DecodeFailure {
        reason: "no QR code found".into(),
    }
}

fn capacity_skip() -> Status {
    Status::EncodeFailure {
        reason: "data too long".into(),
        capacity_exceeded: true,
    }
}

fn matrix(outcomes: Vec<Outcome>, encoders: &[&str], decoders: &[&str]) -> CompatibilityMatrix {
    CompatibilityMatrix::new(
        outcomes,
        encoders.iter().map(|s| s.to_string()).collect(),
        decoders.iter().map(|s| s.to_string()).collect(),
    )
}

#[test]
fn per_adapter_stats_and_partner_breakdown() {
    let m = matrix(
        vec![
            outcome("e1", "d1", 100, 320, success()),
            outcome("e1", "d2", 100, 320, decode_failure()),
            outcome("e2", "d1", 100, 320, success()),
            outcome("e2", "d2", 100, 320, capacity_skip()),
        ],
        &["e1", "e2"],
        &["d1", "d2"],
    );
    let summary = MatrixSummary::from_matrix(&m);

    assert_eq!(summary.encoders.len(), 2);
    let e1 = &summary.encoders[0];
    assert_eq!(e1.name, "e1");
    assert_eq!(e1.stats.total, 2);
    assert_eq!(e1.stats.successes, 1);
    assert!((e1.stats.success_rate() - 0.5).abs() < f64::EPSILON);
    assert_eq!(e1.by_partner.len(), 2);
    assert_eq!(e1.by_partner[0].0, "d1");
    assert_eq!(e1.by_partner[0].1.successes, 1);

    // e2's capacity skip shrinks its denominator to 1.
    let e2 = &summary.encoders[1];
    assert_eq!(e2.stats.capacity_skips, 1);
    assert_eq!(e2.stats.effective(), 1);
    assert!((e2.stats.success_rate() - 1.0).abs() < f64::EPSILON);

    // Decoder view mirrors the same outcomes grouped the other way.
    let d1 = &summary.decoders[0];
    assert_eq!(d1.stats.total, 2);
    assert_eq!(d1.stats.successes, 2);
    assert_eq!(d1.by_partner.len(), 2);

    // Mean durations come straight from the recorded phase times.
    assert_eq!(e1.stats.mean_encode_time(), Duration::from_millis(2));
    assert_eq!(e1.stats.mean_decode_time(), Duration::from_millis(4));
}

#[test]
fn best_combo_prefers_first_seen_on_ties() {
    let m = matrix(
        vec![
            outcome("e1", "d1", 100, 320, success()),
            outcome("e1", "d2", 100, 320, success()),
            outcome("e2", "d1", 100, 320, decode_failure()),
        ],
        &["e1", "e2"],
        &["d1", "d2"],
    );
    let summary = MatrixSummary::from_matrix(&m);

    // (e1,d1) and (e1,d2) both sit at 100%; the first-encountered pair wins.
    let best = summary.best_combo().unwrap();
    assert_eq!((best.encoder.as_str(), best.decoder.as_str()), ("e1", "d1"));
}

#[test]
fn best_combo_none_on_empty_matrix() {
    let m = matrix(Vec::new(), &[], &[]);
    let summary = MatrixSummary::from_matrix(&m);
    assert!(summary.best_combo().is_none());
    assert!(summary.combos.is_empty());
}

#[test]
fn non_monotonic_pattern_is_flagged() {
    // 320 succeeds, 400 fails, 480 succeeds: rounding signature.
    let m = matrix(
        vec![
            outcome("e1", "d1", 500, 320, success()),
            outcome("e1", "d1", 500, 400, decode_failure()),
            outcome("e1", "d1", 500, 480, success()),
        ],
        &["e1"],
        &["d1"],
    );
    let summary = MatrixSummary::from_matrix(&m);

    assert_eq!(summary.non_monotonic.len(), 1);
    let pattern = &summary.non_monotonic[0];
    assert_eq!(pattern.encoder, "e1");
    assert_eq!(pattern.decoder, "d1");
    assert_eq!(pattern.data_size, 500);
    assert_eq!(pattern.failed_pixel_sizes, vec![400]);
}

#[test]
fn monotonic_capacity_cutoff_is_not_flagged() {
    // Failing above a threshold is a capacity profile, not rounding.
    let m = matrix(
        vec![
            outcome("e1", "d1", 500, 320, success()),
            outcome("e1", "d1", 500, 400, decode_failure()),
            outcome("e1", "d1", 500, 480, decode_failure()),
        ],
        &["e1"],
        &["d1"],
    );
    let summary = MatrixSummary::from_matrix(&m);
    assert!(summary.non_monotonic.is_empty());
}

#[test]
fn capacity_skips_do_not_create_patterns() {
    // A skip at 400 between two successes is not a failure profile.
    let m = matrix(
        vec![
            outcome("e1", "d1", 500, 320, success()),
            outcome("e1", "d1", 500, 400, capacity_skip()),
            outcome("e1", "d1", 500, 480, success()),
        ],
        &["e1"],
        &["d1"],
    );
    let summary = MatrixSummary::from_matrix(&m);
    assert!(summary.non_monotonic.is_empty());
}

#[test]
fn unsorted_outcomes_are_ordered_before_detection() {
    let m = matrix(
        vec![
            outcome("e1", "d1", 500, 480, success()),
            outcome("e1", "d1", 500, 320, success()),
            outcome("e1", "d1", 500, 400, decode_failure()),
        ],
        &["e1"],
        &["d1"],
    );
    let summary = MatrixSummary::from_matrix(&m);
    assert_eq!(summary.non_monotonic.len(), 1);
}

#[test]
fn fractional_correlation_splits_by_geometry() {
    // Version 15 at 440px and 480px is fractional; at 405px (81 * 5) it is
    // integer.
    let m = matrix(
        vec![
            with_geometry(outcome("e1", "d1", 750, 440, decode_failure()), 15),
            with_geometry(outcome("e1", "d1", 750, 480, decode_failure()), 15),
            with_geometry(outcome("e1", "d1", 750, 486, success()), 15),
            with_geometry(outcome("e1", "d1", 750, 405, success()), 15),
            // No geometry: must not be counted on either side.
            outcome("e1", "d1", 750, 512, decode_failure()),
        ],
        &["e1"],
        &["d1"],
    );
    let summary = MatrixSummary::from_matrix(&m);

    let corr = &summary.fractional;
    assert_eq!(corr.fractional_total, 2);
    assert_eq!(corr.fractional_failures, 2);
    assert_eq!(corr.integer_total, 2);
    assert_eq!(corr.integer_failures, 0);
    assert!((corr.fractional_failure_rate() - 1.0).abs() < f64::EPSILON);
    assert_eq!(corr.integer_failure_rate(), 0.0);
}

#[test]
fn summary_serializes_for_downstream_reporters() -> anyhow::Result<()> {
    let m = matrix(
        vec![
            outcome("e1", "d1", 100, 320, success()),
            outcome("e1", "d1", 100, 400, decode_failure()),
        ],
        &["e1"],
        &["d1"],
    );
    let summary = MatrixSummary::from_matrix(&m);

    let json = serde_json::to_string(&summary)?;
    assert!(json.contains("\"encoders\""));
    assert!(json.contains("\"non_monotonic\""));

    let json = serde_json::to_string(&m)?;
    assert!(json.contains("\"outcomes\""));
    Ok(())
}
