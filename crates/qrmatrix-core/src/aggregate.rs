//! Result aggregation
//!
//! Reduces a completed [`CompatibilityMatrix`] to per-encoder, per-decoder
//! and per-combination statistics, flags non-monotonic failure patterns, and
//! correlates failures with fractional module geometry. This is a pure batch
//! reduction over a finished run, not a streaming consumer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::outcome::{CompatibilityMatrix, Outcome};

/// Counters for one grouping of outcomes.
///
/// Capacity rejections evidence encoder correctness, so the success-rate
/// denominator is `effective()` (total minus skips), never `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBucket {
    /// All outcomes in the group.
    pub total: usize,
    /// Outcomes tagged success.
    pub successes: usize,
    /// Capacity rejections, excluded from the denominator.
    pub capacity_skips: usize,
    /// Summed encode wall time.
    pub total_encode_time: Duration,
    /// Summed decode wall time.
    pub total_decode_time: Duration,
}

impl StatBucket {
    fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        if outcome.is_success() {
            self.successes += 1;
        }
        if outcome.is_capacity_skip() {
            self.capacity_skips += 1;
        }
        self.total_encode_time += outcome.encode_time;
        self.total_decode_time += outcome.decode_time;
    }

    /// Tests that actually exercised the pair: total minus capacity skips.
    pub fn effective(&self) -> usize {
        self.total - self.capacity_skips
    }

    /// `successes / effective()`, or 0.0 when nothing was effective.
    pub fn success_rate(&self) -> f64 {
        let effective = self.effective();
        if effective == 0 {
            return 0.0;
        }
        self.successes as f64 / effective as f64
    }

    /// Mean encode time over all outcomes in the group.
    pub fn mean_encode_time(&self) -> Duration {
        if self.total == 0 {
            return Duration::ZERO;
        }
        self.total_encode_time / self.total as u32
    }

    /// Mean decode time over all outcomes in the group.
    pub fn mean_decode_time(&self) -> Duration {
        if self.total == 0 {
            return Duration::ZERO;
        }
        self.total_decode_time / self.total as u32
    }
}

/// Statistics for one adapter, with a breakdown by paired adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterStats {
    /// Adapter name.
    pub name: String,
    /// Counters over every outcome involving this adapter.
    pub stats: StatBucket,
    /// Counters split by the adapter on the other side of the cycle,
    /// in first-seen order.
    pub by_partner: Vec<(String, StatBucket)>,
}

/// Statistics for one (encoder, decoder) combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboStats {
    /// Encoder name.
    pub encoder: String,
    /// Decoder name.
    pub decoder: String,
    /// Counters over this pair's outcomes.
    pub stats: StatBucket,
}

/// A failure at one pixel size flanked by successes at a smaller and a
/// larger size, for the same payload and pair. This signature implicates
/// fractional-module rounding rather than a true capacity threshold, which
/// would fail monotonically above a cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonMonotonicPattern {
    pub encoder: String,
    pub decoder: String,
    pub data_size: usize,
    /// Flagged pixel sizes: failures with a success on both sides.
    pub failed_pixel_sizes: Vec<u32>,
}

/// Failure rates split by fractional versus integer module geometry.
///
/// Only geometry-known, non-skip outcomes contribute; unknown-version
/// outcomes cannot be attributed to either class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionalCorrelation {
    pub fractional_total: usize,
    pub fractional_failures: usize,
    pub integer_total: usize,
    pub integer_failures: usize,
}

impl FractionalCorrelation {
    /// Failure rate over fractional-geometry outcomes (0.0 when none).
    pub fn fractional_failure_rate(&self) -> f64 {
        rate(self.fractional_failures, self.fractional_total)
    }

    /// Failure rate over integer-geometry outcomes (0.0 when none).
    pub fn integer_failure_rate(&self) -> f64 {
        rate(self.integer_failures, self.integer_total)
    }
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}

/// The aggregated view of one completed matrix run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixSummary {
    /// Per-encoder statistics, in registry order.
    pub encoders: Vec<AdapterStats>,
    /// Per-decoder statistics, in registry order.
    pub decoders: Vec<AdapterStats>,
    /// Per-pair statistics, in first-seen order.
    pub combos: Vec<ComboStats>,
    /// Non-monotonic failure patterns found across the run.
    pub non_monotonic: Vec<NonMonotonicPattern>,
    /// Fractional-vs-integer geometry correlation.
    pub fractional: FractionalCorrelation,
}

impl MatrixSummary {
    /// Compute the full summary from a completed matrix.
    pub fn from_matrix(matrix: &CompatibilityMatrix) -> Self {
        Self {
            encoders: adapter_stats(matrix, Side::Encoder),
            decoders: adapter_stats(matrix, Side::Decoder),
            combos: combo_stats(matrix),
            non_monotonic: detect_non_monotonic(matrix),
            fractional: fractional_correlation(&matrix.outcomes),
        }
    }

    /// The single best-performing combination: highest success rate, ties
    /// broken by first-seen encounter order.
    pub fn best_combo(&self) -> Option<&ComboStats> {
        let mut best: Option<&ComboStats> = None;
        for combo in &self.combos {
            match best {
                Some(b) if combo.stats.success_rate() <= b.stats.success_rate() => {}
                _ => best = Some(combo),
            }
        }
        best
    }
}

#[derive(Clone, Copy)]
enum Side {
    Encoder,
    Decoder,
}

impl Side {
    fn own<'a>(self, o: &'a Outcome) -> &'a str {
        match self {
            Side::Encoder => &o.encoder,
            Side::Decoder => &o.decoder,
        }
    }

    fn partner<'a>(self, o: &'a Outcome) -> &'a str {
        match self {
            Side::Encoder => &o.decoder,
            Side::Decoder => &o.encoder,
        }
    }

    fn names(self, m: &CompatibilityMatrix) -> &[String] {
        match self {
            Side::Encoder => &m.encoders,
            Side::Decoder => &m.decoders,
        }
    }
}

fn adapter_stats(matrix: &CompatibilityMatrix, side: Side) -> Vec<AdapterStats> {
    let mut out: Vec<AdapterStats> = side
        .names(matrix)
        .iter()
        .map(|name| AdapterStats {
            name: name.clone(),
            stats: StatBucket::default(),
            by_partner: Vec::new(),
        })
        .collect();

    for outcome in &matrix.outcomes {
        let Some(entry) = out.iter_mut().find(|a| a.name == side.own(outcome)) else {
            continue;
        };
        entry.stats.record(outcome);

        let partner = side.partner(outcome);
        match entry.by_partner.iter_mut().find(|(name, _)| name == partner) {
            Some((_, bucket)) => bucket.record(outcome),
            None => {
                let mut bucket = StatBucket::default();
                bucket.record(outcome);
                entry.by_partner.push((partner.to_string(), bucket));
            }
        }
    }

    out
}

fn combo_stats(matrix: &CompatibilityMatrix) -> Vec<ComboStats> {
    let mut combos: Vec<ComboStats> = Vec::new();
    for outcome in &matrix.outcomes {
        let existing = combos
            .iter_mut()
            .find(|c| c.encoder == outcome.encoder && c.decoder == outcome.decoder);
        match existing {
            Some(combo) => combo.stats.record(outcome),
            None => {
                let mut stats = StatBucket::default();
                stats.record(outcome);
                combos.push(ComboStats {
                    encoder: outcome.encoder.clone(),
                    decoder: outcome.decoder.clone(),
                    stats,
                });
            }
        }
    }
    combos
}

/// Whether a success/failure profile over ascending pixel sizes contains a
/// failure flanked by successes on both sides.
///
/// `points` must be sorted by pixel size ascending; each entry is
/// `(pixel_size, succeeded)`.
pub fn is_non_monotonic(points: &[(u32, bool)]) -> bool {
    let mut seen_success = false;
    let mut pending_failure = false;
    for &(_, succeeded) in points {
        if succeeded {
            if seen_success && pending_failure {
                return true;
            }
            seen_success = true;
            pending_failure = false;
        } else if seen_success {
            pending_failure = true;
        }
    }
    false
}

fn detect_non_monotonic(matrix: &CompatibilityMatrix) -> Vec<NonMonotonicPattern> {
    // Group by (encoder, decoder, data_size, content type, EC level) so each
    // group holds at most one outcome per pixel size.
    #[derive(PartialEq)]
    struct Key<'a> {
        encoder: &'a str,
        decoder: &'a str,
        data_size: usize,
        content: crate::corpus::ContentType,
        ec: crate::corpus::EcLevel,
    }

    let mut groups: Vec<(Key<'_>, Vec<(u32, bool)>)> = Vec::new();
    for outcome in &matrix.outcomes {
        // Capacity skips are neither success nor failure.
        if outcome.is_capacity_skip() {
            continue;
        }
        let key = Key {
            encoder: &outcome.encoder,
            decoder: &outcome.decoder,
            data_size: outcome.data_size,
            content: outcome.content_type,
            ec: outcome.ec_level,
        };
        let point = (outcome.pixel_size, outcome.is_success());
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, points)) => points.push(point),
            None => groups.push((key, vec![point])),
        }
    }

    let mut patterns = Vec::new();
    for (key, mut points) in groups {
        points.sort_by_key(|&(px, _)| px);
        if !is_non_monotonic(&points) {
            continue;
        }

        // Collect the flanked failures.
        let mut failed = Vec::new();
        for (i, &(px, succeeded)) in points.iter().enumerate() {
            if succeeded {
                continue;
            }
            let before = points[..i].iter().any(|&(_, s)| s);
            let after = points[i + 1..].iter().any(|&(_, s)| s);
            if before && after {
                failed.push(px);
            }
        }

        let existing = patterns.iter_mut().find(|p: &&mut NonMonotonicPattern| {
            p.encoder == key.encoder && p.decoder == key.decoder && p.data_size == key.data_size
        });
        match existing {
            Some(pattern) => {
                for px in failed {
                    if !pattern.failed_pixel_sizes.contains(&px) {
                        pattern.failed_pixel_sizes.push(px);
                    }
                }
                pattern.failed_pixel_sizes.sort_unstable();
            }
            None => patterns.push(NonMonotonicPattern {
                encoder: key.encoder.to_string(),
                decoder: key.decoder.to_string(),
                data_size: key.data_size,
                failed_pixel_sizes: failed,
            }),
        }
    }
    patterns
}

fn fractional_correlation(outcomes: &[Outcome]) -> FractionalCorrelation {
    let mut corr = FractionalCorrelation::default();
    for outcome in outcomes {
        let Some(geometry) = outcome.geometry else {
            continue;
        };
        if outcome.is_capacity_skip() {
            continue;
        }
        if geometry.is_fractional {
            corr.fractional_total += 1;
            if outcome.is_failure() {
                corr.fractional_failures += 1;
            }
        } else {
            corr.integer_total += 1;
            if outcome.is_failure() {
                corr.integer_failures += 1;
            }
        }
    }
    corr
}
