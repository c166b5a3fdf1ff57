//! Test case corpus generation
//!
//! Produces the deterministic payload grid the runner executes. Determinism
//! is a hard contract: identical parameters yield byte-identical payloads
//! across calls and runs, so results can be compared between runs.

use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Fixed seed for the binary payload generator.
const BINARY_SEED: u64 = 42;

/// Mixed-script sample for UTF-8 payloads. Contains multi-byte sequences
/// that cannot be encoded in QR alphanumeric mode, forcing byte mode.
const UTF8_PATTERN: &str = "Hello世界Café你好Москва";

/// The 45-character QR alphanumeric set.
const ALPHANUMERIC_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Character class of a test payload.
///
/// Content type affects QR encoding mode selection and therefore version
/// selection and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Digits 0-9 only (most efficient QR mode, ~3.3 bits per character)
    Numeric,
    /// The QR alphanumeric set (~5.5 bits per character)
    Alphanumeric,
    /// Arbitrary bytes including nulls (8 bits per byte)
    Binary,
    /// Multi-script UTF-8 text, encoded in byte mode
    Utf8,
}

impl ContentType {
    /// Label used in test case names and grouping.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Numeric => "numeric",
            ContentType::Alphanumeric => "alphanumeric",
            ContentType::Binary => "binary",
            ContentType::Utf8 => "utf8",
        }
    }

    /// All content types, in grid order.
    pub fn all() -> [ContentType; 4] {
        [
            ContentType::Numeric,
            ContentType::Alphanumeric,
            ContentType::Binary,
            ContentType::Utf8,
        ]
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcLevel {
    /// Low: ~7% recovery
    L,
    /// Medium: ~15% recovery
    M,
    /// Quartile: ~25% recovery
    Q,
    /// High: ~30% recovery
    H,
}

impl std::fmt::Display for EcLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        };
        f.write_str(s)
    }
}

/// One test payload plus its target rendering parameters.
///
/// Created by the corpus generator, read-only to the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Human-readable identifier, e.g. `alphanumeric-500b-440px-ecL`.
    pub name: String,
    /// Payload to encode.
    pub payload: Vec<u8>,
    /// Declared payload size in bytes. May exceed `payload.len()` slightly
    /// for UTF-8 cases truncated at a character boundary.
    pub data_size: usize,
    /// Target rendered image dimension (width and height) in pixels.
    pub pixel_size: u32,
    /// Character class of the payload.
    pub content_type: ContentType,
    /// Error correction level requested from encoders.
    pub ec_level: EcLevel,
}

impl TestCase {
    /// Build a test case with the standard name format.
    pub fn new(
        content_type: ContentType,
        data_size: usize,
        pixel_size: u32,
        ec_level: EcLevel,
    ) -> Self {
        Self {
            name: format!("{}-{data_size}b-{pixel_size}px-ec{ec_level}", content_type.label()),
            payload: generate_payload(content_type, data_size),
            data_size,
            pixel_size,
            content_type,
            ec_level,
        }
    }
}

/// Caller-supplied dimension sets for the test grid.
///
/// The generator emits the full cross product; the dimension sets themselves
/// are configuration, not policy baked into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSpec {
    /// Payload sizes in bytes.
    pub data_sizes: Vec<usize>,
    /// Target rendered dimensions in pixels.
    pub pixel_sizes: Vec<u32>,
    /// Character classes to cover.
    pub content_types: Vec<ContentType>,
    /// Error correction levels to cover.
    pub ec_levels: Vec<EcLevel>,
}

impl CorpusSpec {
    /// One test case per {data size} x {pixel size} x {content type} x
    /// {EC level} combination, in stable grid order.
    pub fn generate(&self) -> Vec<TestCase> {
        let capacity = self.data_sizes.len()
            * self.pixel_sizes.len()
            * self.content_types.len()
            * self.ec_levels.len();
        let mut cases = Vec::with_capacity(capacity);

        for &data_size in &self.data_sizes {
            for &pixel_size in &self.pixel_sizes {
                for &content_type in &self.content_types {
                    for &ec_level in &self.ec_levels {
                        cases.push(TestCase::new(content_type, data_size, pixel_size, ec_level));
                    }
                }
            }
        }

        cases
    }
}

/// Generate a payload of the given content type and size.
pub fn generate_payload(content_type: ContentType, size: usize) -> Vec<u8> {
    match content_type {
        ContentType::Numeric => generate_numeric(size),
        ContentType::Alphanumeric => generate_alphanumeric(size),
        ContentType::Binary => generate_binary(size),
        ContentType::Utf8 => generate_utf8(size),
    }
}

/// Repeating `0123456789` pattern of exactly `size` bytes.
pub fn generate_numeric(size: usize) -> Vec<u8> {
    const DIGITS: &[u8] = b"0123456789";
    (0..size).map(|i| DIGITS[i % DIGITS.len()]).collect()
}

/// Repeating QR alphanumeric pattern of exactly `size` bytes.
pub fn generate_alphanumeric(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| ALPHANUMERIC_CHARS[i % ALPHANUMERIC_CHARS.len()])
        .collect()
}

/// Deterministic pseudo-random bytes from a fixed ChaCha8 seed.
///
/// The keystream is consumed sequentially, so a shorter request is always a
/// byte-for-byte prefix of a longer one.
pub fn generate_binary(size: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(BINARY_SEED);
    let mut data = vec![0u8; size];
    rng.fill_bytes(&mut data);
    data
}

/// Repeating mixed-script UTF-8 text, truncated at a character boundary.
///
/// The result is always valid UTF-8 and never longer than `size`; it may be
/// up to three bytes shorter when the cut would split a multi-byte sequence.
pub fn generate_utf8(size: usize) -> Vec<u8> {
    let pattern = UTF8_PATTERN.as_bytes();
    let mut data = Vec::with_capacity(size + pattern.len());
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    while !data.is_empty() && std::str::from_utf8(&data).is_err() {
        data.pop();
    }
    data
}

/// Secondary corpus exercising unusual payloads: empty and single-byte
/// inputs, plus multilingual and emoji text. Single pixel size and EC level,
/// since these probe content handling rather than geometry.
pub fn edge_cases() -> Vec<TestCase> {
    const PIXEL_SIZE: u32 = 480;
    const EC: EcLevel = EcLevel::M;

    let named = |name: &str, payload: Vec<u8>, content_type: ContentType| TestCase {
        name: name.to_string(),
        data_size: payload.len(),
        payload,
        pixel_size: PIXEL_SIZE,
        content_type,
        ec_level: EC,
    };

    vec![
        named("empty-ecM", Vec::new(), ContentType::Binary),
        named("single-byte-ecM", vec![0x42], ContentType::Binary),
        named("numeric-small-ecM", generate_numeric(50), ContentType::Numeric),
        named("numeric-large-ecM", generate_numeric(500), ContentType::Numeric),
        named(
            "alphanumeric-url-ecM",
            generate_alphanumeric(50),
            ContentType::Alphanumeric,
        ),
        named(
            "alphanumeric-large-ecM",
            generate_alphanumeric(1000),
            ContentType::Alphanumeric,
        ),
        named(
            "utf8-multilingual-ecM",
            "Hello World 你好世界 Привет мир こんにちは世界".as_bytes().to_vec(),
            ContentType::Utf8,
        ),
        named(
            "utf8-emoji-ecM",
            "QR Code Testing 🔍📱✅❌🎉".as_bytes().to_vec(),
            ContentType::Utf8,
        ),
    ]
}
