//! QR module geometry calculations
//!
//! Maps QR versions to module counts and rendered pixel sizes to
//! pixels-per-module. Fractional pixels-per-module forces boundary rounding
//! during rendering and is the root interoperability hazard this engine
//! exists to surface.

use serde::{Deserialize, Serialize};

/// Standard quiet zone size in modules (blank border around a QR code).
/// The QR specification requires a minimum of 4 modules.
pub const QUIET_ZONE_MODULES: u32 = 4;

/// Minimum practical rendered size in pixels for [`optimal_pixel_size`].
const MIN_PRACTICAL_PIXELS: u32 = 100;

/// A validated QR version in the range 1..=40.
///
/// Version determines the module grid: `17 + 4 * version` modules per side.
/// "Version unknown" is represented as `Option<QrVersion>::None` by callers,
/// never as a magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QrVersion(u8);

impl QrVersion {
    /// Create a version, returning `None` outside 1..=40.
    pub fn new(version: u8) -> Option<Self> {
        (1..=40).contains(&version).then_some(Self(version))
    }

    /// The raw version number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Modules per side for this version.
    pub fn module_count(self) -> u32 {
        module_count(u32::from(self.0))
    }
}

impl std::fmt::Display for QrVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Structural metadata for one rendered QR symbol.
///
/// Derived only when the producing encoder reported its chosen version;
/// otherwise the whole struct is absent from the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleGeometry {
    /// QR version of the symbol.
    pub version: QrVersion,
    /// Modules per side (`17 + 4 * version`), quiet zone excluded.
    pub module_count: u32,
    /// Rendered pixels per module: `pixel_size / (module_count + quiet_zone)`.
    pub pixels_per_module: f64,
    /// True when `pixels_per_module` has a non-zero fractional part.
    pub is_fractional: bool,
}

impl ModuleGeometry {
    /// Compute geometry for a symbol of `version` rendered at `pixel_size`,
    /// assuming the standard quiet zone.
    pub fn for_render(version: QrVersion, pixel_size: u32) -> Self {
        let module_count = version.module_count();
        let ppm = pixels_per_module(pixel_size, module_count, QUIET_ZONE_MODULES);
        Self {
            version,
            module_count,
            pixels_per_module: ppm,
            is_fractional: is_fractional(ppm),
        }
    }
}

/// Modules per side for a QR version: `17 + 4 * version`.
///
/// Returns 0 for versions outside 1..=40. Never panics.
pub fn module_count(version: u32) -> u32 {
    if !(1..=40).contains(&version) {
        return 0;
    }
    17 + 4 * version
}

/// Pixel dimension per module: `pixel_size / (module_count + quiet_zone)`.
///
/// Returns 0.0 when `pixel_size` or `module_count` is zero. The division is
/// real-valued; fractional remainders are preserved.
///
/// Example: version 15 (77 modules) at 440px with a 4-module quiet zone gives
/// `440 / 81 = 5.43` pixels per module, a known-problematic fractional value.
pub fn pixels_per_module(pixel_size: u32, module_count: u32, quiet_zone: u32) -> f64 {
    if pixel_size == 0 || module_count == 0 {
        return 0.0;
    }
    f64::from(pixel_size) / f64::from(module_count + quiet_zone)
}

/// Whether a pixels-per-module value has a non-zero fractional part.
///
/// Exact comparison against the floor, not epsilon-based: the point is to
/// detect whether rendering forces boundary rounding at all.
pub fn is_fractional(pixels_per_module: f64) -> bool {
    pixels_per_module != pixels_per_module.floor()
}

/// Smallest pixel size that yields integer pixels-per-module for a grid.
///
/// Returns the smallest positive multiple of `module_count + quiet_zone`
/// that is at least 100px, or 0 when `module_count` is zero. Feeding the
/// result back through [`pixels_per_module`] always yields a non-fractional
/// value.
pub fn optimal_pixel_size(module_count: u32, quiet_zone: u32) -> u32 {
    if module_count == 0 {
        return 0;
    }
    let total = module_count + quiet_zone;
    let multiplier = MIN_PRACTICAL_PIXELS.div_ceil(total);
    total * multiplier
}
