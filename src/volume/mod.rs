pub mod normalize;

use std::fmt;

pub use normalize::{normalize, Normalized};

/// Mixer level rescaled to 0..=100.
///
/// Raw readings outside the device's reported range are not clamped, so
/// values outside 0..=100 are possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedVolume(pub i64);

impl NormalizedVolume {
    /// Reported for devices whose range is empty.
    pub const FALLBACK: NormalizedVolume = NormalizedVolume(0);

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for NormalizedVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
