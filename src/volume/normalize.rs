use super::NormalizedVolume;
use crate::source::RawVolumeSample;

/// Result of scaling a raw sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalized {
    Scaled(NormalizedVolume),
    /// The device reported `min == max`; there is nothing to scale against.
    DegenerateRange,
}

impl Normalized {
    pub fn volume(&self) -> NormalizedVolume {
        match self {
            Normalized::Scaled(volume) => *volume,
            Normalized::DegenerateRange => NormalizedVolume::FALLBACK,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, Normalized::DegenerateRange)
    }
}

/// `100 * (value - min) / (max - min)`, truncating toward zero.
pub fn normalize(sample: &RawVolumeSample) -> Normalized {
    if sample.is_degenerate() {
        return Normalized::DegenerateRange;
    }

    let range = i128::from(sample.max) - i128::from(sample.min);
    let shifted = i128::from(sample.value) - i128::from(sample.min);
    let scaled = (100 * shifted) / range;
    let scaled = scaled.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;

    Normalized::Scaled(NormalizedVolume(scaled))
}
