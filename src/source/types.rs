use std::fmt;

use async_trait::async_trait;

use super::error::SourceError;

/// Identifies one simple mixer control on one card.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MixerSelector {
    name: String,
    card: String,
    index: u32,
}

impl MixerSelector {
    pub fn new(name: impl Into<String>, card: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            card: card.into(),
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn card(&self) -> &str {
        &self.card
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Default for MixerSelector {
    fn default() -> Self {
        Self::new("Master", "default", 0)
    }
}

impl fmt::Display for MixerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{}", self.card, self.name, self.index)
    }
}

/// One playback volume reading in the device's native units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawVolumeSample {
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

impl RawVolumeSample {
    pub fn new(value: i64, min: i64, max: i64) -> Self {
        Self { value, min, max }
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Anything that can read a mixer's current playback volume.
///
/// Implementations acquire whatever handle they need inside `sample` and
/// release it before returning, on success and on every error path.
#[async_trait]
pub trait VolumeSource: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
    async fn sample(&self, selector: &MixerSelector) -> Result<RawVolumeSample, SourceError>;
}
