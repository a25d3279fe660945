use super::types::MixerSelector;

/// Why a volume sample could not be taken.
///
/// The monitor treats every variant the same way: nothing is emitted for
/// that poll and the next poll tries again.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to open mixer on card '{card}': {reason}")]
    Open { card: String, reason: String },
    #[error("Mixer control not found: {0}")]
    ControlNotFound(MixerSelector),
    #[error("Failed to read playback volume of {selector}: {reason}")]
    Read { selector: MixerSelector, reason: String },
    #[error("Sampling task failed: {0}")]
    Task(String),
    #[error("Volume source not supported: {0}")]
    Unsupported(String),
}
