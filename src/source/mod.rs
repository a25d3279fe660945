pub mod types;
pub mod error;
#[cfg(target_os = "linux")]
pub mod alsa;

pub use types::{MixerSelector, RawVolumeSample, VolumeSource};
pub use error::SourceError;
#[cfg(target_os = "linux")]
pub use self::alsa::AlsaSource;
