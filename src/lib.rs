pub mod source;
pub mod volume;
pub mod monitor;
pub mod config;
pub mod cli;

pub use source::{MixerSelector, RawVolumeSample, VolumeSource, SourceError};
pub use volume::{normalize, Normalized, NormalizedVolume};
pub use monitor::{EmitMode, LineEmitter, Monitor, MonitorSettings, MonitorState, Phase, PollOutcome};
pub use config::{Config, ConfigError, MixerConfig, MonitorConfig};
pub use cli::Cli;
#[cfg(target_os = "linux")]
pub use source::AlsaSource;
