use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::monitor::{EmitMode, MonitorSettings};
use crate::source::MixerSelector;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub mixer: MixerConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MixerConfig {
    #[serde(default = "default_mixer_name", deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default = "default_card", deserialize_with = "scalar_string")]
    pub card: String,
    #[serde(default)]
    pub index: u32,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            name: default_mixer_name(),
            card: default_card(),
            index: 0,
        }
    }
}

fn default_mixer_name() -> String {
    "Master".to_string()
}

fn default_card() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitorConfig {
    #[serde(default = "default_poll_interval_us")]
    pub poll_interval_us: u64,
    #[serde(default, deserialize_with = "scalar_string")]
    pub prefix: String,
    #[serde(default)]
    pub continuous: bool,
    #[serde(default)]
    pub print_initial: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_us: default_poll_interval_us(),
            prefix: String::new(),
            continuous: false,
            print_initial: false,
        }
    }
}

fn default_poll_interval_us() -> u64 {
    100_000
}

/// Environment values arrive typed (`ASUB_MONITOR__PREFIX=5` is a number),
/// so text fields take any scalar and keep its textual form.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct ScalarString;

    impl<'de> de::Visitor<'de> for ScalarString {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_char<E: de::Error>(self, v: char) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(ScalarString)
}

impl Config {
    /// Default config file location, `$XDG_CONFIG_HOME/asub/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "asub", "asub").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads defaults, then the TOML file (explicit path or the default
    /// location), then `ASUB_*` environment variables.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => {
                let path = PathBuf::from(shellexpand::tilde(p).into_owned());
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path));
                }
                Some(path)
            }
            None => Self::default_path(),
        };
        Self::figment(path).extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    fn figment(path: Option<PathBuf>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            tracing::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("ASUB_").split("__"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mixer.name.is_empty() {
            return Err(ConfigError::Invalid("mixer name must not be empty".to_string()));
        }
        if self.mixer.card.is_empty() {
            return Err(ConfigError::Invalid("card must not be empty".to_string()));
        }
        // ALSA takes both as C strings
        if self.mixer.name.contains('\0') {
            return Err(ConfigError::Invalid("mixer name must not contain NUL".to_string()));
        }
        if self.mixer.card.contains('\0') {
            return Err(ConfigError::Invalid("card must not contain NUL".to_string()));
        }
        if self.monitor.poll_interval_us == 0 {
            return Err(ConfigError::Invalid("poll interval must be at least 1 microsecond".to_string()));
        }
        Ok(())
    }

    pub fn selector(&self) -> MixerSelector {
        MixerSelector::new(self.mixer.name.clone(), self.mixer.card.clone(), self.mixer.index)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_micros(self.monitor.poll_interval_us)
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            mode: EmitMode::from_flags(self.monitor.continuous, self.monitor.print_initial),
            prefix: self.monitor.prefix.clone(),
            poll_interval: self.poll_interval(),
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
