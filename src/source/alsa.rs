use ::alsa::mixer::{Mixer, SelemChannelId, SelemId};
use async_trait::async_trait;

use super::error::SourceError;
use super::types::{MixerSelector, RawVolumeSample, VolumeSource};

/// Reads playback volume from an ALSA simple mixer element.
///
/// A fresh mixer handle is opened for every sample and closed when it
/// drops at the end of `read_blocking`, so a long-running poll loop never
/// holds a handle between polls.
#[derive(Debug, Default)]
pub struct AlsaSource;

impl AlsaSource {
    pub fn new() -> Self {
        Self
    }

    fn read_blocking(selector: &MixerSelector) -> Result<RawVolumeSample, SourceError> {
        // open + attach + selem_register + load
        let mixer = Mixer::new(selector.card(), false).map_err(|e| SourceError::Open {
            card: selector.card().to_string(),
            reason: e.to_string(),
        })?;

        let id = SelemId::new(selector.name(), selector.index());
        let selem = mixer
            .find_selem(&id)
            .ok_or_else(|| SourceError::ControlNotFound(selector.clone()))?;

        let (min, max) = selem.get_playback_volume_range();
        let value = selem
            .get_playback_volume(SelemChannelId::FrontLeft)
            .map_err(|e| SourceError::Read {
                selector: selector.clone(),
                reason: e.to_string(),
            })?;

        Ok(RawVolumeSample::new(value, min, max))
    }
}

#[async_trait]
impl VolumeSource for AlsaSource {
    fn name(&self) -> &'static str {
        "alsa"
    }

    async fn sample(&self, selector: &MixerSelector) -> Result<RawVolumeSample, SourceError> {
        let selector = selector.clone();
        tokio::task::spawn_blocking(move || Self::read_blocking(&selector))
            .await
            .map_err(|e| SourceError::Task(e.to_string()))?
    }
}
