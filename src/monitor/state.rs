use crate::volume::NormalizedVolume;

/// When a sampled volume is written out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitMode {
    /// Every successful poll is written.
    Continuous,
    /// Only changes are written. With `print_initial` the first sample
    /// counts as a change; without it the first sample is a silent baseline.
    OnChange { print_initial: bool },
}

impl EmitMode {
    pub fn from_flags(continuous: bool, print_initial: bool) -> Self {
        if continuous {
            EmitMode::Continuous
        } else {
            EmitMode::OnChange { print_initial }
        }
    }
}

impl Default for EmitMode {
    fn default() -> Self {
        EmitMode::OnChange { print_initial: false }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing sampled yet.
    Idle,
    /// Exactly one sample seen.
    Baseline,
    /// Comparing against the last reported volume.
    Steady,
}

/// State carried from one poll to the next.
#[derive(Clone, Debug)]
pub struct MonitorState {
    mode: EmitMode,
    last_volume: Option<NormalizedVolume>,
    samples: u64,
}

impl MonitorState {
    pub fn new(mode: EmitMode) -> Self {
        Self {
            mode,
            last_volume: None,
            samples: 0,
        }
    }

    pub fn mode(&self) -> EmitMode {
        self.mode
    }

    pub fn last_volume(&self) -> Option<NormalizedVolume> {
        self.last_volume
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn phase(&self) -> Phase {
        match self.samples {
            0 => Phase::Idle,
            1 => Phase::Baseline,
            _ => Phase::Steady,
        }
    }

    /// Feeds one successfully sampled volume and returns it if it should be
    /// written out.
    pub fn observe(&mut self, volume: NormalizedVolume) -> Option<NormalizedVolume> {
        self.samples = self.samples.saturating_add(1);

        let emit = match (self.mode, self.last_volume) {
            (EmitMode::Continuous, _) => true,
            (EmitMode::OnChange { print_initial: false }, None) => {
                self.last_volume = Some(volume);
                false
            }
            (EmitMode::OnChange { print_initial: true }, None) => true,
            (EmitMode::OnChange { .. }, Some(last)) => last != volume,
        };

        if emit {
            self.last_volume = Some(volume);
            Some(volume)
        } else {
            None
        }
    }
}
