pub mod emitter;
pub mod state;

use std::io::{self, Write};
use std::time::Duration;

use crate::source::{MixerSelector, SourceError, VolumeSource};
use crate::volume::{normalize, Normalized, NormalizedVolume};

pub use emitter::LineEmitter;
pub use state::{EmitMode, MonitorState, Phase};

/// Outcome of a single poll of the volume source.
#[derive(Debug)]
pub enum PollOutcome {
    Sampled(Normalized),
    Failed(SourceError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorSettings {
    pub mode: EmitMode,
    pub prefix: String,
    pub poll_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            mode: EmitMode::default(),
            prefix: String::new(),
            poll_interval: Duration::from_micros(100_000),
        }
    }
}

/// Polls a volume source on a fixed interval and writes volume lines.
#[derive(Debug)]
pub struct Monitor<S, W> {
    source: S,
    selector: MixerSelector,
    state: MonitorState,
    emitter: LineEmitter<W>,
    poll_interval: Duration,
    failure_streak: u64,
    degenerate: bool,
}

impl<S: VolumeSource, W: Write> Monitor<S, W> {
    pub fn new(source: S, selector: MixerSelector, settings: MonitorSettings, out: W) -> Self {
        Self {
            source,
            selector,
            state: MonitorState::new(settings.mode),
            emitter: LineEmitter::new(settings.prefix, out),
            poll_interval: settings.poll_interval,
            failure_streak: 0,
            degenerate: false,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn output(&self) -> &W {
        self.emitter.get_ref()
    }

    pub fn into_output(self) -> W {
        self.emitter.into_inner()
    }

    pub async fn poll(&self) -> PollOutcome {
        match self.source.sample(&self.selector).await {
            Ok(sample) => PollOutcome::Sampled(normalize(&sample)),
            Err(e) => PollOutcome::Failed(e),
        }
    }

    /// Runs one iteration and returns the volume written, if any.
    ///
    /// Source failures are logged and swallowed; only output errors are
    /// returned.
    pub async fn tick(&mut self) -> io::Result<Option<NormalizedVolume>> {
        let normalized = match self.poll().await {
            PollOutcome::Sampled(normalized) => normalized,
            PollOutcome::Failed(e) => {
                self.record_failure(&e);
                return Ok(None);
            }
        };
        self.record_success(&normalized);

        match self.state.observe(normalized.volume()) {
            Some(volume) => {
                self.emitter.emit(volume)?;
                Ok(Some(volume))
            }
            None => {
                tracing::trace!("Volume {} unchanged or baseline, phase {:?}", normalized.volume(), self.state.phase());
                Ok(None)
            }
        }
    }

    /// Polls until writing to the output fails.
    pub async fn run(&mut self) -> io::Result<()> {
        tracing::info!(
            "Monitoring {} via {} every {:?} ({:?})",
            self.selector,
            self.source.name(),
            self.poll_interval,
            self.state.mode()
        );

        loop {
            self.tick().await?;
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn record_failure(&mut self, error: &SourceError) {
        self.failure_streak = self.failure_streak.saturating_add(1);
        if self.failure_streak == 1 {
            tracing::warn!("Failed to sample {}: {}", self.selector, error);
        } else {
            tracing::debug!("Failed to sample {} ({} in a row): {}", self.selector, self.failure_streak, error);
        }
    }

    fn record_success(&mut self, normalized: &Normalized) {
        if self.failure_streak > 0 {
            tracing::info!("Sampling {} recovered after {} failed poll(s)", self.selector, self.failure_streak);
            self.failure_streak = 0;
        }

        if normalized.is_degenerate() {
            if !self.degenerate {
                tracing::warn!(
                    "Mixer {} reports an empty volume range, reporting {}",
                    self.selector,
                    NormalizedVolume::FALLBACK
                );
            }
            self.degenerate = true;
        } else {
            self.degenerate = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawVolumeSample;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<RawVolumeSample, SourceError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<RawVolumeSample, SourceError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }

        /// Samples on a 0..=100 device so raw values read back unchanged.
        fn percent(values: &[i64]) -> Self {
            Self::new(values.iter().map(|v| Ok(RawVolumeSample::new(*v, 0, 100))).collect())
        }
    }

    #[async_trait]
    impl VolumeSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn sample(&self, selector: &MixerSelector) -> Result<RawVolumeSample, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SourceError::ControlNotFound(selector.clone())))
        }
    }

    fn unavailable() -> Result<RawVolumeSample, SourceError> {
        Err(SourceError::Open {
            card: "default".to_string(),
            reason: "No such file or directory".to_string(),
        })
    }

    fn monitor(source: ScriptedSource, mode: EmitMode, prefix: &str) -> Monitor<ScriptedSource, Vec<u8>> {
        let settings = MonitorSettings {
            mode,
            prefix: prefix.to_string(),
            ..MonitorSettings::default()
        };
        Monitor::new(source, MixerSelector::default(), settings, Vec::new())
    }

    async fn tick_n<S: VolumeSource, W: Write>(monitor: &mut Monitor<S, W>, n: usize) {
        for _ in 0..n {
            monitor.tick().await.unwrap();
        }
    }

    fn lines(monitor: Monitor<ScriptedSource, Vec<u8>>) -> Vec<String> {
        String::from_utf8(monitor.into_output())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_change_detection_end_to_end() {
        let source = ScriptedSource::percent(&[20, 20, 35, 35, 10]);
        let mut m = monitor(source, EmitMode::default(), "vol:");

        tick_n(&mut m, 5).await;

        assert_eq!(lines(m), vec!["vol:35", "vol:10"]);
    }

    #[tokio::test]
    async fn test_normalizes_device_units() {
        let source = ScriptedSource::new(vec![
            Ok(RawVolumeSample::new(0, 0, 3)),
            Ok(RawVolumeSample::new(1, 0, 3)),
            Ok(RawVolumeSample::new(2, 0, 3)),
        ]);
        let mut m = monitor(source, EmitMode::default(), "");

        tick_n(&mut m, 3).await;

        assert_eq!(lines(m), vec!["33", "66"]);
    }

    #[tokio::test]
    async fn test_first_poll_silent_without_print_initial() {
        let source = ScriptedSource::percent(&[90]);
        let mut m = monitor(source, EmitMode::default(), "");

        assert_eq!(m.tick().await.unwrap(), None);
        assert_eq!(m.state().last_volume(), Some(NormalizedVolume(90)));
        assert!(m.output().is_empty());
    }

    #[tokio::test]
    async fn test_print_initial_emits_first_poll() {
        let source = ScriptedSource::percent(&[90, 90]);
        let mut m = monitor(source, EmitMode::OnChange { print_initial: true }, "");

        tick_n(&mut m, 2).await;

        assert_eq!(lines(m), vec!["90"]);
    }

    #[tokio::test]
    async fn test_continuous_emits_every_poll() {
        let source = ScriptedSource::percent(&[5, 5, 5]);
        let mut m = monitor(source, EmitMode::Continuous, "v=");

        tick_n(&mut m, 3).await;

        assert_eq!(lines(m), vec!["v=5", "v=5", "v=5"]);
    }

    #[tokio::test]
    async fn test_failed_poll_is_skipped() {
        let source = ScriptedSource::new(vec![
            Ok(RawVolumeSample::new(40, 0, 100)),
            unavailable(),
            unavailable(),
            Ok(RawVolumeSample::new(40, 0, 100)),
            Ok(RawVolumeSample::new(45, 0, 100)),
        ]);
        let mut m = monitor(source, EmitMode::default(), "");

        tick_n(&mut m, 5).await;

        assert_eq!(m.state().samples(), 3);
        assert_eq!(lines(m), vec!["45"]);
    }

    #[tokio::test]
    async fn test_failed_poll_does_not_establish_baseline() {
        let source = ScriptedSource::new(vec![unavailable(), Ok(RawVolumeSample::new(70, 0, 100))]);
        let mut m = monitor(source, EmitMode::default(), "");

        tick_n(&mut m, 2).await;

        assert_eq!(m.state().phase(), Phase::Baseline);
        assert!(m.output().is_empty());
    }

    #[tokio::test]
    async fn test_failed_poll_emits_nothing_in_continuous_mode() {
        let source = ScriptedSource::new(vec![
            Ok(RawVolumeSample::new(10, 0, 100)),
            unavailable(),
            Ok(RawVolumeSample::new(10, 0, 100)),
        ]);
        let mut m = monitor(source, EmitMode::Continuous, "");

        tick_n(&mut m, 3).await;

        assert_eq!(lines(m), vec!["10", "10"]);
    }

    #[tokio::test]
    async fn test_degenerate_range_reports_fallback() {
        let source = ScriptedSource::new(vec![
            Ok(RawVolumeSample::new(50, 0, 100)),
            Ok(RawVolumeSample::new(7, 7, 7)),
            Ok(RawVolumeSample::new(7, 7, 7)),
        ]);
        let mut m = monitor(source, EmitMode::default(), "");

        tick_n(&mut m, 3).await;

        assert_eq!(lines(m), vec!["0"]);
    }

    #[tokio::test]
    async fn test_poll_outcome() {
        let source = ScriptedSource::new(vec![Ok(RawVolumeSample::new(1, 0, 4)), unavailable()]);
        let m = monitor(source, EmitMode::default(), "");

        match m.poll().await {
            PollOutcome::Sampled(normalized) => assert_eq!(normalized, Normalized::Scaled(NormalizedVolume(25))),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(m.poll().await, PollOutcome::Failed(SourceError::Open { .. })));
    }

    #[tokio::test]
    async fn test_output_error_is_returned() {
        struct BrokenPipe;

        impl Write for BrokenPipe {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let source = ScriptedSource::percent(&[1]);
        let mut m = Monitor::new(source, MixerSelector::default(), MonitorSettings {
            mode: EmitMode::Continuous,
            ..MonitorSettings::default()
        }, BrokenPipe);

        let err = m.run().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_on_interval() {
        let source = ScriptedSource::percent(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let settings = MonitorSettings {
            mode: EmitMode::Continuous,
            prefix: String::new(),
            poll_interval: Duration::from_millis(100),
        };
        let mut m = Monitor::new(source, MixerSelector::default(), settings, Vec::new());

        let result = tokio::time::timeout(Duration::from_millis(450), m.run()).await;

        assert!(result.is_err(), "run should only stop on output errors");
        assert_eq!(m.source.calls.load(Ordering::SeqCst), 5);
        assert_eq!(lines(m), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_tick_blocking() {
        let source = ScriptedSource::percent(&[3, 4]);
        let mut m = monitor(source, EmitMode::default(), "");

        assert_eq!(tokio_test::block_on(m.tick()).unwrap(), None);
        assert_eq!(tokio_test::block_on(m.tick()).unwrap(), Some(NormalizedVolume(4)));
    }
}
