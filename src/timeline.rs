//! Timeline — the full schedule of one playback, computed ahead of time.
//!
//! Built by running a [`Sequencer`] against a [`RecordingSink`] and a
//! virtual clock, so rendered audio always matches live playback.

use std::time::Duration;

use crate::error::AudioError;
use crate::sequencer::{PlaybackConfig, Sequencer, Step, ToneSink};

/// One sounding interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpan {
    pub start: Duration,
    pub duration: Duration,
    pub frequency: f64,
    pub gain: f64,
}

impl ToneSpan {
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }
}

/// A sink that records tone intervals against an externally set clock.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Current position of the virtual clock.
    pub now: Duration,
    spans: Vec<ToneSpan>,
    open: Option<(Duration, f64, f64)>,
}

impl RecordingSink {
    pub fn spans(&self) -> &[ToneSpan] {
        &self.spans
    }

    pub fn is_sounding(&self) -> bool {
        self.open.is_some()
    }

    fn close(&mut self) {
        if let Some((start, frequency, gain)) = self.open.take() {
            self.spans.push(ToneSpan {
                start,
                duration: self.now.saturating_sub(start),
                frequency,
                gain,
            });
        }
    }
}

impl ToneSink for RecordingSink {
    fn tone_on(&mut self, frequency: f64, gain: f64) -> Result<(), AudioError> {
        self.close();
        self.open = Some((self.now, frequency, gain));
        Ok(())
    }

    fn tone_off(&mut self) {
        self.close();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub tones: Vec<ToneSpan>,
    /// Time from start until the sequencer reports completion.
    pub total: Duration,
}

impl Timeline {
    pub fn from_morse(encoded: &str, config: &PlaybackConfig) -> Timeline {
        let mut sequencer = Sequencer::new(RecordingSink::default(), *config);
        match sequencer.start(encoded) {
            Ok(Some(_)) => {}
            Ok(None) => return Timeline::default(),
            Err(e) => {
                log::warn!("timeline not built: {e}");
                return Timeline::default();
            }
        }

        let mut clock = Duration::ZERO;
        loop {
            sequencer.sink_mut().now = clock;
            match sequencer.advance() {
                Ok(Step::Wait(delay)) => clock += delay,
                Ok(Step::Done) => break,
                Err(e) => {
                    log::warn!("timeline cut short: {e}");
                    break;
                }
            }
        }

        Timeline {
            tones: sequencer.sink().spans().to_vec(),
            total: clock,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty() && self.total.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn three_dots() {
        let t = Timeline::from_morse("...", &PlaybackConfig::default());
        assert_eq!(t.tones.len(), 3);
        assert!(t.tones.iter().all(|s| s.duration == ms(80)));
        assert_eq!(
            t.tones.iter().map(|s| s.start).collect::<Vec<_>>(),
            vec![ms(0), ms(160), ms(320)]
        );
        assert_eq!(t.total, ms(480));
    }

    #[test]
    fn sos_spacing() {
        let t = Timeline::from_morse("... --- ...", &PlaybackConfig::default());
        assert_eq!(t.tones.len(), 9);
        // Third dot ends at 400ms, trailing gap to 480, letter gap to 720.
        assert_eq!(t.tones[3].start, ms(720));
        assert_eq!(t.tones[3].duration, ms(240));
        assert!(t.tones.iter().all(|s| s.frequency == 600.0 && s.gain == 0.5));
    }

    #[test]
    fn tones_never_overlap() {
        let morse = crate::codec::encode("Hello World 73");
        let t = Timeline::from_morse(&morse, &PlaybackConfig::default());
        for pair in t.tones.windows(2) {
            assert!(pair[0].end() < pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
        assert!(t.tones.last().map_or(false, |s| s.end() <= t.total));
    }

    #[test]
    fn empty_input_has_empty_timeline() {
        let t = Timeline::from_morse("", &PlaybackConfig::default());
        assert!(t.is_empty());
    }

    #[test]
    fn word_gap_is_silent() {
        let t = Timeline::from_morse("/", &PlaybackConfig::default());
        assert!(t.tones.is_empty());
        assert_eq!(t.total, ms(560));
    }
}
