//! Playback sequencer — plays an encoded string as timed tones.
//!
//! The sequencer never sleeps. Each call to [`Sequencer::advance`] performs
//! one timed action and returns how long the caller must wait before the
//! next call; the driver (a `setTimeout` loop in the browser, a tokio task
//! natively, or a virtual clock when building a timeline) owns the waiting.
//!
//! ```text
//!  Idle ──start──▶ Playing ──advance…──▶ Idle   (Finished: Completed)
//!                     │
//!                     └──stop──▶ Stopping ──▶ Idle   (Finished: Stopped)
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AudioError, MorseError};
use crate::token::{Symbol, tokenize};

/// Base timing quantum in milliseconds.
pub const UNIT_MS: u64 = 80;
pub const TONE_FREQUENCY: f64 = 600.0;
pub const TONE_GAIN: f64 = 0.5;

const DOT_UNITS: u32 = 1;
const DASH_UNITS: u32 = 3;
const SYMBOL_GAP_UNITS: u32 = 1;
const LETTER_GAP_UNITS: u32 = 3;
const WORD_GAP_UNITS: u32 = 7;

// ── Configuration ───────────────────────────────────────────

/// Fixed playback parameters.
///
/// The defaults are the only supported values; the struct exists so the
/// numbers live in one place and can be handed to renderers and sinks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub unit_ms: u64,
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Output gain [0, 1].
    pub gain: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            unit_ms: UNIT_MS,
            frequency: TONE_FREQUENCY,
            gain: TONE_GAIN,
        }
    }
}

impl PlaybackConfig {
    pub fn unit(&self) -> Duration {
        Duration::from_millis(self.unit_ms)
    }

    pub fn units(&self, count: u32) -> Duration {
        self.unit() * count
    }
}

// ── Audio output seam ───────────────────────────────────────

/// The single audio output channel the sequencer drives.
///
/// Only one tone is ever sounding; `tone_on` is always followed by
/// `tone_off` before the next `tone_on`.
pub trait ToneSink {
    /// Acquire the output device. Called by `start` before any state change.
    fn prepare(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn tone_on(&mut self, frequency: f64, gain: f64) -> Result<(), AudioError>;

    /// Silence the output. Must be safe to call when nothing is sounding.
    fn tone_off(&mut self);
}

impl<S: ToneSink + ?Sized> ToneSink for Box<S> {
    fn prepare(&mut self) -> Result<(), AudioError> {
        (**self).prepare()
    }

    fn tone_on(&mut self, frequency: f64, gain: f64) -> Result<(), AudioError> {
        (**self).tone_on(frequency, gain)
    }

    fn tone_off(&mut self) {
        (**self).tone_off()
    }
}

// ── Notifications ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The queue ran out.
    Completed,
    /// `stop` was called.
    Stopped,
    /// The audio output failed mid-sequence.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// A session was accepted. The start control should stay disabled
    /// until `Underway`.
    Started,
    /// The first step of the session has been performed.
    Underway,
    /// Sent exactly once per session, whichever way it ended.
    Finished { reason: FinishReason },
}

/// Observer of sequencer state changes.
pub trait PlaybackListener {
    fn on_event(&mut self, event: PlaybackEvent);
}

impl<F: FnMut(PlaybackEvent)> PlaybackListener for F {
    fn on_event(&mut self, event: PlaybackEvent) {
        self(event)
    }
}

// ── Sequencer ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    /// Transient: only observable while a session is being torn down.
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub u64);

/// Result of one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Call `advance` again after this delay.
    Wait(Duration),
    /// Nothing is playing.
    Done,
}

/// Ephemeral state of one playback request.
struct PlaybackSession {
    id: SessionId,
    queue: VecDeque<Symbol>,
    /// Silence owed after the tone that is currently sounding.
    trailing_gap: Option<Duration>,
    underway: bool,
}

pub struct Sequencer<S: ToneSink> {
    sink: S,
    config: PlaybackConfig,
    state: PlaybackState,
    /// Present exactly while a session is playing.
    session: Option<PlaybackSession>,
    listeners: Vec<Box<dyn PlaybackListener>>,
    next_id: u64,
}

impl<S: ToneSink> Sequencer<S> {
    pub fn new(sink: S, config: PlaybackConfig) -> Self {
        Sequencer {
            sink,
            config,
            state: PlaybackState::Idle,
            session: None,
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub fn subscribe(&mut self, listener: impl PlaybackListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Begin playing `encoded`.
    ///
    /// Returns `Ok(None)` without any notification when there is nothing to
    /// play. Starting while a session is active is an error; the running
    /// session is left untouched. If the sink cannot be prepared the
    /// sequencer stays idle.
    pub fn start(&mut self, encoded: &str) -> Result<Option<SessionId>, MorseError> {
        if self.session.is_some() {
            return Err(MorseError::AlreadyPlaying);
        }

        let queue: VecDeque<Symbol> = tokenize(encoded).into();
        if queue.is_empty() {
            log::debug!("ignoring empty playback request");
            return Ok(None);
        }

        self.sink.prepare()?;

        let id = SessionId(self.next_id);
        self.next_id += 1;
        log::debug!("session {} started with {} symbols", id.0, queue.len());

        self.session = Some(PlaybackSession {
            id,
            queue,
            trailing_gap: None,
            underway: false,
        });
        self.state = PlaybackState::Playing;
        self.notify(PlaybackEvent::Started);
        Ok(Some(id))
    }

    /// Perform the next timed action of the current session.
    pub fn advance(&mut self) -> Result<Step, MorseError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Step::Done);
        };

        let first_step = !session.underway;
        session.underway = true;
        let trailing_gap = session.trailing_gap.take();
        let next = match trailing_gap {
            Some(_) => None,
            None => session.queue.pop_front(),
        };

        if first_step {
            self.notify(PlaybackEvent::Underway);
        }

        if let Some(gap) = trailing_gap {
            self.sink.tone_off();
            return Ok(Step::Wait(gap));
        }

        let Some(symbol) = next else {
            self.finish(FinishReason::Completed);
            return Ok(Step::Done);
        };

        let delay = match symbol {
            Symbol::Dot | Symbol::Dash => {
                let units = if symbol == Symbol::Dot {
                    DOT_UNITS
                } else {
                    DASH_UNITS
                };
                if let Err(e) = self.sink.tone_on(self.config.frequency, self.config.gain) {
                    log::warn!("tone emission failed: {e}");
                    self.finish(FinishReason::Failed);
                    return Err(e.into());
                }
                if let Some(session) = self.session.as_mut() {
                    session.trailing_gap = Some(self.config.units(SYMBOL_GAP_UNITS));
                }
                self.config.units(units)
            }
            Symbol::LetterGap => self.config.units(LETTER_GAP_UNITS),
            Symbol::WordGap => self.config.units(WORD_GAP_UNITS),
        };
        Ok(Step::Wait(delay))
    }

    /// Cancel the current session, silencing any tone in flight.
    ///
    /// A no-op when idle, so a session never reports `Finished` twice.
    pub fn stop(&mut self) {
        self.finish(FinishReason::Stopped);
    }

    fn finish(&mut self, reason: FinishReason) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        self.state = PlaybackState::Stopping;
        session.queue.clear();
        self.sink.tone_off();
        self.state = PlaybackState::Idle;
        log::debug!("session {} finished: {reason:?}", session.id.0);
        self.notify(PlaybackEvent::Finished { reason });
    }

    fn notify(&mut self, event: PlaybackEvent) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(event);
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Symbols not yet dequeued.
    pub fn remaining(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.queue.len())
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
