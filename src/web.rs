//! Browser playback bridge.
//!
//! The page owns the WebAudio oscillator and the `setTimeout` loop; the
//! sequencer runs here. Each call returns a [`StepReport`] with the audio
//! commands to apply, the notifications raised, and how long to wait
//! before calling `advance` again.
//!
//! Timers carry the session id they were scheduled for. A timer left over
//! from a stopped session gets an empty report, so it cannot step a newer
//! session.
//!
//! ```javascript
//! const player = new MorsePlayer();
//! const apply = (report) => {
//!     report.commands.forEach(runAudioCommand);
//!     report.events.forEach(updatePlayButton);
//!     if (report.wait_ms !== undefined) {
//!         const session = report.session;
//!         setTimeout(() => apply(player.advance(session)), report.wait_ms);
//!     }
//! };
//! apply(player.start(morseInput.value));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{AudioError, MorseError};
use crate::sequencer::{PlaybackConfig, PlaybackEvent, Sequencer, SessionId, Step, ToneSink};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AudioCommand {
    ToneOn { frequency: f64, gain: f64 },
    ToneOff,
}

/// Queues audio commands for the page to apply.
#[derive(Debug, Default)]
pub struct CommandSink {
    pending: Vec<AudioCommand>,
    sounding: bool,
}

impl CommandSink {
    fn take(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.pending)
    }
}

impl ToneSink for CommandSink {
    fn tone_on(&mut self, frequency: f64, gain: f64) -> Result<(), AudioError> {
        self.pending.push(AudioCommand::ToneOn { frequency, gain });
        self.sounding = true;
        Ok(())
    }

    fn tone_off(&mut self) {
        if self.sounding {
            self.pending.push(AudioCommand::ToneOff);
            self.sounding = false;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub commands: Vec<AudioCommand>,
    pub events: Vec<PlaybackEvent>,
    /// Delay before the next `advance`; absent when playback is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<f64>,
    pub playing: bool,
    /// The session the next `advance` must name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionId>,
}

#[wasm_bindgen]
pub struct MorsePlayer {
    sequencer: Sequencer<CommandSink>,
    events: Rc<RefCell<Vec<PlaybackEvent>>>,
}

impl Default for MorsePlayer {
    fn default() -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut sequencer = Sequencer::new(CommandSink::default(), PlaybackConfig::default());
        let seen = Rc::clone(&events);
        sequencer.subscribe(move |e: PlaybackEvent| seen.borrow_mut().push(e));
        MorsePlayer { sequencer, events }
    }
}

#[wasm_bindgen]
impl MorsePlayer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MorsePlayer {
        MorsePlayer::default()
    }

    /// Start playing. Playing an empty string returns an empty report.
    pub fn start(&mut self, morse: &str) -> Result<JsValue, JsValue> {
        let report = self.start_report(morse).map_err(to_js_error)?;
        to_js(&report)
    }

    /// Step `session`. Stale sessions get an empty report.
    pub fn advance(&mut self, session: u64) -> Result<JsValue, JsValue> {
        let report = self
            .advance_report(SessionId(session))
            .map_err(to_js_error)?;
        to_js(&report)
    }

    pub fn stop(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.stop_report())
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_active()
    }
}

impl MorsePlayer {
    pub fn start_report(&mut self, morse: &str) -> Result<StepReport, MorseError> {
        let started = self.sequencer.start(morse)?;
        // The first step runs on the page's next tick.
        let wait = started.map(|_| 0.0);
        Ok(self.report(wait))
    }

    pub fn advance_report(&mut self, session: SessionId) -> Result<StepReport, MorseError> {
        if self.sequencer.session_id() != Some(session) {
            log::debug!("ignoring stale advance for session {}", session.0);
            return Ok(StepReport {
                commands: Vec::new(),
                events: Vec::new(),
                wait_ms: None,
                playing: self.sequencer.is_active(),
                session: self.sequencer.session_id(),
            });
        }
        let wait = match self.sequencer.advance()? {
            Step::Wait(delay) => Some(delay.as_millis() as f64),
            Step::Done => None,
        };
        Ok(self.report(wait))
    }

    pub fn stop_report(&mut self) -> StepReport {
        self.sequencer.stop();
        self.report(None)
    }

    fn report(&mut self, wait_ms: Option<f64>) -> StepReport {
        StepReport {
            commands: self.sequencer.sink_mut().take(),
            events: std::mem::take(&mut *self.events.borrow_mut()),
            wait_ms,
            playing: self.sequencer.is_active(),
            session: self.sequencer.session_id(),
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&format!("{e}")))
}

fn to_js_error(e: MorseError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}
