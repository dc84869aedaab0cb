//! View-model for the translator page.
//!
//! Holds the text/Morse pair and the play button's display state. The
//! button only ever changes in response to sequencer notifications, so it
//! is the one place that branches on playback phase for display.

use serde::Serialize;

use crate::clipboard::{ClipboardWriter, CopyOutcome, copy_text};
use crate::codec;
use crate::error::MorseError;
use crate::sequencer::{PlaybackEvent, Sequencer, SessionId, ToneSink};

/// "1 character", "2 characters", ...
pub fn count_label(count: usize) -> String {
    if count == 1 {
        format!("{count} character")
    } else {
        format!("{count} characters")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translator {
    text: String,
    morse: String,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the input text and re-encode.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.morse = codec::encode(&self.text);
    }

    /// Append one character, as a reference-grid click does.
    pub fn append_char(&mut self, ch: char) {
        self.text.push(ch);
        self.morse = codec::encode(&self.text);
    }

    pub fn clear_all(&mut self) {
        self.text.clear();
        self.morse.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn morse(&self) -> &str {
        &self.morse
    }

    pub fn text_count_label(&self) -> String {
        count_label(self.text.encode_utf16().count())
    }

    pub fn morse_count_label(&self) -> String {
        count_label(self.morse.encode_utf16().count())
    }

    pub fn copy_text<W: ClipboardWriter + ?Sized>(&self, writer: &mut W) -> CopyOutcome {
        copy_text(writer, &self.text)
    }

    pub fn copy_morse<W: ClipboardWriter + ?Sized>(&self, writer: &mut W) -> CopyOutcome {
        copy_text(writer, &self.morse)
    }

    /// The play button's click: stop if playing, otherwise play the
    /// current Morse output.
    pub fn toggle_playback<S: ToneSink>(
        &self,
        sequencer: &mut Sequencer<S>,
    ) -> Result<Option<SessionId>, MorseError> {
        if sequencer.is_active() {
            sequencer.stop();
            Ok(None)
        } else {
            sequencer.start(&self.morse)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayIcon {
    Play,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayButton {
    pub icon: PlayIcon,
    pub label: &'static str,
    pub enabled: bool,
    pub playing: bool,
}

impl Default for PlayButton {
    fn default() -> Self {
        PlayButton {
            icon: PlayIcon::Play,
            label: "Play Morse",
            enabled: true,
            playing: false,
        }
    }
}

impl PlayButton {
    pub fn apply(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Started => {
                self.icon = PlayIcon::Stop;
                self.label = "Stop";
                self.playing = true;
                // Re-enabled once the first step is under way.
                self.enabled = false;
            }
            PlaybackEvent::Underway => self.enabled = true,
            PlaybackEvent::Finished { .. } => *self = PlayButton::default(),
        }
    }

    /// Extra styling class while playing.
    pub fn css_class(&self) -> Option<&'static str> {
        self.playing.then_some("playing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::Acknowledgment;
    use crate::sequencer::{PlaybackConfig, Step};
    use crate::timeline::RecordingSink;
    use std::cell::RefCell;
    use std::error::Error;
    use std::rc::Rc;

    fn wired() -> (Sequencer<RecordingSink>, Rc<RefCell<PlayButton>>) {
        let button = Rc::new(RefCell::new(PlayButton::default()));
        let mut seq = Sequencer::new(RecordingSink::default(), PlaybackConfig::default());
        let view = Rc::clone(&button);
        seq.subscribe(move |e: PlaybackEvent| view.borrow_mut().apply(e));
        (seq, button)
    }

    #[test]
    fn counts_are_pluralised() {
        assert_eq!(count_label(0), "0 characters");
        assert_eq!(count_label(1), "1 character");
        assert_eq!(count_label(12), "12 characters");
    }

    #[test]
    fn typing_updates_morse_and_counts() {
        let mut t = Translator::new();
        t.set_text("sos");
        assert_eq!(t.morse(), "... --- ...");
        assert_eq!(t.text_count_label(), "3 characters");
        assert_eq!(t.morse_count_label(), "11 characters");
    }

    #[test]
    fn counts_use_utf16_units() {
        let mut t = Translator::new();
        t.set_text("\u{1F600}");
        assert_eq!(t.text_count_label(), "2 characters");
        assert_eq!(t.morse_count_label(), "1 character");
    }

    #[test]
    fn grid_click_appends() {
        let mut t = Translator::new();
        t.append_char('E');
        t.append_char('T');
        assert_eq!(t.text(), "ET");
        assert_eq!(t.morse(), ". -");
    }

    #[test]
    fn clear_all_empties_both() {
        let mut t = Translator::new();
        t.set_text("hi");
        t.clear_all();
        assert_eq!(t, Translator::default());
        assert_eq!(t.text_count_label(), "0 characters");
    }

    #[test]
    fn button_follows_playback() {
        let (mut seq, button) = wired();
        let mut t = Translator::new();
        t.set_text("e");

        t.toggle_playback(&mut seq).unwrap();
        assert_eq!(button.borrow().icon, PlayIcon::Stop);
        assert_eq!(button.borrow().label, "Stop");
        assert!(!button.borrow().enabled);
        assert_eq!(button.borrow().css_class(), Some("playing"));

        seq.advance().unwrap();
        assert!(button.borrow().enabled);

        while let Step::Wait(_) = seq.advance().unwrap() {}
        assert_eq!(*button.borrow(), PlayButton::default());
    }

    #[test]
    fn toggle_stops_active_playback() {
        let (mut seq, button) = wired();
        let mut t = Translator::new();
        t.set_text("hello");

        t.toggle_playback(&mut seq).unwrap();
        seq.advance().unwrap();
        assert!(seq.sink().is_sounding());

        assert_eq!(t.toggle_playback(&mut seq).unwrap(), None);
        assert!(!seq.is_active());
        assert!(!seq.sink().is_sounding());
        assert_eq!(button.borrow().css_class(), None);
    }

    #[test]
    fn toggle_with_empty_output_does_nothing() {
        let (mut seq, button) = wired();
        let t = Translator::new();
        assert_eq!(t.toggle_playback(&mut seq).unwrap(), None);
        assert_eq!(*button.borrow(), PlayButton::default());
    }

    #[test]
    fn copy_uses_current_values() {
        struct Last(Option<String>);
        impl ClipboardWriter for Last {
            fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error>> {
                self.0 = Some(text.to_string());
                Ok(())
            }
        }

        let mut t = Translator::new();
        t.set_text("ok");
        let mut clip = Last(None);
        assert_eq!(t.copy_morse(&mut clip), CopyOutcome::Copied(Acknowledgment));
        assert_eq!(clip.0.as_deref(), Some("--- -.-"));
        t.copy_text(&mut clip);
        assert_eq!(clip.0.as_deref(), Some("ok"));
    }
}
