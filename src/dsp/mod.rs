//! DSP — tone synthesis shared by live output and offline rendering.
//!
//! The native audio sink and the WAV/AudioWorklet renderer both run the same
//! oscillator, so a rendered sequence sounds like the live one.

pub mod oscillator;
pub mod renderer;
