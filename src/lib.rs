pub mod clipboard;
pub mod codec;
pub mod dsp;
pub mod error;
pub mod preference;
pub mod presentation;
pub mod sequencer;
pub mod timeline;
pub mod token;
pub mod web;

#[cfg(feature = "native")]
pub mod audio;
#[cfg(feature = "native")]
pub mod player;

use crate::sequencer::PlaybackConfig;
use crate::timeline::Timeline;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: install the panic hook and console logger.
/// Call once before using anything else.
#[wasm_bindgen]
pub fn morse_init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Debug).ok();
    }
}

/// WASM-exposed: return the morse-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: encode text to Morse.
#[wasm_bindgen]
pub fn encode_text(text: &str) -> String {
    codec::encode(text)
}

/// WASM-exposed: decode Morse to text.
#[wasm_bindgen]
pub fn decode_morse(morse: &str) -> String {
    codec::decode(morse)
}

/// WASM-exposed: the reference grid as `[{ch, code}, ...]`.
#[wasm_bindgen]
pub fn morse_reference_grid() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&codec::reference_grid())
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: map the stored `morse-theme` value to a valid theme name.
#[wasm_bindgen]
pub fn resolve_theme(stored: Option<String>) -> String {
    preference::resolve_theme(stored.as_deref()).as_str().to_string()
}

/// WASM-exposed: "N character(s)" label for the input counters.
#[wasm_bindgen]
pub fn character_count_label(count: usize) -> String {
    presentation::count_label(count)
}

/// WASM-exposed: render Morse to mono f32 samples.
/// Returns the raw audio buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_morse_samples(morse: &str, sample_rate: u32) -> Vec<f32> {
    let timeline = Timeline::from_morse(morse, &PlaybackConfig::default());
    dsp::renderer::render_samples(&timeline, sample_rate)
}

/// WASM-exposed: render Morse to a WAV byte array.
#[wasm_bindgen]
pub fn render_morse_wav(morse: &str, sample_rate: u32) -> Vec<u8> {
    let timeline = Timeline::from_morse(morse, &PlaybackConfig::default());
    dsp::renderer::render_wav(&timeline, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_manifest() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn exported_codec_round_trips() {
        assert_eq!(decode_morse(&encode_text("Hello World")), "HELLO WORLD");
    }

    #[test]
    fn exported_theme_resolution() {
        assert_eq!(resolve_theme(None), "light");
        assert_eq!(resolve_theme(Some("dark".into())), "dark");
        assert_eq!(resolve_theme(Some("solarized".into())), "light");
    }

    #[test]
    fn exported_render_matches_timeline() {
        let samples = render_morse_samples("-", 1000);
        // dash + trailing gap = 320ms
        assert_eq!(samples.len(), 320);
        assert!(render_morse_wav("", 1000).len() == 44);
    }
}
