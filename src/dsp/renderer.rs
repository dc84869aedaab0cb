//! Offline renderer — turns a Timeline into mono samples or a WAV file.

use crate::timeline::Timeline;

use super::oscillator::Oscillator;

/// Render a timeline to mono f32 samples at `sample_rate`.
pub fn render_samples(timeline: &Timeline, sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f64;
    let len = (timeline.total.as_secs_f64() * rate).round() as usize;
    let mut buffer = vec![0.0f32; len];
    let mut osc = Oscillator::new(rate);

    for span in &timeline.tones {
        let start = (span.start.as_secs_f64() * rate).round() as usize;
        let end = ((span.end().as_secs_f64() * rate).round() as usize).min(len);
        osc.frequency = span.frequency;
        osc.reset();
        for sample in buffer.iter_mut().take(end).skip(start) {
            *sample = (osc.next_sample() * span.gain) as f32;
        }
    }

    buffer
}

/// Render a timeline to a WAV file as bytes (16-bit mono PCM).
pub fn render_wav(timeline: &Timeline, sample_rate: u32) -> Vec<u8> {
    let pcm: Vec<i16> = render_samples(timeline, sample_rate)
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();

    encode_wav(&pcm, sample_rate)
}

/// Encode i16 PCM samples to a WAV byte buffer.
///
/// Mono only: the tone is a single channel, so `samples` is one frame per
/// sample and the header's channel count is fixed at one.
fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate * block_align as u32;
    let data_size = (samples.len() * 2) as u32;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&CHANNELS.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
