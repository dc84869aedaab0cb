//! Native audio output through `cpal`.
//!
//! One output stream is opened on the default device the first time the
//! sink is prepared and kept for the sink's lifetime. The sequencer flips
//! the tone on and off through atomics; the stream callback never blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::dsp::oscillator::Oscillator;
use crate::error::AudioError;
use crate::sequencer::ToneSink;

#[derive(Debug)]
struct ToneControl {
    sounding: AtomicBool,
    frequency: AtomicU64,
    gain: AtomicU64,
}

impl Default for ToneControl {
    fn default() -> Self {
        ToneControl {
            sounding: AtomicBool::new(false),
            frequency: AtomicU64::new(600.0f64.to_bits()),
            gain: AtomicU64::new(0.0f64.to_bits()),
        }
    }
}

#[derive(Default)]
pub struct CpalToneSink {
    control: Arc<ToneControl>,
    stream: Option<Stream>,
}

impl CpalToneSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the output stream. The next `prepare` reopens it.
    pub fn release(&mut self) {
        if self.stream.take().is_some() {
            self.control.sounding.store(false, Ordering::Release);
            log::debug!("output stream closed");
        }
    }

    fn open_stream(control: Arc<ToneControl>) -> Result<Stream, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let supported = device.default_output_config().map_err(stream_error)?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, control),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, control),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, control),
            other => Err(AudioError::UnsupportedFormat {
                format: format!("{other:?}"),
            }),
        }?;
        stream.play().map_err(stream_error)?;

        log::debug!(
            "output stream opened: {} Hz, {} channel(s), {sample_format:?}",
            config.sample_rate.0,
            config.channels
        );
        Ok(stream)
    }
}

impl ToneSink for CpalToneSink {
    fn prepare(&mut self) -> Result<(), AudioError> {
        if self.stream.is_none() {
            self.stream = Some(Self::open_stream(Arc::clone(&self.control))?);
        }
        Ok(())
    }

    fn tone_on(&mut self, frequency: f64, gain: f64) -> Result<(), AudioError> {
        self.prepare()?;
        self.control
            .frequency
            .store(frequency.to_bits(), Ordering::Relaxed);
        self.control.gain.store(gain.to_bits(), Ordering::Relaxed);
        self.control.sounding.store(true, Ordering::Release);
        Ok(())
    }

    fn tone_off(&mut self) {
        self.control.sounding.store(false, Ordering::Release);
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    control: Arc<ToneControl>,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut osc = Oscillator::new(config.sample_rate.0 as f64);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let sounding = control.sounding.load(Ordering::Acquire);
                if !sounding {
                    osc.reset();
                    data.fill(T::EQUILIBRIUM);
                    return;
                }
                osc.frequency = f64::from_bits(control.frequency.load(Ordering::Relaxed));
                let gain = f64::from_bits(control.gain.load(Ordering::Relaxed));
                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample((osc.next_sample() * gain) as f32);
                    frame.fill(value);
                }
            },
            |err| log::error!("output stream error: {err}"),
            None,
        )
        .map_err(stream_error)
}

fn stream_error(e: impl std::fmt::Display) -> AudioError {
    AudioError::Stream {
        message: e.to_string(),
    }
}
