//! cpal output device driving a shared [`Mixer`].

use std::sync::{Arc, Mutex, MutexGuard};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, error, warn};

use crate::error::{Result, TrombaError};
use crate::playback::{AudioOutput, GainRamp, OutputState, VoiceId, VoiceParams};
use super::mixer::Mixer;
use super::wav::SampleData;

/// The default output device, mixed in software.
///
/// The stream is created paused and starts on the first [`resume`](AudioOutput::resume).
pub struct CpalOutput {
    mixer: Arc<Mutex<Mixer>>,
    stream: cpal::Stream,
    state: OutputState,
}

fn lock(mixer: &Mutex<Mixer>) -> MutexGuard<'_, Mixer> {
    mixer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn render_into<T>(mixer: &Mutex<Mixer>, scratch: &mut Vec<f32>, data: &mut [T], channels: usize, convert: fn(f32) -> T) {
    scratch.resize(data.len(), 0.0);
    lock(mixer).render(scratch, channels);
    for (out, sample) in data.iter_mut().zip(scratch.iter()) {
        *out = convert(*sample);
    }
}

impl CpalOutput {
    pub fn open_default() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| TrombaError::AudioDevice("no audio output device available".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|e| TrombaError::AudioDevice(format!("failed to get default output config: {}", e)))?;

        let sample_rate = config.sample_rate().0;
        let channels = usize::from(config.channels());
        let mixer = Arc::new(Mutex::new(Mixer::new(sample_rate)));
        let shared = Arc::clone(&mixer);
        let on_error = |err| error!("audio stream error: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                device.build_output_stream(
                    &config.into(),
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        lock(&shared).render(data, channels);
                    },
                    on_error,
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let mut scratch = Vec::new();
                device.build_output_stream(
                    &config.into(),
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        render_into(&shared, &mut scratch, data, channels, |s| (s * 32767.0) as i16);
                    },
                    on_error,
                    None,
                )
            }
            cpal::SampleFormat::U16 => {
                let mut scratch = Vec::new();
                device.build_output_stream(
                    &config.into(),
                    move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                        render_into(&shared, &mut scratch, data, channels, |s| (s * 32767.0 + 32768.0) as u16);
                    },
                    on_error,
                    None,
                )
            }
            other => {
                return Err(TrombaError::AudioDevice(format!("unsupported sample format: {:?}", other)));
            }
        }
        .map_err(|e| TrombaError::AudioDevice(format!("failed to build audio stream: {}", e)))?;

        if let Err(e) = stream.pause() {
            warn!("could not pause new audio stream: {}", e);
        }
        debug!("audio stream ready: {} Hz, {} channels", sample_rate, channels);

        Ok(Self { mixer, stream, state: OutputState::Suspended })
    }

    pub fn sample_rate(&self) -> u32 {
        lock(&self.mixer).sample_rate()
    }
}

impl AudioOutput for CpalOutput {
    type Buffer = Arc<SampleData>;

    fn current_time(&self) -> f64 {
        lock(&self.mixer).time()
    }

    fn state(&self) -> OutputState {
        self.state
    }

    fn resume(&mut self) -> Result<()> {
        self.stream.play().map_err(|e| TrombaError::Resume(e.to_string()))?;
        self.state = OutputState::Running;
        debug!("audio stream running");
        Ok(())
    }

    fn start_voice(&mut self, buffer: &Arc<SampleData>, params: VoiceParams) -> Result<VoiceId> {
        Ok(lock(&self.mixer).start(Arc::clone(buffer), params))
    }

    fn ramp_gain(&mut self, voice: VoiceId, ramp: GainRamp) -> Result<()> {
        if !lock(&self.mixer).ramp(voice, ramp) {
            debug!("{:?} already finished, ramp skipped", voice);
        }
        Ok(())
    }

    fn stop_voice(&mut self, voice: VoiceId, at: f64) -> Result<()> {
        if !lock(&self.mixer).stop_at(voice, at) {
            debug!("{:?} already finished, stop skipped", voice);
        }
        Ok(())
    }
}
