//! Software mixer for the native output.
//!
//! Voices are resampled with linear interpolation. The mixer's clock advances only
//! as frames are rendered, so it is the audio clock the engine schedules against.

use std::sync::Arc;

use crate::playback::{GainRamp, VoiceId, VoiceParams};
use super::wav::SampleData;

#[derive(Debug)]
struct MixVoice {
    id: VoiceId,
    data: Arc<SampleData>,
    start_frame: u64,
    position: f64,
    step: f64,
    gain: f32,
    ramp: Option<GainRamp>,
    stop_at: Option<f64>,
}

impl MixVoice {
    fn sample(&self) -> Option<f32> {
        let frames = &self.data.frames;
        let index = self.position as usize;
        let current = *frames.get(index)?;
        let next = frames.get(index + 1).copied().unwrap_or(0.0);
        let fraction = (self.position - index as f64) as f32;
        Some(current + (next - current) * fraction)
    }

    fn gain_at(&self, t: f64) -> f32 {
        self.ramp.map_or(self.gain, |ramp| ramp.gain_at(t))
    }
}

/// Playback rate for a buffer recorded at `source_rate` played at `output_rate`, shifted by `cents`.
pub fn playback_step(source_rate: u32, output_rate: u32, cents: i32) -> f64 {
    let base = f64::from(source_rate) / f64::from(output_rate.max(1));
    base * 2f64.powf(f64::from(cents) / 1200.0)
}

#[derive(Debug)]
pub struct Mixer {
    sample_rate: u32,
    frame: u64,
    next_voice: u64,
    voices: Vec<MixVoice>,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate: sample_rate.max(1), frame: 0, next_voice: 1, voices: Vec::new() }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Seconds of audio rendered so far.
    pub fn time(&self) -> f64 {
        self.frame as f64 / f64::from(self.sample_rate)
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn start(&mut self, data: Arc<SampleData>, params: VoiceParams) -> VoiceId {
        let id = VoiceId(self.next_voice);
        self.next_voice += 1;
        let start_frame = (params.start_time.max(0.0) * f64::from(self.sample_rate)).round() as u64;
        let step = playback_step(data.sample_rate, self.sample_rate, params.detune_cents);
        self.voices.push(MixVoice {
            id,
            data,
            start_frame,
            position: 0.0,
            step,
            gain: params.gain,
            ramp: None,
            stop_at: None,
        });
        id
    }

    /// Returns false if the voice has already finished.
    pub fn ramp(&mut self, id: VoiceId, ramp: GainRamp) -> bool {
        match self.voices.iter_mut().find(|v| v.id == id) {
            Some(voice) => {
                voice.ramp = Some(ramp);
                true
            }
            None => false,
        }
    }

    /// Returns false if the voice has already finished.
    pub fn stop_at(&mut self, id: VoiceId, at: f64) -> bool {
        match self.voices.iter_mut().find(|v| v.id == id) {
            Some(voice) => {
                voice.stop_at = Some(at);
                true
            }
            None => false,
        }
    }

    /// Mix into an interleaved buffer with `channels` channels, advancing the clock.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let rate = f64::from(self.sample_rate);

        for frame in out.chunks_mut(channels) {
            let t = self.frame as f64 / rate;
            let mut mix = 0.0f32;

            for voice in &mut self.voices {
                if self.frame < voice.start_frame {
                    continue;
                }
                if voice.stop_at.is_some_and(|stop| t >= stop) {
                    voice.position = f64::INFINITY;
                    continue;
                }
                if let Some(sample) = voice.sample() {
                    mix += sample * voice.gain_at(t);
                    voice.position += voice.step;
                }
            }

            let value = mix.clamp(-1.0, 1.0);
            for sample in frame.iter_mut() {
                *sample = value;
            }
            self.frame += 1;
        }

        let clock = self.frame;
        self.voices.retain(|v| clock < v.start_frame || (v.position as usize) < v.data.frames.len());
    }
}
