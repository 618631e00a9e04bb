//! Playback type definitions
//!
//! The [`AudioOutput`] trait is the seam between the engine and a concrete audio graph
//! (a cpal device, Web Audio in the browser, or a recording clock in tests).

use serde::Serialize;

use crate::error::Result;

/// Handle for one started voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VoiceId(pub u64);

/// Parameters for starting a voice.
///
/// # Fields
/// - `detune_cents`: pitch shift applied to the buffer (100 cents = 1 semitone)
/// - `gain`: constant gain from the start, no attack ramp
/// - `start_time`: audio clock time in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceParams {
    pub detune_cents: i32,
    pub gain: f32,
    pub start_time: f64,
}

/// A linear gain automation segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GainRamp {
    pub from: f32,
    pub to: f32,
    pub start_time: f64,
    pub end_time: f64,
}

impl GainRamp {
    /// Gain at time `t`: `from` before the ramp, `to` after it, linear in between.
    pub fn gain_at(&self, t: f64) -> f32 {
        if t <= self.start_time {
            self.from
        } else if t >= self.end_time || self.end_time <= self.start_time {
            self.to
        } else {
            let progress = ((t - self.start_time) / (self.end_time - self.start_time)) as f32;
            self.from + (self.to - self.from) * progress
        }
    }
}

/// Whether the output device is producing sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputState {
    /// Not yet started, or paused (browsers start audio suspended until a user gesture).
    Suspended,
    Running,
}

/// Lifecycle of a voice, as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceState {
    Playing,
    /// Fading out, silent from `until` (audio clock seconds).
    Fading { until: f64 },
    /// No longer tracked: finished fading, or superseded by a later `play` without a stop.
    /// A superseded voice may still be ringing on the output.
    Idle,
}

/// An audio graph the engine can schedule voices on.
///
/// All times are on the output's own clock ([`current_time`](AudioOutput::current_time)).
/// Scheduling calls return immediately; the output carries out ramps and stops by itself.
pub trait AudioOutput {
    /// Decoded sample data in whatever form the output plays.
    type Buffer;

    fn current_time(&self) -> f64;

    fn state(&self) -> OutputState;

    /// Start producing sound. May fail until the platform allows audio.
    fn resume(&mut self) -> Result<()>;

    fn start_voice(&mut self, buffer: &Self::Buffer, params: VoiceParams) -> Result<VoiceId>;

    fn ramp_gain(&mut self, voice: VoiceId, ramp: GainRamp) -> Result<()>;

    fn stop_voice(&mut self, voice: VoiceId, at: f64) -> Result<()>;
}
