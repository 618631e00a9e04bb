//! # Playback Module
//!
//! Sounds the drill's notes from a sparse bank of trumpet recordings.
//!
//! ## Purpose
//! A requested pitch is served by the nearest recording, shifted by up to a semitone.
//! The engine starts it at full gain and fades the previous note out on request.
//! Two voices may overlap briefly while one fades.
//!
//! ## Sub-modules
//! - `types` - AudioOutput trait, VoiceId, VoiceParams, GainRamp, voice/output states
//! - `engine` - PlaybackEngine: sample resolution, active voice, fade-out scheduling
//! - `recording` - RecordingOutput: a silent output with a manual clock and command log
//!
//! ## Timing
//! Every time is read from the output's own audio clock, never from the wall clock.
//! A fade is a linear gain ramp from 1 to 0 over [`DEFAULT_FADE_OUT`] seconds and
//! a stop scheduled at the end of it. Once scheduled it always completes.
//!
//! ## Related Modules
//! - `sample` - SampleLayout and SampleBank used for resolution
//! - `native` - cpal-backed output with a software mixer
//! - `drill` - decides when to play and when to stop

mod engine;
mod recording;
mod types;


pub use engine::{PlaybackEngine, DEFAULT_FADE_OUT};
pub use recording::{AudioCommand, RecordingOutput};
pub use types::{AudioOutput, GainRamp, OutputState, VoiceId, VoiceParams, VoiceState};
