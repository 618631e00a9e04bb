//! An [`AudioOutput`] that plays nothing and records every command.
//!
//! The clock only moves when told to, so fades and voice states can be checked
//! deterministically. The CLI also uses it for `--mute`.

use serde::Serialize;

use crate::error::{Result, TrombaError};
use super::types::{AudioOutput, GainRamp, OutputState, VoiceId, VoiceParams};

/// One scheduled operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AudioCommand {
    Start { voice: VoiceId, buffer: String, params: VoiceParams },
    Ramp { voice: VoiceId, ramp: GainRamp },
    Stop { voice: VoiceId, at: f64 },
    Resume,
}

#[derive(Debug, Clone)]
pub struct RecordingOutput {
    time: f64,
    state: OutputState,
    resume_failures: usize,
    start_failures: usize,
    next_voice: u64,
    commands: Vec<AudioCommand>,
}

impl Default for RecordingOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingOutput {
    /// A running output at time zero.
    pub fn new() -> Self {
        Self {
            time: 0.0,
            state: OutputState::Running,
            resume_failures: 0,
            start_failures: 0,
            next_voice: 1,
            commands: Vec::new(),
        }
    }

    /// Start suspended, like a browser audio context before the first gesture.
    pub fn suspended() -> Self {
        Self { state: OutputState::Suspended, ..Self::new() }
    }

    /// Make the next `count` calls to `resume` fail.
    pub fn fail_resumes(mut self, count: usize) -> Self {
        self.resume_failures = count;
        self
    }

    /// Make the next `count` calls to `start_voice` fail with a device error.
    pub fn fail_starts(mut self, count: usize) -> Self {
        self.start_failures = count;
        self
    }

    pub fn advance(&mut self, seconds: f64) {
        self.time += seconds;
    }

    pub fn set_time(&mut self, seconds: f64) {
        self.time = seconds;
    }

    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl AudioOutput for RecordingOutput {
    type Buffer = String;

    fn current_time(&self) -> f64 {
        self.time
    }

    fn state(&self) -> OutputState {
        self.state
    }

    fn resume(&mut self) -> Result<()> {
        if self.resume_failures > 0 {
            self.resume_failures -= 1;
            return Err(TrombaError::Resume("audio output is not allowed to start yet".to_string()));
        }
        self.state = OutputState::Running;
        self.commands.push(AudioCommand::Resume);
        Ok(())
    }

    fn start_voice(&mut self, buffer: &String, params: VoiceParams) -> Result<VoiceId> {
        if self.start_failures > 0 {
            self.start_failures -= 1;
            return Err(TrombaError::AudioDevice(format!("could not start {}", buffer)));
        }
        let voice = VoiceId(self.next_voice);
        self.next_voice += 1;
        self.commands.push(AudioCommand::Start { voice, buffer: buffer.clone(), params });
        Ok(voice)
    }

    fn ramp_gain(&mut self, voice: VoiceId, ramp: GainRamp) -> Result<()> {
        self.commands.push(AudioCommand::Ramp { voice, ramp });
        Ok(())
    }

    fn stop_voice(&mut self, voice: VoiceId, at: f64) -> Result<()> {
        self.commands.push(AudioCommand::Stop { voice, at });
        Ok(())
    }
}
