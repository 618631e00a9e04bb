//! Playback engine
//!
//! Resolves pitches to samples and keeps track of the one voice the drill is sounding.

use log::debug;

use crate::error::Result;
use crate::sample::{SampleBank, SampleSelection};
use super::types::{AudioOutput, GainRamp, VoiceId, VoiceParams, VoiceState};

/// Length of the fade-out when a note is stopped, in seconds.
pub const DEFAULT_FADE_OUT: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
struct FadingVoice {
    id: VoiceId,
    until: f64,
}

/// Plays sample-bank notes on an [`AudioOutput`].
///
/// # Voices
/// At most one voice is *active*. [`play`](PlaybackEngine::play) always starts a new
/// voice and makes it active. An active voice that was never stopped is superseded
/// and rings out on its own. [`stop_current`](PlaybackEngine::stop_current) fades the
/// active voice and moves it to the fading set, from which
/// [`reap_finished`](PlaybackEngine::reap_finished) reports it once the fade has elapsed.
///
/// ```text
/// Idle --play--> Playing --stop_current--> Fading --(fade elapsed)--> Idle
/// ```
///
/// # Example
/// ```rust
/// use tromba::playback::{PlaybackEngine, RecordingOutput, VoiceState};
/// use tromba::{SampleBank, SampleLayout};
///
/// let layout = SampleLayout::default();
/// let bank = SampleBank::new(layout, layout.default_file_names("wav")).unwrap();
/// let mut engine = PlaybackEngine::new(RecordingOutput::new(), bank);
///
/// let voice = engine.play(61).unwrap();
/// assert_eq!(engine.voice_state(voice), VoiceState::Playing);
///
/// engine.stop_current().unwrap();
/// engine.output_mut().advance(0.2);
/// assert_eq!(engine.reap_finished(), vec![voice]);
/// ```
pub struct PlaybackEngine<O: AudioOutput> {
    output: O,
    bank: SampleBank<O::Buffer>,
    fade_out: f64,
    active: Option<VoiceId>,
    fading: Vec<FadingVoice>,
}

impl<O: AudioOutput> PlaybackEngine<O> {
    pub fn new(output: O, bank: SampleBank<O::Buffer>) -> Self {
        Self {
            output,
            bank,
            fade_out: DEFAULT_FADE_OUT,
            active: None,
            fading: Vec::new(),
        }
    }

    /// Use a different fade-out length (negative values are treated as zero).
    pub fn with_fade_out(mut self, seconds: f64) -> Self {
        self.fade_out = seconds.max(0.0);
        self
    }

    pub fn fade_out(&self) -> f64 {
        self.fade_out
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn bank(&self) -> &SampleBank<O::Buffer> {
        &self.bank
    }

    pub fn active_voice(&self) -> Option<VoiceId> {
        self.active
    }

    /// Which sample and detune would serve `pitch`.
    pub fn resolve(&self, pitch: i32) -> Result<SampleSelection> {
        self.bank.layout().resolve(pitch)
    }

    /// Start `pitch` now at full gain and make it the active voice.
    pub fn play(&mut self, pitch: i32) -> Result<VoiceId> {
        let (buffer, selection) = self.bank.lookup(pitch)?;
        let params = VoiceParams {
            detune_cents: selection.detune_cents,
            gain: 1.0,
            start_time: self.output.current_time(),
        };
        let voice = self.output.start_voice(buffer, params)?;

        if let Some(previous) = self.active.replace(voice) {
            debug!("voice {:?} superseded by {:?}", previous, voice);
        }
        debug!(
            "playing pitch {} as {:?} at {:.3}s (sample {}, {} cents)",
            pitch, voice, params.start_time, selection.index, selection.detune_cents
        );
        Ok(voice)
    }

    /// Fade out the active voice. A no-op returning `None` when nothing is active.
    pub fn stop_current(&mut self) -> Result<Option<VoiceId>> {
        let Some(voice) = self.active else {
            return Ok(None);
        };

        let now = self.output.current_time();
        let until = now + self.fade_out;
        self.output.ramp_gain(
            voice,
            GainRamp { from: 1.0, to: 0.0, start_time: now, end_time: until },
        )?;
        self.output.stop_voice(voice, until)?;

        self.active = None;
        self.fading.push(FadingVoice { id: voice, until });
        debug!("fading {:?} until {:.3}s", voice, until);
        Ok(Some(voice))
    }

    /// Superseded voices are not tracked and report [`VoiceState::Idle`].
    pub fn voice_state(&self, voice: VoiceId) -> VoiceState {
        if self.active == Some(voice) {
            return VoiceState::Playing;
        }
        let now = self.output.current_time();
        match self.fading.iter().find(|f| f.id == voice) {
            Some(f) if now < f.until => VoiceState::Fading { until: f.until },
            _ => VoiceState::Idle,
        }
    }

    /// Drop and return the voices whose fade-out has finished.
    pub fn reap_finished(&mut self) -> Vec<VoiceId> {
        let now = self.output.current_time();
        let mut finished = Vec::new();
        self.fading.retain(|f| {
            if now >= f.until {
                finished.push(f.id);
                false
            } else {
                true
            }
        });
        finished
    }
}
