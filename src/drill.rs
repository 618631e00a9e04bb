//! # Drill
//!
//! Alternates between showing a note and answering it.
//!
//! On each trigger the drill either **reveals** the note on display (its label and
//! fingering become visible and its sound plays) or **advances** to a new note. The two
//! always alternate, starting from the prompt returned by [`Drill::start`].
//!
//! Notes are written for a B♭ trumpet, so the sounding pitch is the written pitch plus
//! [`DrillOptions::concert_offset`] (-2 by default).
//!
//! ## Example
//! ```rust
//! use tromba::drill::{Drill, DrillEvent, DrillOptions};
//! use tromba::playback::{PlaybackEngine, RecordingOutput};
//! use tromba::{SampleBank, SampleLayout, SequentialSelector};
//!
//! let layout = SampleLayout::default();
//! let bank = SampleBank::new(layout, layout.default_file_names("wav")).unwrap();
//! let engine = PlaybackEngine::new(RecordingOutput::new(), bank);
//! let mut drill = Drill::new(SequentialSelector::new(54), engine, DrillOptions::default());
//!
//! assert_eq!(drill.start().name, "F#3");
//! assert!(matches!(drill.trigger().unwrap(), DrillEvent::Answer { .. }));
//! assert!(matches!(drill.trigger().unwrap(), DrillEvent::Prompt(note) if note.name == "G3"));
//! ```

use log::{debug, warn};

use crate::config::{DrillConfig, BB_TRUMPET_CONCERT_OFFSET};
use crate::error::{Result, TrombaError};
use crate::note::Note;
use crate::playback::{AudioOutput, OutputState, PlaybackEngine, VoiceId};
use crate::sample::SampleBank;
use crate::selection::{NoteSelector, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillOptions {
    /// Semitones from written to sounding pitch.
    pub concert_offset: i32,
    /// Fade the previous note out before showing the next prompt.
    pub stop_before_advance: bool,
}

impl Default for DrillOptions {
    fn default() -> Self {
        Self { concert_offset: BB_TRUMPET_CONCERT_OFFSET, stop_before_advance: false }
    }
}

impl From<&DrillConfig> for DrillOptions {
    fn from(config: &DrillConfig) -> Self {
        Self {
            concert_offset: config.concert_offset,
            stop_before_advance: config.stop_before_advance,
        }
    }
}

/// What a trigger did.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillEvent {
    /// A new note to show without its answer.
    Prompt(Note),
    /// The answer for the note on display; `voice` is `None` if it could not be sounded.
    Answer { note: Note, voice: Option<VoiceId> },
}

pub struct Drill<S: NoteSelector, O: AudioOutput> {
    selector: S,
    engine: PlaybackEngine<O>,
    options: DrillOptions,
    prompt: Option<Note>,
    last: Option<Note>,
}

impl<O: AudioOutput> Drill<Selector, O> {
    /// Build a drill from configuration with an already loaded sample bank.
    pub fn from_config(config: &DrillConfig, output: O, bank: SampleBank<O::Buffer>) -> Result<Self> {
        config.validate()?;
        let engine = PlaybackEngine::new(output, bank).with_fade_out(config.fade_out);
        Ok(Self::new(config.selector()?, engine, DrillOptions::from(config)))
    }
}

impl<S: NoteSelector, O: AudioOutput> Drill<S, O> {
    pub fn new(selector: S, engine: PlaybackEngine<O>, options: DrillOptions) -> Self {
        Self { selector, engine, options, prompt: None, last: None }
    }

    /// Show the first prompt.
    pub fn start(&mut self) -> Note {
        let note = self.selector.initial_note();
        self.prompt = Some(note.clone());
        note
    }

    /// The note currently on display, prompted or answered.
    pub fn current_note(&self) -> Option<&Note> {
        self.prompt.as_ref().or(self.last.as_ref())
    }

    /// True while a prompt is waiting for its answer.
    pub fn awaiting_answer(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn engine(&self) -> &PlaybackEngine<O> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlaybackEngine<O> {
        &mut self.engine
    }

    pub fn options(&self) -> DrillOptions {
        self.options
    }

    /// Handle one click, tap or key press.
    pub fn trigger(&mut self) -> Result<DrillEvent> {
        self.ensure_running();
        self.engine.reap_finished();

        match self.prompt.take() {
            Some(note) => self.reveal(note),
            None => self.advance(),
        }
    }

    fn ensure_running(&mut self) {
        if self.engine.output().state() == OutputState::Running {
            return;
        }
        if let Err(e) = self.engine.output_mut().resume() {
            warn!("{}; retrying on next trigger", e);
        }
    }

    fn reveal(&mut self, note: Note) -> Result<DrillEvent> {
        let sounding = note.pitch + self.options.concert_offset;
        let voice = match self.engine.play(sounding) {
            Ok(voice) => Some(voice),
            Err(e @ TrombaError::PitchOutOfRange { .. }) => {
                warn!("cannot sound {}: {}", note.name, e);
                None
            }
            Err(e) => {
                // still waiting for this answer
                self.prompt = Some(note);
                return Err(e);
            }
        };
        debug!("revealed {} ({}, valves {})", note.name, note.label, note.fingering.digits());
        self.last = Some(note.clone());
        Ok(DrillEvent::Answer { note, voice })
    }

    fn advance(&mut self) -> Result<DrillEvent> {
        if self.options.stop_before_advance {
            self.engine.stop_current()?;
        }
        let note = self.selector.next_note();
        debug!("prompting {}", note.name);
        self.prompt = Some(note.clone());
        Ok(DrillEvent::Prompt(note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::playback::{AudioCommand, RecordingOutput, VoiceState};
    use crate::sample::SampleLayout;
    use crate::selection::SequentialSelector;

    fn bank() -> SampleBank<String> {
        let layout = SampleLayout::default();
        SampleBank::new(layout, layout.default_file_names("wav")).unwrap()
    }

    fn drill(output: RecordingOutput, options: DrillOptions) -> Drill<SequentialSelector, RecordingOutput> {
        Drill::new(SequentialSelector::new(54), PlaybackEngine::new(output, bank()), options)
    }

    fn starts(output: &RecordingOutput) -> Vec<(String, i32)> {
        output
            .commands()
            .iter()
            .filter_map(|c| match c {
                AudioCommand::Start { buffer, params, .. } => Some((buffer.clone(), params.detune_cents)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_alternates_reveal_and_advance() {
        let mut drill = drill(RecordingOutput::new(), DrillOptions::default());
        assert_eq!(drill.start().pitch, 54);
        assert!(drill.awaiting_answer());

        match drill.trigger().unwrap() {
            DrillEvent::Answer { note, voice } => {
                assert_eq!(note.pitch, 54);
                assert!(voice.is_some());
            }
            other => panic!("expected answer, got {:?}", other),
        }
        assert!(!drill.awaiting_answer());
        assert_eq!(drill.current_note().map(|n| n.pitch), Some(54));

        match drill.trigger().unwrap() {
            DrillEvent::Prompt(note) => assert_eq!(note.pitch, 55),
            other => panic!("expected prompt, got {:?}", other),
        }
        assert!(matches!(drill.trigger().unwrap(), DrillEvent::Answer { note, .. } if note.pitch == 55));
    }

    #[test]
    fn test_reveal_sounds_concert_pitch() {
        let mut drill = drill(RecordingOutput::new(), DrillOptions::default());
        drill.start();
        drill.trigger().unwrap();
        // written F#3 (54) sounds E3 (52): nearest sample D#3, one semitone up
        assert_eq!(starts(drill.engine().output()), vec![("D#3v12.wav".to_string(), 100)]);
    }

    #[test]
    fn test_stop_before_advance() {
        let options = DrillOptions { stop_before_advance: true, ..DrillOptions::default() };
        let mut drill = drill(RecordingOutput::new(), options);
        drill.start();
        let voice = match drill.trigger().unwrap() {
            DrillEvent::Answer { voice, .. } => voice.unwrap(),
            other => panic!("expected answer, got {:?}", other),
        };
        drill.trigger().unwrap();
        assert!(matches!(drill.engine().voice_state(voice), VoiceState::Fading { .. }));
    }

    #[test]
    fn test_without_stop_previous_voice_is_left_ringing() {
        let mut drill = drill(RecordingOutput::new(), DrillOptions::default());
        drill.start();
        drill.trigger().unwrap();
        drill.trigger().unwrap();
        assert!(!drill
            .engine()
            .output()
            .commands()
            .iter()
            .any(|c| matches!(c, AudioCommand::Stop { .. })));
    }

    #[test]
    fn test_resumes_suspended_output() {
        let mut drill = drill(RecordingOutput::suspended(), DrillOptions::default());
        drill.start();
        drill.trigger().unwrap();
        assert_eq!(drill.engine().output().state(), OutputState::Running);
        assert_eq!(drill.engine().output().commands()[0], AudioCommand::Resume);
    }

    #[test]
    fn test_resume_failure_is_retried() {
        let mut drill = drill(RecordingOutput::suspended().fail_resumes(1), DrillOptions::default());
        drill.start();

        assert!(matches!(drill.trigger().unwrap(), DrillEvent::Answer { .. }));
        assert_eq!(drill.engine().output().state(), OutputState::Suspended);

        drill.trigger().unwrap();
        assert_eq!(drill.engine().output().state(), OutputState::Running);
    }

    #[test]
    fn test_unsoundable_note_still_answers() {
        let options = DrillOptions { concert_offset: -40, ..DrillOptions::default() };
        let mut drill = drill(RecordingOutput::new(), options);
        drill.start();
        match drill.trigger().unwrap() {
            DrillEvent::Answer { note, voice } => {
                assert_eq!(note.name, "F#3");
                assert_eq!(voice, None);
            }
            other => panic!("expected answer, got {:?}", other),
        }
        assert!(matches!(drill.trigger().unwrap(), DrillEvent::Prompt(_)));
    }

    #[test]
    fn test_failed_start_keeps_prompt() {
        let mut drill = drill(RecordingOutput::new().fail_starts(1), DrillOptions::default());
        drill.start();

        assert!(matches!(drill.trigger(), Err(TrombaError::AudioDevice(_))));
        assert!(drill.awaiting_answer());
        assert_eq!(drill.current_note().map(|n| n.pitch), Some(54));

        match drill.trigger().unwrap() {
            DrillEvent::Answer { note, voice } => {
                assert_eq!(note.pitch, 54);
                assert!(voice.is_some());
            }
            other => panic!("expected answer, got {:?}", other),
        }
        assert!(matches!(drill.trigger().unwrap(), DrillEvent::Prompt(note) if note.pitch == 55));
    }

    #[test]
    fn test_from_config() {
        let config = DrillConfig::preset(Preset::Chromatic);
        let mut drill = Drill::from_config(&config, RecordingOutput::new(), bank()).unwrap();
        assert!(drill.options().stop_before_advance);
        assert_eq!(drill.start().name, "F#3");
        assert_eq!(drill.engine().fade_out(), 0.1);
    }
}
