//! Integration tests for the trumpet drill
//!
//! Runs full advance/reveal cycles from configuration through to scheduled audio.

use rand::rngs::StdRng;
use rand::SeedableRng;

use tromba::playback::{AudioCommand, PlaybackEngine, RecordingOutput, VoiceState};
use tromba::{
    resolve_note, resolve_sample, select_random_note, Drill, DrillConfig, DrillEvent, Fingering, NoteSelector,
    Preset, SampleBank, SampleLayout, SequentialSelector,
};

fn recorded_bank() -> SampleBank<String> {
    let layout = SampleLayout::default();
    SampleBank::new(layout, layout.default_file_names("wav")).unwrap()
}

#[test]
fn test_resolve_sample_examples() {
    let at_sample = resolve_sample(60).unwrap();
    assert_eq!((at_sample.index, at_sample.sample_pitch, at_sample.detune_cents), (4, 60, 0));

    let above = resolve_sample(61).unwrap();
    assert_eq!((above.index, above.sample_pitch, above.detune_cents), (4, 60, 100));
}

#[test]
fn test_resolve_note_example() {
    let note = resolve_note(61, true);
    assert_eq!(note.name, "C#4");
    assert_eq!(note.label, "cis'");
    assert_eq!(note.fingering, Fingering::Valves([true, true, true]));
}

#[test]
fn test_fingering_is_all_or_nothing() {
    for pitch in -100..300 {
        let valves = resolve_note(pitch, true).fingering.valves();
        assert!(valves.iter().all(Option::is_some) || valves.iter().all(Option::is_none));
    }
}

#[test]
fn test_every_written_trumpet_note_can_sound() {
    let config = DrillConfig::preset(Preset::Trumpet);
    let layout = SampleLayout::default();
    for pitch in config.lowest_pitch..=config.highest_pitch {
        assert!(layout.resolve(pitch + config.concert_offset).is_ok(), "pitch {}", pitch);
    }
}

#[test]
fn test_random_selection_bounds() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..10_000 {
        let note = select_random_note(54, 83, &mut rng).unwrap();
        assert!((54..=83).contains(&note.pitch));
    }
}

#[test]
fn test_chromatic_drill_session() {
    let config = DrillConfig::preset(Preset::Chromatic);
    let mut drill = Drill::from_config(&config, RecordingOutput::new(), recorded_bank()).unwrap();

    let mut shown = vec![drill.start().pitch];
    let mut voices = Vec::new();
    for _ in 0..5 {
        match drill.trigger().unwrap() {
            DrillEvent::Answer { voice, .. } => voices.push(voice.unwrap()),
            DrillEvent::Prompt(note) => shown.push(note.pitch),
        }
        drill.engine_mut().output_mut().advance(0.5);
    }

    assert_eq!(shown, vec![54, 55, 56]);
    assert_eq!(voices.len(), 3);
    // the first two were faded before the next prompt, the last is still sounding
    assert_eq!(drill.engine().voice_state(voices[0]), VoiceState::Idle);
    assert_eq!(drill.engine().voice_state(voices[1]), VoiceState::Idle);
    assert_eq!(drill.engine().voice_state(voices[2]), VoiceState::Playing);

    let stops = drill
        .engine()
        .output()
        .commands()
        .iter()
        .filter(|c| matches!(c, AudioCommand::Stop { .. }))
        .count();
    assert_eq!(stops, 2);
}

#[test]
fn test_student_drill_with_range_override() {
    let config = DrillConfig::preset(Preset::Student).with_range_override(Some(60), Some(62)).unwrap();
    let mut drill = Drill::from_config(&config, RecordingOutput::suspended(), recorded_bank()).unwrap();

    let first = drill.start();
    assert!((60..=62).contains(&first.pitch));
    for _ in 0..40 {
        match drill.trigger().unwrap() {
            DrillEvent::Prompt(note) => assert!((60..=62).contains(&note.pitch)),
            DrillEvent::Answer { voice, .. } => assert!(voice.is_some()),
        }
    }
    assert_eq!(drill.engine().output().commands()[0], AudioCommand::Resume);
}

#[test]
fn test_engine_with_sequential_selector() {
    let mut selector = SequentialSelector::new(60);
    let mut engine = PlaybackEngine::new(RecordingOutput::new(), recorded_bank());

    let a = selector.next_note();
    let b = selector.next_note();
    assert_eq!(b.pitch - a.pitch, 1);

    let first = engine.play(a.pitch).unwrap();
    engine.stop_current().unwrap();
    let second = engine.play(b.pitch).unwrap();
    assert!(matches!(engine.voice_state(first), VoiceState::Fading { .. }));
    assert_eq!(engine.voice_state(second), VoiceState::Playing);
}

#[test]
fn test_note_json_shape() {
    let json = serde_json::to_value(resolve_note(80, false)).unwrap();
    assert_eq!(json["name"], "Ab5");
    assert_eq!(json["label"], "as''");
    assert_eq!(json["sharp"], false);
    assert_eq!(json["fingering"], serde_json::json!([null, null, null]));
}
