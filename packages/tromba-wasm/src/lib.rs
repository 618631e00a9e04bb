use serde::Serialize;
use wasm_bindgen::prelude::*;

use tromba::drill::{Drill, DrillEvent};
use tromba::playback::{AudioOutput, GainRamp, OutputState, VoiceId, VoiceParams};
use tromba::{DrillConfig, LabelStyle, Note, Preset, SampleBank, Selector, TrombaError};

#[wasm_bindgen]
extern "C" {
    /// Web Audio graph provided by the page (see `web/audio-graph.js`).
    pub type AudioGraph;

    #[wasm_bindgen(method, getter, js_name = currentTime)]
    fn current_time(this: &AudioGraph) -> f64;

    #[wasm_bindgen(method, getter)]
    fn running(this: &AudioGraph) -> bool;

    /// Resolves to `false` instead of rejecting; the reason is kept for `takeResumeError`.
    #[wasm_bindgen(method, catch)]
    fn resume(this: &AudioGraph) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, js_name = takeResumeError)]
    fn take_resume_error(this: &AudioGraph) -> Option<String>;

    #[wasm_bindgen(method, js_name = startVoice)]
    fn start_voice(this: &AudioGraph, voice: f64, buffer: &JsValue, detune: f64, gain: f32, time: f64);

    #[wasm_bindgen(method, js_name = rampGain)]
    fn ramp_gain(this: &AudioGraph, voice: f64, from: f32, to: f32, start: f64, end: f64);

    #[wasm_bindgen(method, js_name = stopVoice)]
    fn stop_voice(this: &AudioGraph, voice: f64, time: f64);
}

struct WebAudioOutput {
    graph: AudioGraph,
    next_voice: u64,
}

impl AudioOutput for WebAudioOutput {
    type Buffer = JsValue;

    fn current_time(&self) -> f64 {
        self.graph.current_time()
    }

    fn state(&self) -> OutputState {
        if self.graph.running() {
            OutputState::Running
        } else {
            OutputState::Suspended
        }
    }

    fn resume(&mut self) -> tromba::Result<()> {
        let rejected = self.graph.take_resume_error();
        let started = self
            .graph
            .resume()
            .map(drop)
            .map_err(|e| e.as_string().unwrap_or_else(|| format!("{:?}", e)));
        resume_outcome(rejected, started)
    }

    fn start_voice(&mut self, buffer: &JsValue, params: VoiceParams) -> tromba::Result<VoiceId> {
        let voice = VoiceId(self.next_voice);
        self.next_voice += 1;
        self.graph.start_voice(
            voice.0 as f64,
            buffer,
            f64::from(params.detune_cents),
            params.gain,
            params.start_time,
        );
        Ok(voice)
    }

    fn ramp_gain(&mut self, voice: VoiceId, ramp: GainRamp) -> tromba::Result<()> {
        self.graph.ramp_gain(voice.0 as f64, ramp.from, ramp.to, ramp.start_time, ramp.end_time);
        Ok(())
    }

    fn stop_voice(&mut self, voice: VoiceId, at: f64) -> tromba::Result<()> {
        self.graph.stop_voice(voice.0 as f64, at);
        Ok(())
    }
}

// The context resumes asynchronously, so a rejection only shows up on the next attempt.
fn resume_outcome(rejected: Option<String>, started: Result<(), String>) -> tromba::Result<()> {
    match (rejected, started) {
        (_, Err(message)) | (Some(message), Ok(())) => Err(TrombaError::Resume(message)),
        (None, Ok(())) => Ok(()),
    }
}

#[derive(Serialize)]
struct DrillError {
    message: String,
    kind: &'static str,
}

fn to_js_error(e: TrombaError) -> JsValue {
    let kind = match e {
        TrombaError::PitchOutOfRange { .. } => "pitch-out-of-range",
        TrombaError::InvalidRange { .. } => "invalid-range",
        TrombaError::SampleBankMismatch { .. } | TrombaError::SampleLoad { .. } => "samples",
        TrombaError::AudioDevice(_) | TrombaError::Resume(_) => "audio",
        TrombaError::Config(_) => "config",
        TrombaError::Io(_) => "io",
    };
    let error = DrillError { message: e.to_string(), kind };
    JsValue::from_str(&serde_json::to_string(&error).unwrap_or_else(|_| error.message.clone()))
}

// json_compatible keeps unplayable fingerings as `[null, null, null]`
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// What the page should display after a trigger.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DrillView<'a> {
    /// "prompt" or "answer"
    kind: &'static str,
    note: &'a Note,
    /// Token for the staff renderer, e.g. "C#4/1"
    score: String,
    sounded: bool,
}

impl<'a> DrillView<'a> {
    fn prompt(note: &'a Note) -> Self {
        Self { kind: "prompt", note, score: note.score_token("1"), sounded: false }
    }

    fn answer(note: &'a Note, sounded: bool) -> Self {
        Self { kind: "answer", note, score: note.score_token("1"), sounded }
    }
}

/// A drill running on the page's audio graph.
#[wasm_bindgen]
pub struct WebDrill {
    drill: Drill<Selector, WebAudioOutput>,
}

#[wasm_bindgen]
impl WebDrill {
    /// `buffers` are the decoded `AudioBuffer`s in sample order; `lowest`/`highest`
    /// are the optional range overrides from the page URL.
    #[wasm_bindgen(constructor)]
    pub fn new(
        preset: &str,
        graph: AudioGraph,
        buffers: Vec<JsValue>,
        lowest: Option<i32>,
        highest: Option<i32>,
    ) -> Result<WebDrill, JsValue> {
        let preset = Preset::from_str(preset)
            .ok_or_else(|| to_js_error(TrombaError::Config(format!("unknown preset '{}'", preset))))?;
        let config = DrillConfig::preset(preset)
            .with_range_override(lowest, highest)
            .map_err(to_js_error)?;
        let layout = config.samples.layout().map_err(to_js_error)?;
        let bank = SampleBank::new(layout, buffers).map_err(to_js_error)?;
        let output = WebAudioOutput { graph, next_voice: 1 };
        let drill = Drill::from_config(&config, output, bank).map_err(to_js_error)?;
        Ok(WebDrill { drill })
    }

    /// Show the first note.
    pub fn start(&mut self) -> Result<JsValue, JsValue> {
        let note = self.drill.start();
        to_js(&DrillView::prompt(&note))
    }

    /// Handle a click, tap or space key.
    pub fn trigger(&mut self) -> Result<JsValue, JsValue> {
        match self.drill.trigger().map_err(to_js_error)? {
            DrillEvent::Prompt(note) => to_js(&DrillView::prompt(&note)),
            DrillEvent::Answer { note, voice } => to_js(&DrillView::answer(&note, voice.is_some())),
        }
    }
}

/// File names of the trumpet recordings, in the order `WebDrill` expects the buffers.
#[wasm_bindgen]
pub fn sample_files(extension: &str) -> Vec<String> {
    DrillConfig::default()
        .samples
        .layout()
        .map(|layout| layout.default_file_names(extension))
        .unwrap_or_default()
}

/// Resolve a note for display
#[wasm_bindgen]
pub fn resolve_note(pitch: i32, sharp: bool, style: Option<String>) -> Result<JsValue, JsValue> {
    let style = style.as_deref().and_then(LabelStyle::from_str).unwrap_or_default();
    to_js(&tromba::resolve_note_with(pitch, sharp, style))
}

/// Sample index and detune for a sounding pitch
#[wasm_bindgen]
pub fn resolve_sample(pitch: i32) -> Result<JsValue, JsValue> {
    let selection = tromba::resolve_sample(pitch).map_err(to_js_error)?;
    to_js(&selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_outcome_reports_earlier_rejection() {
        let outcome = resume_outcome(Some("NotAllowedError".to_string()), Ok(()));
        assert!(matches!(outcome, Err(TrombaError::Resume(m)) if m == "NotAllowedError"));
    }

    #[test]
    fn test_resume_outcome_reports_synchronous_throw() {
        let outcome = resume_outcome(None, Err("closed".to_string()));
        assert!(matches!(outcome, Err(TrombaError::Resume(m)) if m == "closed"));
    }

    #[test]
    fn test_resume_outcome_ok_while_pending() {
        assert!(resume_outcome(None, Ok(())).is_ok());
    }
}
