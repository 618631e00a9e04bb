//! # Note Resolution
//!
//! Turns an integer pitch (60 = middle C) into a fully described [`Note`]:
//! a display name for the staff renderer, a human readable label and a valve fingering.
//!
//! ## Spelling
//! Each of the 12 pitch classes is either a natural with one spelling or an
//! accidental with a sharp/flat pair ([`Spelling`]). The `sharp` flag picks one side of
//! the pair, and the name and label of a note always use the same side.
//!
//! ## Octaves
//! - Octave = `floor(pitch / 12) - 1`, so 60 is `C4`
//! - Pitch class = `pitch mod 12`, floor-modulo for negative pitches (-1 is `B-2`)
//! - Labels carry one `'` per octave above 3: `c` (C3), `c'` (C4), `c''` (C5)
//!
//! ## Example
//! ```rust
//! use tromba::{resolve_note, Fingering};
//!
//! let note = resolve_note(61, true);
//! assert_eq!(note.name, "C#4");
//! assert_eq!(note.label, "cis'");
//! assert_eq!(note.fingering, Fingering::Valves([true, true, true]));
//! ```

use serde::{Deserialize, Serialize};

use crate::fingering::{fingering, Fingering};

/// Octave above which labels get one tick per octave.
pub const LABEL_TICK_OCTAVE: i32 = 3;

/// Spelling of one pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spelling {
    /// A natural note with a single spelling.
    Natural(&'static str),
    /// An accidental with a raised (sharp) and lowered (flat) spelling.
    Accidental { sharp: &'static str, flat: &'static str },
}

impl Spelling {
    pub fn pick(self, sharp: bool) -> &'static str {
        match self {
            Spelling::Natural(name) => name,
            Spelling::Accidental { sharp: s, .. } if sharp => s,
            Spelling::Accidental { flat, .. } => flat,
        }
    }

    pub fn is_accidental(self) -> bool {
        matches!(self, Spelling::Accidental { .. })
    }
}

const fn natural(name: &'static str) -> Spelling {
    Spelling::Natural(name)
}

const fn accidental(sharp: &'static str, flat: &'static str) -> Spelling {
    Spelling::Accidental { sharp, flat }
}

/// Letter names understood by the staff renderer.
const NOTE_NAMES: [Spelling; 12] = [
    natural("C"),
    accidental("C#", "Db"),
    natural("D"),
    accidental("D#", "Eb"),
    natural("E"),
    natural("F"),
    accidental("F#", "Gb"),
    natural("G"),
    accidental("G#", "Ab"),
    natural("A"),
    accidental("A#", "Bb"),
    natural("B"),
];

const GERMAN_LABELS: [Spelling; 12] = [
    natural("c"),
    accidental("cis", "des"),
    natural("d"),
    accidental("dis", "es"),
    natural("e"),
    natural("f"),
    accidental("fis", "ges"),
    natural("g"),
    accidental("gis", "as"),
    natural("a"),
    accidental("ais", "b"),
    natural("h"),
];

const SOLFEGE_LABELS: [Spelling; 12] = [
    natural("do"),
    accidental("do♯", "re♭"),
    natural("re"),
    accidental("re♯", "mi♭"),
    natural("mi"),
    natural("fa"),
    accidental("fa♯", "sol♭"),
    natural("sol"),
    accidental("sol♯", "la♭"),
    natural("la"),
    accidental("la♯", "si♭"),
    natural("si"),
];

/// Naming convention for the answer label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// German note names (`cis`, `es`, `h`, `b`).
    #[default]
    German,
    /// Fixed-do solfège (`do♯`, `mi♭`, `si`).
    Solfege,
}

impl LabelStyle {
    fn table(self) -> &'static [Spelling; 12] {
        match self {
            LabelStyle::German => &GERMAN_LABELS,
            LabelStyle::Solfege => &SOLFEGE_LABELS,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "german" | "de" => Some(LabelStyle::German),
            "solfege" | "solfège" | "do" => Some(LabelStyle::Solfege),
            _ => None,
        }
    }
}

/// A resolved note.
///
/// # Fields
/// - `pitch`: MIDI-style pitch number (60 = middle C)
/// - `sharp`: sharp spelling when true, flat spelling when false (naturals ignore it)
/// - `name`: renderer token, `<Letter><#|b>?<octave>`
/// - `label`: answer label in the chosen [`LabelStyle`], with octave ticks
/// - `fingering`: valves to press, or unplayable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub pitch: i32,
    pub sharp: bool,
    pub name: String,
    pub label: String,
    pub fingering: Fingering,
}

impl Note {
    /// Token for the staff renderer, e.g. `C#4/1` for a whole note.
    pub fn score_token(&self, duration: &str) -> String {
        format!("{}/{}", self.name, duration)
    }

    pub fn octave(&self) -> i32 {
        octave_of(self.pitch)
    }

    pub fn pitch_class(&self) -> usize {
        pitch_class_of(self.pitch)
    }
}

pub fn octave_of(pitch: i32) -> i32 {
    pitch.div_euclid(12) - 1
}

pub fn pitch_class_of(pitch: i32) -> usize {
    pitch.rem_euclid(12) as usize
}

pub fn spelling_of(pitch: i32) -> Spelling {
    NOTE_NAMES[pitch_class_of(pitch)]
}

/// Renderer name for a pitch, e.g. `C#4` or `Db4`.
pub fn note_name(pitch: i32, sharp: bool) -> String {
    format!("{}{}", spelling_of(pitch).pick(sharp), octave_of(pitch))
}

/// Answer label for a pitch in the given style, e.g. `cis'` or `des'`.
pub fn note_label(pitch: i32, sharp: bool, style: LabelStyle) -> String {
    let base = style.table()[pitch_class_of(pitch)].pick(sharp);
    let ticks = (octave_of(pitch) - LABEL_TICK_OCTAVE).max(0) as usize;
    format!("{}{}", base, "'".repeat(ticks))
}

/// Resolve a pitch with the default German labels.
pub fn resolve_note(pitch: i32, sharp: bool) -> Note {
    resolve_note_with(pitch, sharp, LabelStyle::default())
}

pub fn resolve_note_with(pitch: i32, sharp: bool, style: LabelStyle) -> Note {
    Note {
        pitch,
        sharp,
        name: note_name(pitch, sharp),
        label: note_label(pitch, sharp, style),
        fingering: fingering(pitch),
    }
}
