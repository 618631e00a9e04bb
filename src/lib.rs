pub mod config;
pub mod drill;
pub mod error;
pub mod fingering;
#[cfg(feature = "native-audio")]
pub mod native;
pub mod note;
pub mod playback;
pub mod sample;
pub mod selection;

pub use config::{DrillConfig, Preset, SampleConfig, SelectionPolicy};
pub use drill::{Drill, DrillEvent, DrillOptions};
pub use error::*;
pub use fingering::{fingering, Fingering, HIGHEST_TRUMPET_PITCH, LOWEST_TRUMPET_PITCH};
pub use note::{note_label, note_name, resolve_note, resolve_note_with, LabelStyle, Note, Spelling};
pub use sample::{SampleBank, SampleLayout, SampleSelection};
pub use selection::{
    select_random_note, select_random_note_with, NoteSelector, RandomSelector, Selector, SequentialSelector,
};

/// Resolve a pitch to the sample that plays it with the default trumpet recordings.
pub fn resolve_sample(pitch: i32) -> Result<SampleSelection> {
    SampleLayout::default().resolve(pitch)
}
