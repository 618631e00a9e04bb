//! Native audio: WAV samples decoded with hound, played through cpal.
//!
//! - `wav` - load a sample file into mono f32 frames
//! - `mixer` - resampling mixer with its own frame clock
//! - `output` - [`CpalOutput`], the [`AudioOutput`](crate::playback::AudioOutput) for a real device

mod mixer;
mod output;
mod wav;

pub use mixer::{playback_step, Mixer};
pub use output::CpalOutput;
pub use wav::{load_shared_wav, load_wav, SampleData};
