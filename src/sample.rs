//! # Sample Bank
//!
//! A sparse set of recordings covers every semitone by pitch shifting.
//! The trumpet samples were recorded every 3 semitones from C3 (48) to C6 (84),
//! so any requested pitch is at most one semitone away from a recording.
//!
//! ## Resolution
//! - `index = round((pitch - lowest) / interval)`, halves rounded up
//! - `sample_pitch = lowest + index * interval`
//! - `detune_cents = 100 * (pitch - sample_pitch)`
//!
//! ```rust
//! use tromba::SampleLayout;
//!
//! let layout = SampleLayout::default();
//! let selection = layout.resolve(61).unwrap();
//! assert_eq!(selection.index, 4);
//! assert_eq!(selection.sample_pitch, 60);
//! assert_eq!(selection.detune_cents, 100);
//! ```

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrombaError};
use crate::note::note_name;

pub const DEFAULT_LOWEST_SAMPLE_PITCH: i32 = 48;
pub const DEFAULT_SAMPLE_INTERVAL: i32 = 3;
pub const DEFAULT_SAMPLE_COUNT: usize = 13;

/// Pitch spacing of the recorded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SampleLayout {
    pub lowest_pitch: i32,
    pub interval: i32,
    pub count: usize,
}

impl Default for SampleLayout {
    fn default() -> Self {
        Self {
            lowest_pitch: DEFAULT_LOWEST_SAMPLE_PITCH,
            interval: DEFAULT_SAMPLE_INTERVAL,
            count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

/// The recording that serves a pitch, and how far to shift it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSelection {
    pub index: usize,
    pub sample_pitch: i32,
    pub detune_cents: i32,
}

impl SampleLayout {
    pub fn new(lowest_pitch: i32, interval: i32, count: usize) -> Result<Self> {
        if interval <= 0 {
            return Err(TrombaError::Config(format!(
                "sample interval must be positive, got {}",
                interval
            )));
        }
        if count == 0 {
            return Err(TrombaError::Config("sample layout needs at least one sample".to_string()));
        }
        Ok(Self { lowest_pitch, interval, count })
    }

    /// Pitch of the recording at `index`.
    pub fn sample_pitch(&self, index: usize) -> i32 {
        self.lowest_pitch + index as i32 * self.interval
    }

    /// Lowest and highest pitch that resolve to a loaded sample.
    pub fn playable_range(&self) -> (i32, i32) {
        let interval = i64::from(self.interval);
        let lowest = i64::from(self.lowest_pitch) - interval / 2;
        let highest = i64::from(self.lowest_pitch) + (2 * interval * self.count as i64 - interval - 1) / 2;
        (clamp_i32(lowest), clamp_i32(highest))
    }

    /// Find the sample nearest to `pitch` and the detune needed to reach it.
    pub fn resolve(&self, pitch: i32) -> Result<SampleSelection> {
        let interval = i64::from(self.interval.max(1));
        let offset = i64::from(pitch) - i64::from(self.lowest_pitch);
        let index = (2 * offset + interval).div_euclid(2 * interval);

        if index < 0 || index >= self.count as i64 {
            let (lowest, highest) = self.playable_range();
            return Err(TrombaError::PitchOutOfRange { pitch, lowest, highest });
        }

        let index = index as usize;
        let sample_pitch = self.sample_pitch(index);
        let detune_cents = 100 * (pitch - sample_pitch);
        debug!(
            "pitch {} -> sample {} ({}), detune {} cents",
            pitch,
            index,
            note_name(sample_pitch, true),
            detune_cents
        );
        Ok(SampleSelection { index, sample_pitch, detune_cents })
    }

    /// File names for the layout, e.g. `C3v12.wav`, `D#3v12.wav`, ...
    pub fn default_file_names(&self, extension: &str) -> Vec<String> {
        (0..self.count)
            .map(|i| format!("{}v12.{}", note_name(self.sample_pitch(i), true), extension))
            .collect()
    }
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Decoded sample buffers, one per recorded pitch, in pitch order.
///
/// The buffer type belongs to the audio output: decoded PCM for the native mixer,
/// a JS `AudioBuffer` handle in the browser.
#[derive(Debug, Clone)]
pub struct SampleBank<B> {
    layout: SampleLayout,
    buffers: Vec<B>,
}

impl<B> SampleBank<B> {
    pub fn new(layout: SampleLayout, buffers: Vec<B>) -> Result<Self> {
        if buffers.len() != layout.count {
            return Err(TrombaError::SampleBankMismatch {
                expected: layout.count,
                actual: buffers.len(),
            });
        }
        Ok(Self { layout, buffers })
    }

    /// Load every file in order with `loader`, stopping at the first failure.
    pub fn load<F>(layout: SampleLayout, directory: &Path, files: &[String], mut loader: F) -> Result<Self>
    where
        F: FnMut(&Path) -> Result<B>,
    {
        if files.len() != layout.count {
            return Err(TrombaError::SampleBankMismatch {
                expected: layout.count,
                actual: files.len(),
            });
        }

        let mut buffers = Vec::with_capacity(files.len());
        for file in files {
            let path: PathBuf = directory.join(file);
            debug!("loading sample {}", path.display());
            buffers.push(loader(&path)?);
        }
        info!("loaded {} samples from {}", buffers.len(), directory.display());
        Self::new(layout, buffers)
    }

    pub fn layout(&self) -> &SampleLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&B> {
        self.buffers.get(index)
    }

    /// Resolve a pitch to its buffer and selection.
    pub fn lookup(&self, pitch: i32) -> Result<(&B, SampleSelection)> {
        let selection = self.layout.resolve(pitch)?;
        let buffer = self.buffers.get(selection.index).ok_or_else(|| {
            let (lowest, highest) = self.layout.playable_range();
            TrombaError::PitchOutOfRange { pitch, lowest, highest }
        })?;
        Ok((buffer, selection))
    }
}
