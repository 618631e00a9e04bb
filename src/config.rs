//! # Drill Configuration
//!
//! A drill is described by a small YAML document. Every field is optional and
//! defaults to the full trumpet drill.
//!
//! ```yaml
//! lowest-pitch: 54
//! highest-pitch: 75
//! selection: random
//! stop-before-advance: false
//! concert-offset: -2
//! label-style: german
//! samples:
//!   directory: sounds
//!   extension: wav
//! ```
//!
//! ## Presets
//! - `trumpet` - random notes over the whole written range F#3..B5
//! - `student` - random notes over F#3..D#5
//! - `chromatic` - a chromatic walk up from F#3, fading each note before the next
//!
//! ## Range overrides
//! [`DrillConfig::with_range_override`] applies externally supplied bounds (CLI flags,
//! or URL query values in the browser) on top of a loaded config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrombaError};
use crate::fingering::{HIGHEST_TRUMPET_PITCH, LOWEST_TRUMPET_PITCH};
use crate::note::LabelStyle;
use crate::playback::DEFAULT_FADE_OUT;
use crate::sample::SampleLayout;
use crate::selection::{RandomSelector, Selector, SequentialSelector};

/// Highest pitch of the student preset (D#5).
pub const STUDENT_HIGHEST_PITCH: i32 = 75;

/// Written pitch minus sounding pitch for a B♭ trumpet: written C sounds B♭.
pub const BB_TRUMPET_CONCERT_OFFSET: i32 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    Random,
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Trumpet,
    Student,
    Chromatic,
}

impl Preset {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trumpet" | "full" => Some(Preset::Trumpet),
            "student" => Some(Preset::Student),
            "chromatic" | "sequential" => Some(Preset::Chromatic),
            _ => None,
        }
    }
}

/// Where the recordings live and how they are spaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SampleConfig {
    pub directory: PathBuf,
    pub lowest_pitch: i32,
    pub interval: i32,
    /// File extension used when `files` is empty.
    pub extension: String,
    /// Explicit file list in pitch order; empty means the default names.
    pub files: Vec<String>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        let layout = SampleLayout::default();
        Self {
            directory: PathBuf::from("sounds"),
            lowest_pitch: layout.lowest_pitch,
            interval: layout.interval,
            extension: "wav".to_string(),
            files: Vec::new(),
        }
    }
}

impl SampleConfig {
    fn default_count(&self) -> usize {
        SampleLayout::default().count
    }

    pub fn layout(&self) -> Result<SampleLayout> {
        let count = if self.files.is_empty() { self.default_count() } else { self.files.len() };
        SampleLayout::new(self.lowest_pitch, self.interval, count)
    }

    pub fn file_names(&self) -> Result<Vec<String>> {
        if self.files.is_empty() {
            Ok(self.layout()?.default_file_names(&self.extension))
        } else {
            Ok(self.files.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DrillConfig {
    pub lowest_pitch: i32,
    pub highest_pitch: i32,
    pub selection: SelectionPolicy,
    /// First pitch of a sequential drill.
    pub start_pitch: i32,
    /// Fade out the sounding note before showing the next one.
    pub stop_before_advance: bool,
    /// Semitones from written to sounding pitch.
    pub concert_offset: i32,
    pub label_style: LabelStyle,
    /// Fade-out length in seconds.
    pub fade_out: f64,
    pub samples: SampleConfig,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self::preset(Preset::Trumpet)
    }
}

impl DrillConfig {
    pub fn preset(preset: Preset) -> Self {
        let base = Self {
            lowest_pitch: LOWEST_TRUMPET_PITCH,
            highest_pitch: HIGHEST_TRUMPET_PITCH,
            selection: SelectionPolicy::Random,
            start_pitch: LOWEST_TRUMPET_PITCH,
            stop_before_advance: false,
            concert_offset: BB_TRUMPET_CONCERT_OFFSET,
            label_style: LabelStyle::German,
            fade_out: DEFAULT_FADE_OUT,
            samples: SampleConfig::default(),
        };
        match preset {
            Preset::Trumpet => base,
            Preset::Student => Self { highest_pitch: STUDENT_HIGHEST_PITCH, ..base },
            Preset::Chromatic => Self {
                selection: SelectionPolicy::Sequential,
                stop_before_advance: true,
                ..base
            },
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .map_err(|e| TrombaError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&yaml)
    }

    /// Replace the random range bounds that are given, then re-validate.
    pub fn with_range_override(mut self, lowest: Option<i32>, highest: Option<i32>) -> Result<Self> {
        if let Some(lowest) = lowest {
            self.lowest_pitch = lowest;
        }
        if let Some(highest) = highest {
            self.highest_pitch = highest;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lowest_pitch > self.highest_pitch {
            return Err(TrombaError::InvalidRange { low: self.lowest_pitch, high: self.highest_pitch });
        }
        if !(self.fade_out >= 0.0) {
            return Err(TrombaError::Config(format!("fade-out must be non-negative, got {}", self.fade_out)));
        }
        self.samples.layout()?;
        Ok(())
    }

    /// Build the selector for this drill's policy.
    pub fn selector(&self) -> Result<Selector> {
        Ok(match self.selection {
            SelectionPolicy::Random => Selector::Random(
                RandomSelector::new(self.lowest_pitch, self.highest_pitch)?.with_label_style(self.label_style),
            ),
            SelectionPolicy::Sequential => Selector::Sequential(
                SequentialSelector::new(self.start_pitch).with_label_style(self.label_style),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::NoteSelector;

    #[test]
    fn test_presets() {
        let trumpet = DrillConfig::preset(Preset::Trumpet);
        assert_eq!((trumpet.lowest_pitch, trumpet.highest_pitch), (54, 83));
        assert_eq!(trumpet.selection, SelectionPolicy::Random);
        assert!(!trumpet.stop_before_advance);

        let student = DrillConfig::preset(Preset::Student);
        assert_eq!((student.lowest_pitch, student.highest_pitch), (54, 75));

        let chromatic = DrillConfig::preset(Preset::Chromatic);
        assert_eq!(chromatic.selection, SelectionPolicy::Sequential);
        assert!(chromatic.stop_before_advance);
        assert_eq!(chromatic.start_pitch, 54);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_str("Student"), Some(Preset::Student));
        assert_eq!(Preset::from_str("sequential"), Some(Preset::Chromatic));
        assert_eq!(Preset::from_str("tuba"), None);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
lowest-pitch: 60
highest-pitch: 72
selection: sequential
start-pitch: 60
label-style: solfege
fade-out: 0.25
samples:
  directory: /opt/tromba/sounds
  extension: ogg
"#;
        let config = DrillConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.lowest_pitch, 60);
        assert_eq!(config.selection, SelectionPolicy::Sequential);
        assert_eq!(config.label_style, LabelStyle::Solfege);
        assert_eq!(config.fade_out, 0.25);
        assert_eq!(config.concert_offset, -2);
        assert_eq!(config.samples.directory, PathBuf::from("/opt/tromba/sounds"));
        assert_eq!(config.samples.interval, 3);
        assert_eq!(config.samples.file_names().unwrap()[0], "C3v12.ogg");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = DrillConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, DrillConfig::default());
    }

    #[test]
    fn test_explicit_files_set_layout_count() {
        let yaml = r#"
samples:
  lowest-pitch: 60
  interval: 12
  files: [c4.wav, c5.wav]
"#;
        let config = DrillConfig::from_yaml_str(yaml).unwrap();
        let layout = config.samples.layout().unwrap();
        assert_eq!(layout.count, 2);
        assert_eq!(layout.sample_pitch(1), 72);
        assert_eq!(config.samples.file_names().unwrap(), vec!["c4.wav", "c5.wav"]);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            DrillConfig::from_yaml_str("lowest-pitch: 80\nhighest-pitch: 60"),
            Err(TrombaError::InvalidRange { low: 80, high: 60 })
        ));
        assert!(matches!(
            DrillConfig::from_yaml_str("samples:\n  interval: 0"),
            Err(TrombaError::Config(_))
        ));
        assert!(matches!(DrillConfig::from_yaml_str("fade-out: -1"), Err(TrombaError::Config(_))));
        assert!(matches!(DrillConfig::from_yaml_str("selection: shuffle"), Err(TrombaError::Config(_))));
    }

    #[test]
    fn test_range_override() {
        let config = DrillConfig::default().with_range_override(Some(60), None).unwrap();
        assert_eq!((config.lowest_pitch, config.highest_pitch), (60, 83));

        let config = DrillConfig::default().with_range_override(None, Some(70)).unwrap();
        assert_eq!((config.lowest_pitch, config.highest_pitch), (54, 70));

        assert!(DrillConfig::default().with_range_override(Some(90), None).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drill.yaml");
        fs::write(&path, "highest-pitch: 75\n").unwrap();
        assert_eq!(DrillConfig::load(&path).unwrap().highest_pitch, 75);

        assert!(matches!(
            DrillConfig::load(&dir.path().join("missing.yaml")),
            Err(TrombaError::Config(_))
        ));
    }

    #[test]
    fn test_selector_follows_policy() {
        let mut selector = DrillConfig::preset(Preset::Chromatic).selector().unwrap();
        assert_eq!(selector.initial_note().pitch, 54);
        assert_eq!(selector.next_note().pitch, 55);

        let mut selector = DrillConfig::preset(Preset::Student).selector().unwrap();
        for _ in 0..200 {
            let pitch = selector.next_note().pitch;
            assert!((54..=75).contains(&pitch));
        }
    }
}
