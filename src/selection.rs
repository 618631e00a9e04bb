//! # Note Selection
//!
//! Chooses the next note to present.
//!
//! ## Policies
//! - [`RandomSelector`] - uniform pitch in a closed range, fair coin for sharp/flat spelling
//! - [`SequentialSelector`] - chromatic walk upward from a start pitch, sharp spelling
//!
//! Both implement [`NoteSelector`], and [`Selector`] wraps whichever policy a
//! [`DrillConfig`](crate::DrillConfig) asks for.
//!
//! ## Example
//! ```rust
//! use tromba::{NoteSelector, SequentialSelector};
//!
//! let mut selector = SequentialSelector::new(54);
//! assert_eq!(selector.initial_note().name, "F#3");
//! assert_eq!(selector.next_note().name, "G3");
//! assert_eq!(selector.next_note().name, "G#3");
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, TrombaError};
use crate::note::{resolve_note_with, LabelStyle, Note};

/// A source of notes for the drill.
pub trait NoteSelector {
    /// The note shown before the first advance.
    fn initial_note(&mut self) -> Note;

    /// The note shown on each advance.
    fn next_note(&mut self) -> Note;
}

/// Draw one random note from `[low, high]` with a random spelling.
pub fn select_random_note<R: Rng + ?Sized>(low: i32, high: i32, rng: &mut R) -> Result<Note> {
    select_random_note_with(low, high, LabelStyle::default(), rng)
}

pub fn select_random_note_with<R: Rng + ?Sized>(
    low: i32,
    high: i32,
    style: LabelStyle,
    rng: &mut R,
) -> Result<Note> {
    if low > high {
        return Err(TrombaError::InvalidRange { low, high });
    }
    let pitch = rng.gen_range(low..=high);
    let sharp = rng.gen_bool(0.5);
    Ok(resolve_note_with(pitch, sharp, style))
}

/// Random notes from a fixed inclusive range.
#[derive(Debug, Clone)]
pub struct RandomSelector<R = StdRng> {
    low: i32,
    high: i32,
    style: LabelStyle,
    rng: R,
}

impl RandomSelector<StdRng> {
    pub fn new(low: i32, high: i32) -> Result<Self> {
        Self::with_rng(low, high, StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSelector<R> {
    pub fn with_rng(low: i32, high: i32, rng: R) -> Result<Self> {
        if low > high {
            return Err(TrombaError::InvalidRange { low, high });
        }
        Ok(Self { low, high, style: LabelStyle::default(), rng })
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    pub fn range(&self) -> (i32, i32) {
        (self.low, self.high)
    }

    pub fn select(&mut self) -> Note {
        let pitch = self.rng.gen_range(self.low..=self.high);
        let sharp = self.rng.gen_bool(0.5);
        resolve_note_with(pitch, sharp, self.style)
    }
}

impl<R: Rng> NoteSelector for RandomSelector<R> {
    fn initial_note(&mut self) -> Note {
        self.select()
    }

    fn next_note(&mut self) -> Note {
        self.select()
    }
}

/// Chromatic walk upward from a start pitch.
///
/// The cursor has no upper bound. Once it runs past the fingering table the notes
/// keep valid names and labels but carry an unplayable fingering.
#[derive(Debug, Clone)]
pub struct SequentialSelector {
    cursor: i32,
    style: LabelStyle,
}

impl SequentialSelector {
    pub fn new(start: i32) -> Self {
        Self { cursor: start, style: LabelStyle::default() }
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    /// Resolve the cursor without moving it.
    pub fn current_note(&self) -> Note {
        resolve_note_with(self.cursor, true, self.style)
    }
}

impl NoteSelector for SequentialSelector {
    fn initial_note(&mut self) -> Note {
        self.current_note()
    }

    fn next_note(&mut self) -> Note {
        self.cursor = self.cursor.saturating_add(1);
        self.current_note()
    }
}

/// Either selection policy, as chosen by configuration.
#[derive(Debug, Clone)]
pub enum Selector {
    Random(RandomSelector),
    Sequential(SequentialSelector),
}

impl NoteSelector for Selector {
    fn initial_note(&mut self) -> Note {
        match self {
            Selector::Random(s) => s.initial_note(),
            Selector::Sequential(s) => s.initial_note(),
        }
    }

    fn next_note(&mut self) -> Note {
        match self {
            Selector::Random(s) => s.next_note(),
            Selector::Sequential(s) => s.next_note(),
        }
    }
}
