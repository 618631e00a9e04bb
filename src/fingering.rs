//! Valve fingerings for the B♭ trumpet, by written pitch.

use serde::ser::{Serialize, SerializeTuple, Serializer};

/// Lowest written pitch in the fingering table (F#3).
pub const LOWEST_TRUMPET_PITCH: i32 = 54;

/// Highest written pitch the drills ask for (B5).
pub const HIGHEST_TRUMPET_PITCH: i32 = 83;

const O: bool = false;
const X: bool = true;

/// Valves 1-2-3 per pitch, starting at [`LOWEST_TRUMPET_PITCH`].
const FINGERINGS: [[bool; 3]; 22] = [
    [X, X, X], // F#3
    [X, O, X],
    [O, X, X],
    [X, X, O],
    [X, O, O],
    [O, X, O],
    [O, O, O], // C4
    [X, X, X],
    [X, O, X],
    [O, X, X],
    [X, X, O],
    [X, O, O],
    [O, X, O],
    [O, O, O], // G4
    [O, X, X],
    [X, X, O],
    [X, O, O],
    [O, X, O],
    [O, O, O], // C5
    [X, X, O],
    [X, O, O],
    [O, X, O], // D#5
];

/// Valve combination for one note.
///
/// Never partially known: either all three valves are defined or none are.
/// Serializes as `[bool, bool, bool]` or `[null, null, null]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fingering {
    Valves([bool; 3]),
    Unplayable,
}

impl Fingering {
    /// Per-valve view for displays: `Some(pressed)` or `None` when unplayable.
    pub fn valves(&self) -> [Option<bool>; 3] {
        match self {
            Fingering::Valves(v) => [Some(v[0]), Some(v[1]), Some(v[2])],
            Fingering::Unplayable => [None; 3],
        }
    }

    pub fn is_playable(&self) -> bool {
        matches!(self, Fingering::Valves(_))
    }

    /// Pressed valve numbers, e.g. `"13"`, `"0"` for open, `"-"` when unplayable.
    pub fn digits(&self) -> String {
        match self {
            Fingering::Valves(v) => {
                let pressed: String = v
                    .iter()
                    .enumerate()
                    .filter(|(_, down)| **down)
                    .map(|(i, _)| char::from(b'1' + i as u8))
                    .collect();
                if pressed.is_empty() {
                    "0".to_string()
                } else {
                    pressed
                }
            }
            Fingering::Unplayable => "-".to_string(),
        }
    }
}

impl Serialize for Fingering {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        for valve in self.valves() {
            tuple.serialize_element(&valve)?;
        }
        tuple.end()
    }
}

/// Look up the fingering for a written pitch.
pub fn fingering(pitch: i32) -> Fingering {
    pitch
        .checked_sub(LOWEST_TRUMPET_PITCH)
        .and_then(|offset| usize::try_from(offset).ok())
        .and_then(|index| FINGERINGS.get(index))
        .map_or(Fingering::Unplayable, |v| Fingering::Valves(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_edges() {
        assert_eq!(fingering(54), Fingering::Valves([true, true, true]));
        assert_eq!(fingering(75), Fingering::Valves([false, true, false]));
        assert_eq!(fingering(53), Fingering::Unplayable);
        assert_eq!(fingering(76), Fingering::Unplayable);
        assert_eq!(fingering(HIGHEST_TRUMPET_PITCH), Fingering::Unplayable);
        assert_eq!(fingering(i32::MIN), Fingering::Unplayable);
    }

    #[test]
    fn test_open_notes() {
        for pitch in [60, 67, 72] {
            assert_eq!(fingering(pitch).digits(), "0", "pitch {}", pitch);
        }
        assert_eq!(fingering(55).digits(), "13");
        assert_eq!(fingering(62).digits(), "13");
        assert_eq!(fingering(90).digits(), "-");
    }

    #[test]
    fn test_never_mixed() {
        for pitch in -20..200 {
            let valves = fingering(pitch).valves();
            let known = valves.iter().filter(|v| v.is_some()).count();
            assert!(known == 0 || known == 3, "pitch {}", pitch);
        }
    }

    #[test]
    fn test_serializes_as_nullable_triple() {
        let json = serde_json::to_string(&fingering(55)).unwrap();
        assert_eq!(json, "[true,false,true]");
        let json = serde_json::to_string(&fingering(80)).unwrap();
        assert_eq!(json, "[null,null,null]");
    }
}
