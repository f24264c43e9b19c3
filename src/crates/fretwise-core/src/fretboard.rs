//! Fretboard index: which (string, fret) placements can sound a pitch.
//!
//! Strings are indexed from the highest-pitched (0) to the lowest (5). Every
//! candidate list is ordered by string index, so the first candidate is always
//! the one on the highest string.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabError};
use crate::note::pitch_class_name;

/// Number of strings on the instrument
pub const STRING_COUNT: usize = 6;

/// Highest playable fret on every string
pub const FRET_COUNT: u8 = 17;

/// Open pitches of standard tuning, highest string first
const STANDARD_OPEN_PITCHES: [i32; STRING_COUNT] = [64, 59, 55, 50, 45, 40];

/// Labels of the five upper strings; the lowest string is named from its tuning
const UPPER_STRING_LABELS: [&str; STRING_COUNT - 1] = ["e", "b", "g", "d", "a"];

/// Instrument configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Semitones added to the lowest string only (-2 is drop-D)
    pub tuning_offset: i32,
    /// Frets by which every open string is raised
    pub capo_offset: i32,
}

impl Instrument {
    pub fn new(tuning_offset: i32, capo_offset: i32) -> Self {
        Self {
            tuning_offset,
            capo_offset,
        }
    }
}

/// A single place on the neck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FretPosition {
    /// 0 is the highest-pitched string, 5 the lowest
    pub string: usize,
    pub fret: u8,
}

impl FretPosition {
    pub fn new(string: usize, fret: u8) -> Self {
        Self { string, fret }
    }

    pub fn is_open(&self) -> bool {
        self.fret == 0
    }
}

#[derive(Debug, Clone)]
pub struct Fretboard {
    instrument: Instrument,
    open_pitches: [u8; STRING_COUNT],
    labels: [String; STRING_COUNT],
    lowest: u8,
    highest: u8,
    /// Candidate lists indexed by `pitch - lowest`
    candidates: Vec<Vec<FretPosition>>,
}

impl Fretboard {
    pub fn new(instrument: Instrument) -> Result<Self> {
        let mut open_pitches = [0u8; STRING_COUNT];
        for (string, &base) in STANDARD_OPEN_PITCHES.iter().enumerate() {
            let mut pitch = base + instrument.capo_offset;
            if string == STRING_COUNT - 1 {
                pitch += instrument.tuning_offset;
            }
            let top = pitch + FRET_COUNT as i32;
            if pitch < 0 || top > 127 {
                let pitch = if pitch < 0 { pitch } else { top };
                return Err(TabError::InvalidInstrument { string, pitch });
            }
            open_pitches[string] = pitch as u8;
        }
        Ok(Self::from_open_pitches(instrument, open_pitches))
    }

    /// Standard tuning, no capo
    pub fn standard() -> Self {
        Self::from_open_pitches(Instrument::default(), STANDARD_OPEN_PITCHES.map(|p| p as u8))
    }

    fn from_open_pitches(instrument: Instrument, open_pitches: [u8; STRING_COUNT]) -> Self {
        let lowest = open_pitches.iter().copied().min().unwrap_or(0);
        let highest = open_pitches.iter().copied().max().unwrap_or(0) + FRET_COUNT;

        let candidates = (lowest..=highest)
            .map(|pitch| {
                open_pitches
                    .iter()
                    .enumerate()
                    .filter(|(_, &open)| (open..=open + FRET_COUNT).contains(&pitch))
                    .map(|(string, &open)| FretPosition::new(string, pitch - open))
                    .collect()
            })
            .collect();

        let mut labels: [String; STRING_COUNT] = Default::default();
        for (label, name) in labels.iter_mut().zip(UPPER_STRING_LABELS) {
            *label = name.to_string();
        }
        let lowest_base = STANDARD_OPEN_PITCHES[STRING_COUNT - 1] + instrument.tuning_offset;
        labels[STRING_COUNT - 1] = pitch_class_name(lowest_base).to_string();

        Self {
            instrument,
            open_pitches,
            labels,
            lowest,
            highest,
            candidates,
        }
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    /// Candidate placements for a pitch, highest string first.
    /// Empty when the pitch cannot be played.
    pub fn candidates(&self, pitch: u8) -> &[FretPosition] {
        if !self.contains(pitch) {
            return &[];
        }
        &self.candidates[(pitch - self.lowest) as usize]
    }

    pub fn range(&self) -> RangeInclusive<u8> {
        self.lowest..=self.highest
    }

    pub fn contains(&self, pitch: u8) -> bool {
        self.range().contains(&pitch)
    }

    pub fn open_pitch(&self, string: usize) -> u8 {
        self.open_pitches[string]
    }

    /// Pitch sounded by a placement
    pub fn pitch_at(&self, position: FretPosition) -> u8 {
        self.open_pitches[position.string] + position.fret
    }

    pub fn label(&self, string: usize) -> &str {
        &self.labels[string]
    }

    pub fn labels(&self) -> &[String; STRING_COUNT] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_standard_range() {
        let board = Fretboard::standard();
        assert_eq!(board.range(), 40..=81);
        assert!(board.candidates(39).is_empty());
        assert!(board.candidates(82).is_empty());
    }

    #[test]
    fn test_open_high_e_prefers_highest_string() {
        let board = Fretboard::standard();
        let candidates = board.candidates(64);
        assert_eq!(candidates[0], FretPosition::new(0, 0));
        assert_eq!(
            candidates,
            &[
                FretPosition::new(0, 0),
                FretPosition::new(1, 5),
                FretPosition::new(2, 9),
                FretPosition::new(3, 14),
            ]
        );
    }

    #[test]
    fn test_lowest_pitch_has_single_candidate() {
        let board = Fretboard::standard();
        assert_eq!(board.candidates(40), &[FretPosition::new(5, 0)]);
    }

    #[test]
    fn test_drop_d_lowers_only_the_low_string() {
        let board = Fretboard::new(Instrument::new(-2, 0)).unwrap();
        assert_eq!(board.open_pitch(5), 38);
        assert_eq!(board.open_pitch(4), 45);
        assert_eq!(board.range(), 38..=81);
        assert_eq!(board.label(5), "D");
    }

    #[test]
    fn test_capo_raises_every_string() {
        let board = Fretboard::new(Instrument::new(0, 2)).unwrap();
        assert_eq!(board.open_pitch(0), 66);
        assert_eq!(board.open_pitch(5), 42);
        assert_eq!(board.range(), 42..=83);
        // Labels follow the tuning, not the capo
        assert_eq!(board.label(5), "E");
    }

    #[test]
    fn test_labels() {
        let board = Fretboard::standard();
        assert_eq!(board.labels(), &["e", "b", "g", "d", "a", "E"].map(String::from));
    }

    #[test]
    fn test_out_of_midi_range_rejected() {
        assert!(matches!(
            Fretboard::new(Instrument::new(0, 60)),
            Err(TabError::InvalidInstrument { string: 0, .. })
        ));
        assert!(matches!(
            Fretboard::new(Instrument::new(-41, 0)),
            Err(TabError::InvalidInstrument { string: 5, .. })
        ));
    }

    proptest! {
        #[test]
        fn test_fret_is_pitch_minus_open(tuning in -5i32..=5, capo in -3i32..=12, pitch in 0u8..128) {
            let board = Fretboard::new(Instrument::new(tuning, capo)).unwrap();
            for position in board.candidates(pitch) {
                let open = board.open_pitch(position.string);
                prop_assert!(pitch >= open);
                prop_assert_eq!(position.fret, pitch - open);
                prop_assert!(position.fret <= FRET_COUNT);
                prop_assert_eq!(board.pitch_at(*position), pitch);
            }
        }

        #[test]
        fn test_candidates_ordered_by_string(pitch in 0u8..128) {
            let board = Fretboard::standard();
            let strings: Vec<usize> = board.candidates(pitch).iter().map(|p| p.string).collect();
            prop_assert!(strings.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
