//! Fingering optimizer: joint string/fret choice for a simultaneous set.
//!
//! Every distinct pitch is a variable whose domain is its candidate list. Two
//! placements are compatible when they sit on different strings and are at
//! most four frets apart, or seven when one of them is an open string. All complete
//! assignments are enumerated by backtracking in lexicographic domain order,
//! then [`playability::select`] picks one. When no assignment exists the
//! second note of the working set is dropped and the search runs again.

use tracing::{debug, warn};

use crate::fretboard::{FretPosition, Fretboard, STRING_COUNT};
use crate::grouper::SimultaneousSet;
use crate::note::note_name;
use crate::playability;
use crate::tab::Assignment;

/// Widest stretch between two fretted notes
pub const MAX_FRET_SPAN: u8 = 4;

/// Widest distance between an open string and a fretted note
pub const MAX_OPEN_SPAN: u8 = 7;

pub fn within_fret_span(a: FretPosition, b: FretPosition) -> bool {
    let distance = a.fret.abs_diff(b.fret);
    distance <= MAX_FRET_SPAN || ((a.is_open() || b.is_open()) && distance <= MAX_OPEN_SPAN)
}

pub fn compatible(a: FretPosition, b: FretPosition) -> bool {
    a.string != b.string && within_fret_span(a, b)
}

pub struct FingeringOptimizer<'a> {
    fretboard: &'a Fretboard,
}

impl<'a> FingeringOptimizer<'a> {
    pub fn new(fretboard: &'a Fretboard) -> Self {
        Self { fretboard }
    }

    /// Choose placements for every note of the set that can be kept
    pub fn assign(&self, set: &SimultaneousSet) -> Vec<Assignment> {
        let mut working: Vec<u8> = Vec::new();
        for pitch in set.distinct_pitches() {
            if self.fretboard.candidates(pitch).is_empty() {
                warn!(beat = set.beat, pitch, "no fretboard position for pitch, skipping");
            } else {
                working.push(pitch);
            }
        }

        let chosen = loop {
            match working.len() {
                0 => return Vec::new(),
                1 => break vec![self.fretboard.candidates(working[0])[0]],
                _ => {}
            }
            let solutions = self.solutions(&working);
            if let Some(best) = playability::select(&solutions) {
                break best.clone();
            }
            let dropped = working.remove(1);
            debug!(
                beat = set.beat,
                note = %note_name(dropped),
                remaining = working.len(),
                "no fingering for simultaneous notes, dropping one"
            );
        };

        let onset_sec = set.onset_sec();
        let mut assignments: Vec<Assignment> = working
            .iter()
            .zip(chosen)
            .map(|(&pitch, position)| Assignment {
                pitch,
                position,
                beat: set.beat,
                onset_sec,
            })
            .collect();
        assignments.sort_by_key(|a| a.position.string);
        assignments
    }

    /// Every assignment of the pitches that satisfies all pairwise constraints,
    /// in lexicographic order over the candidate lists
    pub fn solutions(&self, pitches: &[u8]) -> Vec<Vec<FretPosition>> {
        let mut found = Vec::new();
        if pitches.len() > STRING_COUNT {
            return found;
        }
        let domains: Vec<&[FretPosition]> =
            pitches.iter().map(|&p| self.fretboard.candidates(p)).collect();
        let mut partial = Vec::with_capacity(domains.len());
        search(&domains, &mut partial, &mut found);
        found
    }
}

fn search(
    domains: &[&[FretPosition]],
    partial: &mut Vec<FretPosition>,
    found: &mut Vec<Vec<FretPosition>>,
) {
    let Some(domain) = domains.get(partial.len()) else {
        found.push(partial.clone());
        return;
    };
    for &candidate in domain.iter() {
        if partial.iter().all(|&placed| compatible(placed, candidate)) {
            partial.push(candidate);
            search(domains, partial, found);
            partial.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fretboard::Instrument;
    use crate::quantize::NoteEvent;
    use proptest::prelude::*;

    fn set(beat: u32, pitches: &[u8]) -> SimultaneousSet {
        SimultaneousSet {
            beat,
            notes: pitches
                .iter()
                .map(|&pitch| NoteEvent {
                    pitch,
                    onset_sec: 0.0,
                    beat,
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_note_takes_highest_string() {
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        let assignments = optimizer.assign(&set(1, &[64]));
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].position, FretPosition::new(0, 0));
        assert_eq!(assignments[0].beat, 1);
    }

    #[test]
    fn test_unison_collapses_to_one_assignment() {
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        let assignments = optimizer.assign(&set(3, &[67, 67]));
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].pitch, 67);
        assert_eq!(assignments[0].position, FretPosition::new(0, 3));
    }

    #[test]
    fn test_open_e_major_chord() {
        // E2 B2 E3 G#3 B3 E4: the open E shape
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        let assignments = optimizer.assign(&set(1, &[40, 47, 52, 56, 59, 64]));
        let placed: Vec<(usize, u8)> = assignments
            .iter()
            .map(|a| (a.position.string, a.position.fret))
            .collect();
        assert_eq!(placed, vec![(0, 0), (1, 0), (2, 1), (3, 2), (4, 2), (5, 0)]);
    }

    #[test]
    fn test_two_notes_on_same_string_range_split() {
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        let assignments = optimizer.assign(&set(1, &[64, 65]));
        assert_eq!(assignments.len(), 2);
        assert_ne!(assignments[0].position.string, assignments[1].position.string);
    }

    #[test]
    fn test_open_string_span_capped() {
        assert!(within_fret_span(FretPosition::new(0, 0), FretPosition::new(1, 7)));
        assert!(!within_fret_span(FretPosition::new(0, 0), FretPosition::new(1, 8)));
        assert!(!within_fret_span(FretPosition::new(0, 3), FretPosition::new(1, 8)));
        assert!(within_fret_span(FretPosition::new(0, 4), FretPosition::new(1, 8)));
    }

    #[test]
    fn test_open_string_not_paired_with_high_fret() {
        // E4 open with B4 at fret 12 is too wide; B4 moves to the top string
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        let assignments = optimizer.assign(&set(1, &[64, 71]));
        let placed: Vec<(u8, usize, u8)> = assignments
            .iter()
            .map(|a| (a.pitch, a.position.string, a.position.fret))
            .collect();
        assert_eq!(placed, vec![(71, 0, 7), (64, 1, 5)]);
    }

    #[test]
    fn test_solutions_enumerated_lexicographically() {
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        let solutions = optimizer.solutions(&[64, 59]);
        assert_eq!(solutions[0], vec![FretPosition::new(0, 0), FretPosition::new(1, 0)]);
        assert!(solutions.iter().all(|s| compatible(s[0], s[1])));
    }

    #[test]
    fn test_unsatisfiable_set_drops_second_note() {
        // 40 only fits on the low E string, as does 41
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        let assignments = optimizer.assign(&set(1, &[40, 41, 64]));
        let pitches: Vec<u8> = assignments.iter().map(|a| a.pitch).collect();
        assert_eq!(pitches, vec![64, 40]);
    }

    #[test]
    fn test_too_many_pitches_reduced_to_six_or_fewer() {
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        let assignments = optimizer.assign(&set(1, &[40, 45, 50, 55, 59, 64, 67, 69]));
        assert!(assignments.len() <= STRING_COUNT);
        assert!(assignments.iter().any(|a| a.pitch == 40));
    }

    #[test]
    fn test_unplayable_chord_falls_back_to_unfiltered() {
        let board = Fretboard::standard();
        let optimizer = FingeringOptimizer::new(&board);
        // Only shape is open e over frets 3,3,3,2,1; the bar scan stops at the lone fret 1
        let pitches = [64, 62, 58, 53, 47, 41];
        let solutions = optimizer.solutions(&pitches);
        assert!(!solutions.is_empty());
        assert!(solutions.iter().all(|s| !playability::is_playable(s)));

        let expected = solutions
            .iter()
            .min_by_key(|s| s.iter().map(|p| p.string).sum::<usize>())
            .unwrap();
        let assignments = optimizer.assign(&set(1, &pitches));
        assert_eq!(assignments.len(), 6);
        for (pitch, position) in pitches.iter().zip(expected) {
            assert!(assignments.iter().any(|a| a.pitch == *pitch && a.position == *position));
        }
    }

    #[test]
    fn test_drop_d_uses_low_string() {
        let board = Fretboard::new(Instrument::new(-2, 0)).unwrap();
        let optimizer = FingeringOptimizer::new(&board);
        let assignments = optimizer.assign(&set(1, &[38]));
        assert_eq!(assignments[0].position, FretPosition::new(5, 0));
    }

    proptest! {
        #[test]
        fn test_accepted_solutions_respect_constraints(
            pitches in proptest::collection::vec(40u8..82, 1..8),
        ) {
            let board = Fretboard::standard();
            let optimizer = FingeringOptimizer::new(&board);
            let assignments = optimizer.assign(&set(1, &pitches));
            prop_assert!(!assignments.is_empty());
            for (i, a) in assignments.iter().enumerate() {
                prop_assert_eq!(board.pitch_at(a.position), a.pitch);
                for b in &assignments[i + 1..] {
                    prop_assert!(compatible(a.position, b.position));
                }
            }
        }
    }
}
