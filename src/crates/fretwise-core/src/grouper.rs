use std::iter::Peekable;

use serde::{Deserialize, Serialize};

use crate::quantize::NoteEvent;

/// Notes that share one quarter-beat index and need a joint fingering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimultaneousSet {
    pub beat: u32,
    pub notes: Vec<NoteEvent>,
}

impl SimultaneousSet {
    /// Distinct pitches in order of first appearance
    pub fn distinct_pitches(&self) -> Vec<u8> {
        let mut pitches: Vec<u8> = Vec::with_capacity(self.notes.len());
        for note in &self.notes {
            if !pitches.contains(&note.pitch) {
                pitches.push(note.pitch);
            }
        }
        pitches
    }

    /// Onset of the earliest note in the set
    pub fn onset_sec(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| n.onset_sec)
            .fold(f64::INFINITY, f64::min)
    }
}

/// Lazy, single-pass iterator over maximal runs of equal beat index
pub struct SimultaneousSets<I: Iterator<Item = NoteEvent>> {
    events: Peekable<I>,
}

impl<I: Iterator<Item = NoteEvent>> Iterator for SimultaneousSets<I> {
    type Item = SimultaneousSet;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.events.next()?;
        let beat = first.beat;
        let mut notes = vec![first];
        while let Some(note) = self.events.next_if(|e| e.beat == beat) {
            notes.push(note);
        }
        Some(SimultaneousSet { beat, notes })
    }
}

/// Group a beat-sorted event sequence into simultaneous sets
pub fn group_by_beat<I>(events: I) -> SimultaneousSets<I::IntoIter>
where
    I: IntoIterator<Item = NoteEvent>,
{
    SimultaneousSets {
        events: events.into_iter().peekable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(pitch: u8, beat: u32) -> NoteEvent {
        NoteEvent {
            pitch,
            onset_sec: (beat - 1) as f64 * 0.125,
            beat,
        }
    }

    #[test]
    fn test_groups_runs() {
        let events = vec![event(64, 1), event(67, 1), event(60, 3), event(62, 4), event(65, 4)];
        let sets: Vec<SimultaneousSet> = group_by_beat(events).collect();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].beat, 1);
        assert_eq!(sets[0].notes.len(), 2);
        assert_eq!(sets[1].beat, 3);
        assert_eq!(sets[2].notes.iter().map(|n| n.pitch).collect::<Vec<_>>(), vec![62, 65]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(group_by_beat(Vec::new()).count(), 0);
    }

    #[test]
    fn test_sets_never_empty() {
        let events: Vec<NoteEvent> = (1..20).map(|b| event(60, b / 3 + 1)).collect();
        let total: usize = group_by_beat(events.clone())
            .inspect(|s| assert!(!s.notes.is_empty()))
            .map(|s| s.notes.len())
            .sum();
        assert_eq!(total, events.len());
    }

    #[test]
    fn test_distinct_pitches_keep_first_order() {
        let set = SimultaneousSet {
            beat: 1,
            notes: vec![event(67, 1), event(64, 1), event(67, 1)],
        };
        assert_eq!(set.distinct_pitches(), vec![67, 64]);
        assert_eq!(set.onset_sec(), 0.0);
    }
}
