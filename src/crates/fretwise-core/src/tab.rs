use serde::{Deserialize, Serialize};

use crate::error::{Result, TabError};
use crate::fingering::within_fret_span;
use crate::fretboard::FretPosition;

/// A note placed on the neck at a grid position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub pitch: u8,
    pub position: FretPosition,
    pub beat: u32,
    pub onset_sec: f64,
}

/// Ordered, validated assignment sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    assignments: Vec<Assignment>,
}

impl Tab {
    /// Build a tab, checking that beats never go backwards and that notes
    /// sharing a beat use distinct strings within the fret span
    pub fn new(assignments: Vec<Assignment>) -> Result<Self> {
        if assignments.first().is_some_and(|a| a.beat == 0) {
            return Err(TabError::BeforeFirstBeat);
        }
        for pair in assignments.windows(2) {
            if pair[1].beat < pair[0].beat {
                return Err(TabError::OutOfOrder {
                    previous: pair[0].beat,
                    beat: pair[1].beat,
                });
            }
        }

        for chord in assignments.chunk_by(|a, b| a.beat == b.beat) {
            for (i, a) in chord.iter().enumerate() {
                for b in &chord[i + 1..] {
                    if a.position.string == b.position.string {
                        return Err(TabError::StringCollision {
                            beat: a.beat,
                            string: a.position.string,
                        });
                    }
                    if !within_fret_span(a.position, b.position) {
                        return Err(TabError::FretSpan {
                            beat: a.beat,
                            low: a.position.fret.min(b.position.fret),
                            high: a.position.fret.max(b.position.fret),
                        });
                    }
                }
            }
        }

        Ok(Self { assignments })
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn last_beat(&self) -> Option<u32> {
        self.assignments.last().map(|a| a.beat)
    }

    /// Assignments sharing one beat, in order
    pub fn chords(&self) -> impl Iterator<Item = &[Assignment]> {
        self.assignments.chunk_by(|a, b| a.beat == b.beat)
    }
}
