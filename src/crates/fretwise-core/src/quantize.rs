//! Time quantization of note onsets onto the quarter-beat grid.
//!
//! Ticks are converted to seconds by integrating the tempo map piecewise, then
//! snapped to `1 + round(4 * seconds / seconds_per_beat)`. Index 0 is reserved
//! for "before the first beat".

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, TabError};
use crate::fretboard::Fretboard;
use crate::tempo::{TempoChange, TempoMap, DEFAULT_MICROS_PER_QUARTER, SUBDIVISIONS_PER_QUARTER};

/// A note-on as delivered by the file reader: pitch plus absolute tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    pub pitch: u8,
    pub tick: u64,
}

impl RawNote {
    pub fn new(pitch: u8, tick: u64) -> Self {
        Self { pitch, tick }
    }
}

/// A note placed on the quarter-beat grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    pub onset_sec: f64,
    /// 1-based quarter-beat index
    pub beat: u32,
}

/// Running ticks-to-seconds state, advanced through the tempo map as ticks grow
#[derive(Debug, Clone)]
pub struct TempoCursor<'a> {
    changes: &'a [TempoChange],
    next: usize,
    ticks_per_beat: u32,
    anchor_tick: u64,
    anchor_sec: f64,
    sec_per_tick: f64,
}

impl<'a> TempoCursor<'a> {
    pub fn new(tempo_map: &'a TempoMap, ticks_per_beat: u32) -> Self {
        Self {
            changes: tempo_map.changes(),
            next: 0,
            ticks_per_beat,
            anchor_tick: 0,
            anchor_sec: 0.0,
            sec_per_tick: seconds_per_tick(DEFAULT_MICROS_PER_QUARTER, ticks_per_beat),
        }
    }

    /// Seconds elapsed at `tick`. Ticks must not go backwards between calls.
    pub fn seconds_at(&mut self, tick: u64) -> f64 {
        while let Some(change) = self.changes.get(self.next) {
            if change.tick > tick {
                break;
            }
            self.anchor_sec += self.span(change.tick);
            self.anchor_tick = change.tick;
            self.sec_per_tick = seconds_per_tick(change.micros_per_quarter, self.ticks_per_beat);
            self.next += 1;
        }
        self.anchor_sec + self.span(tick)
    }

    fn span(&self, tick: u64) -> f64 {
        (tick as f64 - self.anchor_tick as f64) * self.sec_per_tick
    }
}

fn seconds_per_tick(micros_per_quarter: u32, ticks_per_beat: u32) -> f64 {
    micros_per_quarter as f64 / 1_000_000.0 / ticks_per_beat as f64
}

/// Largest quarter-beat index the grid accepts
pub const MAX_BEAT_INDEX: u32 = 1 << 24;

/// Quarter-beat index of an onset. Halves round to even.
/// `None` when the onset lands past [`MAX_BEAT_INDEX`].
pub fn beat_index(onset_sec: f64, seconds_per_beat: f64) -> Option<u32> {
    let steps = (SUBDIVISIONS_PER_QUARTER as f64 * onset_sec / seconds_per_beat).round_ties_even();
    if steps.is_nan() || steps >= MAX_BEAT_INDEX as f64 {
        return None;
    }
    Some(1 + steps.max(0.0) as u32)
}

/// Quantize raw notes onto the grid.
///
/// Notes outside the fretboard's range are dropped. The result is stably sorted
/// by beat index, so notes sharing an index keep their input order.
pub fn quantize(
    notes: &[RawNote],
    tempo_map: &TempoMap,
    ticks_per_beat: u32,
    fretboard: &Fretboard,
) -> Result<Vec<NoteEvent>> {
    if ticks_per_beat == 0 {
        return Err(TabError::invalid_timing("ticks per beat must be positive"));
    }

    let first_tick = notes.first().map_or(0, |n| n.tick);
    let initial_tempo = tempo_map
        .changes()
        .first()
        .filter(|c| c.tick <= first_tick)
        .map_or_else(
            || {
                debug!("no tempo before the first note, assuming 120 BPM");
                DEFAULT_MICROS_PER_QUARTER
            },
            |c| c.micros_per_quarter,
        );
    let seconds_per_beat = initial_tempo as f64 / 1_000_000.0;

    let mut cursor = TempoCursor::new(tempo_map, ticks_per_beat);
    let mut events = Vec::with_capacity(notes.len());
    for note in notes {
        let onset_sec = cursor.seconds_at(note.tick);
        if !fretboard.contains(note.pitch) {
            trace!(pitch = note.pitch, tick = note.tick, "dropping note outside playable range");
            continue;
        }
        let beat = beat_index(onset_sec, seconds_per_beat).ok_or_else(|| {
            TabError::invalid_timing(format!(
                "note at tick {} ({:.1}s) is beyond the last grid position",
                note.tick, onset_sec
            ))
        })?;
        events.push(NoteEvent {
            pitch: note.pitch,
            onset_sec,
            beat,
        });
    }

    events.sort_by_key(|e| e.beat);
    Ok(events)
}
