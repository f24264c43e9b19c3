//! Beat-quantized fretboard assignment engine
//!
//! Turns note-on events with absolute tick offsets into six-string tablature.
//! Onsets are snapped to a sixteenth-note grid, notes sharing a grid slot are
//! fingered jointly by an exhaustive constraint search, and the result is laid
//! out as column-aligned text blocks.
//!
//! # Examples
//!
//! ```
//! use fretwise_core::{Instrument, RawNote, TabInput, Transcriber};
//!
//! let transcriber = Transcriber::new(Instrument::default()).unwrap();
//! let input = TabInput {
//!     events: vec![RawNote::new(64, 0), RawNote::new(67, 480)],
//!     ticks_per_beat: 480,
//!     ..Default::default()
//! };
//! let tab = transcriber.transcribe(&input).unwrap();
//! assert_eq!(tab.len(), 2);
//! ```
//!
//! # Main Components
//!
//! - **Fretboard**: candidate (string, fret) placements per pitch
//! - **quantize**: tick to quarter-beat index conversion through the tempo map
//! - **group_by_beat**: simultaneous sets of notes
//! - **FingeringOptimizer**: constraint search with playability filtering
//! - **TabRenderer**: measure-delimited text blocks

pub mod engine;
pub mod error;
pub mod fingering;
pub mod fretboard;
pub mod grouper;
pub mod note;
pub mod playability;
pub mod quantize;
pub mod render;
pub mod tab;
pub mod tempo;

pub use engine::{TabInput, Transcriber};
pub use error::{Result, TabError};
pub use fingering::FingeringOptimizer;
pub use fretboard::{FretPosition, Fretboard, Instrument, FRET_COUNT, STRING_COUNT};
pub use grouper::{group_by_beat, SimultaneousSet};
pub use quantize::{quantize, NoteEvent, RawNote, TempoCursor, MAX_BEAT_INDEX};
pub use render::{TabBlock, TabRenderer, DEFAULT_WRAP_WIDTH};
pub use tab::{Assignment, Tab};
pub use tempo::{TempoChange, TempoMap, TimeSignature};
