//! MIDI to tablature input library
//!
//! Reads Standard MIDI Files with midly, splits note-ons by channel and hands
//! one channel at a time to the fretwise engine.

pub mod error;
pub mod instruments;
pub mod midi;
pub mod output;

// Re-export main types for convenience
pub use error::{MidiError, Result};
pub use midi::{ChannelInfo, MidiData};
pub use output::{OutputFormatter, TabDocument};
