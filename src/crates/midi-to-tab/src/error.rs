use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MidiError>;

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("failed to read MIDI file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse MIDI file: {0}")]
    Parse(#[from] midly::Error),

    #[error("SMPTE timecode files are not supported ({fps} fps); only metrical timing")]
    UnsupportedTiming { fps: f32 },

    #[error("channel {requested} not found; available channels: {}", format_channels(.available))]
    InvalidChannel { requested: u8, available: Vec<u8> },

    #[error("MIDI file contains no note-on events")]
    NoNotes,

    #[error(transparent)]
    Tab(#[from] fretwise_core::TabError),
}

fn format_channels(channels: &[u8]) -> String {
    if channels.is_empty() {
        return "none".to_string();
    }
    channels
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
