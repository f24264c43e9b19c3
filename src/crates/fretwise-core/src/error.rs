use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabError {
    #[error("instrument out of MIDI range: string {string} would sound at pitch {pitch}")]
    InvalidInstrument { string: usize, pitch: i32 },

    #[error("invalid timing: {0}")]
    InvalidTiming(String),

    #[error("strings collide at beat {beat}: two notes on string {string}")]
    StringCollision { beat: u32, string: usize },

    #[error("fret span too wide at beat {beat}: frets {low} and {high}")]
    FretSpan { beat: u32, low: u8, high: u8 },

    #[error("assignment at beat 0, before the first beat")]
    BeforeFirstBeat,

    #[error("assignments out of order: beat {beat} follows beat {previous}")]
    OutOfOrder { previous: u32, beat: u32 },
}

impl TabError {
    pub fn invalid_timing(message: impl Into<String>) -> Self {
        TabError::InvalidTiming(message.into())
    }
}
