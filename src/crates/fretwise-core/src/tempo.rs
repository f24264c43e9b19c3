//! Tempo map and time signature metadata.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TabError};

/// 120 BPM, used until the first tempo change takes effect
pub const DEFAULT_MICROS_PER_QUARTER: u32 = 500_000;

/// Quarter-beat grid resolution: subdivisions per quarter note
pub const SUBDIVISIONS_PER_QUARTER: u32 = 4;

/// A tempo change taking effect at an absolute tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoChange {
    pub micros_per_quarter: u32,
    pub tick: u64,
}

impl TempoChange {
    pub fn new(micros_per_quarter: u32, tick: u64) -> Self {
        Self {
            micros_per_quarter,
            tick,
        }
    }

    pub fn bpm(&self) -> f64 {
        60_000_000.0 / self.micros_per_quarter as f64
    }
}

/// Tempo changes ordered by effective tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TempoMap {
    changes: Vec<TempoChange>,
}

impl TempoMap {
    /// Build a map; changes are stably sorted by tick so equal ticks keep input order
    pub fn new(mut changes: Vec<TempoChange>) -> Result<Self> {
        if let Some(bad) = changes.iter().find(|c| c.micros_per_quarter == 0) {
            return Err(TabError::invalid_timing(format!(
                "tempo change at tick {} has zero microseconds per quarter",
                bad.tick
            )));
        }
        changes.sort_by_key(|c| c.tick);
        Ok(Self { changes })
    }

    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Tempo in effect at `tick`: the last change at or before it, else the default
    pub fn micros_per_quarter_at(&self, tick: u64) -> u32 {
        self.changes
            .iter()
            .take_while(|c| c.tick <= tick)
            .last()
            .map_or(DEFAULT_MICROS_PER_QUARTER, |c| c.micros_per_quarter)
    }
}

/// Time signature (e.g., 4/4, 3/4, 6/8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl TimeSignature {
    pub fn new(numerator: u8, denominator: u8) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(TabError::invalid_timing(format!(
                "time signature {}/{} must be positive",
                numerator, denominator
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Resolve optional metadata, falling back to 4/4
    pub fn or_default(signature: Option<TimeSignature>) -> Self {
        signature.unwrap_or_else(|| {
            debug!("no time signature, assuming 4/4");
            Self::default()
        })
    }

    /// Width of a measure on the quarter-beat grid
    pub fn quarter_beats_per_measure(&self) -> u32 {
        self.numerator as u32 * self.denominator as u32
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
