//! The single-pass pipeline: quantize, group, finger, validate.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::fingering::FingeringOptimizer;
use crate::fretboard::{Fretboard, Instrument};
use crate::grouper::group_by_beat;
use crate::quantize::{quantize, RawNote};
use crate::render::{TabBlock, TabRenderer};
use crate::tab::Tab;
use crate::tempo::{TempoMap, TimeSignature};

/// Everything the engine needs from the file reader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabInput {
    pub events: Vec<RawNote>,
    pub tempo_map: TempoMap,
    pub ticks_per_beat: u32,
    pub time_signature: Option<TimeSignature>,
}

pub struct Transcriber {
    fretboard: Fretboard,
}

impl Transcriber {
    pub fn new(instrument: Instrument) -> Result<Self> {
        Ok(Self {
            fretboard: Fretboard::new(instrument)?,
        })
    }

    pub fn fretboard(&self) -> &Fretboard {
        &self.fretboard
    }

    pub fn transcribe(&self, input: &TabInput) -> Result<Tab> {
        let events = quantize(
            &input.events,
            &input.tempo_map,
            input.ticks_per_beat,
            &self.fretboard,
        )?;
        let kept = events.len();

        let optimizer = FingeringOptimizer::new(&self.fretboard);
        let mut assignments = Vec::with_capacity(kept);
        let mut chords = 0usize;
        for set in group_by_beat(events) {
            assignments.extend(optimizer.assign(&set));
            chords += 1;
        }

        debug!(
            input = input.events.len(),
            in_range = kept,
            placed = assignments.len(),
            chords,
            "transcribed notes"
        );
        Tab::new(assignments)
    }

    /// Renderer for this instrument's string labels
    pub fn renderer(&self, time_signature: Option<TimeSignature>) -> TabRenderer {
        TabRenderer::new(TimeSignature::or_default(time_signature), self.fretboard.labels())
    }

    /// Transcribe and render in one go
    pub fn render(&self, input: &TabInput, wrap_width: usize) -> Result<Vec<TabBlock>> {
        let tab = self.transcribe(input)?;
        let blocks = self
            .renderer(input.time_signature)
            .with_wrap_width(wrap_width)
            .render(&tab);
        info!(notes = tab.len(), blocks = blocks.len(), "rendered tablature");
        Ok(blocks)
    }
}
