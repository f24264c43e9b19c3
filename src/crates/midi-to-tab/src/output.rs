use fretwise_core::{Assignment, TabBlock, TimeSignature, Transcriber, STRING_COUNT};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::midi::MidiData;

/// One channel transcribed and laid out as tablature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabDocument {
    pub channel: u8,
    pub instrument: String,
    pub track_name: Option<String>,
    pub bpm: f64,
    pub time_signature: TimeSignature,
    pub labels: [String; STRING_COUNT],
    pub assignments: Vec<Assignment>,
    pub blocks: Vec<TabBlock>,
}

impl TabDocument {
    pub fn transcribe(
        midi: &MidiData,
        channel: u8,
        transcriber: &Transcriber,
        wrap_width: usize,
    ) -> Result<Self> {
        let info = midi.channel(channel)?;
        let input = midi.tab_input(channel)?;
        let tab = transcriber.transcribe(&input)?;
        let renderer = transcriber
            .renderer(input.time_signature)
            .with_wrap_width(wrap_width);
        let blocks = renderer.render(&tab);

        info!(
            channel,
            notes = info.notes.len(),
            placed = tab.len(),
            blocks = blocks.len(),
            "transcribed channel"
        );

        Ok(Self {
            channel,
            instrument: info.instrument().to_string(),
            track_name: info.name.clone(),
            bpm: midi.bpm(),
            time_signature: renderer.time_signature(),
            labels: transcriber.fretboard().labels().clone(),
            assignments: tab.assignments().to_vec(),
            blocks,
        })
    }
}

pub struct OutputFormatter {
    pretty: bool,
}

impl OutputFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Plain tablature: numbered blocks separated by blank lines
    pub fn build_output(&self, doc: &TabDocument) -> String {
        doc.blocks
            .iter()
            .map(|block| block.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn build_output_json(&self, doc: &TabDocument) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(doc)
        } else {
            serde_json::to_string(doc)
        }
    }

    /// Channel overview for `--list-channels`
    pub fn build_channel_listing(&self, midi: &MidiData) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "// {} ticks per beat, {:.1} bpm, {}\n",
            midi.ticks_per_beat,
            midi.bpm(),
            TimeSignature::or_default(midi.time_signature)
        ));
        for info in midi.channels.values() {
            output.push_str(&info.summary());
            output.push('\n');
        }
        output
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}
