//! Tablature text renderer.
//!
//! Lays a [`Tab`] out as six aligned string lines, one virtual column per
//! quarter-beat index. Columns are at least one character wide, a single
//! filler follows every sounded column, and a bar line closes each measure.
//! Lines wrap into a new block at the first measure boundary past the wrap
//! width; each block is labelled with the measure it starts at.

use std::fmt;

use serde::Serialize;

use crate::fretboard::STRING_COUNT;
use crate::tab::Tab;
use crate::tempo::TimeSignature;

/// Line width (characters) past which a block is flushed at the next bar line
pub const DEFAULT_WRAP_WIDTH: usize = 132;

const FILLER: char = '-';
const BAR_LINE: char = '|';

/// Six aligned string lines starting at a given measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabBlock {
    pub start_measure: u32,
    pub lines: [String; STRING_COUNT],
}

impl fmt::Display for TabBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.start_measure)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

pub struct TabRenderer {
    time_signature: TimeSignature,
    prefixes: [String; STRING_COUNT],
    wrap_width: usize,
}

impl TabRenderer {
    pub fn new(time_signature: TimeSignature, labels: &[String; STRING_COUNT]) -> Self {
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let prefixes = labels.clone().map(|label| format!("{:<label_width$}{} ", label, BAR_LINE));
        Self {
            time_signature,
            prefixes,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }

    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    /// Width of the label prefix every line starts with
    pub fn prefix_width(&self) -> usize {
        self.prefixes[0].chars().count()
    }

    pub fn render(&self, tab: &Tab) -> Vec<TabBlock> {
        let Some(last_beat) = tab.last_beat() else {
            return Vec::new();
        };
        let measure_len = self.time_signature.quarter_beats_per_measure();
        let end = last_beat.div_ceil(measure_len) * measure_len;

        let mut blocks = Vec::new();
        let mut lines = self.prefixes.clone();
        let mut measure = 1;
        let mut block_start = 1;
        let mut chords = tab.chords().peekable();
        let mut previous_sounded = false;

        for beat in 1..=end {
            if previous_sounded {
                push_all(&mut lines, FILLER);
            }

            let mut width = line_width(&lines) + 1;
            previous_sounded = false;
            if let Some(chord) = chords.next_if(|c| c[0].beat == beat) {
                for assignment in chord {
                    let line = &mut lines[assignment.position.string];
                    line.push_str(&assignment.position.fret.to_string());
                    width = width.max(line.chars().count());
                }
                previous_sounded = true;
            }
            for line in lines.iter_mut() {
                let missing = width - line.chars().count();
                line.extend(std::iter::repeat(FILLER).take(missing));
            }

            if beat % measure_len == 0 {
                push_all(&mut lines, BAR_LINE);
                measure += 1;
                if line_width(&lines) > self.wrap_width {
                    let full = std::mem::replace(&mut lines, self.prefixes.clone());
                    blocks.push(TabBlock {
                        start_measure: block_start,
                        lines: full,
                    });
                    block_start = measure;
                }
            }
        }

        if line_width(&lines) > self.prefix_width() {
            blocks.push(TabBlock {
                start_measure: block_start,
                lines,
            });
        }
        blocks
    }

    /// Rendered blocks separated by blank lines
    pub fn render_text(&self, tab: &Tab) -> String {
        self.render(tab)
            .iter()
            .map(|block| block.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn line_width(lines: &[String; STRING_COUNT]) -> usize {
    lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
}

fn push_all(lines: &mut [String; STRING_COUNT], c: char) {
    for line in lines.iter_mut() {
        line.push(c);
    }
}
