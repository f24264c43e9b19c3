use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use fretwise_core::note::note_name;
use fretwise_core::{RawNote, TabInput, TempoChange, TempoMap, TimeSignature};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MidiError, Result};
use crate::instruments::{channel_instrument, is_guitar_program, is_percussion_channel};

/// Note-ons of one MIDI channel, gathered across every track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelInfo {
    pub channel: u8,
    /// Absolute ticks, ordered
    pub notes: Vec<RawNote>,
    pub program: Option<u8>,
    pub name: Option<String>,
}

impl ChannelInfo {
    fn new(channel: u8) -> Self {
        Self {
            channel,
            notes: Vec::new(),
            program: None,
            name: None,
        }
    }

    pub fn instrument(&self) -> &'static str {
        channel_instrument(self.channel, self.program)
    }

    pub fn is_percussion(&self) -> bool {
        is_percussion_channel(self.channel)
    }

    /// Lowest and highest pitch played
    pub fn pitch_range(&self) -> Option<(u8, u8)> {
        let low = self.notes.iter().map(|n| n.pitch).min()?;
        let high = self.notes.iter().map(|n| n.pitch).max()?;
        Some((low, high))
    }

    /// One-line description for channel listings
    pub fn summary(&self) -> String {
        let mut line = format!(
            "channel {:>2}: {} ({} notes",
            self.channel,
            self.instrument(),
            self.notes.len()
        );
        if let Some((low, high)) = self.pitch_range() {
            line.push_str(&format!(", {}..{}", note_name(low), note_name(high)));
        }
        line.push(')');
        if let Some(name) = &self.name {
            line.push_str(&format!(" \"{}\"", name));
        }
        line
    }
}

/// Everything the tab engine needs from a Standard MIDI File
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidiData {
    pub ticks_per_beat: u32,
    pub tempo_map: TempoMap,
    pub time_signature: Option<TimeSignature>,
    pub channels: BTreeMap<u8, ChannelInfo>,
}

impl MidiData {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| MidiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data)?;
        Self::from_smf(&smf)
    }

    pub fn from_smf(smf: &Smf) -> Result<Self> {
        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(tpb) => tpb.as_int() as u32,
            Timing::Timecode(fps, _) => {
                return Err(MidiError::UnsupportedTiming { fps: fps.as_f32() });
            }
        };

        let mut tempo_changes = Vec::new();
        let mut time_signature = None;
        let mut programs: HashMap<u8, u8> = HashMap::new();
        let mut channels: BTreeMap<u8, ChannelInfo> = BTreeMap::new();

        for track in &smf.tracks {
            let mut tick: u64 = 0;
            let mut track_name: Option<String> = None;

            for event in track {
                tick += event.delta.as_int() as u64;

                match event.kind {
                    TrackEventKind::Midi { channel, message } => {
                        let channel = channel.as_int();
                        match message {
                            // A note-on with zero velocity is a note-off
                            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                                let info = channels
                                    .entry(channel)
                                    .or_insert_with(|| ChannelInfo::new(channel));
                                if info.name.is_none() {
                                    info.name = track_name.clone();
                                }
                                info.notes.push(RawNote::new(key.as_int(), tick));
                            }
                            MidiMessage::ProgramChange { program } => {
                                programs.entry(channel).or_insert(program.as_int());
                            }
                            _ => {}
                        }
                    }
                    TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => {
                        tempo_changes.push(TempoChange::new(tempo.as_int(), tick));
                    }
                    TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, power, _, _)) => {
                        if time_signature.is_none() {
                            time_signature = parse_time_signature(numerator, power);
                        }
                    }
                    TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                        // Trim null bytes and whitespace some sequencers leave behind
                        let cleaned = String::from_utf8_lossy(name)
                            .trim_end_matches('\0')
                            .trim()
                            .to_string();
                        if !cleaned.is_empty() {
                            track_name = Some(cleaned);
                        }
                    }
                    _ => {}
                }
            }
        }

        for info in channels.values_mut() {
            info.program = programs.get(&info.channel).copied();
            info.notes.sort_by_key(|n| n.tick);
        }

        debug!(
            ticks_per_beat,
            tempo_changes = tempo_changes.len(),
            channels = channels.len(),
            "parsed MIDI file"
        );

        Ok(MidiData {
            ticks_per_beat,
            tempo_map: TempoMap::new(tempo_changes)?,
            time_signature,
            channels,
        })
    }

    pub fn available_channels(&self) -> Vec<u8> {
        self.channels.keys().copied().collect()
    }

    pub fn channel(&self, channel: u8) -> Result<&ChannelInfo> {
        self.channels
            .get(&channel)
            .ok_or_else(|| MidiError::InvalidChannel {
                requested: channel,
                available: self.available_channels(),
            })
    }

    /// Channel to tabulate when none was requested: the first guitar channel,
    /// then the first pitched channel, then whatever is left
    pub fn default_channel(&self) -> Result<u8> {
        let pitched = || self.channels.values().filter(|c| !c.is_percussion());
        pitched()
            .find(|c| c.program.is_some_and(is_guitar_program))
            .or_else(|| pitched().next())
            .or_else(|| self.channels.values().next())
            .map(|c| c.channel)
            .ok_or(MidiError::NoNotes)
    }

    /// Engine input for one channel
    pub fn tab_input(&self, channel: u8) -> Result<TabInput> {
        let info = self.channel(channel)?;
        if info.is_percussion() {
            warn!(channel, "channel {} is percussion; pitches are drum sounds", channel);
        }
        Ok(TabInput {
            events: info.notes.clone(),
            tempo_map: self.tempo_map.clone(),
            ticks_per_beat: self.ticks_per_beat,
            time_signature: self.time_signature,
        })
    }

    /// Tempo at the start of the file
    pub fn bpm(&self) -> f64 {
        60_000_000.0 / self.tempo_map.micros_per_quarter_at(0) as f64
    }
}

fn parse_time_signature(numerator: u8, power: u8) -> Option<TimeSignature> {
    let denominator = 1u8.checked_shl(power as u32)?;
    match TimeSignature::new(numerator, denominator) {
        Ok(signature) => Some(signature),
        Err(err) => {
            warn!("ignoring time signature: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_signature_power_of_two() {
        assert_eq!(parse_time_signature(6, 3), Some(TimeSignature::new(6, 8).unwrap()));
        assert_eq!(parse_time_signature(4, 2), Some(TimeSignature::default()));
        assert_eq!(parse_time_signature(4, 9), None);
        assert_eq!(parse_time_signature(0, 2), None);
    }

    #[test]
    fn test_channel_summary() {
        let info = ChannelInfo {
            channel: 2,
            notes: vec![RawNote::new(64, 0), RawNote::new(40, 10), RawNote::new(71, 20)],
            program: Some(25),
            name: Some("Rhythm".to_string()),
        };
        assert_eq!(info.pitch_range(), Some((40, 71)));
        assert_eq!(
            info.summary(),
            "channel  2: Acoustic Guitar (steel) (3 notes, E2..B4) \"Rhythm\""
        );
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(matches!(
            MidiData::from_bytes(b"not a midi file"),
            Err(MidiError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = MidiData::from_file(Path::new("/nonexistent/song.mid"));
        assert!(matches!(result, Err(MidiError::Io { .. })));
    }
}
