//! Pitch naming for string labels and channel summaries.

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch class of a MIDI note number (e.g., 40 -> "E", 38 -> "D")
pub fn pitch_class_name(pitch: i32) -> &'static str {
    PITCH_CLASSES[pitch.rem_euclid(12) as usize]
}

/// Scientific pitch name of a MIDI note number (e.g., 60 -> "C4", 40 -> "E2")
pub fn note_name(pitch: u8) -> String {
    let octave = (pitch / 12) as i32 - 1;
    format!("{}{}", pitch_class_name(pitch as i32), octave)
}
