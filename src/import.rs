//! # Chord Sheet Import
//!
//! Converts the plain-text "chords above lyrics" layout used by most chord
//! sites into lyrics with inline `[chord]` tokens.
//!
//! ```text
//! [Verse 1]                [Verse 1]
//! G       C                [G]Amazing [C]grace
//! Amazing grace      =>
//!                          [Em]  [D]
//! Em  D
//! ```
//!
//! A chord line is a line whose whitespace-separated words all parse as
//! chords. Its chords are inserted into the next line at the same column
//! when that line is lyrics; otherwise the chord line is kept with each chord
//! bracketed where it stands.

use crate::detect::detect_key;
use crate::key::KeySignature;
use crate::lyrics::{chord_sections, ChordSection};
use crate::parser::parse_chord;
use serde::Serialize;
use tracing::debug;

/// Result of importing a chord sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedSong {
    /// Lyrics with inline `[chord]` tokens
    pub lyrics: String,
    /// Structured chord list rebuilt from `lyrics`
    pub sections: Vec<ChordSection>,
    /// Detected key of the song
    pub key: KeySignature,
}

/// A chord word on a chord line.
struct PlacedChord<'a> {
    byte: usize,
    column: usize,
    name: &'a str,
}

/// Import a chords-over-lyrics sheet.
///
/// # Example
/// ```rust
/// use chordkeeper::import_chord_sheet;
///
/// let sheet = "G     C\nAmazing grace\n";
/// let song = import_chord_sheet(sheet);
/// assert_eq!(song.lyrics, "[G]Amazin[C]g grace\n");
/// assert_eq!(song.key.name(), "C");
/// ```
pub fn import_chord_sheet(text: &str) -> ImportedSong {
    let lines: Vec<&str> = text.lines().collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut chord_lines = 0;

    let mut i = 0;
    while i < lines.len() {
        let Some(chords) = chord_line(lines[i]) else {
            output.push(lines[i].to_string());
            i += 1;
            continue;
        };
        chord_lines += 1;

        match lines.get(i + 1) {
            Some(next) if is_lyric_line(next) => {
                output.push(merge_into_lyric(&chords, next));
                i += 2;
            }
            _ => {
                output.push(bracket_in_place(lines[i], &chords));
                i += 1;
            }
        }
    }

    let mut lyrics = output.join("\n");
    if text.ends_with('\n') {
        lyrics.push('\n');
    }
    debug!(lines = lines.len(), chord_lines, "imported chord sheet");

    ImportedSong {
        sections: chord_sections(&lyrics),
        key: detect_key(&lyrics),
        lyrics,
    }
}

/// The chords of a chord line, or `None` if the line is anything else.
fn chord_line(line: &str) -> Option<Vec<PlacedChord<'_>>> {
    let mut chords = Vec::new();
    let mut word_start: Option<(usize, usize)> = None;

    // A trailing space closes the last word.
    let chars = line.char_indices().chain(std::iter::once((line.len(), ' ')));
    for (column, (byte, c)) in chars.enumerate() {
        match (c.is_whitespace(), word_start) {
            (false, None) => word_start = Some((byte, column)),
            (true, Some((start, start_column))) => {
                let name = &line[start..byte];
                parse_chord(name).ok()?;
                chords.push(PlacedChord {
                    byte: start,
                    column: start_column,
                    name,
                });
                word_start = None;
            }
            _ => {}
        }
    }

    (!chords.is_empty()).then_some(chords)
}

fn is_lyric_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && chord_line(line).is_none()
        && !(trimmed.starts_with('[') && trimmed.ends_with(']'))
}

/// Insert chords into a lyric line at their columns, padding short lines.
fn merge_into_lyric(chords: &[PlacedChord<'_>], lyric: &str) -> String {
    let mut chars: Vec<char> = lyric.chars().collect();
    let width = chords.last().map(|c| c.column).unwrap_or(0);
    if chars.len() < width {
        chars.resize(width, ' ');
    }

    let mut merged = String::with_capacity(lyric.len() + chords.len() * 4);
    let mut pending = chords.iter().peekable();
    for (column, c) in chars.iter().enumerate() {
        while let Some(chord) = pending.next_if(|chord| chord.column == column) {
            merged.push_str(&format!("[{}]", chord.name));
        }
        merged.push(*c);
    }
    for chord in pending {
        merged.push_str(&format!("[{}]", chord.name));
    }

    merged
}

/// Bracket each chord of a chord line without moving it.
fn bracket_in_place(line: &str, chords: &[PlacedChord<'_>]) -> String {
    let mut result = String::with_capacity(line.len() + chords.len() * 2);
    let mut copied = 0;
    for chord in chords {
        result.push_str(&line[copied..chord.byte]);
        result.push_str(&format!("[{}]", chord.name));
        copied = chord.byte + chord.name.len();
    }
    result.push_str(&line[copied..]);
    result
}
