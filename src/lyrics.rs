//! # Lyrics Scanning
//!
//! Finds chord symbols written inline in lyric text as `[chord]` tokens.
//!
//! ```text
//! [Verse 1]                          <- skipped
//! [G]Amazing [C]grace, how [G]sweet the sound
//! ^          ^             ^
//! 10         21            35
//! ```
//!
//! Bracketed text that does not parse as a chord (section markers, comments)
//! is skipped silently: lyrics legitimately contain such annotations, so one
//! bad token never fails a scan.
//!
//! Offsets are byte positions of the opening `[` in the original text, so
//! `&text[token.offset..token.end()]` is always `token.raw`.

use crate::chord::Chord;
use crate::parser::parse_chord;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A chord found in lyric text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordToken<'a> {
    pub chord: Chord,
    /// Byte offset of the opening bracket
    pub offset: usize,
    /// The bracketed text, brackets included (e.g. `[Cm7]`)
    pub raw: &'a str,
}

impl ChordToken<'_> {
    /// Byte offset just past the closing bracket
    pub fn end(&self) -> usize {
        self.offset + self.raw.len()
    }
}

/// Iterator over the chord tokens of a text, left to right.
///
/// Created by [`extract_chord_tokens`]. Each call starts a fresh scan.
#[derive(Debug, Clone)]
pub struct ChordTokens<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Iterator for ChordTokens<'a> {
    type Item = ChordToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let open = self.position + self.text[self.position..].find('[')?;

            let Some(close) = self.text[open + 1..].find(']').map(|i| open + 1 + i) else {
                // No closing bracket anywhere after this point.
                self.position = self.text.len();
                return None;
            };

            if close == open + 1 {
                // "[]" - try again from the next character
                self.position = open + 1;
                continue;
            }

            self.position = close + 1;
            let inner = &self.text[open + 1..close];
            match parse_chord(inner) {
                Ok(chord) => {
                    return Some(ChordToken {
                        chord,
                        offset: open,
                        raw: &self.text[open..=close],
                    })
                }
                Err(_) => trace!(offset = open, text = inner, "skipping non-chord bracket"),
            }
        }
    }
}

/// Scan lyric text for `[chord]` tokens.
///
/// Yields only the tokens whose interior parses as a chord, each tagged with
/// the byte offset of its opening bracket.
///
/// # Example
/// ```rust
/// use chordkeeper::extract_chord_tokens;
///
/// let tokens: Vec<_> = extract_chord_tokens("[Verse 1]\n[C]Hello [G]world").collect();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].raw, "[C]");
/// assert_eq!(tokens[0].offset, 10);
/// assert_eq!(tokens[1].chord.to_string(), "G");
/// ```
pub fn extract_chord_tokens(text: &str) -> ChordTokens<'_> {
    ChordTokens { text, position: 0 }
}

/// One chord of a structured chord list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEntry {
    pub chord: String,
    /// Byte offset of the chord's bracket in the lyrics
    pub position: usize,
}

/// The chords of one paragraph of lyrics.
///
/// A list of sections is the denormalized chord list that storage keeps next
/// to the lyrics for lookup and search; it can always be rebuilt with
/// [`chord_sections`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSection {
    pub name: String,
    pub chords: Vec<ChordEntry>,
}

/// Group the chords of a lyric text by paragraph (blank-line separated).
///
/// Sections are named `section_<n>` after the paragraph index; paragraphs
/// without chords are left out.
pub fn chord_sections(text: &str) -> Vec<ChordSection> {
    paragraphs(text)
        .into_iter()
        .enumerate()
        .filter_map(|(index, (start, paragraph))| {
            let chords: Vec<ChordEntry> = extract_chord_tokens(paragraph)
                .map(|token| ChordEntry {
                    chord: token.chord.render(),
                    position: start + token.offset,
                })
                .collect();
            (!chords.is_empty()).then(|| ChordSection {
                name: format!("section_{}", index),
                chords,
            })
        })
        .collect()
}

/// Split text into paragraphs, returning each with its starting byte offset.
fn paragraphs(text: &str) -> Vec<(usize, &str)> {
    let mut result = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                result.push((s, &text[s..offset]));
            }
        } else if start.is_none() {
            start = Some(offset);
        }
        offset += line.len();
    }
    if let Some(s) = start {
        result.push((s, &text[s..]));
    }

    result
}
