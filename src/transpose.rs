//! # Transposition
//!
//! Shifts chords by a semitone offset and respells them for a key.
//!
//! Pitch arithmetic happens on pitch classes (mod 12); only the final spelling
//! depends on a key. The spelling key is the target key when one is given,
//! otherwise the caller's current key, so every function here is a pure
//! function of its arguments:
//!
//! ```text
//! C  +1 in F  -> Db      (F prefers flats)
//! C  +1 in G  -> C#      (G prefers sharps)
//! D/F# +2 in E -> E/G#
//! ```
//!
//! Quality tokens and parenthesized groups are copied unchanged: transposition
//! changes pitch, never chord quality.

use crate::chord::Chord;
use crate::key::KeySignature;
use crate::lyrics::{extract_chord_tokens, ChordEntry, ChordSection};
use crate::parser::parse_chord;
use crate::pitch::Note;
use tracing::debug;

/// Transpose a single note by the given number of semitones
pub fn transpose_note(note: &Note, semitones: i32, prefer_flats: bool) -> Note {
    Note::from_pitch_class(note.pitch_class().transpose(semitones), prefer_flats)
}

/// Whether the spelling context favours flats: the target key if given,
/// otherwise the current key.
fn spelling_prefers_flats(target_key: Option<KeySignature>, current_key: KeySignature) -> bool {
    target_key.unwrap_or(current_key).prefers_flats()
}

/// Transpose a chord, moving the root (and bass of a slash chord) by
/// `semitones` and spelling them for `target_key`, or for `current_key`
/// when no target is given.
///
/// An offset that is a multiple of 12 returns the chord unchanged, spelling
/// included.
///
/// # Example
/// ```rust
/// use chordkeeper::{parse_chord, transpose_chord, KeySignature};
///
/// let f: KeySignature = "F".parse()?;
/// let c = parse_chord("C")?;
/// assert_eq!(transpose_chord(&c, 1, Some(f), KeySignature::C).to_string(), "Db");
/// # Ok::<(), chordkeeper::ChordError>(())
/// ```
pub fn transpose_chord(
    chord: &Chord,
    semitones: i32,
    target_key: Option<KeySignature>,
    current_key: KeySignature,
) -> Chord {
    if semitones.rem_euclid(12) == 0 {
        return chord.clone();
    }

    let prefer_flats = spelling_prefers_flats(target_key, current_key);
    let mut transposed = Chord {
        root: transpose_note(&chord.root, semitones, prefer_flats),
        tokens: chord.tokens.clone(),
        group: chord.group.clone(),
        bass: chord
            .bass
            .as_ref()
            .map(|bass| transpose_note(bass, semitones, prefer_flats)),
        source: String::new(),
    };
    transposed.source = transposed.render();
    transposed
}

/// Transpose every `[chord]` token of a lyric text in place.
///
/// All other text (lyrics, whitespace, section markers and any bracketed
/// text that is not a chord) is copied through untouched, so the result has
/// the same bracket layout as the input.
///
/// # Example
/// ```rust
/// use chordkeeper::{transpose_text, KeySignature};
///
/// let lyrics = "[Verse]\n[G]Amazing [C]grace";
/// let up = transpose_text(lyrics, 2, None, "G".parse()?);
/// assert_eq!(up, "[Verse]\n[A]Amazing [D]grace");
/// # Ok::<(), chordkeeper::ChordError>(())
/// ```
pub fn transpose_text(
    text: &str,
    semitones: i32,
    target_key: Option<KeySignature>,
    current_key: KeySignature,
) -> String {
    debug!(
        semitones,
        spelling_key = %target_key.unwrap_or(current_key),
        "transposing lyrics"
    );

    let mut result = String::with_capacity(text.len());
    let mut copied = 0;

    for token in extract_chord_tokens(text) {
        result.push_str(&text[copied..token.offset]);
        let chord = transpose_chord(&token.chord, semitones, target_key, current_key);
        result.push('[');
        result.push_str(&chord.render());
        result.push(']');
        copied = token.end();
    }
    result.push_str(&text[copied..]);

    result
}

/// Transpose lyrics written in `from` so that they sound in `to`, spelling
/// for `to`.
pub fn transpose_to_key(text: &str, from: KeySignature, to: KeySignature) -> String {
    transpose_text(text, from.semitones_to(to) as i32, Some(to), from)
}

/// Transpose a structured chord list entry by entry.
///
/// Entries whose chord text does not parse are kept as they are; positions
/// are unchanged.
pub fn transpose_sections(
    sections: &[ChordSection],
    semitones: i32,
    target_key: Option<KeySignature>,
    current_key: KeySignature,
) -> Vec<ChordSection> {
    sections
        .iter()
        .map(|section| ChordSection {
            name: section.name.clone(),
            chords: section
                .chords
                .iter()
                .map(|entry| ChordEntry {
                    chord: match parse_chord(&entry.chord) {
                        Ok(chord) => {
                            transpose_chord(&chord, semitones, target_key, current_key).render()
                        }
                        Err(_) => entry.chord.clone(),
                    },
                    position: entry.position,
                })
                .collect(),
        })
        .collect()
}
