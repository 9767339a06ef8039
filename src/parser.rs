//! # Chord Grammar
//!
//! Recognizes a single chord symbol and decomposes it into a [`Chord`].
//!
//! ## Grammar
//! ```text
//! chord      := body ( "/" note )?
//! body       := note token* group?
//! note       := [A-G] [#b]*
//! token      := maj7 | min7 | m7 | dim7 | aug7 | sus2 | sus4 | sus | add9 | add2
//!             | 5 | 6 | 7 | 9 | 11 | 13 | M7 | M9 | ° | ø | Δ | + | - | alt
//!             | #5 | b5 | #9 | b9 | #11 | b13 | m | min | maj | dim | aug
//! group      := "(" [^)]+ ")"          kept verbatim, not parsed further
//! ```
//!
//! Only a `/` outside the group separates the bass, so `C7(b9/#11)` is a
//! plain chord with the group `(b9/#11)`.
//!
//! A body with no tokens is a major triad. Accidentals after the letter are
//! matched greedily, giving back marks only when the rest of the body would
//! otherwise fail to match (`Cb5` is a Cb power chord).
//!
//! ## Example
//! ```rust
//! use chordkeeper::{parse_chord, Quality};
//!
//! let chord = parse_chord("D/F#")?;
//! assert_eq!(chord.root.to_string(), "D");
//! assert_eq!(chord.quality(), Quality::Major);
//! assert_eq!(chord.bass.unwrap().to_string(), "F#");
//! # Ok::<(), chordkeeper::ChordError>(())
//! ```

use crate::chord::{Chord, QualityToken};
use crate::error::ChordError;
use crate::pitch::{Accidental, Letter, Note};

/// Parse a chord symbol such as `Cm7`, `G/B`, `F#dim7` or `C7(b9)`.
///
/// # Errors
/// Returns [`ChordError::InvalidChord`] when the text matches neither the
/// chord-body nor the slash-chord form.
pub fn parse_chord(text: &str) -> Result<Chord, ChordError> {
    let invalid = || ChordError::InvalidChord(text.to_string());

    let mut chord = match split_slash(text).and_then(|(body, bass)| slash_chord(body, bass)) {
        Some(chord) => chord,
        None => parse_body(text).ok_or_else(invalid)?,
    };
    chord.source = text.to_string();
    Ok(chord)
}

/// Parse a bare note such as `F#` or `Bb`.
///
/// # Errors
/// Returns [`ChordError::InvalidNote`] if the letter is outside A-G or anything
/// other than accidentals follows it.
pub fn parse_note(text: &str) -> Result<Note, ChordError> {
    text.parse()
}

/// Split at the only `/` outside parentheses, if there is exactly one.
fn split_slash(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut slash = None;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                if slash.is_some() {
                    return None;
                }
                slash = Some(i);
            }
            _ => {}
        }
    }
    slash.map(|i| (&text[..i], &text[i + 1..]))
}

fn slash_chord(body: &str, bass: &str) -> Option<Chord> {
    let mut chord = parse_body(body)?;
    chord.bass = Some(bass.parse::<Note>().ok()?);
    Some(chord)
}

fn parse_body(text: &str) -> Option<Chord> {
    let mut chars = text.chars();
    let letter = chars.next().and_then(Letter::from_char)?;

    let marks: Vec<Accidental> = chars.map_while(Accidental::from_char).collect();

    // Accidentals are single-byte, so the root occupies 1 + k bytes.
    (0..=marks.len()).rev().find_map(|k| {
        let (tokens, group) = parse_suffix(&text[1 + k..])?;
        Some(Chord {
            root: Note {
                letter,
                accidentals: marks[..k].to_vec(),
            },
            tokens,
            group,
            bass: None,
            source: String::new(),
        })
    })
}

/// Split the suffix into quality tokens and an optional trailing group.
fn parse_suffix(text: &str) -> Option<(Vec<QualityToken>, Option<String>)> {
    let (tokens, group) = match text.find('(') {
        Some(i) => {
            let group = &text[i..];
            let inner = group.strip_prefix('(')?.strip_suffix(')')?;
            if inner.is_empty() || inner.contains(')') {
                return None;
            }
            (&text[..i], Some(group.to_string()))
        }
        None => (text, None),
    };
    Some((match_tokens(tokens)?, group))
}

/// Match the whole text as a sequence of vocabulary tokens, preferring
/// longer tokens and falling back to shorter ones when a choice leaves an
/// unmatched tail.
///
/// Works backwards over byte offsets, so each offset is resolved once.
fn match_tokens(text: &str) -> Option<Vec<QualityToken>> {
    // choice[i]: first token that starts at i and leaves a matchable tail
    let mut choice: Vec<Option<QualityToken>> = vec![None; text.len() + 1];
    let matchable =
        |choice: &[Option<QualityToken>], i: usize| i == text.len() || choice[i].is_some();

    for start in (0..text.len()).rev() {
        if !text.is_char_boundary(start) {
            continue;
        }
        let found = QualityToken::VOCABULARY.iter().copied().find(|token| {
            text[start..].starts_with(token.as_str())
                && matchable(&choice, start + token.as_str().len())
        });
        choice[start] = found;
    }

    let mut tokens = Vec::new();
    let mut position = 0;
    while position < text.len() {
        let token = choice[position]?;
        tokens.push(token);
        position += token.as_str().len();
    }
    Some(tokens)
}
