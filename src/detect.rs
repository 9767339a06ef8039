//! # Key Detection
//!
//! Guesses the major key of a lyric text from the chords it uses.
//!
//! Every distinct chord root found in the text is checked against the
//! diatonic triads (I ii iii IV V vi vii°) of each of the 12 candidate keys.
//! A root counts for a key when the name of one of its diatonic triads starts
//! with the root's spelling:
//!
//! ```text
//! key D:  D  Em  F#m  G  A  Bm  C#dim
//! root C  -> counts (prefix of C#dim)
//! root Db -> does not count
//! ```
//!
//! Chord quality of the scanned chords is ignored.
//!
//! The highest score wins; ties go to the earlier key in
//! C G D A E B F Bb Eb Ab Db Gb. Text without chords is in C.

use crate::chord::Chord;
use crate::key::{KeySignature, CANONICAL_KEYS};
use crate::lyrics::extract_chord_tokens;
use crate::pitch::Note;
use serde::Serialize;
use tracing::debug;

/// How many of a text's chord roots belong to a key's diatonic set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyScore {
    pub key: KeySignature,
    pub score: usize,
}

/// Distinct chord roots of a lyric text, in order of first appearance.
pub fn distinct_roots(text: &str) -> Vec<Note> {
    let mut roots: Vec<Note> = Vec::new();
    for token in extract_chord_tokens(text) {
        if !roots.contains(&token.chord.root) {
            roots.push(token.chord.root);
        }
    }
    roots
}

/// Score all 12 candidate keys, best first.
pub fn rank_keys(text: &str) -> Vec<KeyScore> {
    let roots: Vec<String> = distinct_roots(text).iter().map(Note::to_string).collect();

    let mut scores: Vec<KeyScore> = CANONICAL_KEYS
        .iter()
        .map(|&key| {
            let diatonic: Vec<String> = key.diatonic_chords().iter().map(Chord::render).collect();
            let score = roots
                .iter()
                .filter(|root| diatonic.iter().any(|name| name.starts_with(root.as_str())))
                .count();
            KeyScore { key, score }
        })
        .collect();

    // Stable sort keeps canonical order among equal scores.
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    debug!(roots = roots.len(), ?scores, "ranked keys");
    scores
}

/// The most probable major key of a lyric text; C when it has no chords.
///
/// # Example
/// ```rust
/// use chordkeeper::detect_key;
///
/// let lyrics = "[C]Let it [G]be, let it [Am]be, let it [F]be";
/// assert_eq!(detect_key(lyrics).name(), "C");
/// ```
pub fn detect_key(text: &str) -> KeySignature {
    rank_keys(text)
        .first()
        .filter(|best| best.score > 0)
        .map(|best| best.key)
        .unwrap_or(KeySignature::C)
}
