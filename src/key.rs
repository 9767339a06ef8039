//! # Key Signatures
//!
//! Major keys identified by their position on the circle of fifths.
//!
//! ```text
//! fifths: -7  -6  -5  -4  -3  -2  -1   0   1   2   3   4   5   6   7
//! key:    Cb  Gb  Db  Ab  Eb  Bb  F   C   G   D   A   E   B   F#  C#
//! ```
//!
//! Flat keys (negative fifths) prefer flat spellings when notes are respelled
//! after transposition; C and the sharp keys prefer sharps. The preference is
//! used only to choose spellings, never for pitch arithmetic.

use crate::chord::{Chord, QualityToken};
use crate::error::ChordError;
use crate::pitch::{Accidental, Letter, Note, PitchClass};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A major key signature (number of sharps/flats).
/// Positive = sharps, Negative = flats, Zero = C major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct KeySignature {
    fifths: i8, // -7 to +7 (flats to sharps)
}

/// The 12 candidate keys in canonical order, one per pitch class.
/// Key detection breaks ties by position in this list.
pub const CANONICAL_KEYS: [KeySignature; 12] = [
    KeySignature { fifths: 0 },  // C
    KeySignature { fifths: 1 },  // G
    KeySignature { fifths: 2 },  // D
    KeySignature { fifths: 3 },  // A
    KeySignature { fifths: 4 },  // E
    KeySignature { fifths: 5 },  // B
    KeySignature { fifths: -1 }, // F
    KeySignature { fifths: -2 }, // Bb
    KeySignature { fifths: -3 }, // Eb
    KeySignature { fifths: -4 }, // Ab
    KeySignature { fifths: -5 }, // Db
    KeySignature { fifths: -6 }, // Gb
];

impl KeySignature {
    pub const C: KeySignature = KeySignature { fifths: 0 };

    /// Key with the given number of fifths, `None` outside -7..=7.
    pub fn from_fifths(fifths: i8) -> Option<Self> {
        (-7..=7).contains(&fifths).then_some(Self { fifths })
    }

    pub fn fifths(self) -> i8 {
        self.fifths
    }

    pub fn name(self) -> &'static str {
        match self.fifths {
            -7 => "Cb",
            -6 => "Gb",
            -5 => "Db",
            -4 => "Ab",
            -3 => "Eb",
            -2 => "Bb",
            -1 => "F",
            1 => "G",
            2 => "D",
            3 => "A",
            4 => "E",
            5 => "B",
            6 => "F#",
            7 => "C#",
            _ => "C",
        }
    }

    pub fn prefers_flats(self) -> bool {
        self.fifths < 0
    }

    pub fn tonic(self) -> Note {
        self.scale()[0].clone()
    }

    pub fn pitch_class(self) -> PitchClass {
        // Each fifth is 7 semitones above the previous one.
        PitchClass::new(self.fifths as i32 * 7)
    }

    /// Upward interval in semitones from this key's tonic to `other`'s, in `0..12`.
    pub fn semitones_to(self, other: KeySignature) -> u8 {
        self.pitch_class().semitones_to(other.pitch_class())
    }

    /// The conventional key for a tonic pitch class.
    ///
    /// Pitch classes 1 and 6 have a sharp and a flat key (C#/Db, F#/Gb); the
    /// preference decides. Pitch class 11 is always B, never Cb.
    pub fn from_pitch_class(pc: PitchClass, prefer_flats: bool) -> Self {
        match pc.value() {
            1 if !prefer_flats => KeySignature { fifths: 7 },
            6 if !prefer_flats => KeySignature { fifths: 6 },
            _ => CANONICAL_KEYS
                .iter()
                .copied()
                .find(|k| k.pitch_class() == pc)
                .unwrap_or(KeySignature::C),
        }
    }

    /// The key label after moving the tonic by `semitones`.
    pub fn transposed(self, semitones: i32, prefer_flats: bool) -> Self {
        Self::from_pitch_class(self.pitch_class().transpose(semitones), prefer_flats)
    }

    /// The seven scale notes, spelled with one letter per degree
    /// (so F# major contains E#, Gb major contains Cb).
    pub fn scale(self) -> [Note; 7] {
        const MAJOR_STEPS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

        // Tonic letter: C moves by a fifth (four letters) per step on the circle.
        let tonic_letter = Letter::C.offset_by((self.fifths.rem_euclid(7) as usize) * 4);
        let tonic_pc = self.pitch_class().value() as i32;

        std::array::from_fn(|degree| {
            let letter = tonic_letter.offset_by(degree);
            let target = tonic_pc + MAJOR_STEPS[degree];
            // Distance from the natural letter, folded into -6..=5.
            let diff = (target - letter.semitone() + 6).rem_euclid(12) - 6;
            let mark = if diff > 0 { Accidental::Sharp } else { Accidental::Flat };
            Note {
                letter,
                accidentals: vec![mark; diff.unsigned_abs() as usize],
            }
        })
    }

    /// The diatonic triads I, ii, iii, IV, V, vi, vii° of this key.
    pub fn diatonic_chords(self) -> [Chord; 7] {
        const QUALITIES: [Option<QualityToken>; 7] = [
            None,
            Some(QualityToken::Minor),
            Some(QualityToken::Minor),
            None,
            None,
            Some(QualityToken::Minor),
            Some(QualityToken::Dim),
        ];

        let scale = self.scale();
        std::array::from_fn(|degree| {
            let mut chord = Chord::major(scale[degree].clone());
            chord.tokens.extend(QUALITIES[degree]);
            chord.source = chord.render();
            chord
        })
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for KeySignature {
    type Err = ChordError;

    /// Parse a major key name like "G", "Bb" or "F#".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fifths = match s.trim() {
            "C" => 0,
            "G" => 1,
            "D" => 2,
            "A" => 3,
            "E" => 4,
            "B" => 5,
            "F#" => 6,
            "C#" => 7,
            "F" => -1,
            "Bb" => -2,
            "Eb" => -3,
            "Ab" => -4,
            "Db" => -5,
            "Gb" => -6,
            "Cb" => -7,
            _ => return Err(ChordError::InvalidKeySignature(s.to_string())),
        };
        Ok(Self { fifths })
    }
}

impl TryFrom<String> for KeySignature {
    type Error = ChordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for KeySignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> KeySignature {
        name.parse().unwrap()
    }

    #[test]
    fn test_parse_and_name_round_trip() {
        for name in [
            "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
        ] {
            assert_eq!(key(name).name(), name);
        }
    }

    #[test]
    fn test_invalid_key_names() {
        assert_eq!(
            "H".parse::<KeySignature>(),
            Err(ChordError::InvalidKeySignature("H".to_string()))
        );
        assert!("D#".parse::<KeySignature>().is_err());
        assert!("Am".parse::<KeySignature>().is_err());
        assert!("".parse::<KeySignature>().is_err());
    }

    #[test]
    fn test_flat_preference_table() {
        for name in ["F", "Bb", "Eb", "Ab", "Db", "Gb", "Cb"] {
            assert!(key(name).prefers_flats(), "{} should prefer flats", name);
        }
        for name in ["C", "G", "D", "A", "E", "B", "F#", "C#"] {
            assert!(!key(name).prefers_flats(), "{} should prefer sharps", name);
        }
    }

    #[test]
    fn test_tonic_pitch_classes() {
        assert_eq!(key("C").pitch_class().value(), 0);
        assert_eq!(key("G").pitch_class().value(), 7);
        assert_eq!(key("F").pitch_class().value(), 5);
        assert_eq!(key("Bb").pitch_class().value(), 10);
        assert_eq!(key("Cb").pitch_class().value(), 11);
        assert_eq!(key("C#").pitch_class().value(), 1);
        assert_eq!(key("Db").tonic().to_string(), "Db");
        assert_eq!(key("F#").tonic().to_string(), "F#");
    }

    #[test]
    fn test_canonical_keys_cover_all_pitch_classes() {
        let mut seen: Vec<u8> = CANONICAL_KEYS.iter().map(|k| k.pitch_class().value()).collect();
        seen.sort();
        assert_eq!(seen, (0..12).collect::<Vec<u8>>());
    }

    #[test]
    fn test_semitones_between_keys() {
        assert_eq!(key("C").semitones_to(key("D")), 2);
        assert_eq!(key("D").semitones_to(key("C")), 10);
        assert_eq!(key("G").semitones_to(key("Eb")), 8);
        assert_eq!(key("F#").semitones_to(key("Gb")), 0);
    }

    #[test]
    fn test_transposed_key() {
        assert_eq!(key("C").transposed(2, false), key("D"));
        assert_eq!(key("C").transposed(1, true), key("Db"));
        assert_eq!(key("C").transposed(1, false), key("C#"));
        assert_eq!(key("A").transposed(-3, false), key("F#"));
        assert_eq!(key("E").transposed(7, true), key("B"));
    }

    #[test]
    fn test_scales() {
        let names = |k: &str| key(k).scale().iter().map(|n| n.to_string()).collect::<Vec<_>>();
        assert_eq!(names("C"), vec!["C", "D", "E", "F", "G", "A", "B"]);
        assert_eq!(names("D"), vec!["D", "E", "F#", "G", "A", "B", "C#"]);
        assert_eq!(names("Bb"), vec!["Bb", "C", "D", "Eb", "F", "G", "A"]);
        assert_eq!(names("Gb"), vec!["Gb", "Ab", "Bb", "Cb", "Db", "Eb", "F"]);
        assert_eq!(names("F#"), vec!["F#", "G#", "A#", "B", "C#", "D#", "E#"]);
    }

    #[test]
    fn test_diatonic_chords() {
        let chords: Vec<String> = key("G").diatonic_chords().iter().map(|c| c.render()).collect();
        assert_eq!(chords, vec!["G", "Am", "Bm", "C", "D", "Em", "F#dim"]);

        let chords: Vec<String> = key("Ab").diatonic_chords().iter().map(|c| c.render()).collect();
        assert_eq!(chords, vec!["Ab", "Bbm", "Cm", "Db", "Eb", "Fm", "Gdim"]);
    }

    #[test]
    fn test_serde_uses_key_name() {
        let k: KeySignature = serde_yaml::from_str("Eb").unwrap();
        assert_eq!(k, key("Eb"));
        assert_eq!(serde_json::to_string(&key("F#")).unwrap(), "\"F#\"");
        assert!(serde_yaml::from_str::<KeySignature>("X").is_err());
    }
}
