//! # Pitch Model
//!
//! Closed 12-tone pitch classes and letter/accidental note spelling.
//!
//! A [`Note`] always maps to exactly one [`PitchClass`], but a pitch class has
//! several spellings (`C#` and `Db` are both pitch class 1). The reverse
//! mapping [`Note::from_pitch_class`] therefore needs a sharp/flat preference
//! and always returns one of the 12 conventional names, never a double
//! accidental:
//!
//! ```text
//! 0=C  1=C#/Db  2=D  3=D#/Eb  4=E  5=F  6=F#/Gb  7=G  8=G#/Ab  9=A  10=A#/Bb  11=B
//! ```

use crate::error::ChordError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Position on the chromatic circle, always in `0..12` and starting at C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Build a pitch class from any integer, reducing it mod 12.
    pub fn new(value: i32) -> Self {
        PitchClass(value.rem_euclid(12) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Shift by a semitone offset (positive = up, negative = down).
    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones)
    }

    /// Upward distance in semitones from `self` to `other`, in `0..12`.
    pub fn semitones_to(self, other: PitchClass) -> u8 {
        (other.0 as i32 - self.0 as i32).rem_euclid(12) as u8
    }
}

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Letter {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// The letter `steps` positions further along C D E F G A B, wrapping at B.
    pub fn offset_by(self, steps: usize) -> Letter {
        const ORDER: [Letter; 7] = [
            Letter::C,
            Letter::D,
            Letter::E,
            Letter::F,
            Letter::G,
            Letter::A,
            Letter::B,
        ];
        let index = ORDER.iter().position(|l| *l == self).unwrap_or(0);
        ORDER[(index + steps) % 7]
    }

    /// Semitone offset of the natural letter from C
    pub(crate) fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }
}

/// A single accidental mark. Marks are cumulative: `C##` is two semitones above C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Sharp, // #
    Flat,  // b
}

impl Accidental {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Accidental::Sharp),
            'b' => Some(Accidental::Flat),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Accidental::Sharp => '#',
            Accidental::Flat => 'b',
        }
    }

    fn offset(self) -> i32 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// A spelled note: letter plus zero or more accidental marks, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Note {
    pub letter: Letter,
    pub accidentals: Vec<Accidental>,
}

impl Note {
    pub fn natural(letter: Letter) -> Self {
        Self {
            letter,
            accidentals: Vec::new(),
        }
    }

    pub fn sharp(letter: Letter) -> Self {
        Self {
            letter,
            accidentals: vec![Accidental::Sharp],
        }
    }

    pub fn flat(letter: Letter) -> Self {
        Self {
            letter,
            accidentals: vec![Accidental::Flat],
        }
    }

    pub fn pitch_class(&self) -> PitchClass {
        let offset: i32 = self.accidentals.iter().map(|a| a.offset()).sum();
        PitchClass::new(self.letter.semitone() + offset)
    }

    /// Canonical spelling of a pitch class.
    ///
    /// `prefer_flats` picks `Db Eb Gb Ab Bb` over `C# D# F# G# A#` for the five
    /// black keys; the seven naturals are spelled the same either way.
    pub fn from_pitch_class(pc: PitchClass, prefer_flats: bool) -> Self {
        match pc.value() {
            0 => Note::natural(Letter::C),
            1 => if prefer_flats { Note::flat(Letter::D) } else { Note::sharp(Letter::C) },
            2 => Note::natural(Letter::D),
            3 => if prefer_flats { Note::flat(Letter::E) } else { Note::sharp(Letter::D) },
            4 => Note::natural(Letter::E),
            5 => Note::natural(Letter::F),
            6 => if prefer_flats { Note::flat(Letter::G) } else { Note::sharp(Letter::F) },
            7 => Note::natural(Letter::G),
            8 => if prefer_flats { Note::flat(Letter::A) } else { Note::sharp(Letter::G) },
            9 => Note::natural(Letter::A),
            10 => if prefer_flats { Note::flat(Letter::B) } else { Note::sharp(Letter::A) },
            _ => Note::natural(Letter::B),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        for accidental in &self.accidentals {
            write!(f, "{}", accidental.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Note {
    type Err = ChordError;

    /// Parse a bare note such as `C`, `F#`, `Bb` or `Ebb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| ChordError::InvalidNote(s.to_string()))?;

        let accidentals = chars
            .map(Accidental::from_char)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ChordError::InvalidNote(s.to_string()))?;

        Ok(Note {
            letter,
            accidentals,
        })
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pitch class of a note.
pub fn note_to_pitch_class(note: &Note) -> PitchClass {
    note.pitch_class()
}

/// Canonical spelling of a pitch class (see [`Note::from_pitch_class`]).
pub fn pitch_class_to_note(pc: PitchClass, prefer_flats: bool) -> Note {
    Note::from_pitch_class(pc, prefer_flats)
}

/// Parse note text and return its pitch class.
///
/// # Errors
/// Returns [`ChordError::InvalidNote`] if the letter is outside A-G or the
/// text contains anything other than `#`/`b` after the letter.
pub fn pitch_class_of(text: &str) -> Result<PitchClass, ChordError> {
    Ok(text.parse::<Note>()?.pitch_class())
}
