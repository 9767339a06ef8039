//! # Chord Types
//!
//! Structural representation of a chord symbol.
//!
//! ## Type Hierarchy
//! ```text
//! Chord
//!   ├── root: Note            (letter + accidentals)
//!   ├── tokens: Vec<QualityToken>   (maj7, m, sus4, b9, ... in source order)
//!   ├── group: Option<String>       (trailing "(add13)", kept verbatim)
//!   ├── bass: Option<Note>          (slash chords only)
//!   └── source: String              (text the chord was parsed from)
//! ```
//!
//! Rendering concatenates the parts back in the same order:
//! `root + tokens + group [+ "/" + bass]`, so a parsed chord re-renders to the
//! text it came from (`Cm7`, `G/B`, `F#dim7`, `C7(b9)`).

use crate::pitch::Note;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// One entry of the closed quality/extension vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityToken {
    Maj7,       // maj7
    Min7,       // min7
    ShortMin7,  // m7
    Dim7,       // dim7
    Aug7,       // aug7
    Sus2,       // sus2
    Sus4,       // sus4
    Sus,        // sus
    Add9,       // add9
    Add2,       // add2
    Power,      // 5
    Sixth,      // 6
    Seventh,    // 7
    Ninth,      // 9
    Eleventh,   // 11
    Thirteenth, // 13
    ShortMaj7,  // M7
    ShortMaj9,  // M9
    DimSign,    // °
    HalfDim,    // ø
    Delta,      // Δ
    Plus,       // +
    Minus,      // -
    Alt,        // alt
    Sharp5,     // #5
    Flat5,      // b5
    Sharp9,     // #9
    Flat9,      // b9
    Sharp11,    // #11
    Flat13,     // b13
    Minor,      // m
    Min,        // min
    Maj,        // maj
    Dim,        // dim
    Aug,        // aug
}

impl QualityToken {
    /// Every token, longest spelling first so that greedy matching prefers
    /// `maj7` over `maj` and `m7` over `m`.
    pub const VOCABULARY: [QualityToken; 35] = [
        QualityToken::Maj7,
        QualityToken::Min7,
        QualityToken::Dim7,
        QualityToken::Aug7,
        QualityToken::Sus2,
        QualityToken::Sus4,
        QualityToken::Add9,
        QualityToken::Add2,
        QualityToken::Sus,
        QualityToken::Alt,
        QualityToken::Min,
        QualityToken::Maj,
        QualityToken::Dim,
        QualityToken::Aug,
        QualityToken::Sharp11,
        QualityToken::Flat13,
        QualityToken::ShortMin7,
        QualityToken::ShortMaj7,
        QualityToken::ShortMaj9,
        QualityToken::Sharp5,
        QualityToken::Flat5,
        QualityToken::Sharp9,
        QualityToken::Flat9,
        QualityToken::Eleventh,
        QualityToken::Thirteenth,
        QualityToken::Minor,
        QualityToken::Power,
        QualityToken::Sixth,
        QualityToken::Seventh,
        QualityToken::Ninth,
        QualityToken::DimSign,
        QualityToken::HalfDim,
        QualityToken::Delta,
        QualityToken::Plus,
        QualityToken::Minus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QualityToken::Maj7 => "maj7",
            QualityToken::Min7 => "min7",
            QualityToken::ShortMin7 => "m7",
            QualityToken::Dim7 => "dim7",
            QualityToken::Aug7 => "aug7",
            QualityToken::Sus2 => "sus2",
            QualityToken::Sus4 => "sus4",
            QualityToken::Sus => "sus",
            QualityToken::Add9 => "add9",
            QualityToken::Add2 => "add2",
            QualityToken::Power => "5",
            QualityToken::Sixth => "6",
            QualityToken::Seventh => "7",
            QualityToken::Ninth => "9",
            QualityToken::Eleventh => "11",
            QualityToken::Thirteenth => "13",
            QualityToken::ShortMaj7 => "M7",
            QualityToken::ShortMaj9 => "M9",
            QualityToken::DimSign => "°",
            QualityToken::HalfDim => "ø",
            QualityToken::Delta => "Δ",
            QualityToken::Plus => "+",
            QualityToken::Minus => "-",
            QualityToken::Alt => "alt",
            QualityToken::Sharp5 => "#5",
            QualityToken::Flat5 => "b5",
            QualityToken::Sharp9 => "#9",
            QualityToken::Flat9 => "b9",
            QualityToken::Sharp11 => "#11",
            QualityToken::Flat13 => "b13",
            QualityToken::Minor => "m",
            QualityToken::Min => "min",
            QualityToken::Maj => "maj",
            QualityToken::Dim => "dim",
            QualityToken::Aug => "aug",
        }
    }

    /// The chord quality this token names, or `None` for pure alterations
    /// (`#5`, `b9`, ...), which only extend whatever quality precedes them.
    pub fn quality(self) -> Option<Quality> {
        let quality = match self {
            QualityToken::Maj7 | QualityToken::ShortMaj7 | QualityToken::Delta => Quality::Major7,
            QualityToken::ShortMaj9 => Quality::Major9,
            QualityToken::Min7 | QualityToken::ShortMin7 => Quality::Minor7,
            QualityToken::Dim7 => Quality::Diminished7,
            QualityToken::Aug7 => Quality::Augmented7,
            QualityToken::Sus2 => Quality::Sus2,
            QualityToken::Sus4 | QualityToken::Sus => Quality::Sus4,
            QualityToken::Add9 => Quality::Add9,
            QualityToken::Add2 => Quality::Add2,
            QualityToken::Power => Quality::Power,
            QualityToken::Sixth => Quality::Sixth,
            QualityToken::Seventh => Quality::Dominant7,
            QualityToken::Ninth => Quality::Ninth,
            QualityToken::Eleventh => Quality::Eleventh,
            QualityToken::Thirteenth => Quality::Thirteenth,
            QualityToken::DimSign | QualityToken::Dim => Quality::Diminished,
            QualityToken::HalfDim => Quality::HalfDiminished,
            QualityToken::Plus | QualityToken::Aug => Quality::Augmented,
            QualityToken::Minus | QualityToken::Minor | QualityToken::Min => Quality::Minor,
            QualityToken::Maj => Quality::Major,
            QualityToken::Alt => Quality::Altered,
            QualityToken::Sharp5
            | QualityToken::Flat5
            | QualityToken::Sharp9
            | QualityToken::Flat9
            | QualityToken::Sharp11
            | QualityToken::Flat13 => return None,
        };
        Some(quality)
    }
}

impl fmt::Display for QualityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QualityToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Overall chord quality, named by the first quality-bearing token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quality {
    #[default]
    Major,
    Minor,
    Diminished,
    HalfDiminished,
    Augmented,
    Sus2,
    Sus4,
    Power,
    Major7,
    Major9,
    Minor7,
    Diminished7,
    Augmented7,
    Add9,
    Add2,
    Sixth,
    Dominant7,
    Ninth,
    Eleventh,
    Thirteenth,
    Altered,
}

/// A parsed chord symbol.
///
/// Equality is structural and ignores `source`: a chord that has been
/// transposed away and back compares equal to the original.
#[derive(Debug, Clone, Default)]
pub struct Chord {
    pub root: Note,
    pub tokens: Vec<QualityToken>,
    pub group: Option<String>,
    pub bass: Option<Note>,
    pub source: String,
}

impl Chord {
    /// A plain major triad on `root`.
    pub fn major(root: Note) -> Self {
        let source = root.to_string();
        Self {
            root,
            source,
            ..Default::default()
        }
    }

    /// Quality of the chord; `Major` when no quality token is present.
    pub fn quality(&self) -> Quality {
        self.tokens
            .iter()
            .find_map(|t| t.quality())
            .unwrap_or(Quality::Major)
    }

    /// Tokens that follow the quality-bearing one (all tokens if none names a quality).
    pub fn extensions(&self) -> &[QualityToken] {
        match self.tokens.iter().position(|t| t.quality().is_some()) {
            Some(i) => &self.tokens[i + 1..],
            None => &self.tokens,
        }
    }

    pub fn is_slash_chord(&self) -> bool {
        self.bass.is_some()
    }

    /// Everything between the root and the bass, e.g. `m7(b5)` for `Dm7(b5)/Ab`.
    pub fn suffix(&self) -> String {
        let mut suffix: String = self.tokens.iter().map(|t| t.as_str()).collect();
        if let Some(group) = &self.group {
            suffix.push_str(group);
        }
        suffix
    }

    /// Render the chord symbol: `root + quality + extensions [+ "/" + bass]`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.tokens == other.tokens
            && self.group == other.group
            && self.bass == other.bass
    }
}

impl Eq for Chord {}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.suffix())?;
        if let Some(bass) = &self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Chord", 7)?;
        state.serialize_field("root", &self.root)?;
        state.serialize_field("quality", &self.quality())?;
        state.serialize_field("tokens", &self.tokens)?;
        state.serialize_field("group", &self.group)?;
        state.serialize_field("bass", &self.bass)?;
        state.serialize_field("isSlashChord", &self.is_slash_chord())?;
        state.serialize_field("source", &self.source)?;
        state.end()
    }
}
