pub mod chord;
pub mod detect;
pub mod error;
pub mod import;
pub mod key;
pub mod lyrics;
pub mod parser;
pub mod pitch;
pub mod sheet;
pub mod transpose;

pub use chord::{Chord, Quality, QualityToken};
pub use detect::{detect_key, distinct_roots, rank_keys, KeyScore};
pub use error::*;
pub use import::{import_chord_sheet, ImportedSong};
pub use key::{KeySignature, CANONICAL_KEYS};
pub use lyrics::{
    chord_sections, extract_chord_tokens, ChordEntry, ChordSection, ChordToken, ChordTokens,
};
pub use parser::{parse_chord, parse_note};
pub use pitch::{
    note_to_pitch_class, pitch_class_of, pitch_class_to_note, Accidental, Letter, Note, PitchClass,
};
pub use sheet::{SongMetadata, SongSheet};
pub use transpose::{
    transpose_chord, transpose_note, transpose_sections, transpose_text, transpose_to_key,
};

/// Transpose the chords of a song sheet source by `semitones`.
/// This is the main entry point for the library.
///
/// The sheet's declared key (or its detected key) is the current spelling
/// context; `target_key` overrides it and becomes the new `key` field.
pub fn transpose_sheet(
    source: &str,
    semitones: i32,
    target_key: Option<KeySignature>,
) -> Result<String, ChordError> {
    SongSheet::parse(source)?
        .transpose(semitones, target_key)
        .to_source()
}
