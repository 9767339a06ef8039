//! # Error Types
//!
//! This module defines all error types for the chord engine.
//!
//! ## Error Types
//! - `InvalidNote` - Note text with a letter outside A-G or stray characters
//! - `InvalidChord` - Text that matches neither the chord-body nor the slash-chord grammar
//! - `InvalidKeySignature` - Key name that is not one of the supported major keys
//! - `MetadataError` - Invalid YAML frontmatter in a song sheet
//!
//! Scanning lyrics never produces an error: bracketed text that is not a chord
//! (`[Verse 1]`, `[Chorus]`) is treated as ordinary text. Only the single-item
//! entry points (`parse_chord`, `parse_note`, `KeySignature::from_str`) report
//! errors to their caller.
//!
//! ## Usage
//! ```rust
//! use chordkeeper::{parse_chord, ChordError};
//!
//! match parse_chord("Hmaj7") {
//!     Ok(chord) => println!("root is {}", chord.root),
//!     Err(ChordError::InvalidChord(text)) => eprintln!("not a chord: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordError {
    /// Note text is not a letter A-G followed by `#`/`b` marks.
    ///
    /// # Example
    /// ```
    /// # use chordkeeper::ChordError;
    /// let err = ChordError::InvalidNote("H".to_string());
    /// assert_eq!(err.to_string(), "Invalid note: H");
    /// ```
    #[error("Invalid note: {0}")]
    InvalidNote(String),

    /// Chord text is not recognized by the chord grammar.
    ///
    /// # Example
    /// ```
    /// # use chordkeeper::ChordError;
    /// let err = ChordError::InvalidChord("Verse 1".to_string());
    /// assert_eq!(err.to_string(), "Invalid chord: Verse 1");
    /// ```
    #[error("Invalid chord: {0}")]
    InvalidChord(String),

    /// Key name is not a supported major key.
    #[error("Invalid key signature: {0}")]
    InvalidKeySignature(String),

    /// Invalid song sheet frontmatter.
    ///
    /// Occurs when the YAML between the `---` markers cannot be read.
    #[error("Invalid metadata: {0}")]
    MetadataError(String),
}
