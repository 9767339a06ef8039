//! # Song Sheets
//!
//! A song sheet is lyrics with inline chords, optionally preceded by a YAML
//! frontmatter block:
//!
//! ```text
//! ---
//! title: Amazing Grace
//! artist: Traditional
//! key: G
//! tempo: 90
//! ---
//! [G]Amazing [C]grace, how [G]sweet the sound
//! ```
//!
//! The frontmatter must start on the first line. Everything after the closing
//! `---` is the lyrics, kept byte for byte. All fields are optional; a sheet
//! without a `key` uses the key detected from its chords.

use crate::detect::detect_key;
use crate::error::ChordError;
use crate::key::KeySignature;
use crate::lyrics::{chord_sections, ChordSection};
use crate::transpose::transpose_text;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw frontmatter for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawMetadata {
    title: Option<String>,
    artist: Option<String>,
    key: Option<String>,
    tempo: Option<u32>,
}

/// Song sheet metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SongMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<KeySignature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SongSheet {
    pub metadata: SongMetadata,
    pub lyrics: String,
}

impl SongSheet {
    /// Parse a song sheet source.
    ///
    /// # Errors
    /// - [`ChordError::MetadataError`] if the frontmatter is not valid YAML
    /// - [`ChordError::InvalidKeySignature`] if `key` is not a major key name
    pub fn parse(source: &str) -> Result<Self, ChordError> {
        let (frontmatter, lyrics) = split_frontmatter(source);

        let metadata = match frontmatter {
            Some(content) => parse_metadata(content)?,
            None => SongMetadata::default(),
        };

        Ok(Self {
            metadata,
            lyrics: lyrics.to_string(),
        })
    }

    /// Declared key, or the key detected from the chords.
    pub fn key(&self) -> KeySignature {
        self.metadata.key.unwrap_or_else(|| detect_key(&self.lyrics))
    }

    /// Structured chord list of the lyrics
    pub fn sections(&self) -> Vec<ChordSection> {
        chord_sections(&self.lyrics)
    }

    /// Transpose the lyrics and update the key.
    ///
    /// The sheet's key is the current spelling context. The new key is
    /// `target_key` when given, otherwise the current key moved by
    /// `semitones` and spelled like it.
    pub fn transpose(&self, semitones: i32, target_key: Option<KeySignature>) -> SongSheet {
        let current = self.key();
        let new_key = target_key
            .unwrap_or_else(|| current.transposed(semitones, current.prefers_flats()));
        debug!(from = %current, to = %new_key, semitones, "transposing song sheet");

        SongSheet {
            metadata: SongMetadata {
                key: Some(new_key),
                ..self.metadata.clone()
            },
            lyrics: transpose_text(&self.lyrics, semitones, target_key, current),
        }
    }

    /// Transpose the sheet into `key`.
    pub fn transpose_to(&self, key: KeySignature) -> SongSheet {
        let semitones = self.key().semitones_to(key) as i32;
        self.transpose(semitones, Some(key))
    }

    /// Render the sheet back to source text.
    ///
    /// # Errors
    /// Returns [`ChordError::MetadataError`] if the metadata cannot be written as YAML.
    pub fn to_source(&self) -> Result<String, ChordError> {
        if self.metadata == SongMetadata::default() {
            return Ok(self.lyrics.clone());
        }
        let yaml = serde_yaml::to_string(&self.metadata)
            .map_err(|e| ChordError::MetadataError(e.to_string()))?;
        Ok(format!("---\n{}---\n{}", yaml, self.lyrics))
    }
}

/// Split a leading `---` ... `---` block from the lyrics.
fn split_frontmatter(source: &str) -> (Option<&str>, &str) {
    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, source);
    };
    if first.trim() != "---" {
        return (None, source);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim() == "---" {
            return (Some(&source[start..offset]), &source[offset + line.len()..]);
        }
        offset += line.len();
    }

    // Unclosed block: treat the whole source as lyrics.
    (None, source)
}

fn parse_metadata(content: &str) -> Result<SongMetadata, ChordError> {
    if content.trim().is_empty() {
        return Ok(SongMetadata::default());
    }

    let raw: RawMetadata =
        serde_yaml::from_str(content).map_err(|e| ChordError::MetadataError(e.to_string()))?;

    let key = raw.key.as_deref().map(str::parse::<KeySignature>).transpose()?;

    Ok(SongMetadata {
        title: raw.title,
        artist: raw.artist,
        key,
        tempo: raw.tempo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMAZING_GRACE: &str = r#"---
title: Amazing Grace
artist: Traditional
key: G
tempo: 90
---
[Verse 1]
[G]Amazing [C]grace, how [G]sweet the sound
"#;

    #[test]
    fn test_parse_with_metadata() {
        let sheet = SongSheet::parse(AMAZING_GRACE).unwrap();
        assert_eq!(sheet.metadata.title.as_deref(), Some("Amazing Grace"));
        assert_eq!(sheet.metadata.artist.as_deref(), Some("Traditional"));
        assert_eq!(sheet.metadata.key, Some("G".parse().unwrap()));
        assert_eq!(sheet.metadata.tempo, Some(90));
        assert_eq!(sheet.lyrics, "[Verse 1]\n[G]Amazing [C]grace, how [G]sweet the sound\n");
    }

    #[test]
    fn test_parse_without_metadata() {
        let source = "[D]Just [A]lyrics\n---\nnot frontmatter\n";
        let sheet = SongSheet::parse(source).unwrap();
        assert_eq!(sheet.metadata, SongMetadata::default());
        assert_eq!(sheet.lyrics, source);
    }

    #[test]
    fn test_empty_and_unclosed_frontmatter() {
        let sheet = SongSheet::parse("---\n---\n[C]hi").unwrap();
        assert_eq!(sheet.metadata, SongMetadata::default());
        assert_eq!(sheet.lyrics, "[C]hi");

        let sheet = SongSheet::parse("---\ntitle: x\n[C]hi").unwrap();
        assert_eq!(sheet.metadata, SongMetadata::default());
        assert_eq!(sheet.lyrics, "---\ntitle: x\n[C]hi");
    }

    #[test]
    fn test_invalid_metadata() {
        let result = SongSheet::parse("---\ntitle: [unclosed\n---\n");
        assert!(matches!(result, Err(ChordError::MetadataError(_))));

        let result = SongSheet::parse("---\ntempo: fast\n---\n");
        assert!(matches!(result, Err(ChordError::MetadataError(_))));

        let result = SongSheet::parse("---\nkey: H\n---\n");
        assert_eq!(result, Err(ChordError::InvalidKeySignature("H".to_string())));
    }

    #[test]
    fn test_key_falls_back_to_detection() {
        let sheet = SongSheet::parse("[Bb] [Eb] [F] [Gm]").unwrap();
        assert_eq!(sheet.key().name(), "Bb");
    }

    #[test]
    fn test_transpose_updates_key() {
        let sheet = SongSheet::parse(AMAZING_GRACE).unwrap();
        let up = sheet.transpose(2, None);
        assert_eq!(up.metadata.key.unwrap().name(), "A");
        assert_eq!(up.metadata.title, sheet.metadata.title);
        assert_eq!(up.lyrics, "[Verse 1]\n[A]Amazing [D]grace, how [A]sweet the sound\n");

        let flat = sheet.transpose_to("Ab".parse().unwrap());
        assert_eq!(flat.metadata.key.unwrap().name(), "Ab");
        assert_eq!(flat.lyrics, "[Verse 1]\n[Ab]Amazing [Db]grace, how [Ab]sweet the sound\n");
    }

    #[test]
    fn test_to_source_round_trip() {
        let sheet = SongSheet::parse(AMAZING_GRACE).unwrap();
        let source = sheet.to_source().unwrap();
        assert!(source.starts_with("---\ntitle: Amazing Grace\n"));
        assert_eq!(SongSheet::parse(&source).unwrap(), sheet);

        let bare = SongSheet::parse("[C]no metadata").unwrap();
        assert_eq!(bare.to_source().unwrap(), "[C]no metadata");
    }

    #[test]
    fn test_sections() {
        let sheet = SongSheet::parse(AMAZING_GRACE).unwrap();
        let sections = sheet.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].chords.len(), 3);
    }
}
