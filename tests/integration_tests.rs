//! Integration tests for the chord engine
//!
//! Tests the public API end to end: parsing, scanning lyrics, transposition,
//! key detection and song sheets.

use chordkeeper::{
    chord_sections, detect_key, extract_chord_tokens, import_chord_sheet, parse_chord,
    transpose_chord, transpose_sections, transpose_sheet, transpose_text, ChordError,
    KeySignature, Quality, SongSheet,
};

fn key(name: &str) -> KeySignature {
    name.parse().unwrap()
}

#[test]
fn test_canonical_chords_round_trip() {
    let chords = [
        "Cm7", "G/B", "F#dim7", "Bbmaj7", "Dsus4", "E7#9", "Am7b5", "Cadd9/E", "G13", "C7(add13)",
        "C7(b9/#11)",
    ];
    for text in chords {
        let chord = parse_chord(text).unwrap();
        assert_eq!(chord.render(), text, "{} should re-render unchanged", text);
        assert_eq!(parse_chord(&chord.render()).unwrap(), chord);
    }
}

#[test]
fn test_single_chord_errors_reach_the_caller() {
    assert_eq!(
        parse_chord("Verse 1"),
        Err(ChordError::InvalidChord("Verse 1".to_string()))
    );
    assert!(matches!(
        "X".parse::<KeySignature>(),
        Err(ChordError::InvalidKeySignature(_))
    ));
}

#[test]
fn test_slash_chord_scenario() {
    let chord = parse_chord("D/F#").unwrap();
    assert_eq!(chord.root.to_string(), "D");
    assert_eq!(chord.quality(), Quality::Major);
    assert_eq!(chord.bass.as_ref().unwrap().to_string(), "F#");
    assert!(chord.is_slash_chord());

    let up = transpose_chord(&chord, 2, Some(key("D")), key("D"));
    assert_eq!(up.render(), "E/G#");
}

#[test]
fn test_enharmonic_spelling_by_key() {
    let c = parse_chord("C").unwrap();
    assert_eq!(transpose_chord(&c, 1, Some(key("F")), KeySignature::C).root.to_string(), "Db");
    assert_eq!(transpose_chord(&c, 1, Some(key("G")), KeySignature::C).root.to_string(), "C#");
}

#[test]
fn test_fail_open_scanning() {
    let text = "[Verse 1]\n[C]Hello [G]world";
    let tokens: Vec<_> = extract_chord_tokens(text).collect();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].chord.to_string(), "C");
    assert_eq!(tokens[0].offset, 10);
    assert_eq!(tokens[1].chord.to_string(), "G");
    assert_eq!(tokens[1].offset, 19);
}

#[test]
fn test_zero_transposition_is_identity() {
    let text = "[Intro]\n[Ebmaj7] [Gm7/D]\n\n[Verse]\n[Cm]Words and [Ab]more [Bb7sus4]words\n";
    assert_eq!(transpose_text(text, 0, None, key("Eb")), text);
    assert_eq!(transpose_text(text, 0, Some(key("Eb")), key("Eb")), text);
}

#[test]
fn test_round_trip_transposition_restores_lyrics() {
    let text = "[Chorus]\n[G]Shine [D/F#]on, [Em7]shine [Cadd9]on\n";
    let down = transpose_text(text, -5, Some(key("D")), key("G"));
    assert_eq!(down, "[Chorus]\n[D]Shine [A/C#]on, [Bm7]shine [Gadd9]on\n");
    let back = transpose_text(&down, 5, Some(key("G")), key("D"));
    assert_eq!(back, text);
}

#[test]
fn test_key_detection_scenario() {
    let lyrics = "[C]When I find myself in [G]times of trouble\n[Am]Mother Mary [F]comes to me\n"
        .repeat(3);
    assert_eq!(detect_key(&lyrics), KeySignature::C);
    assert_eq!(detect_key("no chords at all"), KeySignature::C);
}

#[test]
fn test_chord_list_follows_lyrics() {
    let lyrics = "[G]one [C]two\n\n[D]three";
    let sections = chord_sections(lyrics);
    let moved = transpose_sections(&sections, 2, None, key("G"));
    let relisted = chord_sections(&transpose_text(lyrics, 2, None, key("G")));

    let names = |s: &[chordkeeper::ChordSection]| -> Vec<String> {
        s.iter().flat_map(|s| s.chords.iter().map(|c| c.chord.clone())).collect()
    };
    assert_eq!(names(&moved), vec!["A", "D", "E"]);
    assert_eq!(names(&moved), names(&relisted));
}

#[test]
fn test_transpose_sheet_source() {
    let source = r#"---
title: Test Song
key: F
---
[F]Hello [Bb]there [C7]friend
"#;
    let result = transpose_sheet(source, 2, None).unwrap();
    let sheet = SongSheet::parse(&result).unwrap();
    assert_eq!(sheet.metadata.title.as_deref(), Some("Test Song"));
    assert_eq!(sheet.metadata.key, Some(key("G")));
    assert_eq!(sheet.lyrics, "[G]Hello [C]there [D7]friend\n");

    let result = transpose_sheet(source, 1, None).unwrap();
    let sheet = SongSheet::parse(&result).unwrap();
    assert_eq!(sheet.metadata.key, Some(key("Gb")));
    assert_eq!(sheet.lyrics, "[Gb]Hello [B]there [Db7]friend\n");
}

#[test]
fn test_invalid_sheet_key_is_reported() {
    let result = transpose_sheet("---\nkey: Q\n---\n[C]hi", 2, None);
    assert_eq!(result, Err(ChordError::InvalidKeySignature("Q".to_string())));
}

#[test]
fn test_import_then_transpose() {
    let sheet = "[Verse]\nD         G       D\nSwing low, sweet chariot\n";
    let song = import_chord_sheet(sheet);
    assert_eq!(song.lyrics, "[Verse]\n[D]Swing low,[G] sweet c[D]hariot\n");
    assert_eq!(song.sections.len(), 1);

    let up = transpose_text(&song.lyrics, 3, Some(key("F")), song.key);
    assert_eq!(up, "[Verse]\n[F]Swing low,[Bb] sweet c[F]hariot\n");
}
