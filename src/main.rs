//! chordkeeper CLI entry point

use chordkeeper::{
    chord_sections, extract_chord_tokens, import_chord_sheet, parse_chord, rank_keys, KeySignature,
    SongMetadata, SongSheet,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// chordkeeper - chord parsing, transposition and key detection for song sheets
#[derive(Parser, Debug)]
#[command(name = "chordkeeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, default_value = "false", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the structure of one or more chord symbols
    Parse {
        /// Chord symbols, e.g. Cm7 G/B F#dim7
        #[arg(required = true)]
        chords: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Transpose the chords of a song sheet
    Transpose {
        /// Song sheet to transpose
        file: PathBuf,

        /// Semitones to move (negative = down)
        #[arg(short, long, allow_negative_numbers = true)]
        semitones: Option<i32>,

        /// Key to spell for; without --semitones, transpose into this key
        #[arg(long, value_name = "KEY")]
        to: Option<KeySignature>,

        /// Write the result here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Detect the key of a song sheet
    DetectKey {
        /// Song sheet to analyze
        file: PathBuf,

        /// Show the score of every candidate key
        #[arg(long)]
        all: bool,
    },

    /// List the chords of a song sheet
    Chords {
        /// Song sheet to scan
        file: PathBuf,

        /// Print the chord list grouped by section as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a chords-over-lyrics text sheet into a song sheet
    Import {
        /// Plain-text chord sheet
        file: PathBuf,

        /// Write the song sheet here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = if cli.quiet { "error" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Parse { chords, json } => parse_chords(&chords, json),
        Command::Transpose {
            file,
            semitones,
            to,
            output,
        } => {
            let sheet = read_sheet(&file)?;
            let transposed = match (semitones, to) {
                (None, Some(key)) => sheet.transpose_to(key),
                (semitones, to) => sheet.transpose(semitones.unwrap_or(0), to),
            };
            info!(key = %transposed.key(), "transposed {}", file.display());
            let source = transposed.to_source().map_err(|e| e.to_string())?;
            write_output(output.as_deref(), &source)
        }
        Command::DetectKey { file, all } => {
            let sheet = read_sheet(&file)?;
            if all {
                for score in rank_keys(&sheet.lyrics) {
                    println!("{:<3} {}", score.key, score.score);
                }
            } else {
                println!("{}", sheet.key());
            }
            Ok(())
        }
        Command::Chords { file, json } => {
            let sheet = read_sheet(&file)?;
            if json {
                let sections = chord_sections(&sheet.lyrics);
                let text = serde_json::to_string_pretty(&sections).map_err(|e| e.to_string())?;
                println!("{}", text);
            } else {
                for token in extract_chord_tokens(&sheet.lyrics) {
                    println!("{:>6}  {}", token.offset, token.chord);
                }
            }
            Ok(())
        }
        Command::Import { file, output } => {
            let text = read_file(&file)?;
            let song = import_chord_sheet(&text);
            info!(key = %song.key, sections = song.sections.len(), "imported {}", file.display());
            let sheet = SongSheet {
                metadata: SongMetadata {
                    key: Some(song.key),
                    ..Default::default()
                },
                lyrics: song.lyrics,
            };
            let source = sheet.to_source().map_err(|e| e.to_string())?;
            write_output(output.as_deref(), &source)
        }
    }
}

fn parse_chords(chords: &[String], json: bool) -> Result<(), String> {
    let mut failed = 0;
    for text in chords {
        match parse_chord(text) {
            Ok(chord) if json => {
                let out = serde_json::to_string(&chord).map_err(|e| e.to_string())?;
                println!("{}", out);
            }
            Ok(chord) => {
                let tokens: Vec<&str> = chord.tokens.iter().map(|t| t.as_str()).collect();
                println!(
                    "{}: root {}, quality {:?}, tokens [{}]{}{}",
                    text,
                    chord.root,
                    chord.quality(),
                    tokens.join(" "),
                    chord.group.as_deref().map(|g| format!(", group {}", g)).unwrap_or_default(),
                    chord.bass.as_ref().map(|b| format!(", bass {}", b)).unwrap_or_default(),
                );
            }
            Err(e) => {
                eprintln!("{}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} chords could not be parsed", failed, chords.len()));
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Error reading file '{}': {}", path.display(), e))
}

fn read_sheet(path: &Path) -> Result<SongSheet, String> {
    let source = read_file(path)?;
    SongSheet::parse(&source).map_err(|e| format!("{}: {}", path.display(), e))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), String> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .map_err(|e| format!("Error writing to '{}': {}", path.display(), e))?;
            eprintln!("Wrote song sheet to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
