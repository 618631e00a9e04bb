use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::info;

use tromba::drill::{Drill, DrillEvent};
use tromba::native::{load_shared_wav, CpalOutput};
use tromba::playback::{AudioOutput, RecordingOutput};
use tromba::{DrillConfig, Fingering, LabelStyle, Note, NoteSelector, Preset, SampleBank, TrombaError};

#[derive(Parser)]
#[command(name = "tromba", version, about = "Trumpet note flashcards with fingerings and sound")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an interactive drill: press Enter to reveal, Enter again for the next note
    Drill {
        /// trumpet, student or chromatic
        #[arg(long, default_value = "trumpet")]
        preset: String,
        /// YAML drill file (overrides the preset)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Lowest written pitch for random notes
        #[arg(long)]
        lowest: Option<i32>,
        /// Highest written pitch for random notes
        #[arg(long)]
        highest: Option<i32>,
        /// Directory with the sample files
        #[arg(long)]
        samples: Option<PathBuf>,
        /// Do not open an audio device
        #[arg(long)]
        mute: bool,
    },
    /// Print a resolved note as JSON
    Note {
        pitch: i32,
        /// Use the flat spelling
        #[arg(long)]
        flat: bool,
        /// german or solfege
        #[arg(long, default_value = "german")]
        style: String,
    },
    /// Print the sample and detune used for a sounding pitch
    Samples { pitch: i32 },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Drill { preset, config, lowest, highest, samples, mute } => {
            load_config(&preset, config, lowest, highest, samples).and_then(|config| run_drill(&config, mute))
        }
        Command::Note { pitch, flat, style } => print_note(pitch, !flat, &style),
        Command::Samples { pitch } => tromba::resolve_sample(pitch).and_then(|selection| print_json(&selection)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(
    preset: &str,
    path: Option<PathBuf>,
    lowest: Option<i32>,
    highest: Option<i32>,
    samples: Option<PathBuf>,
) -> Result<DrillConfig, TrombaError> {
    let mut config = match path {
        Some(path) => DrillConfig::load(&path)?,
        None => {
            let preset = Preset::from_str(preset)
                .ok_or_else(|| TrombaError::Config(format!("unknown preset '{}'", preset)))?;
            DrillConfig::preset(preset)
        }
    };
    if let Some(directory) = samples {
        config.samples.directory = directory;
    }
    config.with_range_override(lowest, highest)
}

fn print_note(pitch: i32, sharp: bool, style: &str) -> Result<(), TrombaError> {
    let style = LabelStyle::from_str(style)
        .ok_or_else(|| TrombaError::Config(format!("unknown label style '{}'", style)))?;
    let note = tromba::resolve_note_with(pitch, sharp, style);
    print_json(&note)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), TrombaError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| TrombaError::Config(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn run_drill(config: &DrillConfig, mute: bool) -> Result<(), TrombaError> {
    let layout = config.samples.layout()?;
    let files = config.samples.file_names()?;

    if mute {
        let bank = SampleBank::new(layout, files)?;
        let drill = Drill::from_config(config, RecordingOutput::new(), bank)?;
        return interact(drill);
    }

    let bank = SampleBank::load(layout, &config.samples.directory, &files, load_shared_wav)?;
    let output = CpalOutput::open_default()?;
    info!("audio output at {} Hz", output.sample_rate());
    let drill = Drill::from_config(config, output, bank)?;
    interact(drill)
}

fn interact<S: NoteSelector, O: AudioOutput>(mut drill: Drill<S, O>) -> Result<(), TrombaError> {
    println!("(press Enter to continue, q to quit)");
    show_prompt(&drill.start());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        match drill.trigger()? {
            DrillEvent::Prompt(note) => show_prompt(&note),
            DrillEvent::Answer { note, voice } => {
                show_answer(&note);
                if voice.is_none() {
                    println!("  (no sound for this note)");
                }
            }
        }
        io::stdout().flush()?;
    }
    Ok(())
}

fn show_prompt(note: &Note) {
    println!();
    println!("♪ {}", note.score_token("1"));
}

fn show_answer(note: &Note) {
    let valves = match note.fingering {
        Fingering::Valves(v) => v.iter().map(|down| if *down { "●" } else { "○" }).collect::<Vec<_>>().join(" "),
        Fingering::Unplayable => "– – –".to_string(),
    };
    println!("  {}   {}", note.label, valves);
}
