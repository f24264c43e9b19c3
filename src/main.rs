mod config;
mod logger;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use config::FretwiseConfig;
use fretwise_core::Transcriber;
use midi_to_tab::{MidiData, OutputFormatter, TabDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Numbered blocks of six string lines
    Text,
    /// Assignments, labels and blocks as JSON
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "tab",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fretwise")]
#[command(about = "Convert a MIDI channel to six-string guitar tablature", long_about = None)]
struct Args {
    /// Path to the MIDI file (default: uses first .mid file in current directory)
    #[arg(short, long)]
    midi: Option<PathBuf>,

    /// MIDI channel to transcribe, 0-15 (default: first guitar channel, else the lowest with notes)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..16))]
    channel: Option<u8>,

    /// Print a summary of every channel and exit
    #[arg(long)]
    list_channels: bool,

    /// Semitones applied to the lowest string only (-2 is drop D)
    #[arg(short, long, allow_hyphen_values = true)]
    tuning: Option<i32>,

    /// Capo fret; raises every open string
    #[arg(long)]
    capo: Option<i32>,

    /// Line width past which output wraps at the next bar line
    #[arg(short, long)]
    width: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML config file (default: fretwise.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file path (default: `<midi-name>.tab`, or `.json`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of file
    #[arg(long)]
    stdout: bool,

    /// Suppress informational messages (only errors)
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    let cfg = FretwiseConfig::resolve(args.config.as_deref())?.with_overrides(
        args.tuning,
        args.capo,
        args.width,
    );

    // Find MIDI file
    let midi_path = if let Some(path) = args.midi {
        if !path.exists() {
            anyhow::bail!("MIDI file not found: {}", path.display());
        }
        path
    } else {
        find_first_midi_file(Path::new("."))?
    };

    info!("Processing MIDI file: {}", midi_path.display());
    let midi_data = MidiData::from_file(&midi_path)?;
    let formatter = OutputFormatter::default();

    if args.list_channels {
        print!("{}", formatter.build_channel_listing(&midi_data));
        return Ok(());
    }

    let channel = match args.channel {
        Some(channel) => channel,
        None => {
            let channel = midi_data.default_channel()?;
            info!("No channel given, using channel {}", channel);
            channel
        }
    };

    let transcriber = Transcriber::new(cfg.instrument()).context("Invalid instrument configuration")?;
    let doc = TabDocument::transcribe(&midi_data, channel, &transcriber, cfg.render.wrap_width)?;
    if doc.assignments.is_empty() {
        warn!("Channel {} has no notes within the fretboard range", channel);
    }

    let output = match args.format {
        OutputFormat::Text => formatter.build_output(&doc),
        OutputFormat::Json => formatter
            .build_output_json(&doc)
            .context("Failed to serialize tablature")?,
    };

    // Output handling
    if args.stdout {
        println!("{}", output);
    } else {
        let output_path = args
            .output
            .unwrap_or_else(|| default_output_path(&midi_path, args.format));
        fs::write(&output_path, format!("{}\n", output))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        info!("Output saved to {}", output_path.display());
    }

    Ok(())
}

fn default_output_path(midi_path: &Path, format: OutputFormat) -> PathBuf {
    let stem = midi_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    PathBuf::from(format!("{}.{}", stem, format.extension()))
}

fn find_first_midi_file(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).context("Failed to read current directory")?;

    let mut found: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_midi = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mid"));
        if is_midi {
            found.push(path);
        }
    }

    // Directory order is platform dependent
    found.sort();
    found
        .into_iter()
        .next()
        .context("No MIDI files found in current directory")
}
