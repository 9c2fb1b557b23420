// Songsmith: CLI entry point.
//
// Describes a song in words, or asks for a random one, and writes a
// four-track MIDI sketch next to the requested output path. The pipeline:
// prompt parsing (or random / learned parameters) → overrides → track
// generation → MIDI output, optionally followed by N variations.
//
// Usage:
//   songsmith [--output PATH] [--seed N] [--json] prompt [TEXT...]
//     [--genre G] [--vibe V] [--tempo T] [--progression N] [--catchiness C]
//     [--variations N]
//   songsmith patterns [--from stats.json]
//   songsmith random
//   songsmith catalog
//
// Logging goes to stderr through env_logger; set RUST_LOG=info or debug for
// per-file and per-track detail.

use clap::{Parser, Subcommand};
use songsmith_music::error::Result;
use songsmith_music::params::{Overrides, ParameterModel};
use songsmith_music::patterns::{CannedPatterns, JsonPatternFile, PatternSource};
use songsmith_music::prompt;
use songsmith_music::song::{
    DEFAULT_OUTPUT, SongInfo, generate_from_params, generate_from_patterns, variation_base,
};
use songsmith_music::theory::{Genre, RhythmFeel, TempoCategory, Vibe};
use songsmith_music::variation::create_variation;
use songsmith_prng::SongRng;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "songsmith", version, about = "Prompt-driven MIDI song sketch generator")]
struct Cli {
    /// Output path. Prompt and random songs append genre and vibe to the
    /// file name; pattern songs are written here as given.
    #[arg(short, long, global = true, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// RNG seed (same seed and arguments => same song). Defaults to the clock.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate from a free-text description
    Prompt {
        /// Description, e.g. "upbeat summer pop song that's super catchy"
        text: Vec<String>,

        #[arg(long)]
        genre: Option<Genre>,

        #[arg(long)]
        vibe: Option<Vibe>,

        /// Tempo category: slow, medium, fast or very_fast
        #[arg(long)]
        tempo: Option<TempoCategory>,

        /// 1-based index into the genre's progression table (see `catalog`)
        #[arg(long)]
        progression: Option<usize>,

        /// 1 to 10; out-of-range values are clamped
        #[arg(long, allow_negative_numbers = true)]
        catchiness: Option<i32>,

        /// Also write this many variations of the song
        #[arg(long, default_value_t = 0)]
        variations: usize,
    },
    /// Generate from learned pattern statistics
    Patterns {
        /// JSON statistics file; the built-in statistics are used if omitted
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Generate from uniformly random parameters
    Random,
    /// List genres, progressions, vibes, tempos and rhythm feels
    Catalog,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let (mut rng, seed) = match cli.seed {
        Some(s) => (SongRng::new(s), s),
        None => SongRng::from_clock(),
    };

    let songs = match cli.command {
        Commands::Catalog => {
            print_catalog();
            return Ok(());
        }
        Commands::Random => {
            let model = ParameterModel::random(&mut rng);
            vec![generate_from_params(&model, &cli.output, &mut rng)?]
        }
        Commands::Patterns { from } => {
            let source: Box<dyn PatternSource> = match from {
                Some(path) => Box::new(JsonPatternFile::new(path)),
                None => Box::new(CannedPatterns),
            };
            vec![generate_from_patterns(source.as_ref(), &cli.output, &mut rng)?]
        }
        Commands::Prompt {
            text,
            genre,
            vibe,
            tempo,
            progression,
            catchiness,
            variations,
        } => {
            let mut model = prompt::parse(&text.join(" "), &mut rng);
            let overrides = Overrides {
                genre,
                vibe,
                tempo_category: tempo,
                progression,
                catchiness,
            };
            if !overrides.is_empty() {
                overrides.apply(&mut model, &mut rng);
            }
            generate_with_variations(&model, &cli.output, variations, &mut rng)?
        }
    };

    if cli.json {
        let json = serde_json::json!({ "seed": seed, "songs": songs });
        let text = serde_json::to_string_pretty(&json).map_err(std::io::Error::from)?;
        println!("{text}");
    } else {
        for (i, song) in songs.iter().enumerate() {
            if i > 0 {
                println!();
                println!("--- variation {i} ---");
            }
            print_summary(song);
        }
        println!();
        println!("Seed: {seed}");
    }
    Ok(())
}

fn generate_with_variations(
    model: &ParameterModel,
    output: &Path,
    variations: usize,
    rng: &mut SongRng,
) -> Result<Vec<SongInfo>> {
    let mut songs = vec![generate_from_params(model, output, rng)?];
    for n in 1..=variations {
        let sibling = create_variation(model, rng);
        songs.push(generate_from_params(&sibling, &variation_base(output, n), rng)?);
    }
    Ok(songs)
}

fn print_summary(song: &SongInfo) {
    println!("=== Songsmith ===");
    println!("File: {}", song.file_path.display());
    println!("Genre: {} ({})", song.genre, song.vibe);
    println!("Tempo: {} BPM ({})", song.tempo, song.tempo_category);
    println!("Key: {}", song.key);
    println!("Chords: {}", song.chord_progression.join(" - "));
    println!("Structure: {}", song.structure.join(", "));
    if let Some(level) = song.catchiness_level {
        println!("Catchiness: {level}/10");
    }
    if let Some(pattern) = &song.melody_pattern {
        let steps: Vec<String> = pattern.iter().map(|s| format!("{s:+}")).collect();
        println!("Learned melody: {}", steps.join(" "));
    }
    if let Some(feel) = song.rhythm_feel {
        println!("Rhythm feel: {feel}");
    }
    println!("Notes: {}", song.note_count);
}

fn print_catalog() {
    println!("Genres:");
    for genre in Genre::ALL {
        println!("  {genre}");
        for (i, progression) in genre.progressions().iter().enumerate() {
            println!("    {}. {}", i + 1, progression.join(" - "));
        }
    }
    println!("Vibes:");
    for vibe in Vibe::ALL {
        let first = vibe.patterns().first().map(|p| format!("{p:?}")).unwrap_or_default();
        println!("  {vibe:<9} {first}");
    }
    println!("Tempos:");
    for tempo in TempoCategory::ALL {
        let (lo, hi) = tempo.bpm_range();
        println!("  {tempo:<9} {lo}-{hi} BPM");
    }
    println!("Rhythm feels:");
    for feel in RhythmFeel::ALL {
        println!("  {feel:<10} {:?}", feel.durations());
    }
}
