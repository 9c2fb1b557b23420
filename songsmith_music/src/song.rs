// Generation entry points: parameters in, MIDI file and summary out.
//
// Two paths, two renderers:
// - `generate_from_params` takes a model from the prompt parser, the random
//   generator or a variation, rolls a BPM inside the model's tempo category,
//   renders with `compose` and writes to `<base>_<genre>_<vibe>.mid`.
// - `generate_from_patterns` loads statistics from a `PatternSource`, builds
//   a model from the most common progression and key, renders the most
//   common melody with `compose_learned` at the mean learned tempo and
//   writes to a fixed path.
//
// Both run the generators in melody, harmony, bass, drums order. Only the
// melody draws randomness, from its own fork of the caller's stream, so the
// caller's later draws do not depend on how long the melody was.
// The MIDI bytes are fully built in memory before the single atomic write.

use crate::error::{Result, SongError};
use crate::midi::{MidiFile, NoteSink, write_atomic};
use crate::params::ParameterModel;
use crate::patterns::PatternSource;
use crate::score::{Composition, TrackId};
use crate::theory::{Genre, Key, RhythmFeel, TempoCategory, Vibe};
use crate::{bass, drums, harmony, melody};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use songsmith_prng::SongRng;
use std::path::{Path, PathBuf};

/// Default output base, also the fixed path for pattern-driven songs.
pub const DEFAULT_OUTPUT: &str = "generated_song.mid";

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongInfo {
    pub genre: Genre,
    pub vibe: Vibe,
    pub tempo_category: TempoCategory,
    pub chord_progression: Vec<String>,
    pub key: Key,
    /// Resolved BPM.
    pub tempo: u16,
    pub structure: Vec<String>,
    pub file_path: PathBuf,
    pub note_count: usize,
    /// Prompt and random paths only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catchiness_level: Option<u8>,
    /// Pattern path only: the learned melody that was played.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melody_pattern: Option<Vec<i8>>,
    /// Pattern path only: the named feel nearest the learned rhythm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rhythm_feel: Option<RhythmFeel>,
}

/// `generated_song.mid` → `generated_song_pop_catchy.mid`.
pub fn output_path_for(base: &Path, genre: Genre, vibe: Vibe) -> PathBuf {
    suffixed(base, &format!("_{}_{}", genre.name(), vibe.name()))
}

/// Base path for the `n`th variation: `generated_song.mid` →
/// `generated_song_var1.mid`.
pub fn variation_base(base: &Path, n: usize) -> PathBuf {
    suffixed(base, &format!("_var{n}"))
}

fn suffixed(base: &Path, suffix: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "generated_song".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mid".to_string());
    base.with_file_name(format!("{stem}{suffix}.{ext}"))
}

/// Render all four tracks, drawing the melody pattern from the vibe table.
pub fn compose(params: &ParameterModel, tempo_bpm: u16, rng: &mut SongRng) -> Composition {
    let mut melody_rng = rng.fork();
    let mut song = Composition::new(tempo_bpm);
    song.set_events(TrackId::Melody, melody::generate(params, &mut melody_rng));
    song.set_events(TrackId::Harmony, harmony::generate(params));
    song.set_events(TrackId::Bass, bass::generate(params));
    song.set_events(TrackId::Drums, drums::generate(params));
    log_tracks(&song);
    song
}

/// Render a learned melody over the model's progression with the fixed
/// learned arrangement: four melody sections, eight progression passes and
/// 32 bars of backbeat. Genre, vibe and catchiness do not shape the result.
pub fn compose_learned(
    params: &ParameterModel,
    melody_pattern: &[i8],
    tempo_bpm: u16,
    rng: &mut SongRng,
) -> Composition {
    let mut melody_rng = rng.fork();
    let mut song = Composition::new(tempo_bpm);
    let progression = &params.chord_progression;
    song.set_events(
        TrackId::Melody,
        melody::render_learned(melody_pattern, &mut melody_rng),
    );
    song.set_events(TrackId::Harmony, harmony::generate_learned(progression));
    song.set_events(TrackId::Bass, bass::generate_learned(progression));
    song.set_events(TrackId::Drums, drums::generate_learned());
    log_tracks(&song);
    song
}

fn log_tracks(song: &Composition) {
    for track in TrackId::ALL {
        debug!("{}: {} notes", track.display_name(), song.events(track).len());
    }
}

/// Serialize a composition and write it atomically to `path`.
pub fn write_song(song: &Composition, path: &Path) -> Result<()> {
    let mut file = MidiFile::new(TrackId::ALL.len());
    song.write_to(&mut file);
    let bytes = file.serialize()?;
    write_atomic(path, &bytes).map_err(SongError::Sink)?;
    info!(
        "wrote {} ({} notes, {:.0} beats at {} BPM)",
        path.display(),
        song.note_count(),
        song.length_beats(),
        song.tempo_bpm
    );
    Ok(())
}

/// Prompt / random / variation path.
pub fn generate_from_params(
    params: &ParameterModel,
    base_path: &Path,
    rng: &mut SongRng,
) -> Result<SongInfo> {
    let tempo = params.resolve_tempo(rng);
    let song = compose(params, tempo, rng);
    let path = output_path_for(base_path, params.genre, params.vibe);
    write_song(&song, &path)?;

    Ok(SongInfo {
        genre: params.genre,
        vibe: params.vibe,
        tempo_category: params.tempo_category,
        chord_progression: params.chord_progression.clone(),
        key: params.key,
        tempo,
        structure: params.structure.clone(),
        file_path: path,
        note_count: song.note_count(),
        catchiness_level: Some(params.catchiness),
        melody_pattern: None,
        rhythm_feel: None,
    })
}

/// Pattern-statistics path.
pub fn generate_from_patterns(
    source: &dyn PatternSource,
    path: &Path,
    rng: &mut SongRng,
) -> Result<SongInfo> {
    let stats = source.load()?;
    if stats.is_empty() {
        return Err(SongError::EmptyPatternSource);
    }
    info!(
        "learning from {}: {} progressions, {} melodies, {} hooks",
        source.describe(),
        stats.chord_progressions.len(),
        stats.melody_patterns.len(),
        stats.hooks.len()
    );

    let params = stats.to_model();
    let melody_pattern = stats.top_melody();
    let tempo = stats.mean_tempo();
    let song = compose_learned(&params, &melody_pattern, tempo, rng);
    write_song(&song, path)?;

    Ok(SongInfo {
        genre: params.genre,
        vibe: params.vibe,
        tempo_category: params.tempo_category,
        chord_progression: params.chord_progression.clone(),
        key: params.key,
        tempo,
        structure: params.structure.clone(),
        file_path: path.to_path_buf(),
        note_count: song.note_count(),
        catchiness_level: None,
        melody_pattern: Some(melody_pattern),
        rhythm_feel: stats.dominant_feel(),
    })
}
