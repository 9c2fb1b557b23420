// Songsmith Music Generator
//
// Turns a free-text description ("upbeat summer pop song that's super
// catchy") into a four-track MIDI song sketch: lead melody, block-chord
// harmony, bass line and drum kit. A keyword parser maps the prompt onto a
// small parameter model (genre, vibe, tempo category, chord progression,
// catchiness, key, section structure), and four rule-based generators
// render that model into timed note events. There is no learning or audio
// analysis; an alternative path renders from pre-computed pattern
// statistics instead of a prompt.
//
// Architecture:
// - theory.rs: Musical vocabulary (genres, vibes, tempo bands, keys, chord
//   voicings and roots, rhythm feels, General MIDI drum notes)
// - params.rs: The parameter model, its defaults and random construction,
//   and user overrides layered on top
// - prompt.rs: Keyword prompt parser (first match per category wins)
// - variation.rs: Independent random perturbations of a model
// - score.rs: Note events, track ids and the composed song
// - melody.rs: Vibe-pattern random walk, repeated twice per section
// - harmony.rs: Block chords, rolled for jazz, shortened for electronic
// - bass.rs: Genre-specific figures on chord roots
// - drums.rs: 16-slot genre bar patterns, four bars per section
// - patterns.rs: Pattern statistics, the `PatternSource` trait, built-in and
//   JSON-file sources
// - midi.rs: `NoteSink` trait and the SMF writer on top of midly, plus the
//   atomic file write
// - song.rs: Generation entry points that tie the above together
// - error.rs: Error type for the fallible operations
//
// Every random draw goes through one `SongRng` (songsmith_prng), so a song
// is reproducible from its seed.

pub mod bass;
pub mod drums;
pub mod error;
pub mod harmony;
pub mod melody;
pub mod midi;
pub mod params;
pub mod patterns;
pub mod prompt;
pub mod score;
pub mod song;
pub mod theory;
pub mod variation;
