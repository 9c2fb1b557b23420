// The parameter model: everything a song render depends on.
//
// A `ParameterModel` is built once per request, either by the prompt parser
// (prompt.rs), by `ParameterModel::random`, or from learned pattern
// statistics (patterns.rs). It may be perturbed once into a sibling by
// variation.rs. The generators only read it.
//
// Invariants kept by every constructor here: catchiness is in [1, 10], and
// the chord progression comes from the genre's own table.

use crate::theory::{DEFAULT_STRUCTURE, Genre, Key, TempoCategory, Vibe};
use log::warn;
use serde::{Deserialize, Serialize};
use songsmith_prng::SongRng;

pub const MIN_CATCHINESS: u8 = 1;
pub const MAX_CATCHINESS: u8 = 10;
pub const DEFAULT_CATCHINESS: u8 = 7;

/// Clamp any integer into the catchiness range.
pub fn clamp_catchiness(value: i32) -> u8 {
    value.clamp(MIN_CATCHINESS as i32, MAX_CATCHINESS as i32) as u8
}

/// Draw a progression from `genre`'s table, as owned chord names.
pub fn pick_progression(genre: Genre, rng: &mut SongRng) -> Vec<String> {
    let table = genre.progressions();
    let chosen = rng.choose(table).unwrap_or(&table[0]);
    chosen.iter().map(|c| c.to_string()).collect()
}

pub fn default_structure() -> Vec<String> {
    DEFAULT_STRUCTURE.iter().map(|s| s.to_string()).collect()
}

/// The full set of generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterModel {
    pub genre: Genre,
    pub vibe: Vibe,
    pub tempo_category: TempoCategory,
    /// Chord names, one structural pass. Usually four chords.
    pub chord_progression: Vec<String>,
    /// 1 to 10.
    pub catchiness: u8,
    pub key: Key,
    /// Section labels. One pass of harmony, bass and melody per entry, and
    /// four bars of drums per entry.
    pub structure: Vec<String>,
}

impl ParameterModel {
    /// Pop, catchy, medium tempo, key of C, catchiness 7, default structure,
    /// with a progression drawn from the pop table.
    pub fn defaults(rng: &mut SongRng) -> Self {
        Self::defaults_in(Genre::Pop, rng)
    }

    /// The defaults with `genre` in place of pop; one progression draw.
    pub fn defaults_in(genre: Genre, rng: &mut SongRng) -> Self {
        ParameterModel {
            genre,
            vibe: Vibe::Catchy,
            tempo_category: TempoCategory::Medium,
            chord_progression: pick_progression(genre, rng),
            catchiness: DEFAULT_CATCHINESS,
            key: Key::C,
            structure: default_structure(),
        }
    }

    /// Uniformly random genre, vibe, tempo and major key, catchiness in
    /// [6, 10], default structure.
    pub fn random(rng: &mut SongRng) -> Self {
        let genre = *rng.choose(&Genre::ALL).unwrap_or(&Genre::Pop);
        let vibe = *rng.choose(&Vibe::ALL).unwrap_or(&Vibe::Catchy);
        let tempo_category = *rng
            .choose(&TempoCategory::ALL)
            .unwrap_or(&TempoCategory::Medium);
        let catchiness = rng.range_i32_inclusive(6, 10) as u8;
        let key = *rng.choose(&Key::RANDOM_POOL).unwrap_or(&Key::C);
        ParameterModel {
            genre,
            vibe,
            tempo_category,
            chord_progression: pick_progression(genre, rng),
            catchiness,
            key,
            structure: default_structure(),
        }
    }

    /// Number of structural sections.
    pub fn section_count(&self) -> usize {
        self.structure.len()
    }

    /// Pick a concrete BPM inside the tempo category's range.
    pub fn resolve_tempo(&self, rng: &mut SongRng) -> u16 {
        let (lo, hi) = self.tempo_category.bpm_range();
        rng.range_i32_inclusive(lo as i32, hi as i32) as u16
    }
}

/// User choices layered on top of a parsed or random model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    pub genre: Option<Genre>,
    pub vibe: Option<Vibe>,
    pub tempo_category: Option<TempoCategory>,
    /// 1-based index into the (possibly overridden) genre's progression table.
    pub progression: Option<usize>,
    pub catchiness: Option<i32>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Overrides::default()
    }

    /// Apply the overrides in place. A genre change re-draws the progression
    /// from the new genre's table unless an explicit index is also given.
    pub fn apply(&self, model: &mut ParameterModel, rng: &mut SongRng) {
        if let Some(genre) = self.genre.filter(|g| *g != model.genre) {
            model.genre = genre;
            model.chord_progression = pick_progression(genre, rng);
        }
        if let Some(vibe) = self.vibe {
            model.vibe = vibe;
        }
        if let Some(tempo) = self.tempo_category {
            model.tempo_category = tempo;
        }
        if let Some(index) = self.progression {
            let table = model.genre.progressions();
            match index.checked_sub(1).and_then(|i| table.get(i)) {
                Some(progression) => {
                    model.chord_progression = progression.iter().map(|c| c.to_string()).collect();
                }
                None => warn!(
                    "progression {index} out of range for {} (1-{}), keeping {}",
                    model.genre,
                    table.len(),
                    model.chord_progression.join("-")
                ),
            }
        }
        if let Some(catchiness) = self.catchiness {
            model.catchiness = clamp_catchiness(catchiness);
        }
    }
}
