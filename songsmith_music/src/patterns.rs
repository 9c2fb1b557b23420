// Pattern statistics: the "learned" input for pattern-driven generation.
//
// A `PatternSource` hands back a `PatternStatistics` object: counted chord
// progressions, keys, structures and melody patterns, plus raw tempo samples,
// rhythm patterns and hook descriptions. Nothing here analyses audio or MIDI;
// `CannedPatterns` returns a fixed set of statistics and `JsonPatternFile`
// loads any object of the same shape from disk, the way the models in a
// corpus-analysis pipeline would be exported.
//
// Generation only needs the most common progression, melody and key, and
// the mean tempo. Each falls back to a fixed default when its collection is
// empty; if all four are empty there is nothing to learn from and the source
// is rejected.

use crate::error::{Result, SongError};
use crate::params::{ParameterModel, default_structure};
use crate::theory::{Genre, Key, RhythmFeel, TempoCategory, Vibe};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const FALLBACK_PROGRESSION: [&str; 4] = ["C", "G", "Am", "F"];
pub const FALLBACK_MELODY: [i8; 4] = [0, 2, -1, 3];
pub const FALLBACK_KEY: &str = "C major";
pub const FALLBACK_TEMPO: u16 = 120;

/// Catchiness reported for learned models; the learned renderer ignores it.
const LEARNED_CATCHINESS: u8 = 5;

/// Steps larger than this are discarded from learned melodies.
const MAX_LEARNED_STEP: i8 = 12;

/// A value with how often it was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counted<T> {
    pub value: T,
    pub count: u32,
}

impl<T> Counted<T> {
    pub fn new(value: T, count: u32) -> Self {
        Counted { value, count }
    }
}

/// Highest count wins; the earliest entry wins ties.
fn most_common<T>(items: &[Counted<T>]) -> Option<&T> {
    let mut best: Option<&Counted<T>> = None;
    for item in items {
        if best.is_none_or(|b| item.count > b.count) {
            best = Some(item);
        }
    }
    best.map(|c| &c.value)
}

/// Statistics a pattern-driven render learns from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternStatistics {
    pub chord_progressions: Vec<Counted<Vec<String>>>,
    pub popular_keys: Vec<Counted<String>>,
    pub optimal_tempos: Vec<u16>,
    pub structure_patterns: Vec<Counted<Vec<String>>>,
    pub melody_patterns: Vec<Counted<Vec<i8>>>,
    pub rhythm_patterns: Vec<Vec<f64>>,
    pub hooks: Vec<String>,
}

impl PatternStatistics {
    /// True when none of the collections generation draws on hold anything.
    pub fn is_empty(&self) -> bool {
        self.chord_progressions.is_empty()
            && self.melody_patterns.is_empty()
            && self.popular_keys.is_empty()
            && self.tempo_samples().next().is_none()
    }

    fn tempo_samples(&self) -> impl Iterator<Item = u16> + '_ {
        self.optimal_tempos.iter().copied().filter(|&t| t > 0)
    }

    pub fn top_progression(&self) -> Vec<String> {
        most_common(&self.chord_progressions)
            .filter(|p| !p.is_empty())
            .cloned()
            .unwrap_or_else(|| strings(&FALLBACK_PROGRESSION))
    }

    /// Most common melody with over-octave steps removed.
    pub fn top_melody(&self) -> Vec<i8> {
        let melody: Vec<i8> = most_common(&self.melody_patterns)
            .map(|m| {
                m.iter()
                    .copied()
                    .filter(|s| s.unsigned_abs() <= MAX_LEARNED_STEP as u8)
                    .collect()
            })
            .unwrap_or_default();
        if melody.is_empty() {
            FALLBACK_MELODY.to_vec()
        } else {
            melody
        }
    }

    /// Most common key descriptor, as written in the statistics.
    pub fn top_key(&self) -> String {
        most_common(&self.popular_keys)
            .cloned()
            .unwrap_or_else(|| FALLBACK_KEY.to_string())
    }

    /// Mean of the tempo samples, truncated, or the fallback tempo.
    pub fn mean_tempo(&self) -> u16 {
        let (sum, n) = self
            .tempo_samples()
            .fold((0u64, 0u64), |(sum, n), t| (sum + t as u64, n + 1));
        if n == 0 {
            FALLBACK_TEMPO
        } else {
            (sum / n) as u16
        }
    }

    /// The named feel closest to the first learned rhythm pattern.
    pub fn dominant_feel(&self) -> Option<RhythmFeel> {
        self.rhythm_patterns
            .iter()
            .find(|r| !r.is_empty())
            .map(|r| RhythmFeel::nearest(r))
    }

    /// A parameter model built from the learned progression, key and tempo.
    pub fn to_model(&self) -> ParameterModel {
        ParameterModel {
            genre: Genre::Pop,
            vibe: Vibe::Catchy,
            tempo_category: TempoCategory::containing(self.mean_tempo()),
            chord_progression: self.top_progression(),
            catchiness: LEARNED_CATCHINESS,
            key: Key::resolve(&self.top_key()),
            structure: default_structure(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Anything that can supply pattern statistics.
pub trait PatternSource {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
    fn load(&self) -> Result<PatternStatistics>;
}

/// The fixed statistics bundled with the generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedPatterns;

impl PatternSource for CannedPatterns {
    fn describe(&self) -> String {
        "built-in pattern statistics".to_string()
    }

    fn load(&self) -> Result<PatternStatistics> {
        Ok(PatternStatistics {
            chord_progressions: vec![Counted::new(strings(&["C", "G", "Am", "F"]), 10)],
            popular_keys: vec![Counted::new("C major".to_string(), 8)],
            optimal_tempos: vec![120, 122, 118],
            structure_patterns: vec![Counted::new(
                strings(&["verse", "chorus", "verse", "chorus"]),
                5,
            )],
            melody_patterns: vec![Counted::new(vec![0, 2, -1, 3], 7)],
            rhythm_patterns: vec![vec![1.0, 0.5, 0.5]],
            hooks: vec!["catchy hook".to_string()],
        })
    }
}

/// Statistics read from a JSON file of the `PatternStatistics` shape.
#[derive(Debug, Clone)]
pub struct JsonPatternFile {
    pub path: PathBuf,
}

impl JsonPatternFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonPatternFile {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PatternSource for JsonPatternFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<PatternStatistics> {
        let data = std::fs::read_to_string(&self.path).map_err(|source| SongError::PatternRead {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_statistics() {
        let stats = CannedPatterns.load().unwrap();
        assert!(!stats.is_empty());
        assert_eq!(stats.top_progression(), vec!["C", "G", "Am", "F"]);
        assert_eq!(stats.top_melody(), vec![0, 2, -1, 3]);
        assert_eq!(stats.top_key(), "C major");
        assert_eq!(stats.mean_tempo(), 120);

        let model = stats.to_model();
        assert_eq!(model.key, Key::C);
        assert_eq!(model.tempo_category, TempoCategory::Medium);
        assert_eq!(model.catchiness, 5);
        assert_eq!(model.structure.len(), 8);
        assert_eq!(stats.dominant_feel(), Some(RhythmFeel::Steady));
    }

    #[test]
    fn test_most_common_prefers_first_on_ties() {
        let items = vec![Counted::new("a", 3), Counted::new("b", 5), Counted::new("c", 5)];
        assert_eq!(most_common(&items), Some(&"b"));
        let none: Vec<Counted<u8>> = Vec::new();
        assert_eq!(most_common(&none), None);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = PatternStatistics {
            optimal_tempos: vec![0, 0],
            hooks: vec!["unused".into()],
            ..Default::default()
        };
        assert!(stats.is_empty());
        assert_eq!(stats.top_progression(), vec!["C", "G", "Am", "F"]);
        assert_eq!(stats.top_melody(), vec![0, 2, -1, 3]);
        assert_eq!(stats.mean_tempo(), 120);
    }

    #[test]
    fn test_partial_statistics_fill_gaps() {
        let stats = PatternStatistics {
            popular_keys: vec![
                Counted::new("A minor".into(), 2),
                Counted::new("G major".into(), 1),
            ],
            optimal_tempos: vec![170, 181],
            melody_patterns: vec![Counted::new(vec![0, 19, 2, -14, -3], 1)],
            ..Default::default()
        };
        assert!(!stats.is_empty());
        assert_eq!(stats.top_melody(), vec![0, 2, -3]);
        assert_eq!(stats.mean_tempo(), 175);
        let model = stats.to_model();
        assert_eq!(model.key, Key::Am);
        assert_eq!(model.tempo_category, TempoCategory::VeryFast);
        assert_eq!(model.chord_progression, vec!["C", "G", "Am", "F"]);
    }

    #[test]
    fn test_json_shape_with_missing_keys() {
        let json = r#"{
            "chord_progressions": [{"value": ["Dm", "G7", "Cmaj7", "Cmaj7"], "count": 4}],
            "optimal_tempos": [90, 100]
        }"#;
        let stats: PatternStatistics = serde_json::from_str(json).unwrap();
        assert_eq!(stats.top_progression(), vec!["Dm", "G7", "Cmaj7", "Cmaj7"]);
        assert_eq!(stats.mean_tempo(), 95);
        assert!(stats.hooks.is_empty());
    }

    #[test]
    fn test_json_file_source() {
        let dir = std::env::temp_dir().join(format!("songsmith_patterns_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stats.json");
        let stats = CannedPatterns.load().unwrap();
        std::fs::write(&path, serde_json::to_string_pretty(&stats).unwrap()).unwrap();

        let loaded = JsonPatternFile::new(&path).load().unwrap();
        assert_eq!(loaded, stats);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonPatternFile::new(&path).load(),
            Err(SongError::PatternParse(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(
            JsonPatternFile::new(dir.join("gone.json")).load(),
            Err(SongError::PatternRead { .. })
        ));
    }
}
