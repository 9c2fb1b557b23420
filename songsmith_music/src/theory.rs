// Static musical knowledge: the constant tables every generator reads.
//
// Genres own their chord-progression tables, vibes own their melodic
// interval patterns, tempo categories own their BPM ranges, and keys own the
// base pitch the melody starts from. Chord names map to a block voicing (for
// the harmony track) and a single low root (for the bass track).
//
// Everything here is immutable `'static` data. Chord names stay plain strings
// because progressions can also arrive from learned pattern statistics
// (patterns.rs), so chord lookups can miss; a miss falls back to C major and
// logs a warning instead of failing the run.

use crate::error::{Result, SongError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A four-chord progression, one structural pass of harmony.
pub type Progression = [&'static str; 4];

/// Musical genre. Selects the chord progression table and the
/// genre-specific harmony, bass and drum behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Pop,
    Rock,
    Jazz,
    Blues,
    Electronic,
    Sad,
    Happy,
    Energetic,
}

impl Genre {
    /// All genres, in prompt-matching order.
    pub const ALL: [Genre; 8] = [
        Genre::Pop,
        Genre::Rock,
        Genre::Jazz,
        Genre::Blues,
        Genre::Electronic,
        Genre::Sad,
        Genre::Happy,
        Genre::Energetic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Genre::Pop => "pop",
            Genre::Rock => "rock",
            Genre::Jazz => "jazz",
            Genre::Blues => "blues",
            Genre::Electronic => "electronic",
            Genre::Sad => "sad",
            Genre::Happy => "happy",
            Genre::Energetic => "energetic",
        }
    }

    /// The genre's progression table. Never empty.
    pub fn progressions(self) -> &'static [Progression] {
        match self {
            Genre::Pop => &[
                ["C", "G", "Am", "F"],  // I-V-vi-IV
                ["Am", "F", "C", "G"],  // vi-IV-I-V
                ["F", "G", "C", "Am"],  // IV-V-I-vi
                ["C", "Am", "F", "G"],  // I-vi-IV-V
            ],
            Genre::Rock => &[
                ["E", "A", "B", "E"],
                ["A", "D", "E", "A"],
                ["G", "C", "D", "G"],
                ["Em", "C", "G", "D"],
            ],
            Genre::Jazz => &[
                ["Cmaj7", "Am7", "Dm7", "G7"],
                ["Am7", "D7", "Gmaj7", "Cmaj7"],
                ["Fmaj7", "Em7", "Am7", "Dm7"],
            ],
            Genre::Blues => &[
                ["C7", "C7", "C7", "C7"],
                ["F7", "F7", "C7", "C7"],
                ["G7", "F7", "C7", "G7"],
            ],
            Genre::Electronic => &[
                ["Am", "G", "F", "E"],
                ["Dm", "Am", "Bb", "F"],
                ["Em", "D", "C", "B"],
            ],
            Genre::Sad => &[
                ["Am", "F", "C", "G"],
                ["Dm", "Bb", "F", "C"],
                ["Em", "C", "G", "D"],
            ],
            Genre::Happy => &[
                ["C", "G", "Am", "F"],
                ["F", "C", "G", "Am"],
                ["G", "D", "Em", "C"],
            ],
            Genre::Energetic => &[
                ["E", "B", "C#m", "A"],
                ["A", "E", "F#m", "D"],
                ["D", "A", "Bm", "G"],
            ],
        }
    }
}

/// Melodic mood. Selects the interval-pattern table for the melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vibe {
    Catchy,
    Smooth,
    Dramatic,
    Playful,
}

impl Vibe {
    pub const ALL: [Vibe; 4] = [Vibe::Catchy, Vibe::Smooth, Vibe::Dramatic, Vibe::Playful];

    pub fn name(self) -> &'static str {
        match self {
            Vibe::Catchy => "catchy",
            Vibe::Smooth => "smooth",
            Vibe::Dramatic => "dramatic",
            Vibe::Playful => "playful",
        }
    }

    /// Signed semitone steps, applied cumulatively to the melody cursor.
    pub fn patterns(self) -> &'static [[i8; 7]] {
        match self {
            Vibe::Catchy => &[
                [0, 2, 4, 2, 0, -1, 0],
                [0, 4, 2, 0, -2, 0, 2],
                [0, 3, 0, 5, 0, 3, 0],
                [0, 1, 3, 1, 0, 2, 0],
            ],
            Vibe::Smooth => &[
                [0, 1, 2, 1, 0, 1, 2],
                [0, 2, 1, 3, 2, 1, 0],
                [0, 1, 0, 2, 1, 0, 1],
            ],
            Vibe::Dramatic => &[
                [0, 7, 0, 5, 0, 7, 0],
                [0, -5, 7, 0, -7, 5, 0],
                [0, 8, -3, 5, -2, 7, 0],
            ],
            Vibe::Playful => &[
                [0, 2, 0, 3, 0, 2, 0],
                [0, 1, 3, 0, 2, 1, 0],
                [0, 3, 1, 4, 2, 3, 0],
            ],
        }
    }
}

/// Coarse tempo class. The exact BPM is drawn from the class's range when a
/// song is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempoCategory {
    Slow,
    Medium,
    Fast,
    VeryFast,
}

impl TempoCategory {
    pub const ALL: [TempoCategory; 4] = [
        TempoCategory::Slow,
        TempoCategory::Medium,
        TempoCategory::Fast,
        TempoCategory::VeryFast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TempoCategory::Slow => "slow",
            TempoCategory::Medium => "medium",
            TempoCategory::Fast => "fast",
            TempoCategory::VeryFast => "very_fast",
        }
    }

    /// Inclusive BPM range.
    pub fn bpm_range(self) -> (u16, u16) {
        match self {
            TempoCategory::Slow => (60, 80),
            TempoCategory::Medium => (80, 120),
            TempoCategory::Fast => (120, 160),
            TempoCategory::VeryFast => (160, 200),
        }
    }

    /// The first category whose range holds `bpm`. Tempos below or above
    /// every range land in the nearest end category.
    pub fn containing(bpm: u16) -> TempoCategory {
        Self::ALL
            .into_iter()
            .find(|c| {
                let (lo, hi) = c.bpm_range();
                (lo..=hi).contains(&bpm)
            })
            .unwrap_or(if bpm < 60 {
                TempoCategory::Slow
            } else {
                TempoCategory::VeryFast
            })
    }
}

/// Song key. Only the melody's starting pitch depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    C,
    G,
    D,
    A,
    E,
    F,
    Bb,
    Am,
    Em,
    Dm,
}

impl Key {
    pub const ALL: [Key; 10] = [
        Key::C,
        Key::G,
        Key::D,
        Key::A,
        Key::E,
        Key::F,
        Key::Bb,
        Key::Am,
        Key::Em,
        Key::Dm,
    ];

    /// Major keys offered by random generation.
    pub const RANDOM_POOL: [Key; 7] = [Key::C, Key::G, Key::D, Key::A, Key::E, Key::F, Key::Bb];

    pub fn name(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::G => "G",
            Key::D => "D",
            Key::A => "A",
            Key::E => "E",
            Key::F => "F",
            Key::Bb => "Bb",
            Key::Am => "Am",
            Key::Em => "Em",
            Key::Dm => "Dm",
        }
    }

    /// MIDI pitch the melody cursor starts each section from (before the
    /// per-section transposition).
    pub fn base_pitch(self) -> u8 {
        match self {
            Key::C => 60,
            Key::G => 67,
            Key::D => 62,
            Key::A | Key::Am => 57,
            Key::E | Key::Em => 64,
            Key::F => 65,
            Key::Bb => 58,
            Key::Dm => 62,
        }
    }

    /// Parse a loose key descriptor: "C", "Am", "C major", "a minor".
    pub fn from_descriptor(text: &str) -> Option<Key> {
        let lower = text.trim().to_lowercase();
        let short = if let Some(note) = lower.strip_suffix(" minor") {
            format!("{}m", note.trim())
        } else if let Some(note) = lower.strip_suffix(" major") {
            note.trim().to_string()
        } else {
            lower
        };
        Key::ALL.into_iter().find(|k| k.name().to_lowercase() == short)
    }

    /// `from_descriptor`, falling back to C.
    pub fn resolve(text: &str) -> Key {
        Key::from_descriptor(text).unwrap_or_else(|| {
            warn!("unrecognised key '{text}', using C");
            Key::C
        })
    }
}

/// Named rhythmic feels with their beat durations. Reference data for the
/// catalog listing and for classifying learned rhythm patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhythmFeel {
    Steady,
    Syncopated,
    Swing,
    Driving,
    LaidBack,
}

impl RhythmFeel {
    pub const ALL: [RhythmFeel; 5] = [
        RhythmFeel::Steady,
        RhythmFeel::Syncopated,
        RhythmFeel::Swing,
        RhythmFeel::Driving,
        RhythmFeel::LaidBack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RhythmFeel::Steady => "steady",
            RhythmFeel::Syncopated => "syncopated",
            RhythmFeel::Swing => "swing",
            RhythmFeel::Driving => "driving",
            RhythmFeel::LaidBack => "laid_back",
        }
    }

    pub fn durations(self) -> &'static [f64] {
        match self {
            RhythmFeel::Steady => &[1.0, 1.0, 1.0, 1.0],
            RhythmFeel::Syncopated => &[0.5, 0.5, 1.0, 0.5, 0.5, 1.0],
            RhythmFeel::Swing => &[0.67, 0.33, 0.67, 0.33, 0.67, 0.33],
            RhythmFeel::Driving => &[0.5; 8],
            RhythmFeel::LaidBack => &[1.5, 0.5, 1.5, 0.5],
        }
    }

    /// The feel whose duration sequence is closest to `durations`
    /// (element-wise absolute difference, length mismatch penalised per
    /// missing note).
    pub fn nearest(durations: &[f64]) -> RhythmFeel {
        let distance = |feel: RhythmFeel| {
            let reference = feel.durations();
            let shared: f64 = reference
                .iter()
                .zip(durations)
                .map(|(a, b)| (a - b).abs())
                .sum();
            shared + reference.len().abs_diff(durations.len()) as f64
        };
        Self::ALL
            .into_iter()
            .min_by(|a, b| distance(*a).total_cmp(&distance(*b)))
            .unwrap_or(RhythmFeel::Steady)
    }
}

/// General MIDI percussion notes (channel 10).
pub mod drum_note {
    pub const KICK: u8 = 36;
    pub const SNARE: u8 = 38;
    pub const CLOSED_HIHAT: u8 = 42;
}

/// Section labels used when nothing else specifies a form.
pub const DEFAULT_STRUCTURE: [&str; 8] = [
    "intro", "verse", "chorus", "verse", "chorus", "bridge", "chorus", "outro",
];

/// Block voicing used when a chord name is not in the table (C major).
pub const FALLBACK_VOICING: &[u8] = &[60, 64, 67];

/// Bass root used when a chord name is not in the table (C2).
pub const FALLBACK_ROOT: u8 = 36;

/// Chord name → block voicing. Triads voice as three notes, sevenths as four.
const VOICINGS: &[(&str, &[u8])] = &[
    ("C", &[60, 64, 67]),
    ("G", &[67, 71, 74]),
    ("Am", &[57, 60, 64]),
    ("F", &[65, 69, 72]),
    ("Dm", &[62, 65, 69]),
    ("Em", &[64, 67, 71]),
    ("D", &[62, 66, 69]),
    ("E", &[64, 68, 71]),
    ("A", &[57, 61, 64]),
    ("Bb", &[58, 62, 65]),
    ("B", &[59, 63, 66]),
    ("C#m", &[61, 64, 68]),
    ("F#m", &[66, 69, 73]),
    ("Bm", &[59, 62, 66]),
    ("Cmaj7", &[60, 64, 67, 71]),
    ("Am7", &[57, 60, 64, 67]),
    ("Dm7", &[62, 65, 69, 72]),
    ("G7", &[67, 71, 74, 77]),
    ("C7", &[60, 64, 67, 70]),
    ("D7", &[62, 66, 69, 72]),
    ("F7", &[65, 69, 72, 75]),
    ("Fmaj7", &[65, 69, 72, 76]),
    ("Gmaj7", &[67, 71, 74, 78]),
    ("Em7", &[64, 67, 71, 74]),
];

/// Chord name → bass root, in the octave below the voicings.
const ROOTS: &[(&str, u8)] = &[
    ("C", 36),
    ("G", 43),
    ("Am", 33),
    ("F", 41),
    ("Dm", 38),
    ("Em", 40),
    ("D", 38),
    ("E", 40),
    ("A", 33),
    ("Bb", 34),
    ("B", 35),
    ("C#m", 37),
    ("F#m", 42),
    ("Bm", 35),
    ("Cmaj7", 36),
    ("Am7", 33),
    ("Dm7", 38),
    ("G7", 43),
    ("C7", 36),
    ("D7", 38),
    ("F7", 41),
    ("Fmaj7", 41),
    ("Gmaj7", 43),
    ("Em7", 40),
];

/// Exact table lookup of a chord's voicing.
pub fn lookup_voicing(chord: &str) -> Option<&'static [u8]> {
    let chord = chord.trim();
    VOICINGS.iter().find(|(name, _)| *name == chord).map(|(_, v)| *v)
}

/// Exact table lookup of a chord's bass root.
pub fn lookup_root(chord: &str) -> Option<u8> {
    let chord = chord.trim();
    ROOTS.iter().find(|(name, _)| *name == chord).map(|(_, r)| *r)
}

/// Voicing for `chord`, or [`FALLBACK_VOICING`] if unknown.
pub fn chord_voicing(chord: &str) -> &'static [u8] {
    lookup_voicing(chord).unwrap_or_else(|| {
        warn!("no voicing for chord '{chord}', using C major");
        FALLBACK_VOICING
    })
}

/// Bass root for `chord`, or [`FALLBACK_ROOT`] if unknown.
pub fn chord_root(chord: &str) -> u8 {
    lookup_root(chord).unwrap_or_else(|| {
        warn!("no bass root for chord '{chord}', using C");
        FALLBACK_ROOT
    })
}

fn parse_named<T: Copy>(
    kind: &'static str,
    text: &str,
    all: &[T],
    name: fn(T) -> &'static str,
) -> Result<T> {
    let wanted = text.trim().to_lowercase().replace([' ', '-'], "_");
    all.iter()
        .copied()
        .find(|&item| name(item).to_lowercase() == wanted)
        .ok_or_else(|| SongError::UnknownName {
            kind,
            name: text.to_string(),
        })
}

impl FromStr for Genre {
    type Err = SongError;
    fn from_str(s: &str) -> Result<Self> {
        parse_named("genre", s, &Genre::ALL, Genre::name)
    }
}

impl FromStr for Vibe {
    type Err = SongError;
    fn from_str(s: &str) -> Result<Self> {
        parse_named("vibe", s, &Vibe::ALL, Vibe::name)
    }
}

impl FromStr for TempoCategory {
    type Err = SongError;
    fn from_str(s: &str) -> Result<Self> {
        parse_named("tempo", s, &TempoCategory::ALL, TempoCategory::name)
    }
}

impl FromStr for Key {
    type Err = SongError;
    fn from_str(s: &str) -> Result<Self> {
        Key::from_descriptor(s).ok_or_else(|| SongError::UnknownName {
            kind: "key",
            name: s.to_string(),
        })
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for TempoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for RhythmFeel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_chord_resolves() {
        for genre in Genre::ALL {
            assert!(!genre.progressions().is_empty(), "{genre} has no progressions");
            for progression in genre.progressions() {
                assert_eq!(progression.len(), 4);
                for chord in progression {
                    assert!(lookup_voicing(chord).is_some(), "{genre}: no voicing for {chord}");
                    assert!(lookup_root(chord).is_some(), "{genre}: no root for {chord}");
                }
            }
        }
    }

    #[test]
    fn test_voicing_sizes() {
        assert_eq!(chord_voicing("C").len(), 3);
        assert_eq!(chord_voicing("Bm").len(), 3);
        assert_eq!(chord_voicing("Cmaj7").len(), 4);
        assert_eq!(chord_voicing("G7").len(), 4);
    }

    #[test]
    fn test_unknown_chord_falls_back() {
        assert_eq!(chord_voicing("Xsus13"), FALLBACK_VOICING);
        assert_eq!(chord_root("Xsus13"), FALLBACK_ROOT);
        assert_eq!(chord_voicing(" Am "), &[57, 60, 64]);
    }

    #[test]
    fn test_every_vibe_pattern_has_seven_steps() {
        for vibe in Vibe::ALL {
            assert!(!vibe.patterns().is_empty());
            for pattern in vibe.patterns() {
                assert_eq!(pattern.len(), 7);
            }
        }
    }

    #[test]
    fn test_tempo_ranges_are_ordered() {
        for category in TempoCategory::ALL {
            let (lo, hi) = category.bpm_range();
            assert!(lo < hi);
        }
        assert_eq!(TempoCategory::containing(70), TempoCategory::Slow);
        assert_eq!(TempoCategory::containing(80), TempoCategory::Slow);
        assert_eq!(TempoCategory::containing(120), TempoCategory::Medium);
        assert_eq!(TempoCategory::containing(121), TempoCategory::Fast);
        assert_eq!(TempoCategory::containing(30), TempoCategory::Slow);
        assert_eq!(TempoCategory::containing(250), TempoCategory::VeryFast);
    }

    #[test]
    fn test_key_descriptors() {
        assert_eq!(Key::from_descriptor("C major"), Some(Key::C));
        assert_eq!(Key::from_descriptor("a minor"), Some(Key::Am));
        assert_eq!(Key::from_descriptor("Bb"), Some(Key::Bb));
        assert_eq!(Key::from_descriptor("em"), Some(Key::Em));
        assert_eq!(Key::from_descriptor("H dorian"), None);
        assert_eq!(Key::resolve("H dorian"), Key::C);
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for genre in Genre::ALL {
            assert_eq!(genre.name().parse::<Genre>().unwrap(), genre);
        }
        for vibe in Vibe::ALL {
            assert_eq!(vibe.name().parse::<Vibe>().unwrap(), vibe);
        }
        for tempo in TempoCategory::ALL {
            assert_eq!(tempo.name().parse::<TempoCategory>().unwrap(), tempo);
        }
        assert_eq!("very fast".parse::<TempoCategory>().unwrap(), TempoCategory::VeryFast);
        assert_eq!("JAZZ".parse::<Genre>().unwrap(), Genre::Jazz);
        assert!(matches!(
            "polka".parse::<Genre>(),
            Err(SongError::UnknownName { kind: "genre", .. })
        ));
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&TempoCategory::VeryFast).unwrap();
        assert_eq!(json, "\"very_fast\"");
        let json = serde_json::to_string(&Key::Bb).unwrap();
        assert_eq!(json, "\"Bb\"");
    }

    #[test]
    fn test_key_serializes_with_musical_spelling() {
        for key in Key::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.name()));
            assert_eq!(serde_json::from_str::<Key>(&json).unwrap(), key);
        }
        assert_eq!(serde_json::to_string(&Key::Am).unwrap(), "\"Am\"");
        assert!(serde_json::from_str::<Key>("\"am\"").is_err());
    }

    #[test]
    fn test_rhythm_feels_fill_whole_beats() {
        for feel in RhythmFeel::ALL {
            let total: f64 = feel.durations().iter().sum();
            assert!(
                (total - total.round()).abs() < 1e-9,
                "{} sums to {total}",
                feel.name()
            );
        }
        assert_eq!(RhythmFeel::nearest(&[1.0, 0.5, 0.5]), RhythmFeel::Steady);
        assert_eq!(RhythmFeel::nearest(&[0.5; 8]), RhythmFeel::Driving);
    }
}
