// Free-text prompt → parameter model, by keyword matching.
//
// Five independent keyword tables are searched as case-insensitive
// substrings of the prompt: genre names, vibe words, tempo words, key
// descriptors and catchiness phrases. Within a table the first entry with a
// matching keyword wins, so table order matters: the catchiness table runs
// from the strongest phrase ("extremely catchy") to the weakest, and the
// tempo table checks "fast" before "very fast" (so "very fast" resolves to
// fast). Categories never influence one another.
//
// Parsing cannot fail. Anything not mentioned keeps its default (see
// `ParameterModel::defaults`). The genre is resolved first so the chord
// progression is drawn once, from that genre's table.

use crate::params::ParameterModel;
use crate::theory::{Genre, Key, TempoCategory, Vibe};
use log::debug;
use songsmith_prng::SongRng;

const VIBE_KEYWORDS: &[(Vibe, &[&str])] = &[
    (Vibe::Catchy, &["catchy", "memorable", "hook", "viral", "addictive"]),
    (Vibe::Smooth, &["smooth", "mellow", "gentle", "soft", "flowing"]),
    (Vibe::Dramatic, &["dramatic", "intense", "powerful", "epic", "emotional"]),
    (Vibe::Playful, &["playful", "fun", "bouncy", "cheerful", "lighthearted"]),
];

const TEMPO_KEYWORDS: &[(TempoCategory, &[&str])] = &[
    (TempoCategory::Slow, &["slow", "ballad", "relaxed", "chill"]),
    (TempoCategory::Medium, &["medium", "moderate", "steady"]),
    (TempoCategory::Fast, &["fast", "upbeat", "energetic", "dance"]),
    (TempoCategory::VeryFast, &["very fast", "rapid", "intense", "hardcore"]),
];

const KEY_KEYWORDS: &[(Key, &[&str])] = &[
    (Key::C, &["c major", "bright", "simple"]),
    (Key::G, &["g major", "warm", "folk"]),
    (Key::D, &["d major", "brilliant", "triumphant"]),
    (Key::A, &["a major", "cheerful", "confident"]),
    (Key::E, &["e major", "bright", "joyful"]),
    (Key::F, &["f major", "peaceful", "pastoral"]),
    (Key::Am, &["a minor", "sad", "melancholic"]),
    (Key::Em, &["e minor", "contemplative", "mysterious"]),
    (Key::Dm, &["d minor", "serious", "tragic"]),
];

/// Strongest phrases first.
const CATCHINESS_KEYWORDS: &[(u8, &[&str])] = &[
    (10, &["extremely catchy", "super viral", "mega hit"]),
    (9, &["very catchy", "viral", "hit"]),
    (8, &["catchy", "memorable", "hooky"]),
    (7, &["somewhat catchy", "decent hook"]),
    (6, &["mildly catchy", "subtle hook"]),
    (5, &["not too catchy", "simple"]),
];

/// First entry of `table` with any keyword contained in `text`.
fn first_match<T: Copy>(text: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(value, _)| *value)
}

/// Resolve a prompt into a full parameter model.
pub fn parse(prompt: &str, rng: &mut SongRng) -> ParameterModel {
    let text = prompt.to_lowercase();
    let genre = Genre::ALL
        .into_iter()
        .find(|g| text.contains(g.name()))
        .unwrap_or(Genre::Pop);
    let mut model = ParameterModel::defaults_in(genre, rng);

    if let Some(vibe) = first_match(&text, VIBE_KEYWORDS) {
        model.vibe = vibe;
    }
    if let Some(tempo) = first_match(&text, TEMPO_KEYWORDS) {
        model.tempo_category = tempo;
    }
    if let Some(key) = first_match(&text, KEY_KEYWORDS) {
        model.key = key;
    }
    if let Some(level) = first_match(&text, CATCHINESS_KEYWORDS) {
        model.catchiness = level;
    }
    debug!(
        "prompt {:?} -> genre={} vibe={} tempo={} key={} catchiness={}",
        prompt, model.genre, model.vibe, model.tempo_category, model.key, model.catchiness
    );
    model
}
