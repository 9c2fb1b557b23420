// Melody track: a vibe-selected interval pattern walked through every section.
//
// One pattern is drawn from the vibe's table for the whole song. Catchier
// songs repeat the opening of the pattern as a hook: catchiness 8+ appends
// the first three steps and then the whole pattern again, 6-7 appends the
// first two steps, anything lower plays the pattern as written.
//
// Each section restarts the pitch cursor at the key's base pitch, shifted up
// by 0, 2 or 4 semitones (section index mod 3) so repeated sections differ.
// The pattern is walked twice per section; every step is added to the cursor
// and the result is clamped to [MIN_PITCH, MAX_PITCH] before the note is
// emitted. Notes are strictly back to back.
//
// Learned patterns (`render_learned`) are played differently: unextended,
// from C4 whatever the key, over a fixed four sections that climb 2
// semitones each, with short note values and a softer velocity range.

use crate::params::ParameterModel;
use crate::score::{NoteEvent, TrackId};
use songsmith_prng::SongRng;

pub const MIN_PITCH: i32 = 48;
pub const MAX_PITCH: i32 = 84;

const PASSES_PER_SECTION: usize = 2;
const HOOK_DURATIONS: [f64; 4] = [0.5, 1.0, 1.5, 2.0];
const PLAIN_DURATIONS: [f64; 3] = [0.5, 1.0, 1.5];
const VELOCITY_RANGE: (i32, i32) = (85, 105);

/// Section count of the learned renderer.
pub const LEARNED_SECTIONS: usize = 4;
const LEARNED_BASE_PITCH: i32 = 60;
const LEARNED_SECTION_STEP: i32 = 2;
const LEARNED_VELOCITY_RANGE: (i32, i32) = (80, 100);

/// Per-render settings for `walk`.
struct Phrasing<'a> {
    durations: &'a [f64],
    velocity: (i32, i32),
}

/// Draw a pattern for the model's vibe and render the melody.
pub fn generate(params: &ParameterModel, rng: &mut SongRng) -> Vec<NoteEvent> {
    let table = params.vibe.patterns();
    let pattern = rng.choose(table).unwrap_or(&table[0]);
    render(params, pattern, rng)
}

/// Lengthen `pattern` according to catchiness.
pub fn extend_pattern(pattern: &[i8], catchiness: u8) -> Vec<i8> {
    let mut extended = pattern.to_vec();
    if catchiness >= 8 {
        extended.extend(pattern.iter().take(3));
        extended.extend_from_slice(pattern);
    } else if catchiness >= 6 {
        extended.extend(pattern.iter().take(2));
    }
    extended
}

/// Render the melody from an explicit interval pattern.
pub fn render(params: &ParameterModel, pattern: &[i8], rng: &mut SongRng) -> Vec<NoteEvent> {
    let steps = extend_pattern(pattern, params.catchiness);
    let durations: &[f64] = if params.catchiness >= 8 {
        &HOOK_DURATIONS
    } else {
        &PLAIN_DURATIONS
    };
    let base = params.key.base_pitch() as i32;
    let section_bases = (0..params.section_count()).map(|section| base + (section % 3) as i32 * 2);
    let phrasing = Phrasing {
        durations,
        velocity: VELOCITY_RANGE,
    };
    walk(&steps, section_bases, &phrasing, rng)
}

/// Render a learned pattern: four climbing sections from C4, unextended.
pub fn render_learned(pattern: &[i8], rng: &mut SongRng) -> Vec<NoteEvent> {
    let section_bases = (0..LEARNED_SECTIONS as i32)
        .map(|section| LEARNED_BASE_PITCH + section * LEARNED_SECTION_STEP);
    let phrasing = Phrasing {
        durations: &PLAIN_DURATIONS,
        velocity: LEARNED_VELOCITY_RANGE,
    };
    walk(pattern, section_bases, &phrasing, rng)
}

/// Walk `steps` twice from each section base, back to back.
fn walk(
    steps: &[i8],
    section_bases: impl Iterator<Item = i32>,
    phrasing: &Phrasing<'_>,
    rng: &mut SongRng,
) -> Vec<NoteEvent> {
    let (vel_lo, vel_hi) = phrasing.velocity;
    let mut events = Vec::new();
    let mut time = 0.0;
    for base in section_bases {
        let mut pitch = base;
        for _ in 0..PASSES_PER_SECTION {
            for &step in steps {
                pitch = (pitch + step as i32).clamp(MIN_PITCH, MAX_PITCH);
                let duration = *rng.choose(phrasing.durations).unwrap_or(&1.0);
                let velocity = rng.range_i32_inclusive(vel_lo, vel_hi);
                events.push(NoteEvent::new(
                    TrackId::Melody,
                    pitch as u8,
                    time,
                    duration,
                    velocity as u32,
                ));
                time += duration;
            }
        }
    }
    events
}
