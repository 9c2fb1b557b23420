// Sibling models: small independent perturbations of an existing model.
//
// Each roll is independent: 30% re-draw the vibe, 20% re-draw the tempo
// category, 40% re-draw the progression from the same genre's table. The
// catchiness always moves by a uniform step in [-2, +2] and is clamped back
// into [1, 10]. Genre, key and structure are left alone, so a variation
// still sounds like the same song family.

use crate::params::{ParameterModel, clamp_catchiness, pick_progression};
use crate::theory::{TempoCategory, Vibe};
use log::debug;
use songsmith_prng::SongRng;

const VIBE_REROLL: f64 = 0.3;
const TEMPO_REROLL: f64 = 0.2;
const PROGRESSION_REROLL: f64 = 0.4;
const CATCHINESS_STEP: i32 = 2;

/// Apply a catchiness step and clamp.
pub fn shift_catchiness(catchiness: u8, delta: i32) -> u8 {
    clamp_catchiness(catchiness as i32 + delta)
}

/// Derive a sibling of `original`. The original is not modified.
pub fn create_variation(original: &ParameterModel, rng: &mut SongRng) -> ParameterModel {
    let mut variation = original.clone();

    if rng.chance(VIBE_REROLL) {
        variation.vibe = *rng.choose(&Vibe::ALL).unwrap_or(&original.vibe);
    }
    if rng.chance(TEMPO_REROLL) {
        variation.tempo_category = *rng
            .choose(&TempoCategory::ALL)
            .unwrap_or(&original.tempo_category);
    }
    if rng.chance(PROGRESSION_REROLL) {
        variation.chord_progression = pick_progression(variation.genre, rng);
    }
    let delta = rng.range_i32_inclusive(-CATCHINESS_STEP, CATCHINESS_STEP);
    variation.catchiness = shift_catchiness(original.catchiness, delta);

    debug!(
        "variation: vibe {} -> {}, tempo {} -> {}, catchiness {} -> {}",
        original.vibe,
        variation.vibe,
        original.tempo_category,
        variation.tempo_category,
        original.catchiness,
        variation.catchiness
    );
    variation
}
