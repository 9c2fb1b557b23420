// Harmony track: one block chord per progression entry, every section.
//
// Jazz rolls each chord, delaying every successive tone by 0.1 beats.
// Electronic plays shorter 1.5-beat stabs; everything else holds for the
// full 2 beats. The chord cursor always moves on by CHORD_SPACING beats, so
// electronic stabs leave half a beat of air before the next chord. The bass
// track advances at the same rate and stays chord-aligned.
//
// Louder chords for catchier songs: velocity = 70 + 2 × catchiness.
// Learned songs play straight 2-beat blocks at velocity 70 for eight passes.

use crate::params::ParameterModel;
use crate::score::{NoteEvent, TrackId};
use crate::theory::{Genre, chord_voicing};

/// Beats between chord onsets, for harmony and bass alike.
pub const CHORD_SPACING: f64 = 2.0;

/// Progression passes of the learned renderer.
pub const LEARNED_PASSES: usize = 8;

const ROLL_DELAY: f64 = 0.1;
const LEARNED_VELOCITY: u32 = 70;

/// How long each chord tone sounds for this genre.
pub fn chord_duration(genre: Genre) -> f64 {
    match genre {
        Genre::Electronic => 1.5,
        _ => 2.0,
    }
}

pub fn generate(params: &ParameterModel) -> Vec<NoteEvent> {
    let voicing = Voicing {
        duration: chord_duration(params.genre),
        velocity: 70 + 2 * params.catchiness as u32,
        roll: if params.genre == Genre::Jazz {
            ROLL_DELAY
        } else {
            0.0
        },
    };
    play_blocks(&params.chord_progression, params.section_count(), &voicing)
}

/// The learned renderer's harmony: plain blocks, fixed velocity.
pub fn generate_learned(progression: &[String]) -> Vec<NoteEvent> {
    let voicing = Voicing {
        duration: CHORD_SPACING,
        velocity: LEARNED_VELOCITY,
        roll: 0.0,
    };
    play_blocks(progression, LEARNED_PASSES, &voicing)
}

struct Voicing {
    duration: f64,
    velocity: u32,
    /// Delay between successive chord tones.
    roll: f64,
}

fn play_blocks(progression: &[String], passes: usize, voicing: &Voicing) -> Vec<NoteEvent> {
    let mut events = Vec::new();
    let mut time = 0.0;
    for _pass in 0..passes {
        for chord in progression {
            for (i, &pitch) in chord_voicing(chord).iter().enumerate() {
                events.push(NoteEvent::new(
                    TrackId::Harmony,
                    pitch,
                    time + i as f64 * voicing.roll,
                    voicing.duration,
                    voicing.velocity,
                ));
            }
            time += CHORD_SPACING;
        }
    }
    events
}
