// Bass track: a short genre-shaped figure on each chord's root.
//
// Figures are (semitone offset from root, duration) lists laid end to end
// from the chord onset. Electronic pulses eight 16th-note roots per chord;
// the other genres play four 8th notes: jazz walks up (root, +2, +4, +5),
// rock jumps to the fifth and fourth, pop returns to the root. The cursor
// advances by the same CHORD_SPACING as the harmony track.
//
// Learned songs always play the root-fifth figure at velocity 90, eight
// passes through the progression.

use crate::harmony::{CHORD_SPACING, LEARNED_PASSES};
use crate::params::ParameterModel;
use crate::score::{NoteEvent, TrackId};
use crate::theory::{Genre, chord_root};

const PULSE: &[(u8, f64)] = &[(0, 0.25); 8];
const WALKING: &[(u8, f64)] = &[(0, 0.5), (2, 0.5), (4, 0.5), (5, 0.5)];
const ROCK: &[(u8, f64)] = &[(0, 0.5), (0, 0.5), (7, 0.5), (5, 0.5)];
const ROOT_FIFTH: &[(u8, f64)] = &[(0, 0.5), (0, 0.5), (7, 0.5), (0, 0.5)];

const LEARNED_VELOCITY: u32 = 90;

/// The per-chord figure for a genre.
pub fn figure(genre: Genre) -> &'static [(u8, f64)] {
    match genre {
        Genre::Electronic => PULSE,
        Genre::Jazz => WALKING,
        Genre::Rock => ROCK,
        _ => ROOT_FIFTH,
    }
}

pub fn generate(params: &ParameterModel) -> Vec<NoteEvent> {
    let velocity = 90 + params.catchiness as u32;
    play_figure(
        &params.chord_progression,
        params.section_count(),
        figure(params.genre),
        velocity,
    )
}

/// The learned renderer's bass line.
pub fn generate_learned(progression: &[String]) -> Vec<NoteEvent> {
    play_figure(progression, LEARNED_PASSES, ROOT_FIFTH, LEARNED_VELOCITY)
}

fn play_figure(
    progression: &[String],
    passes: usize,
    shape: &[(u8, f64)],
    velocity: u32,
) -> Vec<NoteEvent> {
    let mut events = Vec::new();
    let mut time = 0.0;
    for _pass in 0..passes {
        for chord in progression {
            let root = chord_root(chord);
            let mut offset = 0.0;
            for &(interval, duration) in shape {
                events.push(NoteEvent::new(
                    TrackId::Bass,
                    root + interval,
                    time + offset,
                    duration,
                    velocity,
                ));
                offset += duration;
            }
            time += CHORD_SPACING;
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use songsmith_prng::SongRng;

    fn model(genre: Genre) -> ParameterModel {
        let mut m = ParameterModel::defaults(&mut SongRng::new(0));
        m.genre = genre;
        m.chord_progression = genre.progressions()[0].iter().map(|c| c.to_string()).collect();
        m
    }

    #[test]
    fn test_notes_per_chord_by_genre() {
        for genre in Genre::ALL {
            let m = model(genre);
            let events = generate(&m);
            let chords = m.section_count() * m.chord_progression.len();
            if genre == Genre::Electronic {
                assert_eq!(events.len(), chords * 8);
                assert!(events.iter().all(|e| e.duration == 0.25));
            } else {
                assert_eq!(events.len(), chords * 4, "{genre}");
                assert!(events.iter().all(|e| e.duration == 0.5));
            }
        }
    }

    #[test]
    fn test_figures_are_back_to_back_within_a_chord() {
        for genre in Genre::ALL {
            let events = generate(&model(genre));
            let per_chord = figure(genre).len();
            for chord in events.chunks(per_chord) {
                assert_eq!(chord[0].start % 2.0, 0.0);
                for pair in chord.windows(2) {
                    assert_eq!(pair[0].end(), pair[1].start);
                }
            }
        }
    }

    #[test]
    fn test_walking_and_rock_shapes() {
        let mut m = model(Genre::Jazz);
        m.chord_progression = vec!["C7".into()];
        let pitches: Vec<u8> = generate(&m)[..4].iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![36, 38, 40, 41]);

        m.genre = Genre::Rock;
        m.chord_progression = vec!["G".into()];
        let pitches: Vec<u8> = generate(&m)[..4].iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![43, 43, 50, 48]);

        m.genre = Genre::Pop;
        let pitches: Vec<u8> = generate(&m)[..4].iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![43, 43, 50, 43]);
    }

    #[test]
    fn test_chord_onsets_match_harmony_spacing() {
        let m = model(Genre::Pop);
        let events = generate(&m);
        let onsets: Vec<f64> = events.iter().step_by(4).map(|e| e.start).collect();
        let expected: Vec<f64> = (0..onsets.len()).map(|i| i as f64 * CHORD_SPACING).collect();
        assert_eq!(onsets, expected);
    }

    #[test]
    fn test_learned_bass_is_root_fifth_at_fixed_velocity() {
        let progression = vec!["Am".to_string(), "F".to_string()];
        let events = generate_learned(&progression);
        assert_eq!(events.len(), LEARNED_PASSES * 2 * 4);
        assert!(events.iter().all(|e| e.velocity == 90 && e.duration == 0.5));
        let pitches: Vec<u8> = events[..8].iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![33, 33, 40, 33, 41, 41, 48, 41]);
        assert_eq!(events[8].start, 4.0);
    }

    #[test]
    fn test_velocity_and_fallback_root() {
        let mut m = model(Genre::Pop);
        m.catchiness = 9;
        m.chord_progression = vec!["Q#dim".into()];
        let events = generate(&m);
        assert_eq!(events[0].pitch, 36);
        assert!(events.iter().all(|e| e.velocity == 99));
    }
}
