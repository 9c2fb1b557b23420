// Drum track: a genre-selected 16-slot bar pattern repeated for four bars
// per structural section.
//
// A bar is 16 sixteenth-note slots of 0.25 beats. Each kit piece fires on
// the slots where `slot % period` is one of its offsets:
//
//   electronic  kick every 4th slot, snare on 4 of 8, hi-hat on odd slots
//   rock        kick on 0 of 8, snare on 4 of 8, hi-hat on 2 of 4
//   other       kick on 0 and 6 of 8, snare on 4 of 8, hi-hat on odd slots
//
// The bar cursor moves 4 beats per bar regardless of what was struck.
// Learned songs always play the "other" pattern for a fixed 32 bars.

use crate::params::ParameterModel;
use crate::score::{NoteEvent, TrackId};
use crate::theory::{Genre, drum_note};

pub const SLOTS_PER_BAR: usize = 16;
pub const SLOT_BEATS: f64 = 0.25;
pub const BARS_PER_SECTION: usize = 4;

/// Bar count of the learned renderer.
pub const LEARNED_BARS: usize = 32;

const BAR_BEATS: f64 = SLOTS_PER_BAR as f64 * SLOT_BEATS;

/// One kit piece within a bar pattern.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub note: u8,
    pub period: usize,
    pub offsets: &'static [usize],
    pub velocity: u32,
    pub duration: f64,
}

impl Hit {
    pub fn fires_on(&self, slot: usize) -> bool {
        self.offsets.contains(&(slot % self.period))
    }
}

const fn kick(period: usize, offsets: &'static [usize]) -> Hit {
    Hit {
        note: drum_note::KICK,
        period,
        offsets,
        velocity: 100,
        duration: 0.25,
    }
}

const BACKBEAT_SLOT: &[usize] = &[4];

const fn snare(velocity: u32) -> Hit {
    Hit {
        note: drum_note::SNARE,
        period: 8,
        offsets: BACKBEAT_SLOT,
        velocity,
        duration: 0.25,
    }
}

const fn hihat(period: usize, offsets: &'static [usize], velocity: u32) -> Hit {
    Hit {
        note: drum_note::CLOSED_HIHAT,
        period,
        offsets,
        velocity,
        duration: 0.125,
    }
}

const FOUR_ON_THE_FLOOR: &[Hit] = &[kick(4, &[0]), snare(90), hihat(2, &[1], 70)];
const ROCK_BEAT: &[Hit] = &[kick(8, &[0]), snare(95), hihat(4, &[2], 60)];
const BACKBEAT: &[Hit] = &[kick(8, &[0, 6]), snare(90), hihat(2, &[1], 60)];

/// The bar pattern for a genre, in per-slot strike order.
pub fn pattern(genre: Genre) -> &'static [Hit] {
    match genre {
        Genre::Electronic => FOUR_ON_THE_FLOOR,
        Genre::Rock => ROCK_BEAT,
        _ => BACKBEAT,
    }
}

pub fn generate(params: &ParameterModel) -> Vec<NoteEvent> {
    play_bars(pattern(params.genre), params.section_count() * BARS_PER_SECTION)
}

/// The learned renderer's drums: the backbeat pattern for `LEARNED_BARS`.
pub fn generate_learned() -> Vec<NoteEvent> {
    play_bars(BACKBEAT, LEARNED_BARS)
}

fn play_bars(hits: &[Hit], total_bars: usize) -> Vec<NoteEvent> {
    let mut events = Vec::new();
    let mut bar_start = 0.0;
    for _bar in 0..total_bars {
        for slot in 0..SLOTS_PER_BAR {
            let time = bar_start + slot as f64 * SLOT_BEATS;
            for hit in hits.iter().filter(|h| h.fires_on(slot)) {
                events.push(NoteEvent::new(
                    TrackId::Drums,
                    hit.note,
                    time,
                    hit.duration,
                    hit.velocity,
                ));
            }
        }
        bar_start += BAR_BEATS;
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use songsmith_prng::SongRng;

    fn bar_slots(genre: Genre, note: u8) -> Vec<usize> {
        (0..SLOTS_PER_BAR)
            .filter(|&s| pattern(genre).iter().any(|h| h.note == note && h.fires_on(s)))
            .collect()
    }

    fn model(genre: Genre, sections: usize) -> ParameterModel {
        let mut m = ParameterModel::defaults(&mut SongRng::new(0));
        m.genre = genre;
        m.structure = vec!["verse".to_string(); sections];
        m
    }

    #[test]
    fn test_electronic_pattern() {
        assert_eq!(bar_slots(Genre::Electronic, drum_note::KICK), vec![0, 4, 8, 12]);
        assert_eq!(bar_slots(Genre::Electronic, drum_note::SNARE), vec![4, 12]);
        assert_eq!(
            bar_slots(Genre::Electronic, drum_note::CLOSED_HIHAT),
            vec![1, 3, 5, 7, 9, 11, 13, 15]
        );
    }

    #[test]
    fn test_rock_pattern() {
        assert_eq!(bar_slots(Genre::Rock, drum_note::KICK), vec![0, 8]);
        assert_eq!(bar_slots(Genre::Rock, drum_note::SNARE), vec![4, 12]);
        assert_eq!(bar_slots(Genre::Rock, drum_note::CLOSED_HIHAT), vec![2, 6, 10, 14]);
    }

    #[test]
    fn test_default_pattern() {
        for genre in [Genre::Pop, Genre::Jazz, Genre::Blues, Genre::Happy] {
            assert_eq!(bar_slots(genre, drum_note::KICK), vec![0, 6, 8, 14]);
            assert_eq!(bar_slots(genre, drum_note::SNARE), vec![4, 12]);
            assert_eq!(bar_slots(genre, drum_note::CLOSED_HIHAT).len(), 8);
        }
    }

    #[test]
    fn test_song_spans_four_bars_per_section() {
        let m = model(Genre::Pop, 3);
        let events = generate(&m);
        let last = events.iter().map(|e| e.start).fold(0.0, f64::max);
        assert!(last < 3.0 * 4.0 * 4.0);
        assert!(last >= 11.0 * 4.0);
        // 4 kicks + 2 snares + 8 hats per bar.
        assert_eq!(events.len(), 12 * 14);
        assert!(events.iter().all(|e| e.channel == 9));
    }

    #[test]
    fn test_only_kick_snare_and_hihat_sound() {
        for genre in Genre::ALL {
            let events = generate(&model(genre, 8));
            assert!(events.iter().all(|e| {
                [drum_note::KICK, drum_note::SNARE, drum_note::CLOSED_HIHAT].contains(&e.pitch)
            }));
        }
        let default_song = generate(&ParameterModel::defaults(&mut SongRng::new(4)));
        assert_eq!(default_song.len(), 32 * 14);
        assert_eq!(default_song[0].pitch, drum_note::KICK);
    }

    #[test]
    fn test_hihat_is_shorter_than_slot() {
        let events = generate(&model(Genre::Electronic, 1));
        for e in events.iter().filter(|e| e.pitch == drum_note::CLOSED_HIHAT) {
            assert_eq!(e.duration, 0.125);
            assert_eq!(e.velocity, 70);
        }
    }

    #[test]
    fn test_learned_drums_are_32_backbeat_bars() {
        let events = generate_learned();
        assert_eq!(events.len(), LEARNED_BARS * 14);
        let last_bar = events.iter().map(|e| e.start).fold(0.0, f64::max);
        assert!(last_bar >= 31.0 * 4.0 && last_bar < 32.0 * 4.0);
        for e in events.iter().filter(|e| e.pitch == drum_note::CLOSED_HIHAT) {
            assert_eq!(e.velocity, 60);
        }
        assert_eq!(events, generate(&model(Genre::Pop, 8)));
    }
}
