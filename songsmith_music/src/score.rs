// Note events and the composed song that holds them.
//
// The generators (melody.rs, harmony.rs, bass.rs, drums.rs) each produce a
// flat list of `NoteEvent`s for one `TrackId`, with times in beats measured
// from the start of the song. A `Composition` bundles the four lists with
// the resolved tempo and hands them to a `NoteSink` (midi.rs) in one pass.
//
// Tracks never share a time cursor; they line up only because each one
// starts at beat 0 and the harmony and bass generators advance per chord at
// the same fixed rate.

use crate::midi::NoteSink;
use serde::{Deserialize, Serialize};

/// The four instrument tracks, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackId {
    Melody = 0,
    Harmony = 1,
    Bass = 2,
    Drums = 3,
}

impl TrackId {
    pub const ALL: [TrackId; 4] = [
        TrackId::Melody,
        TrackId::Harmony,
        TrackId::Bass,
        TrackId::Drums,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// MIDI channel (0-based). Drums sit on channel 9, the General MIDI
    /// percussion channel.
    pub fn channel(self) -> u8 {
        match self {
            TrackId::Melody => 0,
            TrackId::Harmony => 1,
            TrackId::Bass => 2,
            TrackId::Drums => 9,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TrackId::Melody => "Viral Melody",
            TrackId::Harmony => "Viral Harmony",
            TrackId::Bass => "Viral Bass",
            TrackId::Drums => "Viral Drums",
        }
    }
}

/// One sounding note. Times and durations are in beats (quarter notes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub track: u8,
    pub channel: u8,
    pub pitch: u8,
    pub start: f64,
    pub duration: f64,
    pub velocity: u8,
}

impl NoteEvent {
    /// Build an event on `track`'s own channel. Velocity is clamped to the
    /// MIDI range.
    pub fn new(track: TrackId, pitch: u8, start: f64, duration: f64, velocity: u32) -> Self {
        NoteEvent {
            track: track.index() as u8,
            channel: track.channel(),
            pitch,
            start,
            duration,
            velocity: velocity.min(127) as u8,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A rendered song: tempo plus one event list per track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub tempo_bpm: u16,
    /// Indexed by `TrackId::index()`.
    pub tracks: [Vec<NoteEvent>; 4],
}

impl Composition {
    pub fn new(tempo_bpm: u16) -> Self {
        Composition {
            tempo_bpm,
            tracks: Default::default(),
        }
    }

    pub fn events(&self, track: TrackId) -> &[NoteEvent] {
        &self.tracks[track.index()]
    }

    pub fn set_events(&mut self, track: TrackId, events: Vec<NoteEvent>) {
        self.tracks[track.index()] = events;
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(Vec::len).sum()
    }

    /// Beat at which the last note of any track stops sounding.
    pub fn length_beats(&self) -> f64 {
        self.tracks
            .iter()
            .flatten()
            .map(NoteEvent::end)
            .fold(0.0, f64::max)
    }

    /// Emit the whole song into `sink`: track names, the tempo on track 0,
    /// then every note.
    pub fn write_to(&self, sink: &mut dyn NoteSink) {
        for track in TrackId::ALL {
            sink.add_track_name(track.index(), 0.0, track.display_name());
        }
        sink.add_tempo(TrackId::Melody.index(), 0.0, self.tempo_bpm);
        for event in self.tracks.iter().flatten() {
            sink.add_note(
                event.track as usize,
                event.channel,
                event.pitch,
                event.start,
                event.duration,
                event.velocity,
            );
        }
    }
}
