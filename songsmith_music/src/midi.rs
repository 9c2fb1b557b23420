// MIDI output: the note sink that turns beat-timed events into an SMF file.
//
// `NoteSink` is the narrow interface a `Composition` writes into (track
// names, tempo, notes). `MidiFile` implements it on top of the `midly`
// crate, producing Standard MIDI File format 1 with one MIDI track per sink
// track and 480 ticks per quarter note. A beat is a quarter note.
//
// Notes are buffered with absolute times and only converted to delta-timed
// track events in `serialize`, where each track is sorted by tick with meta
// events first, then note-offs, then note-ons. Ending a note before starting
// the next one at the same tick keeps back-to-back repeats of one pitch (bass
// pulses, repeated chord tones) from swallowing each other.
//
// `write_atomic` puts finished bytes on disk through a temporary sibling
// file and a rename, so a failed write never leaves a truncated song.

use crate::error::Result;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::fs;
use std::path::{Path, PathBuf};

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Receiver for a rendered song. Times are in beats.
pub trait NoteSink {
    fn add_track_name(&mut self, track: usize, time: f64, name: &str);
    fn add_tempo(&mut self, track: usize, time: f64, bpm: u16);
    fn add_note(
        &mut self,
        track: usize,
        channel: u8,
        pitch: u8,
        start: f64,
        duration: f64,
        velocity: u8,
    );
    /// Encode everything added so far.
    fn serialize(&self) -> Result<Vec<u8>>;
}

/// Convert a beat position to ticks, rounding to the nearest tick.
pub fn beats_to_ticks(beats: f64) -> u32 {
    (beats.max(0.0) * TICKS_PER_QUARTER as f64).round() as u32
}

#[derive(Debug, Clone)]
struct PendingNote {
    channel: u8,
    pitch: u8,
    start: u32,
    end: u32,
    velocity: u8,
}

#[derive(Debug, Clone, Default)]
struct TrackBuffer {
    names: Vec<(u32, String)>,
    /// (tick, microseconds per quarter note)
    tempos: Vec<(u32, u32)>,
    notes: Vec<PendingNote>,
}

/// Largest tempo a set-tempo meta event can carry (24 bits), about 3.6 BPM.
const MAX_TEMPO_MICROS: u32 = 0xFF_FFFF;

/// In-memory multi-track SMF builder.
#[derive(Debug, Clone, Default)]
pub struct MidiFile {
    tracks: Vec<TrackBuffer>,
}

impl MidiFile {
    pub fn new(num_tracks: usize) -> Self {
        MidiFile {
            tracks: vec![TrackBuffer::default(); num_tracks],
        }
    }

    /// Buffer for `track`, growing the track list if needed.
    fn track_mut(&mut self, track: usize) -> &mut TrackBuffer {
        if track >= self.tracks.len() {
            self.tracks.resize_with(track + 1, TrackBuffer::default);
        }
        &mut self.tracks[track]
    }
}

impl NoteSink for MidiFile {
    fn add_track_name(&mut self, track: usize, time: f64, name: &str) {
        self.track_mut(track)
            .names
            .push((beats_to_ticks(time), name.to_string()));
    }

    fn add_tempo(&mut self, track: usize, time: f64, bpm: u16) {
        let micros = (60_000_000 / bpm.max(1) as u32).min(MAX_TEMPO_MICROS);
        self.track_mut(track).tempos.push((beats_to_ticks(time), micros));
    }

    fn add_note(
        &mut self,
        track: usize,
        channel: u8,
        pitch: u8,
        start: f64,
        duration: f64,
        velocity: u8,
    ) {
        let start_tick = beats_to_ticks(start);
        let end_tick = beats_to_ticks(start + duration).max(start_tick + 1);
        self.track_mut(track).notes.push(PendingNote {
            channel: channel.min(15),
            pitch: pitch.min(127),
            start: start_tick,
            end: end_tick,
            velocity: velocity.min(127),
        });
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let mut smf = Smf::new(Header::new(
            Format::Parallel,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
        ));
        for buffer in &self.tracks {
            smf.tracks.push(encode_track(buffer));
        }
        let mut bytes = Vec::new();
        smf.write_std(&mut bytes)?;
        Ok(bytes)
    }
}

/// Sort order for events sharing a tick.
const META: u8 = 0;
const NOTE_OFF: u8 = 1;
const NOTE_ON: u8 = 2;

fn encode_track(buffer: &TrackBuffer) -> Track<'_> {
    let mut timed: Vec<(u32, u8, TrackEventKind<'_>)> =
        Vec::with_capacity(buffer.names.len() + buffer.tempos.len() + buffer.notes.len() * 2);

    for (tick, name) in &buffer.names {
        timed.push((*tick, META, TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes()))));
    }
    for &(tick, micros) in &buffer.tempos {
        timed.push((tick, META, TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros)))));
    }
    for note in &buffer.notes {
        let channel = u4::new(note.channel);
        timed.push((
            note.start,
            NOTE_ON,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: u7::new(note.pitch),
                    vel: u7::new(note.velocity),
                },
            },
        ));
        timed.push((
            note.end,
            NOTE_OFF,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: u7::new(note.pitch),
                    vel: u7::new(0),
                },
            },
        ));
    }
    timed.sort_by_key(|(tick, order, _)| (*tick, *order));

    let mut track: Track<'_> = Vec::with_capacity(timed.len() + 1);
    let mut last_tick = 0;
    for (tick, _, kind) in timed {
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind,
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}

/// Write `bytes` to `path` via a temporary sibling and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = partial_path(path);
    let result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}
