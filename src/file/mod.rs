#![doc = r#"
Rusty representation of a decoded [`MidiFile`]
"#]

mod format;
pub use format::*;

mod header;
use header::RawHeader;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::{
    error::{DecodeError, DecodeErrorKind, DecodeResult},
    filter::DEFAULT_REPEAT_WINDOW_MILLIS,
    message::{MetaEvent, TrackMessage},
    note::TimedNote,
    reader::Reader,
    tempo::TempoMap,
};
use core::fmt;
use std::{fs, path::Path};

#[doc = r#"
A fully decoded MIDI file: the composition.

Holds the header classification plus every track as an ordered event
sequence with absolute tick positions and consolidated notes. Built in one
pass by [`MidiFile::parse`] and read-only afterward; a decode either
returns a complete file or a single [`DecodeError`], never a partial
result.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    format: FormatType,
    timing: Timing,
    tracks: Vec<Track>,
}

#[doc = r#"
Caller policy for the tick-to-millisecond conversion and note post-passes.
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    /// Hold the initial 120 bpm default for the whole file, ignoring every
    /// in-stream Set Tempo event.
    pub ignore_tempo_changes: bool,
    /// Window handed to [`filter_repeats`](crate::filter::filter_repeats).
    pub repeat_window_millis: f64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            ignore_tempo_changes: false,
            repeat_window_millis: DEFAULT_REPEAT_WINDOW_MILLIS,
        }
    }
}

impl MidiFile {
    /// Read and decode the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DecodeResult<Self> {
        let bytes = fs::read(path).map_err(DecodeError::unreadable)?;
        Self::parse(&bytes)
    }

    /// Decode a complete SMF byte stream.
    pub fn parse(bytes: &[u8]) -> DecodeResult<Self> {
        let mut reader = Reader::new(bytes);
        let header = RawHeader::read(&mut reader)?;

        let mut tracks = Vec::with_capacity(usize::from(header.track_count));
        for _ in 0..header.track_count {
            reader.skip_to_next_track()?;
            let mut track = Track::decode(&mut reader)?;
            track.resolve_absolute_ticks();
            track.consolidate_note_offs();
            tracks.push(track);
        }

        Ok(Self {
            format: header.format,
            timing: header.timing,
            tracks,
        })
    }

    /// Returns the format type of the file.
    pub const fn format_type(&self) -> FormatType {
        self.format
    }

    /// Returns the header timing division.
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Returns the number of decoded tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Returns the track list.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Returns one track by its 0-based index.
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Returns a track's name, from its first Track Name meta event.
    pub fn track_name(&self, index: usize) -> Option<&str> {
        self.tracks.get(index).and_then(Track::name)
    }

    /// Convert every consolidated note to wall-clock milliseconds.
    ///
    /// Builds one tempo map for the file from the Set Tempo events of all
    /// tracks merged in tick order (or a fixed 120 bpm map under the
    /// tempo-override policy) and returns the notes sorted by start time.
    /// Fails with
    /// [`UnsupportedTiming`](crate::error::DecodeErrorKind::UnsupportedTiming)
    /// if the file declares SMPTE timing.
    pub fn timed_notes(&self, options: &DecodeOptions) -> DecodeResult<Vec<TimedNote>> {
        let ppq = match self.timing {
            Timing::TicksPerQuarterNote(ppq) => ppq,
            Timing::Smpte(smpte) => {
                return Err(DecodeError::new(
                    header::DIVISION_OFFSET,
                    DecodeErrorKind::UnsupportedTiming {
                        frames_per_second: smpte.frames_per_second(),
                        subframes: smpte.subframes(),
                    },
                ));
            }
        };

        let map = if options.ignore_tempo_changes {
            TempoMap::fixed(ppq)
        } else {
            TempoMap::build(ppq, self.tempo_changes())
        };

        let mut notes = Vec::new();
        for track in &self.tracks {
            for (start_ticks, note) in track.notes() {
                notes.push(TimedNote::new(
                    note.channel(),
                    note.key(),
                    note.velocity(),
                    start_ticks,
                    note.duration_ticks(),
                    map.millis_at(start_ticks),
                    map.duration_millis(start_ticks, note.duration_ticks()),
                ));
            }
        }
        notes.sort_by(|a, b| a.start_millis().total_cmp(&b.start_millis()));
        Ok(notes)
    }

    /// Set Tempo events of all tracks, merged in tick order.
    fn tempo_changes(&self) -> Vec<(u64, u32)> {
        let mut changes: Vec<(u64, u32)> = self
            .tracks
            .iter()
            .flat_map(|track| track.events())
            .filter_map(|event| match event.message() {
                TrackMessage::Meta(MetaEvent::Tempo(micros)) => Some((event.ticks(), *micros)),
                _ => None,
            })
            .collect();
        changes.sort_by_key(|(tick, _)| *tick);
        changes
    }
}

/// The human-readable event dump. Diagnostic only; the layout is not part
/// of the data contract.
impl fmt::Display for MidiFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Format: {}", self.format)?;
        match self.timing {
            Timing::TicksPerQuarterNote(ppq) => writeln!(f, "Timing division: {ppq} ppq")?,
            Timing::Smpte(smpte) => writeln!(
                f,
                "SMPTE timing: {} fps, {} subframes",
                smpte.frames_per_second(),
                smpte.subframes()
            )?,
        }
        writeln!(f, "Tracks: {}", self.tracks.len())?;
        for (index, track) in self.tracks.iter().enumerate() {
            match track.name() {
                Some(name) => writeln!(f, "Start of track {}: \"{name}\"", index + 1)?,
                None => writeln!(f, "Start of track {}", index + 1)?,
            }
            for event in track.events() {
                writeln!(f, "{:>8}: {}", event.ticks(), event.message())?;
            }
        }
        Ok(())
    }
}
