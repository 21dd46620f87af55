#![doc = r#"
Duration-bearing note values produced by the decode pipeline
"#]

use core::fmt;

#[doc = r#"
A sounding note, reconstructed by pairing a note-on with its later
note-off.

The start tick lives on the [`TrackEvent`](crate::file::TrackEvent) that
carries the note; the duration is the tick distance to the matched
note-off, or to the last event of the track when no note-off was found.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    channel: u8,
    key: u8,
    velocity: u8,
    duration_ticks: u64,
}

impl Note {
    pub(crate) const fn new(channel: u8, key: u8, velocity: u8, duration_ticks: u64) -> Self {
        Self {
            channel,
            key,
            velocity,
            duration_ticks,
        }
    }

    /// The channel the note sounds on (0-15).
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Key number (0-127).
    pub const fn key(&self) -> u8 {
        self.key
    }

    /// Strike velocity; always greater than zero.
    pub const fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Ticks from note-on to the matched note-off.
    pub const fn duration_ticks(&self) -> u64 {
        self.duration_ticks
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Note: channel {} duration {} pitch {} velocity {}",
            self.channel, self.duration_ticks, self.key, self.velocity
        )
    }
}

#[doc = r#"
A note whose position and duration have been mapped to wall-clock
milliseconds through the tempo map.

Produced by [`MidiFile::timed_notes`](crate::file::MidiFile::timed_notes);
never mutated afterward.
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedNote {
    channel: u8,
    key: u8,
    velocity: u8,
    start_ticks: u64,
    duration_ticks: u64,
    start_millis: f64,
    duration_millis: f64,
}

impl TimedNote {
    pub(crate) const fn new(
        channel: u8,
        key: u8,
        velocity: u8,
        start_ticks: u64,
        duration_ticks: u64,
        start_millis: f64,
        duration_millis: f64,
    ) -> Self {
        Self {
            channel,
            key,
            velocity,
            start_ticks,
            duration_ticks,
            start_millis,
            duration_millis,
        }
    }

    /// The channel the note sounds on (0-15).
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Key number (0-127).
    pub const fn key(&self) -> u8 {
        self.key
    }

    /// Strike velocity; always greater than zero.
    pub const fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Absolute tick of the note-on.
    pub const fn start_ticks(&self) -> u64 {
        self.start_ticks
    }

    /// Ticks from note-on to note-off.
    pub const fn duration_ticks(&self) -> u64 {
        self.duration_ticks
    }

    /// Note start in milliseconds from the start of the timeline.
    pub const fn start_millis(&self) -> f64 {
        self.start_millis
    }

    /// Sounding length in milliseconds, converted with the tempo active at
    /// the note's start.
    pub const fn duration_millis(&self) -> f64 {
        self.duration_millis
    }
}
