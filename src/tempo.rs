#![doc = r#"
Piecewise-constant mapping from tick positions to wall-clock milliseconds

A MIDI file measures time in ticks of the header's quarter-note resolution;
the tempo, in microseconds per quarter note, can change anywhere in the
stream. [`TempoMap`] holds one segment per Set Tempo event (plus the
implicit 120 bpm default at tick 0) and converts tick positions and tick
durations to milliseconds.
"#]

/// Microseconds per quarter note assumed until a Set Tempo event arrives:
/// 120 beats per minute.
pub const DEFAULT_MICROS_PER_QUARTER: u32 = 500_000;

/// One stretch of constant tempo.
///
/// `start_millis` is the wall-clock position of `start_tick`, computed with
/// the tempo of the preceding segment, which keeps the mapping continuous
/// across every tempo change.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoSegment {
    start_tick: u64,
    start_millis: f64,
    micros_per_quarter: u32,
}

impl TempoSegment {
    /// First tick this tempo applies to.
    pub const fn start_tick(&self) -> u64 {
        self.start_tick
    }

    /// Wall-clock position of [`start_tick`](Self::start_tick).
    pub const fn start_millis(&self) -> f64 {
        self.start_millis
    }

    /// The tempo value, in microseconds per quarter note.
    pub const fn micros_per_quarter(&self) -> u32 {
        self.micros_per_quarter
    }
}

#[doc = r#"
An ordered, append-only sequence of tempo segments for one timeline.

Built once per file from the Set Tempo events of all tracks merged in tick
order; see [`MidiFile::timed_notes`](crate::file::MidiFile::timed_notes).
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoMap {
    segments: Vec<TempoSegment>,
    ticks_per_quarter_note: u16,
}

impl TempoMap {
    /// A map holding the default tempo for the whole timeline.
    ///
    /// This is the tempo-override policy: in-stream tempo changes are never
    /// recorded, so the initial 120 bpm applies everywhere.
    pub fn fixed(ticks_per_quarter_note: u16) -> Self {
        Self {
            segments: vec![TempoSegment {
                start_tick: 0,
                start_millis: 0.0,
                micros_per_quarter: DEFAULT_MICROS_PER_QUARTER,
            }],
            ticks_per_quarter_note,
        }
    }

    /// Build a map from tempo changes in tick order.
    ///
    /// Each change appends a segment; a change at an already-seen tick
    /// shadows the earlier one, since lookups take the latest segment at or
    /// before a tick.
    pub fn build(
        ticks_per_quarter_note: u16,
        changes: impl IntoIterator<Item = (u64, u32)>,
    ) -> Self {
        let mut map = Self::fixed(ticks_per_quarter_note);
        for (tick, micros_per_quarter) in changes {
            map.record_change(tick, micros_per_quarter);
        }
        map
    }

    /// The tick resolution the map converts with.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.ticks_per_quarter_note
    }

    /// The segments of the map, in tick order.
    pub fn segments(&self) -> &[TempoSegment] {
        &self.segments
    }

    fn last_segment(&self) -> &TempoSegment {
        // the map is never empty: fixed() seeds the default segment
        &self.segments[self.segments.len() - 1]
    }

    fn record_change(&mut self, start_tick: u64, micros_per_quarter: u32) {
        debug_assert!(start_tick >= self.last_segment().start_tick);
        // flush elapsed time under the previous tempo up to the change tick
        let start_millis = self.millis_at(start_tick);
        self.segments.push(TempoSegment {
            start_tick,
            start_millis,
            micros_per_quarter,
        });
    }

    fn segment_at(&self, tick: u64) -> &TempoSegment {
        let next = self
            .segments
            .partition_point(|segment| segment.start_tick <= tick);
        // next >= 1: the seed segment starts at tick 0
        &self.segments[next - 1]
    }

    fn ticks_to_millis(&self, ticks: u64, micros_per_quarter: u32) -> f64 {
        ticks as f64 * f64::from(micros_per_quarter)
            / (f64::from(self.ticks_per_quarter_note) * 1000.0)
    }

    /// Wall-clock position of a tick.
    pub fn millis_at(&self, tick: u64) -> f64 {
        let segment = self.segment_at(tick);
        segment.start_millis
            + self.ticks_to_millis(tick - segment.start_tick, segment.micros_per_quarter)
    }

    /// Convert a tick duration starting at `start_tick` to milliseconds,
    /// using the tempo active at the start.
    pub fn duration_millis(&self, start_tick: u64, duration_ticks: u64) -> f64 {
        let segment = self.segment_at(start_tick);
        self.ticks_to_millis(duration_ticks, segment.micros_per_quarter)
    }

    /// The tempo active at a tick, in microseconds per quarter note.
    pub fn micros_per_quarter_at(&self, tick: u64) -> u32 {
        self.segment_at(tick).micros_per_quarter
    }
}
