#[doc = r#"
The header timing division.

The top bit of the raw 16-bit field selects between tick-per-quarter-note
resolution and SMPTE frame timing.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta times count pulses of a quarter note (1-32767)
    TicksPerQuarterNote(u16),
    /// Delta times count subframes of an SMPTE frame
    Smpte(SmpteTiming),
}

impl Timing {
    pub(crate) fn from_raw(raw: u16) -> Self {
        if raw & 0x8000 == 0 {
            Self::TicksPerQuarterNote(raw)
        } else {
            Self::Smpte(SmpteTiming {
                frames_per_second: (256 - (raw >> 8)) as u8,
                subframes: (raw & 0xFF) as u8,
            })
        }
    }

    /// Returns Some if the timing is defined as ticks per quarter note.
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            Self::Smpte(_) => None,
        }
    }

    /// True if the file declares SMPTE timing.
    pub const fn is_smpte(&self) -> bool {
        matches!(self, Self::Smpte(_))
    }
}

/// SMPTE timing parameters from the header division field.
///
/// Tick-to-millisecond conversion is tempo-based and does not apply to
/// SMPTE-timed files; asking such a file for timed notes fails with
/// [`UnsupportedTiming`](crate::error::DecodeErrorKind::UnsupportedTiming).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteTiming {
    pub(crate) frames_per_second: u8,
    pub(crate) subframes: u8,
}

impl SmpteTiming {
    /// Frames per second (24, 25, 29 or 30).
    pub const fn frames_per_second(&self) -> u8 {
        self.frames_per_second
    }

    /// Subframe resolution within each frame.
    pub const fn subframes(&self) -> u8 {
        self.subframes
    }
}
