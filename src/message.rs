#![doc = r#"
Typed representations of the events a track can carry

# Hierarchy
```text
                  |--------------|
                  | TrackMessage |
                  |--------------|
                 /    |       |   \
     ChannelVoice   Meta   SysEx   Note (after consolidation)
```
"#]

use core::fmt;
use num_enum::TryFromPrimitive;

use crate::{
    error::{DecodeError, DecodeResult},
    note::Note,
    reader::Reader,
};

/// Status byte values from the SMF grammar.
pub(crate) mod status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLY_AFTERTOUCH: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_AFTERTOUCH: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;
    pub const SYSTEM_EXCLUSIVE: u8 = 0xF0;
    pub const END_OF_EXCLUSIVE: u8 = 0xF7;
    pub const META_EVENT: u8 = 0xFF;

    /// High nibble selects the channel-voice message type.
    pub const MESSAGE_TYPE_MASK: u8 = 0xF0;
    /// Low nibble carries the channel of a channel-voice message.
    pub const CHANNEL_MASK: u8 = 0x0F;
}

#[doc = r#"
The set of possible messages on a decoded track
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// A channel voice message
    ChannelVoice(ChannelVoiceEvent),
    /// A file-only annotation
    Meta(MetaEvent),
    /// A system-exclusive payload, end-of-exclusive marker stripped
    SystemExclusive(Vec<u8>),
    /// A consolidated note carrying its sounding duration
    Note(Note),
}

impl From<ChannelVoiceEvent> for TrackMessage {
    fn from(value: ChannelVoiceEvent) -> Self {
        Self::ChannelVoice(value)
    }
}

impl From<MetaEvent> for TrackMessage {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

/// A channel voice message and the channel it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceEvent {
    channel: u8,
    event: VoiceEvent,
}

impl ChannelVoiceEvent {
    pub(crate) const fn new(channel: u8, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// The channel the message addresses (0-15).
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The voice event itself.
    pub const fn event(&self) -> VoiceEvent {
        self.event
    }
}

#[doc = r#"
A channel voice message, decoded from a status byte and its operands.

Note-on with velocity zero is the running-status-friendly spelling of
note-off; the consolidation pass treats the two identically.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// 0x8n: stop sounding a key
    NoteOff {
        /// Key number (0-127)
        key: u8,
        /// Release velocity
        velocity: u8,
    },
    /// 0x9n: start sounding a key
    NoteOn {
        /// Key number (0-127)
        key: u8,
        /// Strike velocity; zero means note-off
        velocity: u8,
    },
    /// 0xAn: per-key pressure
    PolyAftertouch {
        /// Key number (0-127)
        key: u8,
        /// Pressure amount
        pressure: u8,
    },
    /// 0xBn: controller value change
    ControlChange {
        /// Controller number (see [`controller_name`])
        controller: u8,
        /// New controller value
        value: u8,
    },
    /// 0xCn: instrument selection
    ProgramChange {
        /// Program number
        program: u8,
    },
    /// 0xDn: whole-channel pressure
    ChannelAftertouch {
        /// Pressure amount
        pressure: u8,
    },
    /// 0xEn: pitch wheel position
    PitchBend {
        /// Low seven bits
        lsb: u8,
        /// High seven bits
        msb: u8,
    },
}

impl VoiceEvent {
    /// Decode the operands of a channel voice message.
    ///
    /// `data1` is the first operand, which the caller has always consumed
    /// already while resolving running status. Messages with two operands
    /// read their second byte here; program change and channel aftertouch
    /// carry only `data1`.
    pub(crate) fn read(status: u8, data1: u8, reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let event = match status & status::MESSAGE_TYPE_MASK {
            status::NOTE_OFF => Self::NoteOff {
                key: data1,
                velocity: reader.read_byte()?,
            },
            status::NOTE_ON => Self::NoteOn {
                key: data1,
                velocity: reader.read_byte()?,
            },
            status::POLY_AFTERTOUCH => Self::PolyAftertouch {
                key: data1,
                pressure: reader.read_byte()?,
            },
            status::CONTROL_CHANGE => Self::ControlChange {
                controller: data1,
                value: reader.read_byte()?,
            },
            status::PROGRAM_CHANGE => Self::ProgramChange { program: data1 },
            status::CHANNEL_AFTERTOUCH => Self::ChannelAftertouch { pressure: data1 },
            status::PITCH_BEND => Self::PitchBend {
                lsb: data1,
                msb: reader.read_byte()?,
            },
            _ => return Err(DecodeError::invalid_event(reader.position(), status)),
        };
        Ok(event)
    }
}

/// Every meta event type code the diagnostic dump can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaKind {
    /// FF 00: pattern number of a format 2 sequence
    SequenceNumber = 0x00,
    /// FF 01: free text
    Text = 0x01,
    /// FF 02: copyright notice
    Copyright = 0x02,
    /// FF 03: name of the track
    TrackName = 0x03,
    /// FF 04: instrument name
    InstrumentName = 0x04,
    /// FF 05: lyric syllable
    Lyric = 0x05,
    /// FF 06: section marker
    Marker = 0x06,
    /// FF 07: cue point
    CuePoint = 0x07,
    /// FF 20: channel prefix for following meta events
    ChannelPrefix = 0x20,
    /// FF 21: output port selection
    Port = 0x21,
    /// FF 2F: end of track
    EndOfTrack = 0x2F,
    /// FF 51: microseconds per quarter note
    SetTempo = 0x51,
    /// FF 54: SMPTE start offset of the track
    SmpteOffset = 0x54,
    /// FF 58: time signature
    TimeSignature = 0x58,
    /// FF 59: key signature
    KeySignature = 0x59,
    /// FF 7F: sequencer-specific payload
    SequencerSpecific = 0x7F,
}

impl MetaKind {
    /// Human-readable name used by the diagnostic dump.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SequenceNumber => "Sequence number",
            Self::Text => "Text",
            Self::Copyright => "Copyright",
            Self::TrackName => "Track name",
            Self::InstrumentName => "Instrument name",
            Self::Lyric => "Lyric",
            Self::Marker => "Text marker",
            Self::CuePoint => "Cue point",
            Self::ChannelPrefix => "Channel prefix",
            Self::Port => "Channel prefix or port",
            Self::EndOfTrack => "End of track",
            Self::SetTempo => "Set tempo",
            Self::SmpteOffset => "SMPTE offset",
            Self::TimeSignature => "Time signature",
            Self::KeySignature => "Key signature",
            Self::SequencerSpecific => "Sequencer specific",
        }
    }
}

#[doc = r#"
A file-only annotation: not a playable MIDI message.

Codes the decoder does not materialize further keep their raw payload in
[`MetaEvent::Other`].
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaEvent {
    /// FF 01
    Text(String),
    /// FF 02
    Copyright(String),
    /// FF 03
    TrackName(String),
    /// FF 04
    InstrumentName(String),
    /// FF 05
    Lyric(String),
    /// FF 06
    Marker(String),
    /// FF 07
    CuePoint(String),
    /// FF 51: the new tempo in microseconds per quarter note
    Tempo(u32),
    /// FF 58
    TimeSignature(TimeSignature),
    /// FF 59
    KeySignature(KeySignature),
    /// FF 2F
    EndOfTrack,
    /// Any other meta code, payload kept verbatim
    Other {
        /// The raw meta type byte
        code: u8,
        /// The raw payload
        data: Vec<u8>,
    },
}

impl MetaEvent {
    /// Materialize a meta event from its type byte and payload.
    ///
    /// Never fails: a payload too short for its declared type is kept as
    /// [`MetaEvent::Other`] and logged, since meta events do not affect the
    /// byte-level framing of the rest of the track.
    pub(crate) fn read(code: u8, payload: &[u8]) -> Self {
        let text = || String::from_utf8_lossy(payload).into_owned();
        match MetaKind::try_from(code) {
            Ok(MetaKind::Text) => Self::Text(text()),
            Ok(MetaKind::Copyright) => Self::Copyright(text()),
            Ok(MetaKind::TrackName) => Self::TrackName(text()),
            Ok(MetaKind::InstrumentName) => Self::InstrumentName(text()),
            Ok(MetaKind::Lyric) => Self::Lyric(text()),
            Ok(MetaKind::Marker) => Self::Marker(text()),
            Ok(MetaKind::CuePoint) => Self::CuePoint(text()),
            Ok(MetaKind::SetTempo) => match payload {
                [m0, m1, m2, ..] => {
                    let tempo = ((u32::from(*m0) << 8 | u32::from(*m1)) << 8) | u32::from(*m2);
                    Self::Tempo(tempo)
                }
                _ => Self::short_payload(code, payload),
            },
            Ok(MetaKind::TimeSignature) => match payload {
                [numerator, denominator_log2, ..] => Self::TimeSignature(TimeSignature {
                    numerator: *numerator,
                    denominator_log2: *denominator_log2,
                }),
                _ => Self::short_payload(code, payload),
            },
            Ok(MetaKind::KeySignature) => match payload {
                [accidentals, minor, ..] => Self::KeySignature(KeySignature {
                    accidentals: *accidentals as i8,
                    minor: *minor != 0,
                }),
                _ => Self::short_payload(code, payload),
            },
            Ok(MetaKind::EndOfTrack) => Self::EndOfTrack,
            Ok(_) | Err(_) => Self::Other {
                code,
                data: payload.to_vec(),
            },
        }
    }

    fn short_payload(code: u8, payload: &[u8]) -> Self {
        tracing::warn!(code, len = payload.len(), "meta event payload too short");
        Self::Other {
            code,
            data: payload.to_vec(),
        }
    }
}

/// A time signature meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: u8,
    denominator_log2: u8,
}

impl TimeSignature {
    /// Beats per measure.
    pub const fn numerator(&self) -> u8 {
        self.numerator
    }

    /// The note value of one beat; the file stores its base-2 logarithm.
    pub const fn denominator(&self) -> u32 {
        let log2 = self.denominator_log2;
        1u32 << (if log2 > 31 { 31 } else { log2 })
    }
}

/// A key signature meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    accidentals: i8,
    minor: bool,
}

impl KeySignature {
    /// Sharps when positive, flats when negative.
    pub const fn accidentals(&self) -> i8 {
        self.accidentals
    }

    /// True for a minor key.
    pub const fn minor(&self) -> bool {
        self.minor
    }
}

/// Name of a controller number, for the controllers the dump labels.
pub const fn controller_name(controller: u8) -> Option<&'static str> {
    Some(match controller {
        0 => "Bank select MSB",
        1 => "Modulation wheel",
        7 => "Volume",
        10 => "Pan",
        32 => "Bank select LSB",
        64 => "Sustain",
        71 => "Resonance",
        72 => "Release",
        73 => "Attack",
        74 => "Filter",
        91 => "Reverb",
        93 => "Chorus",
        98 => "NRPN LSB",
        99 => "NRPN MSB",
        100 => "RPN LSB",
        101 => "RPN MSB",
        120 => "All sounds off",
        121 => "Reset all controllers",
        122 => "Local",
        123 => "All notes off",
        _ => return None,
    })
}

impl fmt::Display for TrackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelVoice(event) => event.fmt(f),
            Self::Meta(meta) => meta.fmt(f),
            Self::SystemExclusive(data) => {
                write!(f, "System exclusive: {} bytes", data.len())
            }
            Self::Note(note) => note.fmt(f),
        }
    }
}

impl fmt::Display for ChannelVoiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = self.channel;
        match self.event {
            VoiceEvent::NoteOff { key, velocity } => {
                write!(f, "Note off: channel {ch} pitch {key} velocity {velocity}")
            }
            VoiceEvent::NoteOn { key, velocity } => {
                write!(f, "Note on: channel {ch} pitch {key} velocity {velocity}")
            }
            VoiceEvent::PolyAftertouch { key, pressure } => {
                write!(
                    f,
                    "Polyphonic aftertouch: channel {ch} pitch {key} pressure {pressure}"
                )
            }
            VoiceEvent::ControlChange { controller, value } => {
                write!(f, "Controller change: channel {ch} controller {controller}")?;
                if let Some(name) = controller_name(controller) {
                    write!(f, " ({name})")?;
                }
                write!(f, " value {value}")
            }
            VoiceEvent::ProgramChange { program } => {
                write!(f, "Program change: channel {ch} program {program}")
            }
            VoiceEvent::ChannelAftertouch { pressure } => {
                write!(f, "Channel aftertouch: channel {ch} pressure {pressure}")
            }
            VoiceEvent::PitchBend { lsb, msb } => {
                let value = u16::from(msb) * 128 + u16::from(lsb);
                write!(f, "Pitch bend: channel {ch} value {value}")
            }
        }
    }
}

impl fmt::Display for MetaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "Text: \"{text}\""),
            Self::Copyright(text) => write!(f, "Copyright: \"{text}\""),
            Self::TrackName(text) => write!(f, "Track name: \"{text}\""),
            Self::InstrumentName(text) => write!(f, "Instrument name: \"{text}\""),
            Self::Lyric(text) => write!(f, "Lyric: \"{text}\""),
            Self::Marker(text) => write!(f, "Text marker: \"{text}\""),
            Self::CuePoint(text) => write!(f, "Cue point: \"{text}\""),
            Self::Tempo(micros) => {
                let bpm = 60_000_000.0 / f64::from(*micros);
                write!(f, "Tempo: {micros} us/quarter ({bpm:.2} bpm)")
            }
            Self::TimeSignature(ts) => {
                write!(f, "Time signature: {}/{}", ts.numerator(), ts.denominator())
            }
            Self::KeySignature(ks) => {
                let count = ks.accidentals().unsigned_abs();
                let kind = match (ks.accidentals() >= 0, count) {
                    (true, 1) => "sharp",
                    (true, _) => "sharps",
                    (false, 1) => "flat",
                    (false, _) => "flats",
                };
                let mode = if ks.minor() { "minor" } else { "major" };
                write!(f, "Key signature: {count} {kind}, {mode}")
            }
            Self::EndOfTrack => write!(f, "End of track"),
            Self::Other { code, data } => {
                match MetaKind::try_from(*code) {
                    Ok(kind) => write!(f, "File meta event: code {code}: {}:", kind.name())?,
                    Err(_) => write!(f, "File meta event: code {code}:")?,
                }
                for byte in data {
                    write!(f, " {byte}")?;
                }
                Ok(())
            }
        }
    }
}
