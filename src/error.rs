#![doc = r#"
Errors produced while decoding a MIDI file
"#]

use std::io;
use thiserror::Error;

#[doc = r#"
An error raised while decoding a MIDI file.

Carries the byte position the decoder had reached when the error was
detected, plus the [`DecodeErrorKind`] describing what went wrong. Any of
these aborts the whole decode; no partially built
[`MidiFile`](crate::file::MidiFile) is ever returned alongside one.
"#]
#[derive(Debug, Error)]
#[error("decode error at byte {position}: {kind}")]
pub struct DecodeError {
    position: usize,
    kind: DecodeErrorKind,
}

/// A kind of error that the decoder can produce.
#[derive(Debug, Error)]
pub enum DecodeErrorKind {
    /// The file could not be opened or read at all.
    #[error("file unreadable: {0}")]
    FileUnreadable(#[from] io::Error),

    /// The 14-byte file header failed validation.
    #[error("bad header: {0}")]
    BadHeader(#[from] HeaderError),

    /// A read ran past the end of the stream or past a track's declared
    /// byte count.
    #[error("unexpected end of stream")]
    TruncatedStream,

    /// A status byte arrived where none is valid, or a data byte arrived
    /// while running status was undefined.
    #[error("invalid event code {0:#04x}")]
    InvalidEventCode(u8),

    /// The file declares SMPTE timing, which has no tempo-based clock.
    #[error("unsupported SMPTE timing ({frames_per_second} fps, {subframes} subframes)")]
    UnsupportedTiming {
        /// SMPTE frames per second from the header division field
        frames_per_second: u8,
        /// Subframe resolution within each frame
        subframes: u8,
    },
}

/// Reasons the file header can be rejected.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The first four bytes were not the `MThd` tag.
    #[error("expected an MThd tag, found {0:02x?}")]
    BadTag([u8; 4]),

    /// The header data length field must always be 6.
    #[error("header length is {0}, must be 6")]
    BadLength(u32),

    /// The format field was something other than 0, 1 or 2.
    #[error("unknown file format {0}")]
    UnknownFormat(u16),
}

impl DecodeError {
    /// Create a decode error from a position and kind.
    pub const fn new(position: usize, kind: DecodeErrorKind) -> Self {
        Self { position, kind }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Returns the byte position where the error occurred.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// True if a read ran past available bytes.
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::TruncatedStream)
    }

    pub(crate) const fn truncated(position: usize) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::TruncatedStream,
        }
    }

    pub(crate) const fn invalid_event(position: usize, code: u8) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::InvalidEventCode(code),
        }
    }

    pub(crate) fn bad_header(position: usize, err: HeaderError) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::BadHeader(err),
        }
    }

    pub(crate) fn unreadable(err: io::Error) -> Self {
        Self {
            position: 0,
            kind: DecodeErrorKind::FileUnreadable(err),
        }
    }
}

/// The decode result type (see [`DecodeError`])
pub type DecodeResult<T> = Result<T, DecodeError>;
