use num_enum::TryFromPrimitive;

#[doc = r#"
How the tracks of a file relate to one another.

Stored as a 16-bit big-endian integer in the file header; any value other
than 0, 1 or 2 fails the header parse.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatType {
    /// Format 0: one track carrying every channel
    SingleMultiChannel = 0,
    /// Format 1: multiple tracks, played simultaneously
    Simultaneous = 1,
    /// Format 2: multiple tracks, each an independent sequence
    SequentiallyIndependent = 2,
}

impl core::fmt::Display for FormatType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::SingleMultiChannel => "MIDI Single Track File",
            Self::Simultaneous => "MIDI Simultaneous Track File",
            Self::SequentiallyIndependent => "MIDI Sequential Track File",
        };
        f.write_str(name)
    }
}
