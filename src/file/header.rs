use crate::{
    error::{DecodeError, DecodeResult, HeaderError},
    file::{FormatType, Timing},
    reader::Reader,
};

/// The four bytes introducing the file header chunk.
const FILE_TAG: &[u8; 4] = b"MThd";

/// The header data length is fixed by the format.
const HEADER_DATA_LENGTH: u32 = 6;

/// Byte offset of the timing division field within the file.
pub(crate) const DIVISION_OFFSET: usize = 12;

#[doc = r#"
The validated contents of the 14-byte file header.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawHeader {
    pub(crate) format: FormatType,
    pub(crate) track_count: u16,
    pub(crate) timing: Timing,
}

impl RawHeader {
    /// Parse and validate the header at the start of the stream.
    pub(crate) fn read(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let position = reader.position();
        let tag = reader.read_bytes(4)?;
        if tag != FILE_TAG {
            let mut found = [0; 4];
            found.copy_from_slice(tag);
            return Err(DecodeError::bad_header(position, HeaderError::BadTag(found)));
        }

        let position = reader.position();
        let length = reader.read_u32()?;
        if length != HEADER_DATA_LENGTH {
            return Err(DecodeError::bad_header(
                position,
                HeaderError::BadLength(length),
            ));
        }

        let position = reader.position();
        let raw_format = reader.read_u16()?;
        let format = FormatType::try_from(raw_format)
            .map_err(|_| DecodeError::bad_header(position, HeaderError::UnknownFormat(raw_format)))?;

        let track_count = reader.read_u16()?;
        let timing = Timing::from_raw(reader.read_u16()?);

        Ok(Self {
            format,
            track_count,
            timing,
        })
    }
}
