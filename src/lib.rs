#![doc = r#"
# midinote

Decode Standard MIDI Files into a time-accurate composition and wall-clock
note timings.

The decoder implements the SMF binary grammar (variable-length quantities,
running status, meta events, system-exclusive messages), reconstructs
absolute tick positions and note durations from the delta-time-only
encoding, and converts ticks to milliseconds through a tempo map that may
change mid-stream.

```no_run
use midinote::prelude::*;

fn main() -> DecodeResult<()> {
    let file = MidiFile::open("song.mid")?;
    println!("{} tracks, {}", file.track_count(), file.format_type());

    let options = DecodeOptions::default();
    let notes = file.timed_notes(&options)?;
    let notes = filter_repeats(&notes, options.repeat_window_millis);
    for note in notes {
        println!(
            "{:8.1} ms  pitch {:3}  velocity {:3}",
            note.start_millis(),
            note.key(),
            note.velocity()
        );
    }
    Ok(())
}
```

Decoding is a pure function of the file bytes plus a [`DecodeOptions`]
policy value: no shared state, safe to run on independent inputs from
independent threads. A malformed file fails fast with a single
[`DecodeError`]; no partial composition is ever returned.
"#]

pub mod error;
pub mod file;
pub mod filter;
pub mod message;
pub mod note;
pub mod reader;
pub mod tempo;

pub mod prelude {
    #![doc = r#"
    Re-exports of the public decoder surface
    "#]
    pub use crate::{
        error::{DecodeError, DecodeErrorKind, DecodeResult, HeaderError},
        file::{DecodeOptions, FormatType, MidiFile, SmpteTiming, Timing, Track, TrackEvent},
        filter::{DEFAULT_REPEAT_WINDOW_MILLIS, filter_repeats},
        message::{
            ChannelVoiceEvent, KeySignature, MetaEvent, MetaKind, TimeSignature, TrackMessage,
            VoiceEvent,
        },
        note::{Note, TimedNote},
        tempo::{DEFAULT_MICROS_PER_QUARTER, TempoMap, TempoSegment},
    };
}
