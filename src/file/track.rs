use crate::{
    error::{DecodeError, DecodeResult},
    message::{ChannelVoiceEvent, MetaEvent, TrackMessage, VoiceEvent, status},
    note::Note,
    reader::Reader,
};

#[doc = r#"
One decoded track: an ordered sequence of events.

Events keep the order they have in the file. After parsing completes every
event carries its absolute tick position, sounding note-ons have been
merged with their note-offs into [`TrackMessage::Note`] entries, and the
matched note-offs are gone.
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
    name: Option<String>,
}

/// An event and its position on the track timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    /// Delta ticks while the track is being decoded, absolute ticks once
    /// the track has been resolved.
    ticks: u64,
    message: TrackMessage,
}

impl TrackEvent {
    /// Ticks from the start of the track.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The event payload.
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }
}

impl Track {
    /// The events of the track, in file order.
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// The first Track Name meta event, if the track carries one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The consolidated notes of the track with their start ticks.
    pub fn notes(&self) -> impl Iterator<Item = (u64, &Note)> {
        self.events.iter().filter_map(|event| match &event.message {
            TrackMessage::Note(note) => Some((event.ticks, note)),
            _ => None,
        })
    }

    /// Decode one track chunk whose byte budget has been armed on `reader`.
    ///
    /// Each iteration reads a delta time and one more byte. A data byte in
    /// status position reuses the running status, which the track must have
    /// established; otherwise the byte dispatches on its status value.
    /// Running status is updated by channel-voice status bytes only.
    pub(crate) fn decode(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let mut events = Vec::new();
        let mut name = None;
        let mut running_status: Option<u8> = None;

        while !reader.track_exhausted() {
            let delta_ticks = u64::from(reader.read_var_len(None)?);
            let position = reader.position();
            let byte = reader.read_byte()?;

            let message = if byte & 0x80 == 0 {
                let Some(running) = running_status else {
                    return Err(DecodeError::invalid_event(position, byte));
                };
                let event = VoiceEvent::read(running, byte, reader)?;
                TrackMessage::ChannelVoice(ChannelVoiceEvent::new(
                    running & status::CHANNEL_MASK,
                    event,
                ))
            } else {
                match byte {
                    status::META_EVENT => {
                        let code = reader.read_byte()?;
                        let length = reader.read_var_len(None)? as usize;
                        let payload = reader.read_bytes(length)?;
                        let meta = MetaEvent::read(code, payload);
                        if name.is_none() {
                            if let MetaEvent::TrackName(text) = &meta {
                                name = Some(text.clone());
                            }
                        }
                        TrackMessage::Meta(meta)
                    }
                    status::SYSTEM_EXCLUSIVE => {
                        let first = reader.read_byte()?;
                        let length = reader.read_var_len(Some(first))? as usize;
                        let payload = reader.read_bytes(length)?;
                        match payload.split_last() {
                            Some((&status::END_OF_EXCLUSIVE, body)) => {
                                TrackMessage::SystemExclusive(body.to_vec())
                            }
                            _ => {
                                tracing::warn!(
                                    position,
                                    length,
                                    "dropping system-exclusive message without a terminator"
                                );
                                continue;
                            }
                        }
                    }
                    status::END_OF_EXCLUSIVE => {
                        tracing::warn!(position, "ignoring stray end-of-exclusive byte");
                        continue;
                    }
                    _ if byte < status::SYSTEM_EXCLUSIVE => {
                        running_status = Some(byte);
                        let data1 = reader.read_byte()?;
                        let event = VoiceEvent::read(byte, data1, reader)?;
                        TrackMessage::ChannelVoice(ChannelVoiceEvent::new(
                            byte & status::CHANNEL_MASK,
                            event,
                        ))
                    }
                    _ => return Err(DecodeError::invalid_event(position, byte)),
                }
            };

            events.push(TrackEvent {
                ticks: delta_ticks,
                message,
            });
        }

        Ok(Self { events, name })
    }

    /// Replace each event's delta time with its cumulative tick position,
    /// seeded at zero.
    pub(crate) fn resolve_absolute_ticks(&mut self) {
        let mut accumulated = 0;
        for event in &mut self.events {
            accumulated += event.ticks;
            event.ticks = accumulated;
        }
    }

    /// Merge every sounding note-on with its note-off.
    ///
    /// The match is the first later event on the same channel and key that
    /// is a note-off or a zero-velocity note-on; it is removed, and its
    /// tick distance becomes the note's duration. A note-on with no match
    /// before track end gets the distance to the last event of the track.
    /// Requires absolute tick positions.
    pub(crate) fn consolidate_note_offs(&mut self) {
        let mut i = 0;
        while i < self.events.len() {
            let (channel, key, velocity) = match &self.events[i].message {
                TrackMessage::ChannelVoice(cv) => match cv.event() {
                    VoiceEvent::NoteOn { key, velocity } if velocity > 0 => {
                        (cv.channel(), key, velocity)
                    }
                    _ => {
                        i += 1;
                        continue;
                    }
                },
                _ => {
                    i += 1;
                    continue;
                }
            };

            let start = self.events[i].ticks;
            let matched = self.events[i + 1..]
                .iter()
                .position(|event| ends_note(&event.message, channel, key))
                .map(|offset| i + 1 + offset);

            let duration_ticks = match matched {
                Some(j) => {
                    let end = self.events[j].ticks;
                    self.events.remove(j);
                    end - start
                }
                None => {
                    tracing::debug!(key, start_tick = start, "no note-off before track end");
                    self.events.last().map_or(start, |event| event.ticks) - start
                }
            };

            self.events[i].message =
                TrackMessage::Note(Note::new(channel, key, velocity, duration_ticks));
            i += 1;
        }
    }
}

/// True for the events that end a sounding note: an explicit note-off, or
/// the zero-velocity note-on spelling.
fn ends_note(message: &TrackMessage, channel: u8, key: u8) -> bool {
    let TrackMessage::ChannelVoice(cv) = message else {
        return false;
    };
    if cv.channel() != channel {
        return false;
    }
    match cv.event() {
        VoiceEvent::NoteOff { key: k, .. } => k == key,
        VoiceEvent::NoteOn {
            key: k,
            velocity: 0,
        } => k == key,
        _ => false,
    }
}
