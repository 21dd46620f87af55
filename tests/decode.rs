mod common;

use common::*;
use midinote::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn header_fields_are_exposed() {
    let bytes = smf(
        1,
        480,
        &[
            track(&[track_name(0, "lead"), end_of_track(0)]),
            track(&[end_of_track(0)]),
        ],
    );
    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.format_type(), FormatType::Simultaneous);
    assert_eq!(file.timing(), Timing::TicksPerQuarterNote(480));
    assert_eq!(file.track_count(), 2);
    assert_eq!(file.track_name(0), Some("lead"));
    assert_eq!(file.track_name(1), None);
}

#[test]
fn bad_magic_fails_with_bad_header() {
    let mut bytes = smf(0, 96, &[track(&[end_of_track(0)])]);
    bytes[..4].copy_from_slice(b"XXXX");

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(matches!(err.kind(), DecodeErrorKind::BadHeader(_)));
}

#[test]
fn track_shorter_than_declared_fails_with_truncated_stream() {
    // a track chunk declaring 10 bytes but carrying 5
    let mut bytes = smf(0, 96, &[]);
    bytes[10] = 0;
    bytes[11] = 1; // declared track count 1
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&10u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x90, 60, 100, 0x00]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn missing_track_chunk_fails_with_truncated_stream() {
    // header declares two tracks, the file carries one
    let mut bytes = smf(1, 96, &[track(&[end_of_track(0)])]);
    bytes[11] = 2;

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn running_status_decodes_a_second_note_on() {
    let mut data = track(&[note_on(0, 0, 60, 100)]);
    data.extend_from_slice(&var_len(10));
    data.extend_from_slice(&[64, 100]); // no status byte
    data.extend_from_slice(&end_of_track(100));

    let file = MidiFile::parse(&smf(0, 96, &[data])).unwrap();
    let track = &file.tracks()[0];
    let notes: Vec<_> = track.notes().collect();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].1.key(), 60);
    assert_eq!(notes[1].0, 10);
    assert_eq!(notes[1].1.key(), 64);
    assert_eq!(notes[1].1.channel(), 0);
}

#[test]
fn absolute_ticks_are_the_sum_of_deltas() {
    let data = track(&[
        note_on(5, 0, 60, 100),
        note_off(200, 0, 60),
        note_on(3, 0, 62, 90),
        note_off(128, 0, 62),
        end_of_track(0),
    ]);
    let file = MidiFile::parse(&smf(0, 480, &[data])).unwrap();
    let starts: Vec<u64> = file.tracks()[0].notes().map(|(start, _)| start).collect();

    assert_eq!(starts, vec![5, 208]);
}

#[test]
fn note_off_consolidation_sets_exact_duration_and_removes_the_off() {
    let data = track(&[
        note_on(0, 2, 60, 100),
        note_off(480, 2, 60),
        end_of_track(0),
    ]);
    let file = MidiFile::parse(&smf(0, 96, &[data])).unwrap();
    let track = &file.tracks()[0];

    let notes: Vec<_> = track.notes().collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].1.duration_ticks(), 480);
    assert_eq!(notes[0].1.channel(), 2);

    // the note and the end-of-track meta are all that remain
    assert_eq!(track.events().len(), 2);
    assert!(!track.events().iter().any(|event| matches!(
        event.message(),
        TrackMessage::ChannelVoice(cv)
            if matches!(cv.event(), VoiceEvent::NoteOff { .. })
    )));
}

#[test]
fn every_sounding_note_on_yields_exactly_one_note() {
    let data = track(&[
        note_on(0, 0, 60, 100),
        note_on(10, 0, 64, 100),
        note_off(10, 0, 60),
        note_on(10, 0, 67, 100), // never released
        note_off(10, 0, 64),
        end_of_track(60),
    ]);
    let file = MidiFile::parse(&smf(0, 96, &[data])).unwrap();
    let notes: Vec<_> = file.tracks()[0].notes().collect();

    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0].1.duration_ticks(), 20);
    assert_eq!(notes[1].1.duration_ticks(), 30);
    // fallback: distance to the last event of the track
    assert_eq!(notes[2].0, 30);
    assert_eq!(notes[2].1.duration_ticks(), 70);
}

#[test]
fn dump_lists_header_and_events() {
    let data = track(&[
        track_name(0, "piano"),
        set_tempo(0, 500_000),
        note_on(0, 0, 60, 100),
        note_off(96, 0, 60),
        end_of_track(0),
    ]);
    let file = MidiFile::parse(&smf(0, 96, &[data])).unwrap();
    let dump = file.to_string();

    assert!(dump.contains("Format: MIDI Single Track File"));
    assert!(dump.contains("Timing division: 96 ppq"));
    assert!(dump.contains("Start of track 1: \"piano\""));
    assert!(dump.contains("Track name: \"piano\""));
    assert!(dump.contains("Tempo: 500000 us/quarter (120.00 bpm)"));
    assert!(dump.contains("Note: channel 0 duration 96 pitch 60 velocity 100"));
    assert!(dump.contains("End of track"));
}

#[test]
fn smpte_division_is_parsed_but_flagged_unsupported_for_timing() {
    // -24 fps, 80 subframes
    let division = ((256 - 24) as u16) << 8 | 80 | 0x8000;
    let data = track(&[note_on(0, 0, 60, 100), end_of_track(10)]);
    let file = MidiFile::parse(&smf(0, division, &[data])).unwrap();

    let Timing::Smpte(smpte) = file.timing() else {
        panic!("expected SMPTE timing, got {:?}", file.timing());
    };
    assert_eq!(smpte.frames_per_second(), 24);
    assert_eq!(smpte.subframes(), 80);

    let err = file.timed_notes(&DecodeOptions::default()).unwrap_err();
    assert!(matches!(
        err.kind(),
        DecodeErrorKind::UnsupportedTiming {
            frames_per_second: 24,
            subframes: 80,
        }
    ));
}
