mod common;

use common::*;
use midinote::prelude::*;
use pretty_assertions::assert_eq;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn default_tempo_maps_one_quarter_note_to_500ms() {
    let data = track(&[
        note_on(240, 0, 60, 100),
        note_off(240, 0, 60),
        end_of_track(0),
    ]);
    let file = MidiFile::parse(&smf(0, 240, &[data])).unwrap();
    let notes = file.timed_notes(&DecodeOptions::default()).unwrap();

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].start_millis(), 500.0);
    assert_eq!(notes[0].duration_millis(), 500.0);
}

#[test]
fn tempo_change_splits_the_timeline_piecewise() {
    // tempo doubles at tick 480: quarters before take 500ms, after 1000ms
    let data = track(&[
        set_tempo(0, 500_000),
        note_on(0, 0, 60, 100),
        note_off(240, 0, 60),
        set_tempo(240, 1_000_000),
        note_on(240, 0, 62, 100),
        note_off(240, 0, 62),
        end_of_track(0),
    ]);
    let file = MidiFile::parse(&smf(0, 240, &[data])).unwrap();
    let notes = file.timed_notes(&DecodeOptions::default()).unwrap();

    assert_eq!(notes.len(), 2);
    // first note entirely under the old tempo
    assert_eq!(notes[0].start_millis(), 0.0);
    assert!(close(notes[0].duration_millis(), 500.0));
    // tick 480 is 1000ms in (continuity at the change), tick 720 adds one
    // 1000ms quarter under the new tempo
    assert_eq!(notes[1].start_ticks(), 720);
    assert!(close(notes[1].start_millis(), 2000.0));
    assert!(close(notes[1].duration_millis(), 1000.0));
}

#[test]
fn mapping_is_continuous_across_the_change() {
    let change_tick = 480u32;
    let mut with_change = Vec::new();
    let mut without_change = Vec::new();
    for tick in [479u32, 480, 481] {
        let data = |change: bool| {
            let mut events = vec![note_on(tick, 0, 60, 100)];
            if change {
                events.insert(0, set_tempo(change_tick, 1_000_000));
                // the tempo event consumed the delta up to tick 480
                events[1] = note_on(tick.saturating_sub(change_tick), 0, 60, 100);
            }
            events.push(end_of_track(10));
            track(&events)
        };
        let changed = if tick >= change_tick {
            MidiFile::parse(&smf(0, 480, &[data(true)])).unwrap()
        } else {
            MidiFile::parse(&smf(0, 480, &[data(false)])).unwrap()
        };
        let notes = changed.timed_notes(&DecodeOptions::default()).unwrap();
        if tick >= change_tick {
            with_change.push(notes[0].start_millis());
        } else {
            without_change.push(notes[0].start_millis());
        }
    }

    // 479 old-tempo ticks, then the boundary itself, then one new-tempo tick
    assert!(close(without_change[0], 479.0 * 500_000.0 / 480_000.0));
    assert!(close(with_change[0], 500.0));
    assert!(close(with_change[1], 500.0 + 1_000_000.0 / 480_000.0));
}

#[test]
fn tempo_on_one_track_governs_notes_on_another() {
    let conductor = track(&[set_tempo(0, 250_000), end_of_track(0)]);
    let melody = track(&[
        note_on(480, 1, 60, 100),
        note_off(480, 1, 60),
        end_of_track(0),
    ]);
    let file = MidiFile::parse(&smf(1, 480, &[conductor, melody])).unwrap();
    let notes = file.timed_notes(&DecodeOptions::default()).unwrap();

    // one quarter note at 240 bpm
    assert_eq!(notes[0].start_millis(), 250.0);
    assert_eq!(notes[0].duration_millis(), 250.0);
}

#[test]
fn tempo_override_holds_the_default_for_the_whole_file() {
    let data = track(&[
        set_tempo(0, 250_000),
        note_on(240, 0, 60, 100),
        note_off(240, 0, 60),
        end_of_track(0),
    ]);
    let file = MidiFile::parse(&smf(0, 240, &[data])).unwrap();

    let options = DecodeOptions {
        ignore_tempo_changes: true,
        ..DecodeOptions::default()
    };
    let notes = file.timed_notes(&options).unwrap();
    assert_eq!(notes[0].start_millis(), 500.0);

    let followed = file.timed_notes(&DecodeOptions::default()).unwrap();
    assert_eq!(followed[0].start_millis(), 250.0);
}

#[test]
fn notes_are_ordered_by_start_time_across_tracks() {
    let first = track(&[
        note_on(480, 0, 60, 100),
        note_off(120, 0, 60),
        end_of_track(0),
    ]);
    let second = track(&[
        note_on(120, 1, 48, 90),
        note_off(120, 1, 48),
        end_of_track(0),
    ]);
    let file = MidiFile::parse(&smf(1, 480, &[first, second])).unwrap();
    let notes = file.timed_notes(&DecodeOptions::default()).unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].key(), 48);
    assert_eq!(notes[1].key(), 60);
    assert!(notes[0].start_millis() <= notes[1].start_millis());
}

#[test]
fn repeat_filter_collapses_notes_inside_the_window() {
    // 240 ppq at 120 bpm: 48 ticks = 100ms, 96 ticks = 200ms
    let close_pair = track(&[
        note_on(0, 0, 60, 100),
        note_on(48, 0, 60, 90),
        end_of_track(48),
    ]);
    let file = MidiFile::parse(&smf(0, 240, &[close_pair])).unwrap();
    let options = DecodeOptions::default();
    let notes = file.timed_notes(&options).unwrap();
    let kept = filter_repeats(&notes, options.repeat_window_millis);

    assert_eq!(notes.len(), 2);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].start_millis(), 0.0);

    let far_pair = track(&[
        note_on(0, 0, 60, 100),
        note_on(96, 0, 60, 90),
        end_of_track(48),
    ]);
    let file = MidiFile::parse(&smf(0, 240, &[far_pair])).unwrap();
    let notes = file.timed_notes(&options).unwrap();
    let kept = filter_repeats(&notes, options.repeat_window_millis);
    assert_eq!(kept.len(), 2);
}
