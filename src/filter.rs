#![doc = r#"
Post-pass removing rapid same-pitch repeats from a timed note list
"#]

use crate::note::TimedNote;

/// Window within which a same-pitch note counts as a repeat.
pub const DEFAULT_REPEAT_WINDOW_MILLIS: f64 = 150.0;

/// Drop every note that repeats the pitch of a retained note no more than
/// `window_millis` earlier.
///
/// The input must be ordered by start time. The backward scan runs over the
/// notes retained so far, so of a burst of equal-pitch notes only the first
/// survives, and a note just outside the window restarts the chain. Returns
/// a new sequence; the input is untouched.
pub fn filter_repeats(notes: &[TimedNote], window_millis: f64) -> Vec<TimedNote> {
    let mut kept: Vec<TimedNote> = Vec::with_capacity(notes.len());
    for note in notes {
        let cutoff = note.start_millis() - window_millis;
        let repeat = kept
            .iter()
            .rev()
            .take_while(|earlier| earlier.start_millis() >= cutoff)
            .any(|earlier| earlier.key() == note.key());
        if repeat {
            tracing::debug!(
                key = note.key(),
                start_millis = note.start_millis(),
                "dropping repeated note"
            );
        } else {
            kept.push(*note);
        }
    }
    kept
}
