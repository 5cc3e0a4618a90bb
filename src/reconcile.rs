//! Turns a row of analog dial values into digits.
//!
//! A needle sitting right at its 0/10 mark is ambiguous on its own. The
//! neighbouring, less significant dial tells which side of the boundary it
//! is really on: if the neighbour has just wrapped past zero the current dial
//! has already advanced, if the neighbour is about to wrap it has not.

/// Fractional part above which a dial may already have ticked over
const UPPER_EDGE: f64 = 0.9;
/// Fractional part below which a dial may not have ticked over yet
const LOWER_EDGE: f64 = 0.1;
const NUDGE: f64 = 0.1;

/// Reconcile dial values (most significant first) into a digit string.
///
/// Every dial but the last may be nudged by ±0.1 depending on its right
/// neighbour before truncation. A nudge never leaves the dial's own digit
/// range: 9.95 nudged up stays 9 and 0.05 nudged down stays 0, there is no
/// carry into more significant positions.
pub fn reconcile(values: &[f64]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let adjusted = match values.get(i + 1) {
                Some(&next) => nudge(value, next),
                None => value,
            };
            digit(adjusted)
        })
        .collect()
}

fn nudge(value: f64, next: f64) -> f64 {
    let fraction = value.fract();
    if fraction > UPPER_EDGE && next < 1.0 {
        value + NUDGE
    } else if fraction < LOWER_EDGE && next > 9.0 {
        value - NUDGE
    } else {
        value
    }
}

/// Truncate to a single digit, clamped to 0..=9
fn digit(value: f64) -> char {
    let d = value.floor().clamp(0.0, 9.0) as u32;
    char::from_digit(d, 10).unwrap_or('0')
}
