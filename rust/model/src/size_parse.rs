// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient parsing of size-descriptor strings into a diameter.
//!
//! Size attributes arrive in many spellings: `"160ø"`, `"6\""`, `"15,5mm"`,
//! `"DN 100"`-style texts with stray unit symbols. Any string containing a
//! recoverable number should parse; this is locale-tolerant recovery, not
//! validation.

/// Parses a size descriptor into a diameter in millimetres.
///
/// Strips unit and diameter symbols (`ø`, `"`, `°`, whitespace, the letter
/// `m` as in "mm"), normalizes comma decimal separators to periods, then
/// attempts a standard float parse.
///
/// Returns `None` when nothing parseable remains or the result is not a
/// positive finite number.
pub fn parse_diameter_mm(text: &str) -> Option<f64> {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ',' => cleaned.push('.'),
            c if c.is_ascii_digit() || c == '.' || c == '-' => cleaned.push(c),
            // ø, ", °, 'm', whitespace and anything else is dropped
            _ => {}
        }
    }

    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}
