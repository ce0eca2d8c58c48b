//! Minimal SGR (Select Graphic Rendition) parameter diffing.
//!
//! Given the previously-emitted [`Effect`] and the one the next cell needs,
//! produces the smallest parameter list that gets the terminal there: only
//! the channels that actually changed, never a blanket reset unless the
//! target is fully unset (clearing five attributes one at a time would cost
//! more bytes than `ESC[0m`, and "attribute soup" from a long-lived rect is
//! exactly the case a full reset exists for).

use strata_cell::Effect;

/// Returns the SGR parameters (without the leading `ESC[` / trailing `m`)
/// needed to move the terminal's rendition state from `from` to `to`.
/// Empty when the two are equivalent.
pub fn diff_params(from: Effect, to: Effect) -> Vec<u8> {
    if from == to {
        return Vec::new();
    }
    if to == Effect::UNSET && from != Effect::UNSET {
        return vec![0];
    }

    let mut params = Vec::new();
    if from.fg() != to.fg() {
        params.push(fg_code(to.fg()));
    }
    if from.bg() != to.bg() {
        params.push(bg_code(to.bg()));
    }
    if from.bold() != to.bold() {
        params.push(if to.bold() { 1 } else { 22 });
    }
    if from.underline() != to.underline() {
        params.push(if to.underline() { 4 } else { 24 });
    }
    if from.invert() != to.invert() {
        params.push(if to.invert() { 7 } else { 27 });
    }
    params
}

fn fg_code(color: Option<strata_cell::Color>) -> u8 {
    match color {
        None => 39,
        Some(c) if c.is_bright() => 90 + c.base(),
        Some(c) => 30 + c.base(),
    }
}

fn bg_code(color: Option<strata_cell::Color>) -> u8 {
    match color {
        None => 49,
        Some(c) if c.is_bright() => 100 + c.base(),
        Some(c) => 40 + c.base(),
    }
}
