//! The atomic unit of the compositor: a terminal [`Cell`] and its packed
//! [`Effect`] attributes.
//!
//! `Effect` is deliberately a single `u16`, not a struct of `Option<u8>`
//! fields: the renderer diffs thousands of these per frame, and a packed
//! integer compares and copies for free. Each color channel reserves one bit
//! to mean "unset" rather than using a sentinel value inside the 4-bit color
//! range, so all 16 ANSI colors stay usable.
//!
//! Bit layout (low to high):
//! ```text
//! 0..=3   fg color (0..=15)
//! 4       fg set
//! 5..=8   bg color (0..=15)
//! 9       bg set
//! 10      bold
//! 11      underline
//! 12      invert
//! 13..=15 reserved
//! ```

use std::fmt;

const FG_SHIFT: u16 = 0;
const FG_MASK: u16 = 0b1111 << FG_SHIFT;
const FG_SET_BIT: u16 = 1 << 4;
const BG_SHIFT: u16 = 5;
const BG_MASK: u16 = 0b1111 << BG_SHIFT;
const BG_SET_BIT: u16 = 1 << 9;
const BOLD_BIT: u16 = 1 << 10;
const UNDERLINE_BIT: u16 = 1 << 11;
const INVERT_BIT: u16 = 1 << 12;

/// One of the 16 colors of the 4-bit ANSI palette (0..=7 normal, 8..=15 bright).
///
/// There is no true-color or 256-color representation; that is an explicit
/// non-goal of this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(u8);

/// A color argument fell outside the 4-bit ANSI palette (`0..=15`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadColor(pub u8);

impl fmt::Display for BadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color {} is out of range 0..=15", self.0)
    }
}

impl std::error::Error for BadColor {}

impl Color {
    pub const BLACK: Color = Color(0);
    pub const RED: Color = Color(1);
    pub const GREEN: Color = Color(2);
    pub const YELLOW: Color = Color(3);
    pub const BLUE: Color = Color(4);
    pub const MAGENTA: Color = Color(5);
    pub const CYAN: Color = Color(6);
    pub const WHITE: Color = Color(7);

    pub fn new(value: u8) -> Result<Self, BadColor> {
        if value <= 15 { Ok(Color(value)) } else { Err(BadColor(value)) }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_bright(self) -> bool {
        self.0 & 0x08 != 0
    }

    /// The base 0..=7 index used by the `3c`/`4c` SGR forms.
    pub fn base(self) -> u8 {
        self.0 & 0x07
    }
}

impl TryFrom<u8> for Color {
    type Error = BadColor;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Color::new(value)
    }
}

/// Packed color and flag attributes applied to a [`Cell`].
///
/// A fully unset `Effect` (the `Default`) renders with whatever SGR state
/// the terminal already has — every channel defers to the owning rect's
/// `default_effect`, and a rect's `default_effect` that is itself unset
/// defers to the terminal's own default (`39`/`49`, attributes cleared).
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Effect(u16);

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("fg", &self.fg())
            .field("bg", &self.bg())
            .field("bold", &self.bold())
            .field("underline", &self.underline())
            .field("invert", &self.invert())
            .finish()
    }
}

impl Effect {
    pub const UNSET: Effect = Effect(0);

    pub fn fg(self) -> Option<Color> {
        (self.0 & FG_SET_BIT != 0).then(|| Color(((self.0 & FG_MASK) >> FG_SHIFT) as u8))
    }

    pub fn bg(self) -> Option<Color> {
        (self.0 & BG_SET_BIT != 0).then(|| Color(((self.0 & BG_MASK) >> BG_SHIFT) as u8))
    }

    pub fn bold(self) -> bool {
        self.0 & BOLD_BIT != 0
    }

    pub fn underline(self) -> bool {
        self.0 & UNDERLINE_BIT != 0
    }

    pub fn invert(self) -> bool {
        self.0 & INVERT_BIT != 0
    }

    #[must_use]
    pub fn with_fg(mut self, color: Color) -> Self {
        self.0 = (self.0 & !FG_MASK) | ((color.get() as u16) << FG_SHIFT) | FG_SET_BIT;
        self
    }

    #[must_use]
    pub fn with_bg(mut self, color: Color) -> Self {
        self.0 = (self.0 & !BG_MASK) | ((color.get() as u16) << BG_SHIFT) | BG_SET_BIT;
        self
    }

    #[must_use]
    pub fn without_fg(mut self) -> Self {
        self.0 &= !(FG_MASK | FG_SET_BIT);
        self
    }

    #[must_use]
    pub fn without_bg(mut self) -> Self {
        self.0 &= !(BG_MASK | BG_SET_BIT);
        self
    }

    /// Clears fg and bg, but not bold/underline/invert (those are independent
    /// per-flag operations; see the flag setters below).
    #[must_use]
    pub fn without_color(self) -> Self {
        self.without_fg().without_bg()
    }

    #[must_use]
    pub fn with_bold(mut self, value: bool) -> Self {
        self.set_bit(BOLD_BIT, value);
        self
    }

    #[must_use]
    pub fn with_underline(mut self, value: bool) -> Self {
        self.set_bit(UNDERLINE_BIT, value);
        self
    }

    #[must_use]
    pub fn with_invert(mut self, value: bool) -> Self {
        self.set_bit(INVERT_BIT, value);
        self
    }

    fn set_bit(&mut self, bit: u16, value: bool) {
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

/// A single terminal cell: a displayable character plus its [`Effect`].
///
/// Rects never store a `Cell` directly in their grid (see `strata-state`);
/// this type exists for the composed view the compositor and renderer
/// exchange, where character and effect have already been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub character: char,
    pub effect: Effect,
}

impl Cell {
    pub fn new(character: char, effect: Effect) -> Self {
        Self { character, effect }
    }

    pub fn blank(character: char) -> Self {
        Self { character, effect: Effect::UNSET }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(' ')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_effect_is_fully_unset() {
        let e = Effect::default();
        assert_eq!(e.fg(), None);
        assert_eq!(e.bg(), None);
        assert!(!e.bold());
        assert!(!e.underline());
        assert!(!e.invert());
    }

    #[test]
    fn with_fg_then_without_fg_roundtrips() {
        let e = Effect::UNSET.with_fg(Color::RED);
        assert_eq!(e.fg(), Some(Color::RED));
        let e = e.without_fg();
        assert_eq!(e.fg(), None);
    }

    #[test]
    fn without_color_leaves_flags_untouched() {
        let e = Effect::UNSET
            .with_fg(Color::GREEN)
            .with_bg(Color::BLUE)
            .with_bold(true)
            .with_underline(true);
        let cleared = e.without_color();
        assert_eq!(cleared.fg(), None);
        assert_eq!(cleared.bg(), None);
        assert!(cleared.bold());
        assert!(cleared.underline());
    }

    #[test]
    fn bright_colors_report_base_and_brightness() {
        let bright_red = Color::new(9).expect("valid");
        assert!(bright_red.is_bright());
        assert_eq!(bright_red.base(), 1);
        assert_eq!(Color::RED.base(), 1);
        assert!(!Color::RED.is_bright());
    }

    #[test]
    fn color_out_of_range_is_rejected() {
        assert_eq!(Color::new(16), Err(BadColor(16)));
        assert!(Color::new(15).is_ok());
    }

    #[test]
    fn flags_are_independent_of_each_other() {
        let e = Effect::UNSET.with_bold(true);
        assert!(e.bold());
        assert!(!e.underline());
        assert!(!e.invert());
        let e = e.with_bold(false).with_invert(true);
        assert!(!e.bold());
        assert!(e.invert());
    }
}
