//! Diffs a composed [`ComposedGrid`] region against what was last written to
//! the terminal and emits the minimal ANSI byte stream to catch it up.
//!
//! The renderer tracks two pieces of state across calls: where it believes
//! the real cursor sits (`terminal_cursor`) and what SGR attributes are
//! currently active (`terminal_effect`). Both persist between `render_region`
//! calls so back-to-back renders of different rects still chain into a
//! single minimal stream rather than each re-announcing position and style.

use crate::grid::ComposedGrid;
use crate::sgr;
use std::io::{self, Write};
use strata_cell::{Cell, Effect};

pub struct Renderer {
    screen_width: u16,
    screen_height: u16,
    last: Vec<Cell>,
    known: Vec<bool>,
    terminal_effect: Effect,
    terminal_cursor: Option<(u16, u16)>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            screen_width: 0,
            screen_height: 0,
            last: Vec::new(),
            known: Vec::new(),
            terminal_effect: Effect::UNSET,
            terminal_cursor: None,
        }
    }

    /// Declare the current screen dimensions. Changing them discards the
    /// "last emitted" memory (the old buffer no longer corresponds to
    /// anything on screen at those coordinates), so the next render repaints
    /// from scratch.
    pub fn resize_screen(&mut self, width: u16, height: u16) {
        let len = width as usize * height as usize;
        self.screen_width = width;
        self.screen_height = height;
        self.last = vec![Cell::default(); len];
        self.known = vec![false; len];
    }

    /// Force the next render to treat every cell as changed without altering
    /// the declared screen size (used after `kill()`/re-entry, or in tests).
    pub fn invalidate(&mut self) {
        self.known.iter_mut().for_each(|k| *k = false);
        self.terminal_cursor = None;
    }

    /// Diff `region`, positioned at `origin` in absolute screen coordinates,
    /// against the tracked emission state and write the minimal sequence
    /// needed to bring the terminal in sync. Returns the number of cells
    /// actually written (distinct from bytes; useful for tests/metrics).
    pub fn render_region(
        &mut self,
        origin: (u16, u16),
        region: &ComposedGrid,
        out: &mut impl Write,
    ) -> io::Result<usize> {
        let (ox, oy) = origin;
        let mut written = 0usize;
        for ry in 0..region.height() {
            let sy = oy.saturating_add(ry);
            if sy >= self.screen_height {
                continue;
            }
            for rx in 0..region.width() {
                let sx = ox.saturating_add(rx);
                if sx >= self.screen_width {
                    continue;
                }
                let cell = region.get(rx, ry);
                let idx = sy as usize * self.screen_width as usize + sx as usize;
                if self.known[idx] && self.last[idx] == cell {
                    continue;
                }
                if self.terminal_cursor != Some((sx, sy)) {
                    write!(out, "\x1b[{};{}H", sy + 1, sx + 1)?;
                }
                let params = sgr::diff_params(self.terminal_effect, cell.effect);
                if !params.is_empty() {
                    write!(out, "\x1b[{}m", join_params(&params))?;
                    self.terminal_effect = cell.effect;
                }
                write!(out, "{}", cell.character)?;
                self.last[idx] = cell;
                self.known[idx] = true;
                self.terminal_cursor = Some((sx + 1, sy));
                written += 1;
            }
        }
        out.flush()?;
        tracing::trace!(target: "render.emit", origin = ?origin, cells_written = written, "render_region");
        Ok(written)
    }
}

fn join_params(params: &[u8]) -> String {
    let mut s = String::with_capacity(params.len() * 3);
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            s.push(';');
        }
        s.push_str(&p.to_string());
    }
    s
}
