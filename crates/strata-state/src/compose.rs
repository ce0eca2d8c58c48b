//! Composition and rendering (`SPEC_FULL.md` §4.3, §4.4).
//!
//! `ensure_composed` lazily refreshes a rect's `composed` cache for its
//! pending coordinates, recursing into covering children first (so a
//! parent never reads a stale child cell) and honoring transparency
//! pass-through. `render` then snapshots a rect's full current `composed`
//! cache into a [`strata_render::ComposedGrid`] and hands it to the
//! renderer positioned at the rect's absolute screen offset.

use std::io::Write;

use strata_cell::Cell;
use strata_render::ComposedGrid;

use crate::error::{RectError, RectResult};
use crate::manager::RectManager;
use crate::rect::RectId;

impl RectManager {
    /// Refreshes `id`'s composed cache for its currently pending coordinates.
    pub(crate) fn ensure_composed(&mut self, id: RectId) {
        let pending = match self.rects.get(&id) {
            Some(r) => r.pending_coords(),
            None => return,
        };
        for (x, y) in pending {
            let cell = self.resolve_local_cell(id, x, y);
            if let Some(r) = self.rects.get_mut(&id) {
                r.composed.insert((x, y), cell);
            }
        }
        if let Some(r) = self.rects.get_mut(&id) {
            r.clear_dirty();
        }
    }

    fn resolve_local_cell(&mut self, id: RectId, x: u16, y: u16) -> Cell {
        let Some(rect) = self.rects.get(&id) else {
            return Cell::default();
        };
        let Some(stack) = rect.occlusion.get(&(x, y)).cloned() else {
            return rect.own_cell(x, y);
        };

        for child_id in stack.into_iter().rev() {
            let Some(child) = self.rects.get(&child_id) else { continue };
            let lx = (x as i32 - child.offset_x) as u16;
            let ly = (y as i32 - child.offset_y) as u16;

            if child.transparent {
                let has_own = child.grid.contains_key(&(lx, ly));
                let covered_by_grandchild = child.occlusion.contains_key(&(lx, ly));
                if !has_own && !covered_by_grandchild {
                    continue;
                }
            }

            self.ensure_composed(child_id);
            if let Some(child) = self.rects.get(&child_id) {
                if let Some(cell) = child.composed.get(&(lx, ly)) {
                    return *cell;
                }
                return child.own_cell(lx, ly);
            }
        }

        self.rects.get(&id).map(|r| r.own_cell(x, y)).unwrap_or_default()
    }

    /// Absolute position of `id`'s (0, 0) corner, summing offsets up to the
    /// root. Clamped to non-negative (a rect fully scrolled off the root's
    /// top/left edge renders at the clamped origin rather than negatively).
    fn absolute_origin(&self, id: RectId) -> (u16, u16) {
        let mut x: i64 = 0;
        let mut y: i64 = 0;
        let mut cur = Some(id);
        while let Some(rect_id) = cur {
            let Some(rect) = self.rects.get(&rect_id) else { break };
            x += rect.offset_x as i64;
            y += rect.offset_y as i64;
            cur = rect.parent;
        }
        (x.max(0) as u16, y.max(0) as u16)
    }

    /// Composes and emits the subtree rooted at `id`, restricted to its
    /// absolute footprint. A render on the root behaves as a full-screen
    /// render; a render on any other id repaints only that rect's extent.
    pub fn render(&mut self, id: RectId, out: &mut impl Write) -> RectResult<usize> {
        if !self.rects.contains_key(&id) {
            return Err(RectError::NotFound(id));
        }
        self.ensure_composed(id);

        let rect = self.rects.get(&id).expect("checked above");
        let (width, height) = (rect.width, rect.height);
        let mut grid = ComposedGrid::filled(width, height, Cell::default());
        for y in 0..height {
            for x in 0..width {
                let cell = rect
                    .composed
                    .get(&(x, y))
                    .copied()
                    .unwrap_or_else(|| rect.own_cell(x, y));
                grid.set(x, y, cell);
            }
        }

        let origin = self.absolute_origin(id);
        let written = self
            .renderer
            .render_region(origin, &grid, out)
            .map_err(|_| RectError::Fatal("render write failed"))?;
        tracing::info!(id, cells_written = written, "render complete");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::ROOT;

    #[test]
    fn single_cell_renders_one_literal_among_spaces() {
        let mut m = RectManager::new(10, 3);
        m.set_character(ROOT, 2, 1, 'X').unwrap();
        let mut out = Vec::new();
        m.render(ROOT, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[2;3H"));
        assert!(text.contains('X'));
    }

    #[test]
    fn nested_overlay_composes_child_background_and_string() {
        let mut m = RectManager::new(10, 5);
        let c = m.create(ROOT, 4, 3).unwrap();
        m.set_position(c, 2, 1).unwrap();
        m.set_bg_color(c, 4).unwrap();
        m.set_string(c, 0, 0, "hi").unwrap();
        let mut out = Vec::new();
        m.render(ROOT, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[44m"));
        assert!(text.contains('h'));
        assert!(text.contains('i'));
    }

    #[test]
    fn occlusion_and_ghost_on_move() {
        let mut m = RectManager::new(10, 1);
        let a = m.create(ROOT, 5, 1).unwrap();
        m.set_string(a, 0, 0, "AAAAA").unwrap();
        let b = m.create(ROOT, 3, 1).unwrap();
        m.set_position(b, 2, 0).unwrap();
        m.set_string(b, 0, 0, "BBB").unwrap();

        let mut out = Vec::new();
        m.render(ROOT, &mut out).unwrap();
        let row = row_of(&m, ROOT);
        assert_eq!(row, "AABBB_____");

        m.set_position(b, 5, 0).unwrap();
        let mut out2 = Vec::new();
        m.render(ROOT, &mut out2).unwrap();
        let row2 = row_of(&m, ROOT);
        assert_eq!(row2, "AAAAABBB__");
    }

    fn row_of(m: &RectManager, id: RectId) -> String {
        let rect = m.rects.get(&id).unwrap();
        (0..rect.width)
            .map(|x| rect.composed.get(&(x, 0)).map(|c| c.character).unwrap_or(' '))
            .collect()
    }

    #[test]
    fn transparent_rect_falls_through_to_root_default() {
        let mut m = RectManager::new(5, 1);
        m.set_bg_color(ROOT, 1).unwrap();
        let t = m.create(ROOT, 3, 1).unwrap();
        m.set_position(t, 1, 0).unwrap();
        m.set_transparency(t, true).unwrap();
        m.set_character(t, 1, 0, '*').unwrap();

        let mut out = Vec::new();
        m.render(ROOT, &mut out).unwrap();
        let row = row_of(&m, ROOT);
        assert_eq!(row, " _*__".replace('_', " "));
        let root = m.rects.get(&ROOT).unwrap();
        assert_eq!(root.composed.get(&(2, 0)).unwrap().character, '*');
        assert_eq!(root.composed.get(&(1, 0)).unwrap().character, ' ');
        assert_eq!(root.composed.get(&(3, 0)).unwrap().character, ' ');
    }
}
