//! [`Rect`]: one node of the composition tree.
//!
//! A `Rect` never stores a [`Cell`] directly — only the character half of
//! its grid is kept (see `SPEC_FULL.md` §3 for why); the effect half is
//! always read live from `default_effect` at composition time.

use std::collections::{HashMap, HashSet};
use strata_cell::{Cell, Effect};

/// Identifies a rect uniquely within the lifetime of one [`crate::RectManager`].
/// Ids are assigned monotonically and never reused.
pub type RectId = u32;

/// Root rect id. Always present, always enabled, never removable.
pub const ROOT: RectId = 0;

#[derive(Debug)]
pub(crate) struct Rect {
    pub id: RectId,
    pub parent: Option<RectId>,
    /// Z-order ascending: later entries draw on top.
    pub children: Vec<RectId>,
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u16,
    pub height: u16,
    /// Sparse: absent coordinates resolve to `default_character`.
    pub grid: HashMap<(u16, u16), char>,
    pub default_character: char,
    pub default_effect: Effect,
    pub enabled: bool,
    pub transparent: bool,
    pub dirty_local: HashSet<(u16, u16)>,
    pub full_refresh: bool,
    /// Local coordinate -> z-order-ascending list of covering child ids,
    /// filtered to non-negative, in-bounds coordinates at insertion time.
    pub occlusion: HashMap<(u16, u16), Vec<RectId>>,
    /// Last-composited cell per local coordinate, read by the parent (or the
    /// renderer, at the root) during composition.
    pub composed: HashMap<(u16, u16), Cell>,
}

impl Rect {
    pub fn new(id: RectId, parent: Option<RectId>, width: u16, height: u16) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            offset_x: 0,
            offset_y: 0,
            width,
            height,
            grid: HashMap::new(),
            default_character: ' ',
            default_effect: Effect::UNSET,
            enabled: true,
            transparent: false,
            dirty_local: HashSet::new(),
            full_refresh: true, // a freshly created rect is entirely unpainted
            occlusion: HashMap::new(),
            composed: HashMap::new(),
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// The cell this rect itself would contribute at `(x, y)`, ignoring any
    /// children that might occlude it.
    pub fn own_cell(&self, x: u16, y: u16) -> Cell {
        let character = self.grid.get(&(x, y)).copied().unwrap_or(self.default_character);
        Cell::new(character, self.default_effect)
    }

    pub fn mark_dirty(&mut self, x: u16, y: u16) {
        if self.contains(x, y) {
            self.dirty_local.insert((x, y));
        }
    }

    pub fn mark_region_dirty(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.dirty_local.insert((x, y));
            }
        }
    }

    pub fn mark_full_dirty(&mut self) {
        self.full_refresh = true;
    }

    /// Coordinates that need recompositing this pass: the full extent if
    /// `full_refresh` is set, else the accumulated `dirty_local` set.
    pub fn pending_coords(&self) -> Vec<(u16, u16)> {
        if self.full_refresh {
            let mut v = Vec::with_capacity(self.width as usize * self.height as usize);
            for y in 0..self.height {
                for x in 0..self.width {
                    v.push((x, y));
                }
            }
            v
        } else {
            self.dirty_local.iter().copied().collect()
        }
    }

    pub fn clear_dirty(&mut self) {
        self.dirty_local.clear();
        self.full_refresh = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rect_starts_fully_dirty_and_enabled() {
        let r = Rect::new(1, Some(0), 4, 3);
        assert!(r.full_refresh);
        assert!(r.enabled);
        assert!(!r.transparent);
        assert_eq!(r.pending_coords().len(), 12);
    }

    #[test]
    fn own_cell_falls_back_to_defaults() {
        let mut r = Rect::new(1, Some(0), 2, 2);
        assert_eq!(r.own_cell(0, 0).character, ' ');
        r.grid.insert((0, 0), 'Z');
        assert_eq!(r.own_cell(0, 0).character, 'Z');
        assert_eq!(r.own_cell(1, 0).character, ' ');
    }

    #[test]
    fn mark_dirty_ignores_out_of_bounds() {
        let mut r = Rect::new(1, Some(0), 2, 2);
        r.clear_dirty();
        r.mark_dirty(5, 5);
        assert!(r.dirty_local.is_empty());
        r.mark_dirty(1, 1);
        assert!(r.dirty_local.contains(&(1, 1)));
    }
}
