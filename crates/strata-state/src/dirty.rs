//! Dirty propagation: bubbling a changed local cell up through ancestors,
//! and escalating a rect to `full_refresh` with its footprint flagged dirty
//! in its parent (`SPEC_FULL.md` §4.2).

use crate::manager::RectManager;
use crate::rect::RectId;

impl RectManager {
    /// Flags `(x, y)` dirty in `id`, then translates it through `id`'s own
    /// offset and repeats on the parent, climbing until the root or a
    /// disabled ancestor is reached.
    pub(crate) fn mark_cell_dirty(&mut self, id: RectId, x: u16, y: u16) {
        let mut cur = id;
        let mut cx = x;
        let mut cy = y;
        loop {
            let Some(rect) = self.rects.get_mut(&cur) else { return };
            rect.mark_dirty(cx, cy);
            let (parent, ox, oy, enabled) = (rect.parent, rect.offset_x, rect.offset_y, rect.enabled);
            if !enabled {
                return;
            }
            let Some(parent_id) = parent else { return };
            let px = ox.checked_add(cx as i32);
            let py = oy.checked_add(cy as i32);
            let (Some(px), Some(py)) = (px, py) else { return };
            if px < 0 || py < 0 {
                return;
            }
            cur = parent_id;
            cx = px as u16;
            cy = py as u16;
        }
    }

    /// Marks every local cell of `id`'s current extent dirty in its parent,
    /// bubbling further up from there. Used for structural changes and the
    /// "ghost" side of a move/resize (call once before and once after).
    pub(crate) fn dirty_full_footprint_in_parent(&mut self, id: RectId) {
        let Some((parent_id, ox, oy, w, h)) = self.rects.get(&id).and_then(|r| {
            r.parent.map(|p| (p, r.offset_x, r.offset_y, r.width, r.height))
        }) else {
            return;
        };
        for y in 0..h {
            for x in 0..w {
                if let (Some(px), Some(py)) = (ox.checked_add(x as i32), oy.checked_add(y as i32)) {
                    if px >= 0 && py >= 0 {
                        self.mark_cell_dirty(parent_id, px as u16, py as u16);
                    }
                }
            }
        }
    }

    /// Sets `full_refresh` on `id` and dirties its current footprint in the
    /// parent (the "before" half of a move/resize should call this prior to
    /// changing geometry; the "after" half calls it again afterward).
    pub(crate) fn escalate_full_refresh(&mut self, id: RectId) {
        if let Some(rect) = self.rects.get_mut(&id) {
            rect.mark_full_dirty();
        }
        self.dirty_full_footprint_in_parent(id);
    }
}
