//! Position, size and content-shift operations (`SPEC_FULL.md` §4.1).

use crate::error::{RectError, RectResult};
use crate::manager::RectManager;
use crate::rect::RectId;

impl RectManager {
    /// Moves `id` within its parent. Flags the union of the old and new
    /// footprints dirty in the parent.
    pub fn set_position(&mut self, id: RectId, x: i32, y: i32) -> RectResult<()> {
        self.require(id)?;
        self.dirty_full_footprint_in_parent(id);
        let rect = self.require_mut(id)?;
        rect.offset_x = x;
        rect.offset_y = y;
        let parent_id = rect.parent;
        self.dirty_full_footprint_in_parent(id);
        if let Some(parent_id) = parent_id {
            self.rebuild_occlusion(parent_id);
        }
        Ok(())
    }

    /// Resizes `id`, clipping any grid entries now out of range. Flags dirty.
    pub fn resize(&mut self, id: RectId, width: u16, height: u16) -> RectResult<()> {
        self.require(id)?;
        self.dirty_full_footprint_in_parent(id);
        let rect = self.require_mut(id)?;
        rect.width = width;
        rect.height = height;
        rect.grid.retain(|&(x, y), _| x < width && y < height);
        rect.composed.retain(|&(x, y), _| x < width && y < height);
        rect.dirty_local.retain(|&(x, y)| x < width && y < height);
        rect.full_refresh = true;
        let parent_id = rect.parent;
        self.dirty_full_footprint_in_parent(id);
        if let Some(parent_id) = parent_id {
            self.rebuild_occlusion(parent_id);
        }
        if id == crate::rect::ROOT {
            self.renderer.resize_screen(width, height);
        }
        tracing::debug!(id, width, height, "rect resized");
        Ok(())
    }

    /// Translates every set cell and every direct child's offset by
    /// `(dx, dy)`; cells and children that fall fully outside are discarded.
    pub fn shift_contents(&mut self, id: RectId, dx: i32, dy: i32) -> RectResult<()> {
        let rect = self.require(id)?;
        let (width, height) = (rect.width, rect.height);
        let grid = rect.grid.clone();

        let mut shifted = std::collections::HashMap::new();
        for ((x, y), ch) in grid {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx >= 0 && ny >= 0 && (nx as u16) < width && (ny as u16) < height {
                shifted.insert((nx as u16, ny as u16), ch);
            }
        }

        let children = self.require(id)?.children.clone();
        for child_id in children {
            if let Some(child) = self.rects.get_mut(&child_id) {
                child.offset_x += dx;
                child.offset_y += dy;
            }
        }

        let rect = self.require_mut(id)?;
        rect.grid = shifted;
        rect.full_refresh = true;
        self.rebuild_occlusion(id);
        self.dirty_full_footprint_in_parent(id);
        Ok(())
    }

    pub(crate) fn check_bounds(&self, id: RectId, x: u16, y: u16) -> RectResult<()> {
        let rect = self.require(id)?;
        if !rect.contains(x, y) {
            return Err(RectError::OutOfBounds(x, y, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::ROOT;

    #[test]
    fn resize_shrink_then_expand_loses_old_content() {
        let mut m = RectManager::new(10, 10);
        let r = m.create(ROOT, 5, 5).unwrap();
        m.set_character(r, 4, 4, 'Z').unwrap();
        m.resize(r, 3, 3).unwrap();
        assert_eq!(m.check_bounds(r, 4, 4), Err(RectError::OutOfBounds(4, 4, r)));
        m.resize(r, 5, 5).unwrap();
        assert_eq!(m.require(r).unwrap().own_cell(4, 4).character, ' ');
    }

    #[test]
    fn shift_contents_drops_cells_pushed_out_of_bounds() {
        let mut m = RectManager::new(10, 10);
        let r = m.create(ROOT, 3, 1).unwrap();
        m.set_character(r, 0, 0, 'A').unwrap();
        m.shift_contents(r, -1, 0).unwrap();
        assert!(m.require(r).unwrap().grid.is_empty());
    }

    #[test]
    fn shift_contents_moves_children_offsets() {
        let mut m = RectManager::new(10, 10);
        let r = m.create(ROOT, 5, 5).unwrap();
        let c = m.create(r, 1, 1).unwrap();
        m.shift_contents(r, 2, 3).unwrap();
        let child = m.require(c).unwrap();
        assert_eq!((child.offset_x, child.offset_y), (2, 3));
    }
}
