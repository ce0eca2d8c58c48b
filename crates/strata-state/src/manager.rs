//! [`RectManager`]: owns the rect arena, allocates ids, and exposes the
//! structural half of the operation surface from `SPEC_FULL.md` §4.1.
//!
//! Content, effect, visibility, geometry and composition operations live in
//! sibling modules as further `impl RectManager` blocks; this file holds the
//! arena itself plus create/remove/attach/detach/replace_with/clear_children
//! and the two width/height queries.

use std::collections::HashMap;

use strata_render::Renderer;

use crate::error::{RectError, RectResult};
use crate::rect::{Rect, RectId, ROOT};

pub struct RectManager {
    pub(crate) rects: HashMap<RectId, Rect>,
    pub(crate) next_id: RectId,
    pub(crate) renderer: Renderer,
}

impl RectManager {
    /// Builds a manager with a root rect sized `width` x `height`.
    pub fn new(width: u16, height: u16) -> Self {
        let mut rects = HashMap::new();
        let mut root = Rect::new(ROOT, None, width, height);
        root.full_refresh = true;
        rects.insert(ROOT, root);
        let mut renderer = Renderer::new();
        renderer.resize_screen(width, height);
        Self {
            rects,
            next_id: ROOT + 1,
            renderer,
        }
    }

    fn alloc_id(&mut self) -> RectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn require(&self, id: RectId) -> RectResult<&Rect> {
        self.rects.get(&id).ok_or(RectError::NotFound(id))
    }

    pub(crate) fn require_mut(&mut self, id: RectId) -> RectResult<&mut Rect> {
        self.rects.get_mut(&id).ok_or(RectError::NotFound(id))
    }

    /// Like [`Self::require`], but reports an unknown id as `ParentNotFound`
    /// rather than `NotFound` — used wherever the id names a parent role.
    fn require_parent(&self, parent_id: RectId) -> RectResult<&Rect> {
        self.rects.get(&parent_id).ok_or(RectError::ParentNotFound(parent_id))
    }

    pub fn get_width(&self, id: RectId) -> RectResult<u16> {
        Ok(self.require(id)?.width)
    }

    pub fn get_height(&self, id: RectId) -> RectResult<u16> {
        Ok(self.require(id)?.height)
    }

    /// Allocates a new rect at `(0, 0)` within `parent_id`.
    pub fn create(&mut self, parent_id: RectId, width: u16, height: u16) -> RectResult<RectId> {
        self.require_parent(parent_id)?;
        let id = self.alloc_id();
        let rect = Rect::new(id, Some(parent_id), width, height);
        self.rects.insert(id, rect);
        self.require_mut(parent_id)?.children.push(id);
        self.rebuild_occlusion(parent_id);
        self.dirty_full_footprint_in_parent(id);
        tracing::debug!(id, parent_id, width, height, "rect created");
        Ok(id)
    }

    /// Recursively destroys `id` and every descendant. Root removal is fatal.
    pub fn remove(&mut self, id: RectId) -> RectResult<()> {
        if id == ROOT {
            tracing::warn!(id, "attempted to remove the root rect");
            return Err(RectError::Fatal("the root rect cannot be removed"));
        }
        self.require(id)?;
        self.detach(id)?;
        self.destroy_subtree(id);
        tracing::debug!(id, "rect removed");
        Ok(())
    }

    fn destroy_subtree(&mut self, id: RectId) {
        let children = match self.rects.get(&id) {
            Some(r) => r.children.clone(),
            None => return,
        };
        for child in children {
            self.destroy_subtree(child);
        }
        self.rects.remove(&id);
    }

    /// Detaches `id` if attached, then appends it under `parent_id`.
    pub fn attach(&mut self, id: RectId, parent_id: RectId) -> RectResult<()> {
        self.require(id)?;
        self.require_parent(parent_id)?;
        if id == parent_id || self.is_ancestor(id, parent_id) {
            tracing::warn!(id, parent_id, "attach would form a cycle");
            return Err(RectError::Fatal("attach would form a cycle"));
        }
        self.detach(id).ok();
        self.require_mut(parent_id)?.children.push(id);
        self.require_mut(id)?.parent = Some(parent_id);
        self.rebuild_occlusion(parent_id);
        self.dirty_full_footprint_in_parent(id);
        Ok(())
    }

    fn is_ancestor(&self, maybe_ancestor: RectId, id: RectId) -> bool {
        let mut cur = self.rects.get(&id).and_then(|r| r.parent);
        while let Some(p) = cur {
            if p == maybe_ancestor {
                return true;
            }
            cur = self.rects.get(&p).and_then(|r| r.parent);
        }
        false
    }

    /// Removes `id` from its current parent. Idempotent if already detached.
    pub fn detach(&mut self, id: RectId) -> RectResult<()> {
        let rect = self.require(id)?;
        let Some(parent_id) = rect.parent else {
            if id == ROOT {
                return Err(RectError::NoParent(id));
            }
            return Ok(());
        };
        self.dirty_full_footprint_in_parent(id);
        if let Some(parent) = self.rects.get_mut(&parent_id) {
            parent.children.retain(|&c| c != id);
        }
        if let Some(rect) = self.rects.get_mut(&id) {
            rect.parent = None;
        }
        self.rebuild_occlusion(parent_id);
        Ok(())
    }

    /// Detaches `new_id`, then swaps it into `old_id`'s slot: same parent,
    /// same index, same offset. `old_id` ends up detached. A no-op if
    /// `old_id == new_id`.
    pub fn replace_with(&mut self, old_id: RectId, new_id: RectId) -> RectResult<()> {
        self.require(old_id)?;
        self.require(new_id)?;
        if old_id == new_id {
            return Ok(());
        }
        let old_rect = self.require(old_id)?;
        let parent_id = old_rect.parent.ok_or(RectError::NoParent(old_id))?;
        let (offset_x, offset_y) = (old_rect.offset_x, old_rect.offset_y);

        let index = self
            .rects
            .get(&parent_id)
            .and_then(|p| p.children.iter().position(|&c| c == old_id));
        self.detach(new_id).ok();

        if let Some(parent) = self.rects.get_mut(&parent_id) {
            if let Some(idx) = index {
                parent.children[idx] = new_id;
            }
        }
        if let Some(rect) = self.rects.get_mut(&old_id) {
            rect.parent = None;
        }
        if let Some(rect) = self.rects.get_mut(&new_id) {
            rect.parent = Some(parent_id);
            rect.offset_x = offset_x;
            rect.offset_y = offset_y;
        }
        self.rebuild_occlusion(parent_id);
        self.dirty_full_footprint_in_parent(new_id);
        self.dirty_full_footprint_in_parent(old_id);
        Ok(())
    }

    /// Detaches and destroys every child of `id`.
    pub fn clear_children(&mut self, id: RectId) -> RectResult<()> {
        let children = self.require(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    /// Detaches and destroys all children, emits a terminal-reset sequence
    /// through `out`, and releases resources. The root itself survives (at
    /// size 0x0 semantics are caller-managed via a fresh `RectManager`).
    pub fn kill(&mut self, out: &mut impl std::io::Write) -> std::io::Result<()> {
        self.clear_children(ROOT).ok();
        out.write_all(b"\x1b[0m\x1b[?25h")?;
        out.flush()?;
        tracing::info!("manager killed, terminal reset emitted");
        Ok(())
    }

    /// Re-applies an externally observed terminal size to the root. Returns
    /// `true` if the size actually changed.
    pub fn fit_to_terminal(&mut self, width: u16, height: u16) -> bool {
        let root = self.rects.get(&ROOT).expect("root always present");
        if root.width == width && root.height == height {
            return false;
        }
        self.resize(ROOT, width, height).ok();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_monotonic_ids() {
        let mut m = RectManager::new(10, 5);
        let a = m.create(ROOT, 2, 2).unwrap();
        let b = m.create(ROOT, 2, 2).unwrap();
        assert!(b > a);
    }

    #[test]
    fn create_under_unknown_parent_fails() {
        let mut m = RectManager::new(10, 5);
        assert_eq!(m.create(999, 1, 1), Err(RectError::ParentNotFound(999)));
    }

    #[test]
    fn attach_to_unknown_parent_fails() {
        let mut m = RectManager::new(10, 5);
        let a = m.create(ROOT, 2, 2).unwrap();
        assert_eq!(m.attach(a, 999), Err(RectError::ParentNotFound(999)));
    }

    #[test]
    fn attach_of_unknown_rect_fails_with_not_found() {
        let mut m = RectManager::new(10, 5);
        assert_eq!(m.attach(999, ROOT), Err(RectError::NotFound(999)));
    }

    #[test]
    fn removing_root_is_fatal() {
        let mut m = RectManager::new(10, 5);
        assert!(matches!(m.remove(ROOT), Err(RectError::Fatal(_))));
    }

    #[test]
    fn remove_destroys_descendants() {
        let mut m = RectManager::new(10, 5);
        let a = m.create(ROOT, 5, 5).unwrap();
        let b = m.create(a, 2, 2).unwrap();
        m.remove(a).unwrap();
        assert_eq!(m.get_width(a), Err(RectError::NotFound(a)));
        assert_eq!(m.get_width(b), Err(RectError::NotFound(b)));
    }

    #[test]
    fn attach_refuses_cycles() {
        let mut m = RectManager::new(10, 5);
        let a = m.create(ROOT, 5, 5).unwrap();
        let b = m.create(a, 2, 2).unwrap();
        assert!(matches!(m.attach(a, b), Err(RectError::Fatal(_))));
    }

    #[test]
    fn detach_is_idempotent() {
        let mut m = RectManager::new(10, 5);
        let a = m.create(ROOT, 5, 5).unwrap();
        m.detach(a).unwrap();
        m.detach(a).unwrap();
    }

    #[test]
    fn detaching_root_fails_with_no_parent() {
        let mut m = RectManager::new(10, 5);
        assert_eq!(m.detach(ROOT), Err(RectError::NoParent(ROOT)));
    }

    #[test]
    fn replace_with_swaps_slot_parent_and_offset() {
        let mut m = RectManager::new(10, 5);
        let old = m.create(ROOT, 2, 2).unwrap();
        m.set_position(old, 3, 4).unwrap();
        let new = m.create(ROOT, 2, 2).unwrap();
        m.replace_with(old, new).unwrap();
        assert_eq!(m.require(new).unwrap().parent, Some(ROOT));
        assert_eq!((m.require(new).unwrap().offset_x, m.require(new).unwrap().offset_y), (3, 4));
        assert_eq!(m.require(old).unwrap().parent, None);
        assert!(m.require(ROOT).unwrap().children.contains(&new));
        assert!(!m.require(ROOT).unwrap().children.contains(&old));
    }

    #[test]
    fn replace_with_same_id_is_a_no_op() {
        let mut m = RectManager::new(10, 5);
        let a = m.create(ROOT, 2, 2).unwrap();
        m.replace_with(a, a).unwrap();
        assert_eq!(m.require(a).unwrap().parent, Some(ROOT));
        assert_eq!(
            m.require(ROOT).unwrap().children.iter().filter(|&&c| c == a).count(),
            1
        );
    }
}
