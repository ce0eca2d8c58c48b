//! Enable/disable and transparency (`SPEC_FULL.md` §4.1).

use crate::error::{RectError, RectResult};
use crate::manager::RectManager;
use crate::rect::{RectId, ROOT};

impl RectManager {
    /// Disables `id`: it and its subtree are treated as absent from
    /// composition. Flags the rect's footprint dirty in the parent.
    pub fn disable_rect(&mut self, id: RectId) -> RectResult<()> {
        self.set_enabled(id, false)
    }

    pub fn enable_rect(&mut self, id: RectId) -> RectResult<()> {
        self.set_enabled(id, true)
    }

    fn set_enabled(&mut self, id: RectId, enabled: bool) -> RectResult<()> {
        if id == ROOT && !enabled {
            tracing::warn!(id, "attempted to disable the root rect");
            return Err(RectError::Fatal("the root rect cannot be disabled"));
        }
        let rect = self.require_mut(id)?;
        if rect.enabled == enabled {
            return Ok(());
        }
        rect.enabled = enabled;
        let parent_id = rect.parent;
        self.dirty_full_footprint_in_parent(id);
        if let Some(parent_id) = parent_id {
            self.rebuild_occlusion(parent_id);
        }
        tracing::debug!(id, enabled, "rect visibility changed");
        Ok(())
    }

    /// Sets transparency; flags full_refresh since it changes how every
    /// cell in the rect's own grid participates in occlusion.
    pub fn set_transparency(&mut self, id: RectId, transparent: bool) -> RectResult<()> {
        let rect = self.require_mut(id)?;
        if rect.transparent == transparent {
            return Ok(());
        }
        rect.transparent = transparent;
        self.escalate_full_refresh(id);
        Ok(())
    }
}
