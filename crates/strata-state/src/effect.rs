//! Default-effect operations (`SPEC_FULL.md` §4.1). Every cell in a rect
//! reads its effect live from `default_effect`, so these operations only
//! need to mutate that one field and escalate `full_refresh` when the
//! resulting value actually changed.

use strata_cell::Color;

use crate::error::RectResult;
use crate::manager::RectManager;
use crate::rect::RectId;

impl RectManager {
    fn update_effect(&mut self, id: RectId, f: impl FnOnce(strata_cell::Effect) -> strata_cell::Effect) -> RectResult<()> {
        let rect = self.require_mut(id)?;
        let before = rect.default_effect;
        let after = f(before);
        if after == before {
            return Ok(());
        }
        rect.default_effect = after;
        self.escalate_full_refresh(id);
        Ok(())
    }

    pub fn set_fg_color(&mut self, id: RectId, color: u8) -> RectResult<()> {
        let color = Color::new(color)?;
        self.update_effect(id, move |e| e.with_fg(color))
    }

    pub fn set_bg_color(&mut self, id: RectId, color: u8) -> RectResult<()> {
        let color = Color::new(color)?;
        self.update_effect(id, move |e| e.with_bg(color))
    }

    pub fn unset_fg_color(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.without_fg())
    }

    pub fn unset_bg_color(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.without_bg())
    }

    /// Clears fg and bg only; bold/underline/invert are independent (spec's
    /// resolved Open Question on historical `unset_color` disagreement).
    pub fn unset_color(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.without_color())
    }

    pub fn set_bold_flag(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.with_bold(true))
    }

    pub fn unset_bold_flag(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.with_bold(false))
    }

    pub fn set_underline_flag(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.with_underline(true))
    }

    pub fn unset_underline_flag(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.with_underline(false))
    }

    pub fn set_invert_flag(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.with_invert(true))
    }

    pub fn unset_invert_flag(&mut self, id: RectId) -> RectResult<()> {
        self.update_effect(id, |e| e.with_invert(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RectError;
    use crate::rect::ROOT;

    #[test]
    fn set_fg_color_rejects_out_of_range() {
        let mut m = RectManager::new(5, 5);
        assert_eq!(m.set_fg_color(ROOT, 16), Err(RectError::BadColor));
    }

    #[test]
    fn set_fg_color_escalates_full_refresh_only_on_change() {
        let mut m = RectManager::new(5, 5);
        let r = m.create(ROOT, 3, 1).unwrap();
        m.require_mut(r).unwrap().clear_dirty();
        m.set_fg_color(r, 1).unwrap();
        assert!(m.require(r).unwrap().full_refresh);
        m.require_mut(r).unwrap().clear_dirty();
        m.set_fg_color(r, 1).unwrap();
        assert!(!m.require(r).unwrap().full_refresh);
    }

    #[test]
    fn unset_color_leaves_flags_untouched() {
        let mut m = RectManager::new(5, 5);
        let r = m.create(ROOT, 3, 1).unwrap();
        m.set_fg_color(r, 1).unwrap();
        m.set_bold_flag(r).unwrap();
        m.unset_color(r).unwrap();
        let effect = m.require(r).unwrap().default_effect;
        assert!(effect.fg().is_none());
        assert!(effect.bold());
    }
}
