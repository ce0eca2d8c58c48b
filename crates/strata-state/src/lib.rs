//! The rect tree: components 2-6 of the compositor (`SPEC_FULL.md` §2).
//!
//! [`RectManager`] owns an arena of [`Rect`] nodes keyed by [`RectId`] and
//! exposes the operation surface from §4.1 as inherent methods, spread
//! across sibling modules by concern (structural, content, effect,
//! visibility, geometry, dirty propagation, occlusion, composition) the way
//! the teacher splits its render pipeline across `dirty`, `style`, `apply`
//! and `writer`. This crate depends on `strata-render` for the actual byte
//! emission; it never depends on a terminal backend directly.

mod compose;
mod content;
mod dirty;
mod effect;
mod error;
mod geometry;
mod manager;
mod occlusion;
mod rect;
mod visibility;

pub use error::{RectError, RectResult};
pub use manager::RectManager;
pub use rect::{RectId, ROOT};
