//! Composed-grid representation and the ANSI-emitting renderer.
//!
//! This crate owns component 6 of the compositor (the renderer): turning a
//! rectangle of [`strata_cell::Cell`]s into a minimal byte stream, and
//! remembering what was last written so the next call only repaints what
//! changed. It knows nothing about the rect tree — that lives in
//! `strata-state`, which depends on this crate rather than the other way
//! around, so the emission logic stays testable in isolation (see the
//! scenarios in `renderer::tests`).

pub mod grid;
pub mod renderer;
pub mod sgr;

pub use grid::ComposedGrid;
pub use renderer::Renderer;
