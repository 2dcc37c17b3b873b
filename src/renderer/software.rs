//! ---------------------------------------------------------------------------
//! Software (CPU) ray-casting renderer
//!
//! * One DDA ray per screen column ([`raycast`]); each column renders into
//!   its own slice of a column-major scratch buffer and writes its own depth
//!   slot, so the pass runs on rayon's pool without locks.
//! * Floor and ceiling are cast per column for the rows the wall leaves
//!   uncovered ([`planes`]).
//! * After the join, billboards are composited far-to-near against the
//!   per-column depth buffer ([`sprites`]), then the HUD is drawn ([`hud`]).
//!
//! Pixels are **0x00RRGGBB** ([`super::Rgba`]).
//! ---------------------------------------------------------------------------

mod hud;
mod planes;
mod raycast;
mod renderer;
mod sprites;

pub use raycast::{WallSpan, wall_span};
pub use renderer::Software;
pub use sprites::{VisSprite, visible_in_column};

/// Distances are clamped to this before any division.
pub(crate) const MIN_DIST: f32 = 1e-3;
