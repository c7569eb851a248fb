//! A headless, recycling viewport virtualizer.
//!
//! This crate keeps a long vertical (or horizontal) list cheap to display: only the items that
//! intersect the viewport hold a rendered handle, handles that scroll out of view are pooled and
//! reused, and the space taken by everything else is reported as two spacer extents.
//!
//! Item sizes start out as estimates and are corrected from measurements of the attached
//! handles on every pass. When corrections shift the items above the viewport, a stored anchor
//! (item index + offset into that item) yields the scroll offset that keeps the content from
//! visually jumping.
//!
//! It is UI-agnostic. The host is expected to:
//! - implement [`Surface`] to create, measure, attach and detach handles,
//! - call [`Virtualizer::recompute_visible_window`] after each layout pass or scroll event and
//!   apply the returned [`WindowUpdate`] (spacers + scroll offset),
//! - call [`Virtualizer::invalidate_anchor`] when the user starts scrolling.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod fenwick;
mod options;
mod surface;
mod types;
mod virtualizer;


pub use options::{DEFAULT_GAP, DEFAULT_MIN_SIZE, VirtualizerOptions};
pub use surface::Surface;
pub use types::{Anchor, MeasurePolicy, SizeCorrection, Window, WindowUpdate};
pub use virtualizer::Virtualizer;
