use alloc::vec::Vec;

/// A contiguous run of item indexes, `start_index..end_index` (end exclusive).
///
/// An empty window still has a position: spacer extents are computed around it, so an empty
/// window at `count` means "everything is above the viewport".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl Window {
    pub(crate) fn empty_at(index: usize) -> Self {
        Self {
            start_index: index,
            end_index: index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    pub fn first(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.start_index)
    }

    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end_index - 1)
    }

    pub fn indexes(&self) -> core::ops::Range<usize> {
        self.start_index..self.end_index
    }
}

/// A stable visual reference point: an item plus the distance from that item's start to the
/// scroll offset.
///
/// `offset` may be negative (the viewport starts above the item) or exceed the item's size.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub index: usize,
    pub offset: f64,
}

/// A size-table entry that was corrected from a measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeCorrection {
    pub index: usize,
    pub previous: f64,
    pub measured: f64,
}

/// Which attached handles are measured at the start of a recompute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasurePolicy {
    /// Every attached handle is measured on every pass.
    #[default]
    AllAttached,
    /// Items are measured once after they first get a handle; afterwards only indexes flagged
    /// through `notify_size_changed` are re-measured.
    Hinted,
}

/// The outcome of one `recompute_visible_window` pass.
///
/// The presentation layer applies this: spacer extents above/below the rendered run, and the
/// scroll offset (which differs from the requested one when the anchor moved it).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowUpdate {
    pub window: Window,
    /// Size-table entries corrected from measurements, in ascending index order.
    pub corrections: Vec<SizeCorrection>,
    /// Indexes that received a handle in this pass, ascending.
    pub inserted: Vec<usize>,
    /// Indexes whose handle went back to the pool in this pass, ascending.
    pub removed: Vec<usize>,
    /// Total stride of all items before the window.
    pub leading_spacer: f64,
    /// Total stride of all items after the window.
    pub trailing_spacer: f64,
    /// Scroll offset the host should apply.
    ///
    /// Differs from the requested `viewport_top` when the anchor moved it. `window` and the
    /// spacers still describe the requested viewport, so the host runs another pass at this
    /// offset until it stops changing.
    pub scroll_offset: f64,
    /// Handles allocated through `Surface::create_handle` because the pool ran dry.
    pub created_handles: usize,
}

impl WindowUpdate {
    pub fn has_changes(&self) -> bool {
        !(self.corrections.is_empty() && self.inserted.is_empty() && self.removed.is_empty())
    }

    pub fn invalidated_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.corrections.iter().map(|c| c.index)
    }
}
