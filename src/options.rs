use alloc::sync::Arc;

use crate::MeasurePolicy;

/// Spacing the original list used between rows.
pub const DEFAULT_GAP: f64 = 8.0;

/// Smallest size an item may occupy in the size table.
pub const DEFAULT_MIN_SIZE: f64 = 1.0;

/// Configuration for [`crate::Virtualizer`].
///
/// The item count is fixed once the virtualizer is built. The estimate closure lives in an `Arc`
/// so options stay cheap to clone.
pub struct VirtualizerOptions {
    pub count: usize,
    /// Initial size of item `i` along the scroll axis, used until the item is measured.
    pub estimate_size: Arc<dyn Fn(usize) -> f64 + Send + Sync>,
    /// Space after every item. An item's stride is `size + gap`.
    pub gap: f64,
    /// Measurements and estimates below this value (or non-finite ones) are clamped to it.
    pub min_size: f64,
    pub measure_policy: MeasurePolicy,
    /// Scroll offset reported before the first recompute.
    pub initial_offset: f64,
}

impl Clone for VirtualizerOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            estimate_size: Arc::clone(&self.estimate_size),
            gap: self.gap,
            min_size: self.min_size,
            measure_policy: self.measure_policy,
            initial_offset: self.initial_offset,
        }
    }
}

impl VirtualizerOptions {
    /// Creates options for `count` items.
    ///
    /// Estimates may be deliberately rough; every attached item is measured on each pass and the
    /// size table converges on the real extents.
    pub fn new(count: usize, estimate_size: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            count,
            estimate_size: Arc::new(estimate_size),
            gap: DEFAULT_GAP,
            min_size: DEFAULT_MIN_SIZE,
            measure_policy: MeasurePolicy::default(),
            initial_offset: 0.0,
        }
    }

    /// Creates options where every item shares the same estimate.
    pub fn uniform(count: usize, estimate: f64) -> Self {
        Self::new(count, move |_| estimate)
    }

    pub fn with_estimate_size(
        mut self,
        estimate_size: impl Fn(usize) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.estimate_size = Arc::new(estimate_size);
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_measure_policy(mut self, measure_policy: MeasurePolicy) -> Self {
        self.measure_policy = measure_policy;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: f64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub(crate) fn sanitized_gap(&self) -> f64 {
        if self.gap.is_finite() && self.gap > 0.0 {
            self.gap
        } else {
            0.0
        }
    }

    pub(crate) fn sanitized_min_size(&self) -> f64 {
        if self.min_size.is_finite() && self.min_size > 0.0 {
            self.min_size
        } else {
            DEFAULT_MIN_SIZE
        }
    }
}

impl core::fmt::Debug for VirtualizerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizerOptions")
            .field("count", &self.count)
            .field("gap", &self.gap)
            .field("min_size", &self.min_size)
            .field("measure_policy", &self.measure_policy)
            .field("initial_offset", &self.initial_offset)
            .finish_non_exhaustive()
    }
}
