use alloc::vec::Vec;

use crate::fenwick::Fenwick;
use crate::{
    Anchor, MeasurePolicy, SizeCorrection, Surface, VirtualizerOptions, Window, WindowUpdate,
};

#[derive(Clone, Debug)]
struct Attached<H> {
    index: usize,
    handle: H,
}

/// A recycling viewport virtualizer.
///
/// The virtualizer owns the size table, the handles currently showing items, and a pool of
/// detached handles waiting for reuse. It holds no UI state of its own:
/// - the host calls [`Self::recompute_visible_window`] after every layout pass and scroll event,
/// - the host calls [`Self::invalidate_anchor`] when the user starts scrolling,
/// - a [`Surface`] creates, measures, attaches and detaches handles on request.
///
/// Item `i` occupies `[start(i), start(i) + size(i)]`, followed by `gap`. Starts are prefix sums
/// of `size + gap` over the preceding items.
#[derive(Clone, Debug)]
pub struct Virtualizer<H> {
    options: VirtualizerOptions,
    gap: f64,
    min_size: f64,

    sizes: Vec<f64>, // base sizes (no gap)
    measured: Vec<bool>,
    hinted: Vec<bool>,
    hints: Vec<usize>,
    sums: Fenwick,

    attached: Vec<Attached<H>>, // ascending and contiguous
    pool: Vec<H>,
    window: Window,

    anchor: Option<Anchor>,
    scroll_offset: f64,
}

impl<H> Virtualizer<H> {
    pub fn new(options: VirtualizerOptions) -> Self {
        let gap = options.sanitized_gap();
        let min_size = options.sanitized_min_size();
        let count = options.count;
        vdebug!(count, gap, min_size, "Virtualizer::new");

        let mut v = Self {
            gap,
            min_size,
            sizes: Vec::new(),
            measured: Vec::new(),
            hinted: alloc::vec![false; count],
            hints: Vec::new(),
            sums: Fenwick::from_sizes(&[], gap),
            attached: Vec::new(),
            pool: Vec::new(),
            window: Window::default(),
            anchor: None,
            scroll_offset: if options.initial_offset.is_finite() {
                options.initial_offset
            } else {
                0.0
            },
            options,
        };
        v.rebuild_estimates();
        v
    }

    pub fn options(&self) -> &VirtualizerOptions {
        &self.options
    }

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// The size table: one entry per item, excluding the gap.
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn item_size(&self, index: usize) -> Option<f64> {
        self.sizes.get(index).copied()
    }

    pub fn item_start(&self, index: usize) -> Option<f64> {
        (index < self.count()).then(|| self.sums.prefix_sum(index))
    }

    pub fn item_end(&self, index: usize) -> Option<f64> {
        Some(self.item_start(index)? + self.item_size(index)?)
    }

    /// Total scrollable extent: the sum of every item's stride.
    pub fn total_extent(&self) -> f64 {
        self.sums.total()
    }

    /// Returns the item whose stride (item plus trailing gap) contains `offset`.
    ///
    /// Offsets before the content map to the first item; offsets at or past the end yield `None`.
    pub fn index_at_offset(&self, offset: f64) -> Option<usize> {
        let count = self.count();
        if count == 0 || offset.is_nan() || offset >= self.total_extent() {
            return None;
        }
        let index = self.sums.lower_bound(offset.max(0.0));
        (index < count).then_some(index)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// The window produced by the most recent recompute.
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Installs an explicit anchor, e.g. to restore a saved position.
    ///
    /// The next recompute scrolls so that `anchor.index` starts `anchor.offset` above the
    /// viewport top.
    pub fn set_anchor(&mut self, anchor: Anchor) {
        vtrace!(index = anchor.index, offset = anchor.offset, "set_anchor");
        self.anchor = Some(anchor);
    }

    /// Forgets the current anchor so the next recompute derives a fresh one from the scroll
    /// offset it is given.
    ///
    /// Call this when the user starts a scroll gesture; a stale anchor would otherwise snap the
    /// viewport back.
    pub fn invalidate_anchor(&mut self) {
        if self.anchor.take().is_some() {
            vtrace!("invalidate_anchor");
        }
    }

    /// Flags `index` for measurement on the next recompute.
    ///
    /// With [`MeasurePolicy::AllAttached`] every attached item is measured anyway and this is
    /// only a hint. With [`MeasurePolicy::Hinted`] an attached item is measured once after it
    /// first gets a handle; after that, this is the only way it gets re-measured.
    pub fn notify_size_changed(&mut self, index: usize) {
        let Some(flag) = self.hinted.get_mut(index) else {
            return;
        };
        if !*flag {
            *flag = true;
            self.hints.push(index);
        }
    }

    /// The scroll offset resolved by the most recent recompute.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn attached_len(&self) -> usize {
        self.attached.len()
    }

    pub fn attached_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.attached.iter().map(|slot| slot.index)
    }

    /// Returns the handle currently displaying `index`, if any.
    pub fn handle(&self, index: usize) -> Option<&H> {
        let position = index.checked_sub(self.window.start_index)?;
        self.attached
            .get(position)
            .filter(|slot| slot.index == index)
            .map(|slot| &slot.handle)
    }

    pub fn handle_mut(&mut self, index: usize) -> Option<&mut H> {
        let position = index.checked_sub(self.window.start_index)?;
        self.attached
            .get_mut(position)
            .filter(|slot| slot.index == index)
            .map(|slot| &mut slot.handle)
    }

    /// Records a measurement taken outside of a recompute (for example of an off-screen item).
    ///
    /// The anchor is left alone; the next recompute re-stabilizes the viewport around it.
    pub fn measure(&mut self, index: usize, size: f64) -> Option<SizeCorrection> {
        if index >= self.count() {
            return None;
        }
        vtrace!(index, size, "measure");
        self.set_size(index, size)
    }

    /// Drops every measurement and rebuilds the size table from the estimates.
    pub fn reset_measurements(&mut self) {
        self.rebuild_estimates();
    }

    /// Pure query: the window a recompute would select for this viewport, using the current
    /// size table.
    ///
    /// An item is visible when `[start, start + size]` intersects
    /// `[viewport_top, viewport_top + viewport_height]`; touching an edge counts.
    pub fn visible_window_for(&self, viewport_top: f64, viewport_height: f64) -> Window {
        let count = self.count();
        if count == 0
            || !viewport_top.is_finite()
            || !viewport_height.is_finite()
            || viewport_height <= 0.0
        {
            return Window::empty_at(0);
        }

        let bottom = viewport_top + viewport_height;
        if bottom < 0.0 {
            return Window::empty_at(0);
        }

        // The stride containing the top is a starting guess: the previous item may end exactly
        // on the top edge (zero gap), or the top may sit inside this item's gap.
        let mut start = self.sums.lower_bound(viewport_top.max(0.0)).min(count - 1);
        while start > 0 && self.end_of(start - 1) >= viewport_top {
            start -= 1;
        }
        while start < count && self.end_of(start) < viewport_top {
            start += 1;
        }
        if start == count {
            return Window::empty_at(count);
        }

        let mut cursor = self.sums.prefix_sum(start);
        let mut end = start;
        while end < count && cursor <= bottom {
            cursor += self.sizes[end] + self.gap;
            end += 1;
        }

        Window {
            start_index: start,
            end_index: end,
        }
    }

    /// Brings the attached handles in line with the viewport.
    ///
    /// In order, this:
    /// 1. measures attached handles and corrects the size table,
    /// 2. selects the visible window for `viewport_top`/`viewport_height`,
    /// 3. detaches handles that left the window into the pool and attaches pooled (or new)
    ///    handles to items that entered it,
    /// 4. computes the leading/trailing spacer extents,
    /// 5. resolves the anchor: an existing anchor wins over `viewport_top` and yields the scroll
    ///    offset to apply; without one, a new anchor is derived from the first visible item.
    ///
    /// The window and spacers are selected for `viewport_top`. When the returned
    /// [`WindowUpdate::scroll_offset`] differs from it, apply that offset and recompute again
    /// with it so the window matches what is actually on screen.
    pub fn recompute_visible_window<S>(
        &mut self,
        surface: &mut S,
        viewport_top: f64,
        viewport_height: f64,
    ) -> WindowUpdate
    where
        S: Surface<Handle = H> + ?Sized,
    {
        let top = if viewport_top.is_finite() {
            viewport_top
        } else {
            self.scroll_offset
        };

        let mut update = WindowUpdate::default();
        self.refresh_sizes(&*surface, &mut update.corrections);

        let window = self.visible_window_for(top, viewport_height);
        self.apply_window(surface, window, &mut update);
        self.window = window;

        update.window = window;
        update.leading_spacer = self.sums.prefix_sum(window.start_index);
        update.trailing_spacer =
            (self.sums.total() - self.sums.prefix_sum(window.end_index)).max(0.0);
        update.scroll_offset = self.resolve_anchor(top, window);

        if update.has_changes() {
            vdebug!(
                corrected = ?update.corrections.iter().map(|c| c.index).collect::<Vec<_>>(),
                removed = ?update.removed,
                inserted = ?update.inserted,
                start = window.start_index,
                end = window.end_index,
                "visible window changed"
            );
        }
        vtrace!(
            leading = update.leading_spacer,
            trailing = update.trailing_spacer,
            scroll_offset = update.scroll_offset,
            pool = self.pool.len(),
            "recompute_visible_window"
        );

        update
    }

    /// Detaches every attached handle into the pool.
    ///
    /// Returns how many handles were released.
    pub fn release_all<S>(&mut self, surface: &mut S) -> usize
    where
        S: Surface<Handle = H> + ?Sized,
    {
        let n = self.attached.len();
        for mut slot in self.attached.drain(..) {
            surface.detach(&mut slot.handle, slot.index);
            self.pool.push(slot.handle);
        }
        self.window = Window::default();
        vdebug!(released = n, "release_all");
        n
    }

    /// Drops every pooled handle, returning how many were dropped.
    pub fn clear_pool(&mut self) -> usize {
        let n = self.pool.len();
        self.pool.clear();
        n
    }

    fn refresh_sizes<S>(&mut self, surface: &S, corrections: &mut Vec<SizeCorrection>)
    where
        S: Surface<Handle = H> + ?Sized,
    {
        let hinted_only = self.options.measure_policy == MeasurePolicy::Hinted;
        let min_size = self.min_size;

        for slot in &self.attached {
            let index = slot.index;
            // Under `Hinted`, items without any measurement yet are still measured once.
            if hinted_only && !self.hinted[index] && self.measured[index] {
                continue;
            }

            let raw = surface.measure(&slot.handle, index);
            let size = clamp_size(raw, min_size);
            if size != raw {
                vwarn!(index, raw, clamped = size, "measured size out of range; clamped");
            }

            self.measured[index] = true;
            let previous = self.sizes[index];
            if size != previous {
                self.sizes[index] = size;
                self.sums.add(index, size - previous);
                corrections.push(SizeCorrection {
                    index,
                    previous,
                    measured: size,
                });
            }
        }

        for index in self.hints.drain(..) {
            self.hinted[index] = false;
        }
    }

    fn apply_window<S>(&mut self, surface: &mut S, window: Window, update: &mut WindowUpdate)
    where
        S: Surface<Handle = H> + ?Sized,
    {
        // Both the attached run and the window are contiguous, so whatever leaves the window is
        // a prefix and/or a suffix of the attached run.
        let head = self
            .attached
            .partition_point(|slot| slot.index < window.start_index);
        for slot in self.attached.drain(..head) {
            release(surface, &mut self.pool, slot, &mut update.removed);
        }
        let tail = self
            .attached
            .partition_point(|slot| slot.index < window.end_index);
        for slot in self.attached.drain(tail..) {
            release(surface, &mut self.pool, slot, &mut update.removed);
        }

        for index in window.indexes() {
            let position = index - window.start_index;
            if self
                .attached
                .get(position)
                .is_some_and(|slot| slot.index == index)
            {
                continue;
            }

            let mut handle = match self.pool.pop() {
                Some(handle) => handle,
                None => {
                    update.created_handles += 1;
                    surface.create_handle()
                }
            };
            surface.attach(&mut handle, index, position);
            self.attached.insert(position, Attached { index, handle });
            update.inserted.push(index);
        }

        debug_assert!(
            self.attached
                .iter()
                .enumerate()
                .all(|(k, slot)| slot.index == window.start_index + k),
            "attached handles must mirror the window (window={window:?})"
        );
    }

    fn resolve_anchor(&mut self, viewport_top: f64, window: Window) -> f64 {
        let count = self.count();
        if let Some(anchor) = self.anchor.filter(|a| a.index < count) {
            self.scroll_offset = self.sums.prefix_sum(anchor.index) + anchor.offset;
        } else {
            self.anchor = window.first().map(|index| Anchor {
                index,
                offset: viewport_top - self.sums.prefix_sum(index),
            });
            self.scroll_offset = viewport_top;
        }
        self.scroll_offset
    }

    fn set_size(&mut self, index: usize, size: f64) -> Option<SizeCorrection> {
        let size = clamp_size(size, self.min_size);
        self.measured[index] = true;
        let previous = self.sizes[index];
        if size == previous {
            return None;
        }
        self.sizes[index] = size;
        self.sums.add(index, size - previous);
        Some(SizeCorrection {
            index,
            previous,
            measured: size,
        })
    }

    fn end_of(&self, index: usize) -> f64 {
        self.sums.prefix_sum(index) + self.sizes[index]
    }

    fn rebuild_estimates(&mut self) {
        let count = self.options.count;
        vdebug!(count, "rebuild_estimates");
        self.sizes.clear();
        self.measured.clear();
        self.sizes.reserve_exact(count);
        self.measured.reserve_exact(count);

        for i in 0..count {
            self.sizes
                .push(clamp_size((self.options.estimate_size)(i), self.min_size));
            self.measured.push(false);
        }
        self.sums = Fenwick::from_sizes(&self.sizes, self.gap);
    }
}

fn release<S>(
    surface: &mut S,
    pool: &mut Vec<S::Handle>,
    slot: Attached<S::Handle>,
    removed: &mut Vec<usize>,
) where
    S: Surface + ?Sized,
{
    let Attached { index, mut handle } = slot;
    surface.detach(&mut handle, index);
    pool.push(handle);
    removed.push(index);
}

fn clamp_size(size: f64, min_size: f64) -> f64 {
    if size.is_finite() {
        size.max(min_size)
    } else {
        min_size
    }
}
