/// The rendering side of a virtualized list.
///
/// A surface creates handles (cells, rows, widgets), renders items into them, and reports how
/// large they turned out. The virtualizer decides which indexes get a handle and keeps unused
/// handles in its pool; it never looks at rendering internals.
///
/// All calls happen synchronously from inside
/// [`Virtualizer::recompute_visible_window`](crate::Virtualizer::recompute_visible_window) or
/// [`Virtualizer::release_all`](crate::Virtualizer::release_all).
pub trait Surface {
    type Handle;

    /// Allocates a fresh handle. Only called when the reuse pool is empty.
    fn create_handle(&mut self) -> Self::Handle;

    /// Returns the current rendered extent of `handle` (which displays `index`) along the
    /// scroll axis.
    fn measure(&self, handle: &Self::Handle, index: usize) -> f64;

    /// Starts displaying `index` in `handle`.
    ///
    /// `position` is the handle's rank among the attached handles after insertion, i.e. the slot
    /// to insert it at in an ordered container such as a stack view.
    fn attach(&mut self, handle: &mut Self::Handle, index: usize, position: usize);

    /// Stops displaying `index` in `handle`. The handle goes back to the pool afterwards.
    fn detach(&mut self, handle: &mut Self::Handle, index: usize);
}
