use crate::error::{Error, Result};

use super::handle::Handle;

/// Slot arena owning every node of a backend.
///
/// Freed slots are recycled through a free list, so handles stay dense under
/// churn. `try_alloc` reserves growth fallibly: a map can report
/// [`Error::AllocationFailure`] from `insert` before any link has been
/// touched, which is what gives the backends their strong rollback
/// guarantee.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live (non-freed) elements.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Allocates a slot, reusing a freed one when available.
    ///
    /// Infallible variant used during construction, where the caller has no
    /// error channel; panics if the arena is at maximum capacity.
    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            // Strict less-than: slots.len() must stay <= Handle::MAX after push.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    /// Fallible allocation: reserves backing storage up front and reports
    /// failure instead of aborting. Used by every insert path.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle> {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()] = Some(element);
            return Ok(h);
        }
        if self.slots.len() >= Handle::MAX {
            return Err(Error::AllocationFailure);
        }
        self.slots.try_reserve(1).map_err(|_| Error::AllocationFailure)?;
        self.slots.push(Some(element));
        Ok(Handle::from_index(self.slots.len() - 1))
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Removes the element and recycles its slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }

    /// Drops every element. This is the bulk-destruction path: node graphs
    /// are never walked edge by edge on drop.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
