//! Display surfaces: where the sorted view ends up.
//!
//! A surface owns two things the pipeline cares about: the visible rows,
//! which the binding replaces after every pass, and the current sort
//! comparator, which the surface changes when the user picks a column.

use std::cell::{Cell, RefCell};

use crate::error::Result;
use crate::observable::Property;
use crate::ordering::Comparator;

/// Contract between the binding and whatever displays its output.
pub trait DisplaySurface<T> {
    /// Replaces the visible rows.
    fn set_visible(&self, items: Vec<T>);

    /// The surface's current sort comparator; `None` means unsorted.
    ///
    /// The binding subscribes to this property and re-sorts on every change.
    fn comparator(&self) -> Property<Option<Comparator<T>>>;
}

/// Headless surface that keeps the visible rows in memory.
///
/// # Example
///
/// ```
/// use roster_seeker::{Comparator, DisplaySurface, MemorySurface};
///
/// let surface = MemorySurface::new();
/// surface.set_visible(vec![3, 1, 2]);
/// assert_eq!(surface.visible(), [3, 1, 2]);
///
/// surface.sort_by(Comparator::by_key(|n: &i32| *n)).unwrap();
/// assert!(surface.comparator().get().is_some());
/// ```
#[derive(Debug)]
pub struct MemorySurface<T> {
    visible: RefCell<Vec<T>>,
    renders: Cell<u64>,
    comparator: Property<Option<Comparator<T>>>,
}

impl<T> MemorySurface<T> {
    /// Creates an empty, unsorted surface.
    pub fn new() -> Self {
        MemorySurface {
            visible: RefCell::new(Vec::new()),
            renders: Cell::new(0),
            comparator: Property::new(None),
        }
    }

    /// How many times the visible rows have been replaced.
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.visible.borrow().len()
    }

    /// Returns `true` if no rows are visible.
    pub fn is_empty(&self) -> bool {
        self.visible.borrow().is_empty()
    }

    /// Selects a new sort comparator, notifying subscribers.
    pub fn sort_by(&self, comparator: Comparator<T>) -> Result<()> {
        self.comparator.set(Some(comparator))
    }

    /// Drops the sort comparator, notifying subscribers.
    pub fn clear_sort(&self) -> Result<()> {
        self.comparator.set(None)
    }
}

impl<T: Clone> MemorySurface<T> {
    /// Copy of the visible rows.
    pub fn visible(&self) -> Vec<T> {
        self.visible.borrow().clone()
    }
}

impl<T> Default for MemorySurface<T> {
    fn default() -> Self {
        MemorySurface::new()
    }
}

impl<T> DisplaySurface<T> for MemorySurface<T> {
    fn set_visible(&self, items: Vec<T>) {
        *self.visible.borrow_mut() = items;
        self.renders.set(self.renders.get() + 1);
    }

    fn comparator(&self) -> Property<Option<Comparator<T>>> {
        self.comparator.clone()
    }
}
