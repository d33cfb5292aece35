//! Single-threaded observable primitives.
//!
//! [`Property`] holds one value (query text, current comparator) and
//! [`ObservableList`] holds an ordered sequence (the source records). Both
//! publish a notification after every write completes. Handles are cheap
//! clones that share state through `Rc`, so the writer and any number of
//! readers can hold one each.
//!
//! Listeners return [`Result`]: the first listener error stops delivery and
//! is handed back to the writer.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::{Result, SeekerError};

/// Identifies a registered listener so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Rc<dyn Fn(&E) -> Result<()>>;

struct Listeners<E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, Listener<E>)>>,
}

impl<E> Listeners<E> {
    fn new() -> Self {
        Listeners {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    fn add(&self, listener: Listener<E>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    fn remove(&self, id: ListenerId) -> bool {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            entries
                .iter()
                .position(|(entry, _)| *entry == id)
                .map(|index| entries.remove(index))
        };
        // The closure drops here, after the borrow ends, so whatever it
        // owned may unsubscribe from this registry as it goes.
        removed.is_some()
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    // Delivers to a snapshot so listeners may subscribe or unsubscribe
    // while being notified.
    fn notify(&self, event: &E) -> Result<()> {
        let snapshot: Vec<Listener<E>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event)?;
        }
        Ok(())
    }
}

// ============================================================================
// Property
// ============================================================================

struct PropertyInner<T> {
    value: RefCell<T>,
    listeners: Listeners<T>,
}

/// Observable single value with one writer.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use roster_seeker::Property;
///
/// let query = Property::new(String::new());
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let log = Rc::clone(&seen);
/// query.subscribe(move |text: &String| {
///     log.borrow_mut().push(text.clone());
///     Ok(())
/// });
///
/// query.set("a".to_string()).unwrap();
/// query.set("an".to_string()).unwrap();
/// assert_eq!(*seen.borrow(), ["a", "an"]);
/// ```
pub struct Property<T> {
    inner: Rc<PropertyInner<T>>,
}

impl<T> Property<T> {
    /// Creates a property holding `value`.
    pub fn new(value: T) -> Self {
        Property {
            inner: Rc::new(PropertyInner {
                value: RefCell::new(value),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Runs `f` with a reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Registers a listener called with the new value after every write.
    pub fn subscribe(&self, listener: impl Fn(&T) -> Result<()> + 'static) -> ListenerId {
        self.inner.listeners.add(Rc::new(listener))
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Returns `true` if both handles refer to the same property.
    pub fn ptr_eq(&self, other: &Property<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> Property<T> {
    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Replaces the value, then notifies listeners.
    ///
    /// Every write notifies, even when the new value equals the old one.
    pub fn set(&self, value: T) -> Result<()> {
        *self.inner.value.borrow_mut() = value;
        self.publish()
    }

    /// Edits the value in place, then notifies listeners.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<()> {
        f(&mut self.inner.value.borrow_mut());
        self.publish()
    }

    fn publish(&self) -> Result<()> {
        let current = self.get();
        trace!(listeners = self.listener_count(), "property changed");
        self.inner.listeners.notify(&current)
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Property::new(T::default())
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Property {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.inner.value.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

// ============================================================================
// ObservableList
// ============================================================================

/// Structural change published by an [`ObservableList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// An item was inserted at `index`.
    Inserted { index: usize },
    /// The item at `index` was removed.
    Removed { index: usize },
    /// The item at `index` was replaced.
    Replaced { index: usize },
    /// The whole contents were replaced or cleared.
    Reset,
}

impl fmt::Display for ListChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListChange::Inserted { index } => write!(f, "inserted at {}", index),
            ListChange::Removed { index } => write!(f, "removed at {}", index),
            ListChange::Replaced { index } => write!(f, "replaced at {}", index),
            ListChange::Reset => write!(f, "reset"),
        }
    }
}

struct ListInner<T> {
    items: RefCell<Vec<T>>,
    listeners: Listeners<ListChange>,
}

/// Observable ordered sequence with one writer.
///
/// Mutations return the first listener error, if any; the mutation itself
/// has already been applied by then.
///
/// # Example
///
/// ```
/// use roster_seeker::{ListChange, ObservableList};
///
/// let names = ObservableList::from(vec!["Anna".to_string()]);
/// names.subscribe(|change| {
///     assert_eq!(*change, ListChange::Inserted { index: 1 });
///     Ok(())
/// });
///
/// names.push("Ben".to_string()).unwrap();
/// assert_eq!(names.len(), 2);
/// ```
pub struct ObservableList<T> {
    inner: Rc<ListInner<T>>,
}

impl<T> ObservableList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        ObservableList::from(Vec::new())
    }

    /// Appends an item.
    pub fn push(&self, item: T) -> Result<()> {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            items.push(item);
            items.len() - 1
        };
        self.publish(ListChange::Inserted { index })
    }

    /// Inserts an item at `index`, shifting later items.
    pub fn insert(&self, index: usize, item: T) -> Result<()> {
        {
            let mut items = self.inner.items.borrow_mut();
            if index > items.len() {
                return Err(SeekerError::IndexOutOfBounds {
                    index,
                    len: items.len(),
                });
            }
            items.insert(index, item);
        }
        self.publish(ListChange::Inserted { index })
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&self, index: usize) -> Result<T> {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            if index >= items.len() {
                return Err(SeekerError::IndexOutOfBounds {
                    index,
                    len: items.len(),
                });
            }
            items.remove(index)
        };
        self.publish(ListChange::Removed { index })?;
        Ok(removed)
    }

    /// Replaces the item at `index`, returning the old one.
    pub fn replace(&self, index: usize, item: T) -> Result<T> {
        let old = {
            let mut items = self.inner.items.borrow_mut();
            match items.get_mut(index) {
                Some(slot) => std::mem::replace(slot, item),
                None => {
                    return Err(SeekerError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    })
                }
            }
        };
        self.publish(ListChange::Replaced { index })?;
        Ok(old)
    }

    /// Replaces the whole contents.
    pub fn set_all(&self, items: Vec<T>) -> Result<()> {
        *self.inner.items.borrow_mut() = items;
        self.publish(ListChange::Reset)
    }

    /// Removes every item.
    pub fn clear(&self) -> Result<()> {
        self.inner.items.borrow_mut().clear();
        self.publish(ListChange::Reset)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Returns `true` if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// Runs `f` over the current items in order.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.borrow())
    }

    /// Borrows the current items.
    ///
    /// The borrow must be released before the list is written again.
    pub fn borrow(&self) -> Ref<'_, [T]> {
        Ref::map(self.inner.items.borrow(), Vec::as_slice)
    }

    /// Registers a listener called after every structural change.
    pub fn subscribe(
        &self,
        listener: impl Fn(&ListChange) -> Result<()> + 'static,
    ) -> ListenerId {
        self.inner.listeners.add(Rc::new(listener))
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Returns `true` if both handles refer to the same list.
    pub fn ptr_eq(&self, other: &ObservableList<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn publish(&self, change: ListChange) -> Result<()> {
        trace!(%change, len = self.len(), "list changed");
        self.inner.listeners.notify(&change)
    }
}

impl<T: Clone> ObservableList<T> {
    /// Returns a copy of the current items.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    /// Returns a copy of the item at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.items.borrow().get(index).cloned()
    }
}

impl<T> From<Vec<T>> for ObservableList<T> {
    fn from(items: Vec<T>) -> Self {
        ObservableList {
            inner: Rc::new(ListInner {
                items: RefCell::new(items),
                listeners: Listeners::new(),
            }),
        }
    }
}

impl<T> FromIterator<T> for ObservableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        ObservableList::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        ObservableList::new()
    }
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        ObservableList {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("items", &self.inner.items.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
