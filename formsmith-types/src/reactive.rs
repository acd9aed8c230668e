//! Observable values, observable lists and computed values.
//!
//! This is a small, single-threaded observer/subject system. Reads that should
//! create a dependency go through a [`Tracker`], which is handed explicitly to
//! the evaluation closure of a [`Computed`]. There is no ambient "current
//! computation": a read without a tracker never subscribes to anything.
//!
//! A computed value subscribes to exactly the sources it read during its last
//! evaluation. When any of them changes, the computed value is marked dirty and
//! the dirtiness is forwarded to everything depending on it. The next read
//! re-evaluates it, so a read after a mutation never observes a stale value.
//!
//! ```
//! use formsmith_types::reactive::{Computed, Observable};
//!
//! let count = Observable::new(2);
//! let doubled = {
//!     let count = count.clone();
//!     Computed::new(move |cx| count.track(cx) * 2)
//! };
//! assert_eq!(doubled.get(), 4);
//!
//! count.set(5);
//! assert_eq!(doubled.get(), 10);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Something that can be marked stale by a source it depends on.
trait Subscriber {
    fn mark_dirty(&self);
}

/// Something a subscriber can stop listening to.
///
/// Subscribers are identified by the address of their allocation.
trait Source {
    fn unsubscribe(&self, subscriber: *const ());
}

fn address_of(subscriber: &Weak<dyn Subscriber>) -> *const () {
    subscriber.as_ptr().cast::<()>()
}

/// The listeners registered on one source.
#[derive(Default)]
struct Subscribers {
    entries: RefCell<Vec<Weak<dyn Subscriber>>>,
}

impl Subscribers {
    fn add(&self, subscriber: Weak<dyn Subscriber>) {
        let mut entries = self.entries.borrow_mut();
        let address = address_of(&subscriber);
        if !entries.iter().any(|w| address_of(w) == address) {
            entries.push(subscriber);
        }
    }

    fn remove(&self, subscriber: *const ()) {
        self.entries
            .borrow_mut()
            .retain(|w| address_of(w) != subscriber && w.strong_count() > 0);
    }

    fn notify(&self) {
        // Collect first: marking a subscriber dirty may touch other sources.
        let live: Vec<Rc<dyn Subscriber>> = {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|w| w.strong_count() > 0);
            entries.iter().filter_map(Weak::upgrade).collect()
        };
        for subscriber in live {
            subscriber.mark_dirty();
        }
    }

    fn len(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// Records the sources read while a computed value evaluates.
///
/// Pass it to [`Observable::track`], [`ObservableList::track`] or
/// [`Computed::track`] to make the read a dependency. A tracker created with
/// [`Tracker::untracked`] records nothing, which lets code written against a
/// tracker also run outside of any computed value.
pub struct Tracker {
    subscriber: Option<Weak<dyn Subscriber>>,
    sources: RefCell<Vec<Rc<dyn Source>>>,
}

impl Tracker {
    /// A tracker that records no dependencies.
    pub fn untracked() -> Self {
        Self {
            subscriber: None,
            sources: RefCell::new(Vec::new()),
        }
    }

    fn recording(subscriber: Weak<dyn Subscriber>) -> Self {
        Self {
            subscriber: Some(subscriber),
            sources: RefCell::new(Vec::new()),
        }
    }

    /// Whether reads through this tracker create dependencies.
    pub fn is_recording(&self) -> bool {
        self.subscriber.is_some()
    }

    fn record<S: Source + 'static>(&self, source: &Rc<S>, subscribers: &Subscribers) {
        if let Some(subscriber) = &self.subscriber {
            subscribers.add(subscriber.clone());
            let source: Rc<dyn Source> = source.clone();
            self.sources.borrow_mut().push(source);
        }
    }

    fn into_sources(self) -> Vec<Rc<dyn Source>> {
        self.sources.into_inner()
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("recording", &self.is_recording())
            .field("sources", &self.sources.borrow().len())
            .finish()
    }
}

struct ObservableInner<T> {
    value: RefCell<T>,
    subscribers: Subscribers,
}

impl<T> Source for ObservableInner<T> {
    fn unsubscribe(&self, subscriber: *const ()) {
        self.subscribers.remove(subscriber);
    }
}

/// A value that notifies its dependents when it changes.
///
/// Cloning an `Observable` clones the handle, not the value: both handles
/// read and write the same cell.
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T: 'static> Observable<T> {
    /// Create a new observable holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(value),
                subscribers: Subscribers::default(),
            }),
        }
    }

    /// Borrow the current value without creating a dependency.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Borrow the current value and record it as a dependency of `cx`.
    pub fn with_tracked<R>(&self, cx: &Tracker, f: impl FnOnce(&T) -> R) -> R {
        cx.record(&self.inner, &self.inner.subscribers);
        self.with(f)
    }

    /// Mutate the value in place. Dependents are always notified.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.inner.subscribers.notify();
    }

    /// Notify dependents without changing the value.
    ///
    /// Needed after a change the observable could not see, e.g. an in-place
    /// mutation through interior mutability of `T` itself.
    pub fn value_has_mutated(&self) {
        self.inner.subscribers.notify();
    }

    /// Number of live dependents.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Current value, without creating a dependency.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Current value, recorded as a dependency of `cx`.
    pub fn track(&self, cx: &Tracker) -> T {
        self.with_tracked(cx, T::clone)
    }
}

impl<T: PartialEq + 'static> Observable<T> {
    /// Replace the value. Dependents are notified only if the value changed.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.inner.subscribers.notify();
        true
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable")
            .field(&self.inner.value.borrow())
            .finish()
    }
}

/// An ordered list that notifies its dependents on every mutation.
///
/// Like [`Observable`], cloning shares the underlying list.
pub struct ObservableList<T> {
    items: Observable<Vec<T>>,
}

impl<T: Clone + 'static> ObservableList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a list holding `items`.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: Observable::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.items.with(Vec::is_empty)
    }

    /// Item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.with(|items| items.get(index).cloned())
    }

    /// Snapshot of the items.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.get()
    }

    /// Borrow the items without creating a dependency.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.items.with(|items| f(items))
    }

    /// Snapshot of the items, recorded as a dependency of `cx`.
    pub fn track(&self, cx: &Tracker) -> Vec<T> {
        self.items.track(cx)
    }

    /// Length of the list, recorded as a dependency of `cx`.
    pub fn track_len(&self, cx: &Tracker) -> usize {
        self.items.with_tracked(cx, Vec::len)
    }

    /// Index of the first item matching `predicate`.
    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.with(|items| items.iter().position(predicate))
    }

    /// Append an item.
    pub fn push(&self, item: T) {
        self.items.update(|items| items.push(item));
    }

    /// Insert an item at `index`, shifting later items. `index` is clamped to
    /// the length of the list.
    pub fn insert(&self, index: usize, item: T) {
        self.items.update(|items| {
            let index = index.min(items.len());
            items.insert(index, item);
        });
    }

    /// Remove and return the item at `index`. Out-of-range indices are a
    /// no-op and do not notify.
    pub fn remove_at(&self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        let mut removed = None;
        self.items.update(|items| removed = Some(items.remove(index)));
        removed
    }

    /// Replace the item at `index`. Returns false if `index` is out of range.
    pub fn replace_at(&self, index: usize, item: T) -> bool {
        if index >= self.len() {
            return false;
        }
        self.items.update(|items| items[index] = item);
        true
    }

    /// Move the item at `from` so that it ends up at `to`.
    ///
    /// Both indices refer to the list as it is before the move, except that
    /// `to` is the final position after the item has been taken out. Returns
    /// false (and does not notify) if either index is out of range.
    pub fn move_item(&self, from: usize, to: usize) -> bool {
        let len = self.len();
        if from >= len || to >= len {
            return false;
        }
        self.items.update(|items| {
            let item = items.remove(from);
            items.insert(to, item);
        });
        true
    }

    /// Signal a change made outside of the list's own operations.
    pub fn value_has_mutated(&self) {
        self.items.value_has_mutated();
    }
}

impl<T: Clone + PartialEq + 'static> ObservableList<T> {
    /// Remove the first item equal to `item`. Returns whether one was removed.
    pub fn remove_item(&self, item: &T) -> bool {
        match self.position(|candidate| candidate == item) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    /// Whether the list contains an item equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.position(|candidate| candidate == item).is_some()
    }
}

/// A handle on an [`ObservableList`] that can read and reorder the items but
/// neither add nor remove them.
///
/// Owners that keep invariants over the set of items, like a form whose
/// fields must be unique, hand this out instead of the list.
pub struct Reorderable<T> {
    list: ObservableList<T>,
}

impl<T: Clone + 'static> Reorderable<T> {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<T> {
        self.list.get(index)
    }

    /// Snapshot of the items.
    pub fn to_vec(&self) -> Vec<T> {
        self.list.to_vec()
    }

    /// Snapshot of the items, recorded as a dependency of `cx`.
    pub fn track(&self, cx: &Tracker) -> Vec<T> {
        self.list.track(cx)
    }

    /// Index of the first item matching `predicate`.
    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.list.position(predicate)
    }

    /// See [`ObservableList::move_item`].
    pub fn move_item(&self, from: usize, to: usize) -> bool {
        self.list.move_item(from, to)
    }
}

impl<T> From<ObservableList<T>> for Reorderable<T> {
    fn from(list: ObservableList<T>) -> Self {
        Self { list }
    }
}

impl<T> Clone for Reorderable<T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Reorderable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reorderable").field(&self.list).finish()
    }
}

impl<T: Clone + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObservableList")
            .field(&self.items.inner.value.borrow())
            .finish()
    }
}

struct ComputedInner<T> {
    evaluate: Box<dyn Fn(&Tracker) -> T>,
    value: RefCell<T>,
    dirty: Cell<bool>,
    sources: RefCell<Vec<Rc<dyn Source>>>,
    subscribers: Subscribers,
    this: Weak<ComputedInner<T>>,
    evaluations: Cell<u64>,
}

impl<T: 'static> ComputedInner<T> {
    fn refresh(&self) {
        if !self.dirty.get() {
            return;
        }
        for source in self.sources.borrow_mut().drain(..) {
            source.unsubscribe(self.this.as_ptr().cast::<()>());
        }

        let subscriber: Weak<dyn Subscriber> = self.this.clone();
        let tracker = Tracker::recording(subscriber);
        let value = (self.evaluate)(&tracker);
        *self.sources.borrow_mut() = tracker.into_sources();
        *self.value.borrow_mut() = value;
        self.dirty.set(false);
        self.evaluations.set(self.evaluations.get() + 1);
        tracing::trace!(evaluations = self.evaluations.get(), "computed value refreshed");
    }
}

impl<T: 'static> Subscriber for ComputedInner<T> {
    fn mark_dirty(&self) {
        if self.dirty.replace(true) {
            return;
        }
        self.subscribers.notify();
    }
}

impl<T> Source for ComputedInner<T> {
    fn unsubscribe(&self, subscriber: *const ()) {
        self.subscribers.remove(subscriber);
    }
}

impl<T> Drop for ComputedInner<T> {
    fn drop(&mut self) {
        let this = self.this.as_ptr().cast::<()>();
        for source in self.sources.get_mut().drain(..) {
            source.unsubscribe(this);
        }
    }
}

/// A value derived from observables, re-evaluated after any of them changes.
///
/// The value is evaluated once on construction and afterwards lazily: a
/// change only marks it dirty, the next [`get`](Computed::get) recomputes it.
pub struct Computed<T> {
    inner: Rc<ComputedInner<T>>,
}

impl<T: 'static> Computed<T> {
    /// Create a computed value from an evaluation function.
    ///
    /// Every source read through the tracker passed to `evaluate` becomes a
    /// dependency.
    pub fn new(evaluate: impl Fn(&Tracker) -> T + 'static) -> Self {
        let inner = Rc::new_cyclic(|this: &Weak<ComputedInner<T>>| {
            let subscriber: Weak<dyn Subscriber> = this.clone();
            let tracker = Tracker::recording(subscriber);
            let value = evaluate(&tracker);
            ComputedInner {
                evaluate: Box::new(evaluate),
                value: RefCell::new(value),
                dirty: Cell::new(false),
                sources: RefCell::new(tracker.into_sources()),
                subscribers: Subscribers::default(),
                this: this.clone(),
                evaluations: Cell::new(1),
            }
        });
        Self { inner }
    }

    /// Borrow the up-to-date value without creating a dependency.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.refresh();
        f(&self.inner.value.borrow())
    }

    /// Whether a dependency changed since the last evaluation.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    /// How many times the value has been evaluated.
    pub fn evaluations(&self) -> u64 {
        self.inner.evaluations.get()
    }
}

impl<T: Clone + 'static> Computed<T> {
    /// The up-to-date value, without creating a dependency.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// The up-to-date value, recorded as a dependency of `cx`.
    pub fn track(&self, cx: &Tracker) -> T {
        self.inner.refresh();
        cx.record(&self.inner, &self.inner.subscribers);
        self.inner.value.borrow().clone()
    }
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("value", &self.inner.value.borrow())
            .field("dirty", &self.inner.dirty.get())
            .finish()
    }
}
