//! Row collection with change notifications.
//!
//! [`Rows`] owns the ordered backing sequence shared by both model variants
//! and reports every structural change through [`TableSignals`], so a view
//! can repaint only the affected region. Models deref to their `Rows`, so
//! all of these operations are available directly on a model.
//!
//! Index validity is the caller's contract: positional operations index the
//! underlying `Vec` directly and panic on out-of-range positions.
//! Equality-based operations that find no match are silent no-ops.

use std::cmp::Ordering;

use parking_lot::RwLock;

use crate::signal::Signal;

/// The change notifications a table model emits.
///
/// Views connect to these to stay synchronized with the model. Row-range
/// signals carry inclusive `(first, last)` bounds; `data_changed` means the
/// whole table must be re-read.
pub struct TableSignals {
    /// Emitted when the table changed wholesale (bulk replace, clear,
    /// batch append, full refresh).
    pub data_changed: Signal<()>,
    /// Emitted after rows have been inserted. Args: (first row, last row).
    pub rows_inserted: Signal<(usize, usize)>,
    /// Emitted after existing rows changed in place. Args: (first, last).
    pub rows_updated: Signal<(usize, usize)>,
    /// Emitted after rows have been removed. Args: (first, last), the
    /// positions the rows held before removal.
    pub rows_removed: Signal<(usize, usize)>,
}

impl Default for TableSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSignals {
    /// Creates a new set of table signals.
    pub fn new() -> Self {
        Self {
            data_changed: Signal::new(),
            rows_inserted: Signal::new(),
            rows_updated: Signal::new(),
            rows_removed: Signal::new(),
        }
    }
}

/// An observable, ordered collection of rows.
///
/// Every mutation emits the matching [`TableSignals`] notification after the
/// collection has been updated, so slots observe the post-change state.
pub struct Rows<T> {
    rows: RwLock<Vec<T>>,
    signals: TableSignals,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Rows<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates a collection over existing rows.
    pub fn from_vec(rows: Vec<T>) -> Self {
        Self {
            rows: RwLock::new(rows),
            signals: TableSignals::new(),
        }
    }

    /// The signals this collection emits.
    pub fn signals(&self) -> &TableSignals {
        &self.signals
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns `true` if the collection holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Read-only access to the rows.
    pub fn rows(&self) -> impl std::ops::Deref<Target = Vec<T>> + '_ {
        self.rows.read()
    }

    /// Replaces the entire backing sequence.
    ///
    /// An empty `rows` clears the table. Emits `data_changed`.
    pub fn set_all(&self, rows: Vec<T>) {
        *self.rows.write() = rows;
        self.signals.data_changed.emit(());
    }

    /// Appends a row to the end. Emits `rows_inserted` at the new last index.
    pub fn push(&self, row: T) {
        let index = {
            let mut rows = self.rows.write();
            rows.push(row);
            rows.len() - 1
        };
        self.signals.rows_inserted.emit((index, index));
    }

    /// Appends a batch of rows to the end.
    ///
    /// Batch granularity collapses to a single `data_changed` rather than
    /// one `rows_inserted` per row.
    pub fn extend<I: IntoIterator<Item = T>>(&self, rows: I) {
        self.rows.write().extend(rows);
        self.signals.data_changed.emit(());
    }

    /// Inserts a row at `index`, shifting subsequent rows down.
    ///
    /// Emits `rows_inserted` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&self, index: usize, row: T) {
        self.rows.write().insert(index, row);
        self.signals.rows_inserted.emit((index, index));
    }

    /// Inserts a row at its sorted position, determined by a front-to-back
    /// scan: the row lands immediately before the first existing row that
    /// `compare` places after it, or at the end if there is none.
    ///
    /// `compare` is called as `compare(&new, existing)`; `Ordering::Less`
    /// means the new row comes first. The scan is O(n). Returns the
    /// insertion position and emits `rows_inserted` there.
    pub fn insert_sorted<F>(&self, row: T, compare: F) -> usize
    where
        F: Fn(&T, &T) -> Ordering,
    {
        let index = {
            let mut rows = self.rows.write();
            let index = rows
                .iter()
                .position(|existing| compare(&row, existing) == Ordering::Less)
                .unwrap_or(rows.len());
            rows.insert(index, row);
            index
        };
        self.signals.rows_inserted.emit((index, index));
        index
    }

    /// Overwrites the row at `index`, returning the previous row.
    ///
    /// Emits `rows_updated` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn replace(&self, index: usize, row: T) -> T {
        let old = std::mem::replace(&mut self.rows.write()[index], row);
        self.signals.rows_updated.emit((index, index));
        old
    }

    /// Provides mutable access to the row at `index` via a closure.
    ///
    /// Returns `None` without emitting if `index` is out of range;
    /// otherwise emits `rows_updated` at `index` after the closure runs.
    pub fn modify<F, R>(&self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let result = {
            let mut rows = self.rows.write();
            let row = rows.get_mut(index)?;
            f(row)
        };
        self.signals.rows_updated.emit((index, index));
        Some(result)
    }

    /// Re-announces the row at `index` without changing it, so the view
    /// redraws it. Emits `rows_updated` at `index`.
    pub fn touch(&self, index: usize) {
        self.signals.rows_updated.emit((index, index));
    }

    /// Re-announces the whole table without changing it.
    /// Emits `data_changed`.
    pub fn touch_all(&self) {
        self.signals.data_changed.emit(());
    }

    /// Removes and returns the row at `index`; rows after it shift up.
    ///
    /// Emits `rows_removed` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&self, index: usize) -> T {
        let row = self.rows.write().remove(index);
        self.signals.rows_removed.emit((index, index));
        row
    }

    /// Removes all rows. Emits `data_changed`.
    pub fn clear(&self) {
        self.rows.write().clear();
        self.signals.data_changed.emit(());
    }

    /// Sorts the rows with the provided comparator. Emits `data_changed`.
    pub fn sort_by<F>(&self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.rows.write().sort_by(compare);
        self.signals.data_changed.emit(());
    }
}

impl<T: Clone> Rows<T> {
    /// A clone of the row at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<T> {
        self.rows.read().get(index).cloned()
    }
}

impl<T: PartialEq> Rows<T> {
    /// Locates `row` by equality and re-announces it.
    ///
    /// Returns the found index after emitting `rows_updated` there, or
    /// `None` (no emission, no state change) if the row is absent.
    pub fn touch_row(&self, row: &T) -> Option<usize> {
        let index = self.rows.read().iter().position(|r| r == row)?;
        self.signals.rows_updated.emit((index, index));
        Some(index)
    }

    /// Locates `row` by equality and removes it.
    ///
    /// Returns the removed row after emitting `rows_removed` at its former
    /// index. An absent row is a no-op returning `None`.
    pub fn remove_row(&self, row: &T) -> Option<T> {
        let (index, removed) = {
            let mut rows = self.rows.write();
            let index = rows.iter().position(|r| r == row)?;
            (index, rows.remove(index))
        };
        self.signals.rows_removed.emit((index, index));
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records every notification a `Rows` emits, in order.
    #[derive(Clone)]
    struct Recorder {
        events: Arc<Mutex<Vec<(&'static str, usize, usize)>>>,
    }

    impl Recorder {
        fn attach<T>(rows: &Rows<T>) -> Self {
            let recorder = Self {
                events: Arc::new(Mutex::new(Vec::new())),
            };

            let events = recorder.events.clone();
            rows.signals().data_changed.connect(move |_| {
                events.lock().push(("data_changed", 0, 0));
            });
            let events = recorder.events.clone();
            rows.signals()
                .rows_inserted
                .connect(move |&(first, last)| {
                    events.lock().push(("inserted", first, last));
                });
            let events = recorder.events.clone();
            rows.signals().rows_updated.connect(move |&(first, last)| {
                events.lock().push(("updated", first, last));
            });
            let events = recorder.events.clone();
            rows.signals().rows_removed.connect(move |&(first, last)| {
                events.lock().push(("removed", first, last));
            });

            recorder
        }

        fn take(&self) -> Vec<(&'static str, usize, usize)> {
            std::mem::take(&mut *self.events.lock())
        }
    }

    #[test]
    fn test_push_notifies_last_index() {
        let rows = Rows::new();
        let recorder = Recorder::attach(&rows);

        rows.push("a");
        rows.push("b");

        assert_eq!(rows.len(), 2);
        assert_eq!(recorder.take(), vec![("inserted", 0, 0), ("inserted", 1, 1)]);
    }

    #[test]
    fn test_extend_collapses_to_data_changed() {
        let rows = Rows::new();
        let recorder = Recorder::attach(&rows);

        rows.extend(["a", "b", "c"]);

        assert_eq!(rows.len(), 3);
        assert_eq!(recorder.take(), vec![("data_changed", 0, 0)]);
    }

    #[test]
    fn test_insert_notifies_at_insertion_index() {
        // Regression: the notification must name the insertion position,
        // not the new tail position.
        let rows = Rows::from_vec(vec!["a", "c", "d"]);
        let recorder = Recorder::attach(&rows);

        rows.insert(1, "b");

        assert_eq!(*rows.rows(), vec!["a", "b", "c", "d"]);
        assert_eq!(recorder.take(), vec![("inserted", 1, 1)]);
    }

    #[test]
    fn test_insert_sorted_keeps_order() {
        let rows = Rows::new();

        for value in [5, 1, 4, 2, 3] {
            rows.insert_sorted(value, |a, b| a.cmp(b));
        }

        assert_eq!(*rows.rows(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_insert_sorted_reports_position() {
        let rows = Rows::from_vec(vec![10, 30]);
        let recorder = Recorder::attach(&rows);

        let index = rows.insert_sorted(20, |a, b| a.cmp(b));

        assert_eq!(index, 1);
        assert_eq!(recorder.take(), vec![("inserted", 1, 1)]);

        // No greater element: appends.
        let index = rows.insert_sorted(40, |a, b| a.cmp(b));
        assert_eq!(index, 3);
    }

    #[test]
    fn test_insert_sorted_into_empty_appends() {
        let rows = Rows::new();
        assert_eq!(rows.insert_sorted(7, |a, b| a.cmp(b)), 0);
        assert_eq!(*rows.rows(), vec![7]);
    }

    #[test]
    fn test_replace_returns_old_row() {
        let rows = Rows::from_vec(vec!["a", "b"]);
        let recorder = Recorder::attach(&rows);

        let old = rows.replace(1, "B");

        assert_eq!(old, "b");
        assert_eq!(*rows.rows(), vec!["a", "B"]);
        assert_eq!(recorder.take(), vec![("updated", 1, 1)]);
    }

    #[test]
    fn test_remove_shifts_following_rows() {
        let rows = Rows::from_vec(vec!["a", "b", "c"]);
        let recorder = Recorder::attach(&rows);

        let removed = rows.remove(1);

        assert_eq!(removed, "b");
        assert_eq!(*rows.rows(), vec!["a", "c"]);
        assert_eq!(recorder.take(), vec![("removed", 1, 1)]);
    }

    #[test]
    fn test_remove_row_miss_is_noop() {
        // Regression: a miss must not emit anything or touch the rows,
        // rather than "removing" an invalid position.
        let rows = Rows::from_vec(vec!["a", "b"]);
        let recorder = Recorder::attach(&rows);

        assert_eq!(rows.remove_row(&"z"), None);

        assert_eq!(rows.len(), 2);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_remove_row_hit() {
        let rows = Rows::from_vec(vec!["a", "b", "c"]);
        let recorder = Recorder::attach(&rows);

        assert_eq!(rows.remove_row(&"b"), Some("b"));
        assert_eq!(recorder.take(), vec![("removed", 1, 1)]);
    }

    #[test]
    fn test_touch_row_miss_is_noop() {
        let rows = Rows::from_vec(vec![1, 2, 3]);
        let recorder = Recorder::attach(&rows);

        assert_eq!(rows.touch_row(&9), None);
        assert!(recorder.take().is_empty());

        assert_eq!(rows.touch_row(&2), Some(1));
        assert_eq!(recorder.take(), vec![("updated", 1, 1)]);
    }

    #[test]
    fn test_touch_and_touch_all() {
        let rows = Rows::from_vec(vec!["a"]);
        let recorder = Recorder::attach(&rows);

        rows.touch(0);
        rows.touch_all();

        assert_eq!(recorder.take(), vec![("updated", 0, 0), ("data_changed", 0, 0)]);
    }

    #[test]
    fn test_set_all_and_clear() {
        let rows = Rows::from_vec(vec![1, 2]);
        let recorder = Recorder::attach(&rows);

        rows.set_all(vec![3, 4, 5]);
        assert_eq!(rows.len(), 3);

        rows.clear();
        assert_eq!(rows.len(), 0);
        assert!(rows.is_empty());

        assert_eq!(
            recorder.take(),
            vec![("data_changed", 0, 0), ("data_changed", 0, 0)]
        );
    }

    #[test]
    fn test_set_all_empty_clears() {
        let rows = Rows::from_vec(vec![1, 2]);
        rows.set_all(Vec::new());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_modify_emits_update() {
        let rows = Rows::from_vec(vec![String::from("a")]);
        let recorder = Recorder::attach(&rows);

        let len = rows.modify(0, |s| {
            s.push('x');
            s.len()
        });

        assert_eq!(len, Some(2));
        assert_eq!(recorder.take(), vec![("updated", 0, 0)]);
        assert_eq!(rows.modify(5, |_| ()), None);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_sort_by() {
        let rows = Rows::from_vec(vec![3, 1, 2]);
        let recorder = Recorder::attach(&rows);

        rows.sort_by(|a, b| a.cmp(b));

        assert_eq!(*rows.rows(), vec![1, 2, 3]);
        assert_eq!(recorder.take(), vec![("data_changed", 0, 0)]);
    }
}
