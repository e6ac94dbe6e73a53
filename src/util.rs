//! Utilities that are needed or useful for the rest of the crate,
//! but that don't really have anything to do with the core of the crate.

use std::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A wrapper around [`Vec`] that only lets you append or clear everything at once.
/// Entries keep their insertion order and can never be edited after the fact.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct History<T>(Vec<T>);

impl<T> From<Vec<T>> for History<T> {
    fn from(vec: Vec<T>) -> Self {
        History(vec)
    }
}

impl<T> From<History<T>> for Vec<T> {
    fn from(history: History<T>) -> Self {
        history.0
    }
}

impl<T> Deref for History<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> History<T> {
    /// Creates a new, empty `History<T>`.
    ///
    /// See also: [`Vec::new()`]
    #[must_use]
    pub fn new() -> Self {
        History(Vec::new())
    }

    /// Appends an entry.
    ///
    /// See also: [`Vec::push()`]
    pub fn push(&mut self, value: T) {
        self.0.push(value);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod test {
    use super::History;

    #[test]
    fn keeps_insertion_order() {
        let mut history = History::new();
        history.push(3);
        history.push(1);
        history.push(2);

        assert_eq!(&*history, &[3, 1, 2]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.first(), Some(&3));
    }

    #[test]
    fn clear_empties() {
        let mut history = History::from(vec![1.0, 0.5]);
        history.clear();

        assert!(history.is_empty());
        assert_eq!(Vec::from(history), Vec::<f64>::new());
    }
}
