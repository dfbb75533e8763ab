//! Repeatable sub-list editor: a bounded list of sub-records.

use serde::Serialize;

/// A rejected list edit. Shown to the user as a transient warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum ListNotice {
    #[error("You can add at most {max} items")]
    MaxItemsReached { max: usize },

    #[error("At least {min} item(s) are required")]
    MinItemsReached { min: usize },

    #[error("Item {index} does not exist (list has {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Variable-length list bounded by `min_items..=max_items`.
///
/// New items are clones of `template`.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatableList<T> {
    items: Vec<T>,
    min_items: usize,
    max_items: usize,
    template: T,
}

impl<T: Clone> RepeatableList<T> {
    /// Start with `min_items` copies of the template.
    pub fn new(template: T, min_items: usize, max_items: usize) -> Self {
        let items = vec![template.clone(); min_items];
        Self::from_items(items, template, min_items, max_items)
    }

    /// Wrap existing items.
    pub fn from_items(items: Vec<T>, template: T, min_items: usize, max_items: usize) -> Self {
        Self {
            items,
            min_items,
            max_items: max_items.max(min_items),
            template,
        }
    }

    /// Append a default item. Returns its index.
    pub fn add(&mut self) -> Result<usize, ListNotice> {
        if self.items.len() >= self.max_items {
            return Err(ListNotice::MaxItemsReached {
                max: self.max_items,
            });
        }
        self.items.push(self.template.clone());
        Ok(self.items.len() - 1)
    }

    /// Remove the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T, ListNotice> {
        if self.items.len() <= self.min_items {
            return Err(ListNotice::MinItemsReached {
                min: self.min_items,
            });
        }
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Replace the item at `index`.
    pub fn update(&mut self, index: usize, value: T) -> Result<(), ListNotice> {
        self.check_index(index)?;
        self.items[index] = value;
        Ok(())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn min_items(&self) -> usize {
        self.min_items
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    fn check_index(&self, index: usize) -> Result<(), ListNotice> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(ListNotice::IndexOutOfBounds {
                index,
                len: self.items.len(),
            })
        }
    }
}
