use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Category(String);

crate::impl_string_newtype!(Category);

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoriesError {
    #[error("Duplicate category '{0}'")]
    Duplicate(Category),
}

/// Circular list of category labels. Index arithmetic wraps in both
/// directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories(Vec<Category>);

impl Categories {
    pub fn try_new(items: impl IntoIterator<Item = Category>) -> Result<Self, CategoriesError> {
        let items: Vec<Category> = items.into_iter().collect();
        let mut seen = HashSet::with_capacity(items.len());

        if let Some(dup) = items.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(CategoriesError::Duplicate(dup.clone()));
        }

        Ok(Self(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.0.get(index)
    }

    /// Category for an unbounded virtual index.
    pub fn wrapped(&self, virtual_index: i64) -> Option<&Category> {
        wrap_index(virtual_index, self.len()).and_then(|i| self.0.get(i))
    }

    pub fn index_of(&self, category: &Category) -> Option<usize> {
        self.0.iter().position(|c| c == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Categories {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Maps any integer onto `0..len`, negative values included. `None` for an
/// empty list.
pub fn wrap_index(index: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as i64;
    Some((((index % len) + len) % len) as usize)
}
