use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, StanzaError};
use crate::models::{Book, BookId};

/// Wire shape of the dataset file: `{ "books": [ ... ] }`.
#[derive(Deserialize)]
struct Dataset {
    books: Vec<Book>,
}

/// A label together with the number of catalog books carrying it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Facet {
    pub name: String,
    pub count: usize,
}

/// The read-only book catalog, loaded once at startup. Catalog order is
/// the dataset order and serves as the unsorted display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Load the catalog from a dataset file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StanzaError::DatasetNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&contents)?;
        debug!("loaded {} books from {}", dataset.books.len(), path.display());
        Ok(Self { books: dataset.books })
    }

    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Distinct genre labels with usage counts, sorted by label.
    pub fn genre_facets(&self) -> Vec<Facet> {
        facets(self.books.iter().map(|b| b.genres.as_slice()))
    }

    /// Distinct theme labels with usage counts, sorted by label.
    pub fn theme_facets(&self) -> Vec<Facet> {
        facets(self.books.iter().map(|b| b.themes.as_slice()))
    }
}

fn facets<'a>(groups: impl Iterator<Item = &'a [String]>) -> Vec<Facet> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for labels in groups {
        // Count each book once per label even if the dataset repeats one.
        let mut seen = HashSet::new();
        for label in labels {
            if seen.insert(label.as_str()) {
                *counts.entry(label.as_str()).or_insert(0) += 1;
            }
        }
    }
    counts
        .into_iter()
        .map(|(name, count)| Facet { name: name.to_string(), count })
        .collect()
}
