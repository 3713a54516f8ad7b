use serde::{Deserialize, Serialize};

/// Stable identifier of a book within the catalog dataset.
pub type BookId = u32;

// ─── Book ────────────────────────────────────────────────────────────────────

/// One catalog entry. Books come from the dataset file and are immutable
/// for the lifetime of the app; everything the user changes lives in an
/// [`Annotation`](crate::models::Annotation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    /// Short blurb shown on the book card. Display-only.
    #[serde(default)]
    pub haiku: String,
    /// Genre labels. Matching treats these as a set; display keeps
    /// dataset order.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Theme labels, same contract as `genres`.
    #[serde(default)]
    pub themes: Vec<String>,
}

impl Book {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }
}

// ─── Annotation ──────────────────────────────────────────────────────────────

/// Per-book user state. The default value is the never-touched state, so
/// absent entries and stored defaults are indistinguishable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub read: bool,
    /// 0 = unrated, 1..=5 = star rating.
    #[serde(default)]
    pub rating: u8,
}

impl Annotation {
    pub fn is_rated(&self) -> bool {
        self.rating > 0
    }

    /// Merge the set fields of `patch` into this annotation, leaving the
    /// rest untouched.
    pub fn apply(&mut self, patch: AnnotationPatch) {
        if let Some(read) = patch.read {
            self.read = read;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
    }
}

/// Partial update merged into an [`Annotation`] by
/// [`AnnotationStore::set`](crate::store::AnnotationStore::set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationPatch {
    pub read: Option<bool>,
    pub rating: Option<u8>,
}

impl AnnotationPatch {
    pub fn read(value: bool) -> Self {
        Self { read: Some(value), rating: None }
    }

    pub fn rating(value: u8) -> Self {
        Self { read: None, rating: Some(value) }
    }
}
