use serde::Serialize;

use crate::models::Book;
use crate::store::AnnotationStore;

/// Aggregate shelf counters shown in the status bar and `stanza stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub read_count: usize,
    /// Mean of ratings above zero, rounded to one decimal. `None` while
    /// nothing is rated.
    pub average_rating: Option<f64>,
}

impl CatalogStats {
    /// Average formatted for display, `"-"` when nothing is rated.
    pub fn average_display(&self) -> String {
        match self.average_rating {
            Some(avg) => format!("{avg:.1}"),
            None => "-".to_string(),
        }
    }
}

/// Recompute the counters from scratch over the whole catalog. Always
/// counts all books, not the filtered view.
pub fn compute_stats(books: &[Book], store: &AnnotationStore) -> CatalogStats {
    let total = books.len();
    let read_count = books.iter().filter(|b| store.get(b.id).read).count();

    let mut rated = 0u32;
    let mut sum = 0u32;
    for book in books {
        let rating = store.get(book.id).rating;
        if rating > 0 {
            rated += 1;
            sum += u32::from(rating);
        }
    }

    let average_rating = if rated == 0 {
        None
    } else {
        let mean = f64::from(sum) / f64::from(rated);
        Some((mean * 10.0).round() / 10.0)
    };

    CatalogStats { total, read_count, average_rating }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnnotationPatch;

    fn book(id: u32) -> Book {
        Book {
            id,
            title: format!("Book {id}"),
            author: "Anon".to_string(),
            year: 2000,
            haiku: String::new(),
            genres: Vec::new(),
            themes: Vec::new(),
        }
    }

    fn store() -> (tempfile::TempDir, AnnotationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::load(dir.path().join("annotations.json"));
        (dir, store)
    }

    #[test]
    fn test_untouched_shelf() {
        let (_dir, store) = store();
        let books = vec![book(1), book(2)];
        let stats = compute_stats(&books, &store);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.read_count, 0);
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.average_display(), "-");
    }

    #[test]
    fn test_read_count() {
        let (_dir, mut store) = store();
        let books = vec![book(1), book(2), book(3)];
        store.set(1, AnnotationPatch::read(true)).unwrap();
        store.set(3, AnnotationPatch::read(true)).unwrap();

        let stats = compute_stats(&books, &store);
        assert_eq!(stats.read_count, 2);

        store.set(2, AnnotationPatch::read(true)).unwrap();
        let stats = compute_stats(&books, &store);
        assert_eq!(stats.read_count, stats.total, "a fully read shelf counts every book");
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let (_dir, mut store) = store();
        let books = vec![book(1), book(2), book(3), book(4)];
        store.set(1, AnnotationPatch::rating(1)).unwrap();
        store.set(2, AnnotationPatch::rating(2)).unwrap();
        store.set(3, AnnotationPatch::rating(2)).unwrap();
        // Book 4 stays unrated and must not drag the mean down.

        let stats = compute_stats(&books, &store);
        assert_eq!(stats.average_rating, Some(1.7), "5/3 rounds to 1.7");
        assert_eq!(stats.average_display(), "1.7");
    }

    #[test]
    fn test_cleared_rating_leaves_the_mean() {
        let (_dir, mut store) = store();
        let books = vec![book(1), book(2)];
        store.set(1, AnnotationPatch::rating(4)).unwrap();
        store.set(2, AnnotationPatch::rating(2)).unwrap();
        store.set(2, AnnotationPatch::rating(0)).unwrap();

        let stats = compute_stats(&books, &store);
        assert_eq!(stats.average_rating, Some(4.0));
    }

    #[test]
    fn test_empty_catalog() {
        let (_dir, store) = store();
        let stats = compute_stats(&[], &store);
        assert_eq!(stats, CatalogStats { total: 0, read_count: 0, average_rating: None });
    }
}
