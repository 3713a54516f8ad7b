use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::Book;
use crate::store::AnnotationStore;

/// Minimum rating for a book to seed the affinity tables.
pub const SEED_RATING_MIN: u8 = 4;
/// Upper bound on returned recommendations.
pub const MAX_RECOMMENDATIONS: usize = 6;
/// Genre overlap counts double relative to theme overlap.
const GENRE_WEIGHT: u32 = 2;

/// An unread book ranked by tag affinity with the user's favorites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub book: Book,
    /// Unbounded weighted overlap. Presenters label it "% match" even
    /// though it is not a percentage; the shelf has always shown it that
    /// way.
    pub score: u32,
}

/// Rank unread books by how strongly their labels overlap the books rated
/// [`SEED_RATING_MIN`] or higher. Returns at most [`MAX_RECOMMENDATIONS`]
/// entries, all with positive scores; empty when no seeds exist yet.
///
/// Seeds contribute their rating once per distinct label. An unread seed
/// stays a candidate and will usually rank itself highly; only marking it
/// read removes it from the list.
pub fn recommend(books: &[Book], store: &AnnotationStore) -> Vec<Recommendation> {
    let seeds: Vec<&Book> = books
        .iter()
        .filter(|b| store.get(b.id).rating >= SEED_RATING_MIN)
        .collect();
    if seeds.is_empty() {
        return Vec::new();
    }

    let mut genre_affinity: HashMap<&str, u32> = HashMap::new();
    let mut theme_affinity: HashMap<&str, u32> = HashMap::new();
    for seed in &seeds {
        let weight = u32::from(store.get(seed.id).rating);
        accumulate(&mut genre_affinity, &seed.genres, weight);
        accumulate(&mut theme_affinity, &seed.themes, weight);
    }

    let mut ranked: Vec<Recommendation> = books
        .iter()
        .filter(|b| !store.get(b.id).read)
        .map(|book| Recommendation {
            score: score(book, &genre_affinity, &theme_affinity),
            book: book.clone(),
        })
        .collect();

    // Stable sort keeps catalog order within equal scores, so the cut at
    // MAX_RECOMMENDATIONS is deterministic.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(MAX_RECOMMENDATIONS);
    ranked.retain(|r| r.score > 0);
    ranked
}

/// Add `weight` once per distinct label.
fn accumulate<'a>(table: &mut HashMap<&'a str, u32>, labels: &'a [String], weight: u32) {
    let mut seen = HashSet::new();
    for label in labels {
        if seen.insert(label.as_str()) {
            *table.entry(label.as_str()).or_insert(0) += weight;
        }
    }
}

fn score(book: &Book, genres: &HashMap<&str, u32>, themes: &HashMap<&str, u32>) -> u32 {
    let genre_points: u32 = book
        .genres
        .iter()
        .filter_map(|g| genres.get(g.as_str()))
        .sum();
    let theme_points: u32 = book
        .themes
        .iter()
        .filter_map(|t| themes.get(t.as_str()))
        .sum();
    genre_points * GENRE_WEIGHT + theme_points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnnotationPatch;

    fn book(id: u32, genres: &[&str], themes: &[&str]) -> Book {
        Book {
            id,
            title: format!("Book {id}"),
            author: "Anon".to_string(),
            year: 2000,
            haiku: String::new(),
            genres: genres.iter().map(|s| s.to_string()).collect(),
            themes: themes.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn store() -> (tempfile::TempDir, AnnotationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::load(dir.path().join("annotations.json"));
        (dir, store)
    }

    #[test]
    fn test_no_seeds_means_no_recommendations() {
        let (_dir, mut store) = store();
        let books = vec![book(1, &["Poetry"], &[]), book(2, &["Poetry"], &[])];
        assert!(recommend(&books, &store).is_empty());

        // A 3-star rating is still not a seed.
        store.set(1, AnnotationPatch::rating(3)).unwrap();
        assert!(recommend(&books, &store).is_empty());
    }

    #[test]
    fn test_read_seed_recommends_genre_sibling() {
        let (_dir, mut store) = store();
        let books = vec![
            book(1, &["Poetry"], &[]),
            book(2, &["Poetry"], &[]),
            book(3, &["Fiction"], &[]),
        ];
        store.set(1, AnnotationPatch::read(true)).unwrap();
        store.set(1, AnnotationPatch::rating(5)).unwrap();

        let recs = recommend(&books, &store);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].book.id, 2);
        assert_eq!(recs[0].score, 10, "genre affinity 5, doubled");
    }

    #[test]
    fn test_genre_counts_double_theme() {
        let (_dir, mut store) = store();
        let books = vec![
            book(1, &["Epic"], &["War"]),
            book(2, &["Epic"], &[]),
            book(3, &[], &["War"]),
        ];
        store.set(1, AnnotationPatch::read(true)).unwrap();
        store.set(1, AnnotationPatch::rating(4)).unwrap();

        let recs = recommend(&books, &store);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].book.id, 2);
        assert_eq!(recs[0].score, 8);
        assert_eq!(recs[1].book.id, 3);
        assert_eq!(recs[1].score, 4);
    }

    #[test]
    fn test_unread_seed_ranks_itself() {
        let (_dir, mut store) = store();
        let books = vec![book(1, &["Poetry"], &[]), book(2, &["Poetry"], &[])];
        store.set(1, AnnotationPatch::rating(5)).unwrap();

        let recs = recommend(&books, &store);
        let ids: Vec<u32> = recs.iter().map(|r| r.book.id).collect();
        assert_eq!(ids, vec![1, 2], "the rated-but-unread seed stays in the pool");
    }

    #[test]
    fn test_multiple_seeds_stack_affinity() {
        let (_dir, mut store) = store();
        let books = vec![
            book(1, &["Poetry"], &[]),
            book(2, &["Poetry"], &[]),
            book(3, &["Poetry"], &[]),
        ];
        store.set(1, AnnotationPatch::read(true)).unwrap();
        store.set(1, AnnotationPatch::rating(5)).unwrap();
        store.set(2, AnnotationPatch::read(true)).unwrap();
        store.set(2, AnnotationPatch::rating(4)).unwrap();

        let recs = recommend(&books, &store);
        assert_eq!(recs[0].book.id, 3);
        assert_eq!(recs[0].score, 18, "(5 + 4) doubled");
    }

    #[test]
    fn test_duplicate_seed_labels_count_once() {
        let (_dir, mut store) = store();
        let books = vec![book(1, &["Poetry", "Poetry"], &[]), book(2, &["Poetry"], &[])];
        store.set(1, AnnotationPatch::read(true)).unwrap();
        store.set(1, AnnotationPatch::rating(4)).unwrap();

        let recs = recommend(&books, &store);
        assert_eq!(recs[0].score, 8, "affinity accumulates once per distinct label");
    }

    #[test]
    fn test_capped_then_zero_scores_dropped() {
        let (_dir, mut store) = store();
        let mut books = vec![book(1, &["Poetry"], &[])];
        for id in 2..=9 {
            books.push(book(id, &["Poetry"], &[]));
        }
        books.push(book(10, &["Fiction"], &[]));
        store.set(1, AnnotationPatch::read(true)).unwrap();
        store.set(1, AnnotationPatch::rating(5)).unwrap();

        let recs = recommend(&books, &store);
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        let ids: Vec<u32> = recs.iter().map(|r| r.book.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6, 7], "equal scores keep catalog order");
        assert!(recs.iter().all(|r| r.score > 0));
    }

    #[test]
    fn test_rating_zero_withdraws_seed() {
        let (_dir, mut store) = store();
        let books = vec![book(1, &["Poetry"], &[]), book(2, &["Poetry"], &[])];
        store.set(1, AnnotationPatch::read(true)).unwrap();
        store.set(1, AnnotationPatch::rating(5)).unwrap();
        assert_eq!(recommend(&books, &store).len(), 1);

        store.set(1, AnnotationPatch::rating(0)).unwrap();
        assert!(recommend(&books, &store).is_empty());
    }
}
