use std::cmp::Reverse;

use crate::models::Book;
use crate::store::AnnotationStore;

// ─── Criteria ────────────────────────────────────────────────────────────────

/// Read-status clause of [`FilterCriteria`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    Read,
    Unread,
}

impl StatusFilter {
    /// Parse a status token. Anything unrecognized means no constraint.
    pub fn parse(s: &str) -> Self {
        match s {
            "read" => Self::Read,
            "unread" => Self::Unread,
            _ => Self::Any,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Read => "read",
            Self::Unread => "unread",
        }
    }
}

/// Active filter clauses. All clauses are AND-ed; an empty clause matches
/// every book.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against title or author.
    pub search: String,
    /// Exact genre membership.
    pub genre: Option<String>,
    /// Exact theme membership.
    pub theme: Option<String>,
    pub status: StatusFilter,
}

impl FilterCriteria {
    /// True when no clause constrains anything.
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.genre.is_none()
            && self.theme.is_none()
            && self.status == StatusFilter::Any
    }

    /// Whether `book` passes every clause. Read status comes from the
    /// annotation store, never from the book itself.
    pub fn matches(&self, book: &Book, store: &AnnotationStore) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !book.title.to_lowercase().contains(&needle)
            && !book.author.to_lowercase().contains(&needle)
        {
            return false;
        }

        if let Some(genre) = &self.genre {
            if !book.has_genre(genre) {
                return false;
            }
        }
        if let Some(theme) = &self.theme {
            if !book.has_theme(theme) {
                return false;
            }
        }

        match self.status {
            StatusFilter::Any => true,
            StatusFilter::Read => store.get(book.id).read,
            StatusFilter::Unread => !store.get(book.id).read,
        }
    }
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Orderings for the visible shelf. `None` at the call sites means "keep
/// catalog order".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Author,
    YearAsc,
    YearDesc,
    RatingDesc,
}

impl SortKey {
    /// Parse a sort token. Unknown tokens yield `None`, which callers
    /// treat as catalog order rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "year" | "year-asc" => Some(Self::YearAsc),
            "year-desc" => Some(Self::YearDesc),
            "rating" | "rating-desc" => Some(Self::RatingDesc),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::YearAsc => "year ↑",
            Self::YearDesc => "year ↓",
            Self::RatingDesc => "rating ↓",
        }
    }

    /// Next state in the TUI sort cycle, starting and ending at catalog
    /// order.
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Title),
            Some(Self::Title) => Some(Self::Author),
            Some(Self::Author) => Some(Self::YearAsc),
            Some(Self::YearAsc) => Some(Self::YearDesc),
            Some(Self::YearDesc) => Some(Self::RatingDesc),
            Some(Self::RatingDesc) => None,
        }
    }
}

/// Apply `criteria` to the catalog, then order the survivors by `sort`.
/// The sort is stable, so ties and `sort == None` keep catalog order.
pub fn filter_and_sort(
    books: &[Book],
    store: &AnnotationStore,
    criteria: &FilterCriteria,
    sort: Option<SortKey>,
) -> Vec<Book> {
    let mut visible: Vec<Book> = books
        .iter()
        .filter(|b| criteria.matches(b, store))
        .cloned()
        .collect();

    match sort {
        None => {}
        Some(SortKey::Title) => visible.sort_by_cached_key(|b| b.title.to_lowercase()),
        Some(SortKey::Author) => visible.sort_by_cached_key(|b| b.author.to_lowercase()),
        Some(SortKey::YearAsc) => visible.sort_by_key(|b| b.year),
        Some(SortKey::YearDesc) => visible.sort_by_key(|b| Reverse(b.year)),
        Some(SortKey::RatingDesc) => visible.sort_by_key(|b| Reverse(store.get(b.id).rating)),
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnnotationPatch;

    fn book(id: u32, title: &str, author: &str, year: i32) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            year,
            haiku: String::new(),
            genres: vec!["Poetry".to_string()],
            themes: vec!["Time".to_string()],
        }
    }

    fn shelf() -> Vec<Book> {
        vec![
            book(1, "the Waste Land", "T. S. Eliot", 1922),
            book(2, "Ariel", "Sylvia Plath", 1965),
            book(3, "Howl", "Allen Ginsberg", 1956),
        ]
    }

    fn empty_store() -> (tempfile::TempDir, AnnotationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::load(dir.path().join("annotations.json"));
        (dir, store)
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(StatusFilter::parse("read"), StatusFilter::Read);
        assert_eq!(StatusFilter::parse("unread"), StatusFilter::Unread);
        assert_eq!(StatusFilter::parse("any"), StatusFilter::Any);
        assert_eq!(StatusFilter::parse("bogus"), StatusFilter::Any);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("title"), Some(SortKey::Title));
        assert_eq!(SortKey::parse("year"), Some(SortKey::YearAsc));
        assert_eq!(SortKey::parse("year-desc"), Some(SortKey::YearDesc));
        assert_eq!(SortKey::parse("rating"), Some(SortKey::RatingDesc));
        assert_eq!(SortKey::parse("frecency"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn test_sort_cycle_returns_to_catalog_order() {
        let mut sort = None;
        let mut seen = Vec::new();
        loop {
            sort = SortKey::cycle(sort);
            match sort {
                Some(key) => seen.push(key),
                None => break,
            }
        }
        assert_eq!(seen.len(), 5, "cycle visits every key once");
    }

    #[test]
    fn test_search_matches_title_and_author() {
        let (_dir, store) = empty_store();
        let books = shelf();

        let criteria = FilterCriteria { search: "  WASTE ".to_string(), ..Default::default() };
        assert!(criteria.matches(&books[0], &store), "trimmed, case-insensitive title match");
        assert!(!criteria.matches(&books[1], &store));

        let criteria = FilterCriteria { search: "plath".to_string(), ..Default::default() };
        assert!(criteria.matches(&books[1], &store), "author field matches too");
    }

    #[test]
    fn test_label_clauses_are_exact() {
        let (_dir, store) = empty_store();
        let books = shelf();

        let criteria = FilterCriteria { genre: Some("Poetry".to_string()), ..Default::default() };
        assert!(criteria.matches(&books[0], &store));

        let criteria = FilterCriteria { genre: Some("poetry".to_string()), ..Default::default() };
        assert!(!criteria.matches(&books[0], &store), "no case folding on labels");

        let criteria = FilterCriteria { theme: Some("Time".to_string()), ..Default::default() };
        assert!(criteria.matches(&books[2], &store));
    }

    #[test]
    fn test_status_clause_reads_store() {
        let (_dir, mut store) = empty_store();
        let books = shelf();
        store.set(2, AnnotationPatch::read(true)).unwrap();

        let read = FilterCriteria { status: StatusFilter::Read, ..Default::default() };
        let unread = FilterCriteria { status: StatusFilter::Unread, ..Default::default() };

        assert!(read.matches(&books[1], &store));
        assert!(!read.matches(&books[0], &store));
        assert!(unread.matches(&books[0], &store));
        assert!(!unread.matches(&books[1], &store));
    }

    #[test]
    fn test_clauses_are_anded() {
        let (_dir, mut store) = empty_store();
        let books = shelf();
        store.set(2, AnnotationPatch::read(true)).unwrap();

        let criteria = FilterCriteria {
            search: "a".to_string(),
            genre: Some("Poetry".to_string()),
            status: StatusFilter::Read,
            ..Default::default()
        };
        let visible = filter_and_sort(&books, &store, &criteria, None);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn test_repeated_application_is_identical() {
        let (_dir, mut store) = empty_store();
        let books = shelf();
        store.set(3, AnnotationPatch::rating(4)).unwrap();

        let criteria = FilterCriteria { search: "l".to_string(), ..Default::default() };
        let first = filter_and_sort(&books, &store, &criteria, Some(SortKey::RatingDesc));
        let second = filter_and_sort(&books, &store, &criteria, Some(SortKey::RatingDesc));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_criteria_keeps_catalog_order() {
        let (_dir, store) = empty_store();
        let books = shelf();
        let visible = filter_and_sort(&books, &store, &FilterCriteria::default(), None);
        let ids: Vec<u32> = visible.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let (_dir, store) = empty_store();
        let books = shelf();
        let visible = filter_and_sort(&books, &store, &FilterCriteria::default(), Some(SortKey::Title));
        let titles: Vec<&str> = visible.iter().map(|b| b.title.as_str()).collect();
        // "the Waste Land" sorts under T despite the lowercase article.
        assert_eq!(titles, vec!["Ariel", "Howl", "the Waste Land"]);
    }

    #[test]
    fn test_year_sorts() {
        let (_dir, store) = empty_store();
        let books = shelf();

        let asc = filter_and_sort(&books, &store, &FilterCriteria::default(), Some(SortKey::YearAsc));
        let years: Vec<i32> = asc.iter().map(|b| b.year).collect();
        assert_eq!(years, vec![1922, 1956, 1965]);

        let desc = filter_and_sort(&books, &store, &FilterCriteria::default(), Some(SortKey::YearDesc));
        let years: Vec<i32> = desc.iter().map(|b| b.year).collect();
        assert_eq!(years, vec![1965, 1956, 1922]);
    }

    #[test]
    fn test_rating_sort_is_stable_on_ties() {
        let (_dir, mut store) = empty_store();
        let books = shelf();
        store.set(3, AnnotationPatch::rating(5)).unwrap();
        // Books 1 and 2 stay unrated and tie at 0.

        let visible =
            filter_and_sort(&books, &store, &FilterCriteria::default(), Some(SortKey::RatingDesc));
        let ids: Vec<u32> = visible.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1, 2], "rated first, ties keep catalog order");
    }

    #[test]
    fn test_is_empty() {
        assert!(FilterCriteria::default().is_empty());
        assert!(FilterCriteria { search: "   ".to_string(), ..Default::default() }.is_empty());
        assert!(!FilterCriteria { status: StatusFilter::Read, ..Default::default() }.is_empty());
    }
}
