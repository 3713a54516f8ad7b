use tracing::warn;

use stanza_core::{
    AnnotationPatch, AnnotationStore, AppConfig, Book, Catalog, CatalogStats, FilterCriteria,
    Recommendation, SortKey, StatusFilter, compute_stats, filter_and_sort, recommend,
};

use crate::theme::Theme;

// ─── State ───────────────────────────────────────────────────────────────────

/// Input modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Keystrokes edit the search needle and filter the shelf live.
    Search,
}

/// Which panel owns the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePanel {
    Sidebar,
    Shelf,
    Recommendations,
}

/// Rows of the filter sidebar, rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarItem {
    AllBooks { count: usize },
    Status { status: StatusFilter, count: usize },
    GenreHeader,
    Genre { name: String, count: usize },
    ThemeHeader,
    Theme { name: String, count: usize },
}

impl SidebarItem {
    pub fn selectable(&self) -> bool {
        !matches!(self, Self::GenreHeader | Self::ThemeHeader)
    }
}

/// Whole TUI state. Mutations go through the action methods, which re-run
/// the engines before the next draw; nothing here caches across edits.
pub struct App {
    pub should_quit: bool,
    pub mode: Mode,
    pub active_panel: ActivePanel,
    pub theme: Theme,

    pub catalog: Catalog,
    pub store: AnnotationStore,
    pub criteria: FilterCriteria,
    pub sort: Option<SortKey>,

    // Engine outputs, recomputed by `refresh`.
    pub visible: Vec<Book>,
    pub stats: CatalogStats,
    pub recommendations: Vec<Recommendation>,
    pub sidebar_items: Vec<SidebarItem>,

    pub sidebar_selected: usize,
    pub shelf_selected: usize,
    pub rec_selected: usize,

    pub status_message: String,
    pub show_help: bool,
}

impl App {
    pub fn new(catalog: Catalog, store: AnnotationStore, config: &AppConfig) -> Self {
        let mut app = Self {
            should_quit: false,
            mode: Mode::Normal,
            active_panel: ActivePanel::Shelf,
            theme: Theme::default(),
            catalog,
            store,
            criteria: FilterCriteria::default(),
            sort: config.default_sort(),
            visible: Vec::new(),
            stats: CatalogStats::default(),
            recommendations: Vec::new(),
            sidebar_items: Vec::new(),
            sidebar_selected: 0,
            shelf_selected: 0,
            rec_selected: 0,
            status_message: String::new(),
            show_help: false,
        };
        app.refresh();
        app
    }

    /// Re-run every engine against the current criteria and annotations.
    /// All action methods call this before handing control back to the
    /// draw loop.
    pub fn refresh(&mut self) {
        self.visible =
            filter_and_sort(self.catalog.books(), &self.store, &self.criteria, self.sort);
        self.stats = compute_stats(self.catalog.books(), &self.store);
        self.recommendations = recommend(self.catalog.books(), &self.store);
        self.rebuild_sidebar();
        self.clamp_selection();
    }

    fn rebuild_sidebar(&mut self) {
        let total = self.catalog.len();
        let read = self.stats.read_count;

        let mut items = vec![
            SidebarItem::AllBooks { count: total },
            SidebarItem::Status { status: StatusFilter::Read, count: read },
            SidebarItem::Status { status: StatusFilter::Unread, count: total - read },
            SidebarItem::GenreHeader,
        ];
        for facet in self.catalog.genre_facets() {
            items.push(SidebarItem::Genre { name: facet.name, count: facet.count });
        }
        items.push(SidebarItem::ThemeHeader);
        for facet in self.catalog.theme_facets() {
            items.push(SidebarItem::Theme { name: facet.name, count: facet.count });
        }
        self.sidebar_items = items;
    }

    fn clamp_selection(&mut self) {
        self.shelf_selected = self.shelf_selected.min(self.visible.len().saturating_sub(1));
        self.rec_selected = self.rec_selected.min(self.recommendations.len().saturating_sub(1));
        if self.sidebar_selected >= self.sidebar_items.len() {
            self.sidebar_selected = 0;
        }
        // The strip disappears when the engine returns nothing.
        if self.recommendations.is_empty() && self.active_panel == ActivePanel::Recommendations {
            self.active_panel = ActivePanel::Shelf;
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Book shown in the detail card and targeted by annotation actions:
    /// the cursor row of the focused list, or the shelf row while the
    /// sidebar has focus.
    pub fn detail_book(&self) -> Option<&Book> {
        match self.active_panel {
            ActivePanel::Recommendations => {
                self.recommendations.get(self.rec_selected).map(|r| &r.book)
            }
            _ => self.visible.get(self.shelf_selected),
        }
    }

    pub fn move_down(&mut self) {
        match self.active_panel {
            ActivePanel::Sidebar => self.move_sidebar(1),
            ActivePanel::Shelf => {
                if !self.visible.is_empty() {
                    self.shelf_selected = (self.shelf_selected + 1).min(self.visible.len() - 1);
                }
            }
            ActivePanel::Recommendations => {
                if !self.recommendations.is_empty() {
                    self.rec_selected =
                        (self.rec_selected + 1).min(self.recommendations.len() - 1);
                }
            }
        }
    }

    pub fn move_up(&mut self) {
        match self.active_panel {
            ActivePanel::Sidebar => self.move_sidebar(-1),
            ActivePanel::Shelf => self.shelf_selected = self.shelf_selected.saturating_sub(1),
            ActivePanel::Recommendations => self.rec_selected = self.rec_selected.saturating_sub(1),
        }
    }

    /// Step the sidebar cursor past header rows.
    fn move_sidebar(&mut self, direction: isize) {
        let mut idx = self.sidebar_selected as isize;
        loop {
            idx += direction;
            if idx < 0 || idx as usize >= self.sidebar_items.len() {
                return;
            }
            if self.sidebar_items[idx as usize].selectable() {
                self.sidebar_selected = idx as usize;
                return;
            }
        }
    }

    pub fn move_to_top(&mut self) {
        match self.active_panel {
            ActivePanel::Sidebar => {
                self.sidebar_selected =
                    self.sidebar_items.iter().position(SidebarItem::selectable).unwrap_or(0);
            }
            ActivePanel::Shelf => self.shelf_selected = 0,
            ActivePanel::Recommendations => self.rec_selected = 0,
        }
    }

    pub fn move_to_bottom(&mut self) {
        match self.active_panel {
            ActivePanel::Sidebar => {
                if let Some(idx) = self.sidebar_items.iter().rposition(SidebarItem::selectable) {
                    self.sidebar_selected = idx;
                }
            }
            ActivePanel::Shelf => self.shelf_selected = self.visible.len().saturating_sub(1),
            ActivePanel::Recommendations => {
                self.rec_selected = self.recommendations.len().saturating_sub(1);
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.active_panel = match self.active_panel {
            ActivePanel::Sidebar => ActivePanel::Shelf,
            ActivePanel::Shelf if !self.recommendations.is_empty() => {
                ActivePanel::Recommendations
            }
            ActivePanel::Shelf => ActivePanel::Sidebar,
            ActivePanel::Recommendations => ActivePanel::Sidebar,
        };
    }

    pub fn focus_left(&mut self) {
        self.active_panel = ActivePanel::Sidebar;
    }

    pub fn focus_right(&mut self) {
        self.active_panel = ActivePanel::Shelf;
    }

    // ─── Filtering ───────────────────────────────────────────────────────

    /// Enter on a sidebar row: apply that filter, or clear it when it is
    /// already active.
    pub fn select(&mut self) {
        if self.active_panel != ActivePanel::Sidebar {
            return;
        }
        let Some(item) = self.sidebar_items.get(self.sidebar_selected).cloned() else {
            return;
        };
        match item {
            SidebarItem::AllBooks { .. } => {
                self.criteria.genre = None;
                self.criteria.theme = None;
                self.criteria.status = StatusFilter::Any;
            }
            SidebarItem::Status { status, .. } => {
                self.criteria.status =
                    if self.criteria.status == status { StatusFilter::Any } else { status };
            }
            SidebarItem::Genre { name, .. } => {
                self.criteria.genre = if self.criteria.genre.as_deref() == Some(name.as_str()) {
                    None
                } else {
                    Some(name)
                };
            }
            SidebarItem::Theme { name, .. } => {
                self.criteria.theme = if self.criteria.theme.as_deref() == Some(name.as_str()) {
                    None
                } else {
                    Some(name)
                };
            }
            SidebarItem::GenreHeader | SidebarItem::ThemeHeader => return,
        }
        self.shelf_selected = 0;
        self.refresh();
        self.status_message = format!("Filter: {}", self.filter_label());
    }

    /// Whether a sidebar row corresponds to the currently applied filter.
    pub fn sidebar_item_active(&self, item: &SidebarItem) -> bool {
        match item {
            SidebarItem::AllBooks { .. } => {
                self.criteria.genre.is_none()
                    && self.criteria.theme.is_none()
                    && self.criteria.status == StatusFilter::Any
            }
            SidebarItem::Status { status, .. } => self.criteria.status == *status,
            SidebarItem::Genre { name, .. } => {
                self.criteria.genre.as_deref() == Some(name.as_str())
            }
            SidebarItem::Theme { name, .. } => {
                self.criteria.theme.as_deref() == Some(name.as_str())
            }
            SidebarItem::GenreHeader | SidebarItem::ThemeHeader => false,
        }
    }

    /// One-line description of the active criteria for the status bar.
    pub fn filter_label(&self) -> String {
        if self.criteria.is_empty() {
            return "all books".to_string();
        }
        let mut parts = Vec::new();
        let needle = self.criteria.search.trim();
        if !needle.is_empty() {
            parts.push(format!("\"{needle}\""));
        }
        if let Some(genre) = &self.criteria.genre {
            parts.push(format!("genre:{genre}"));
        }
        if let Some(theme) = &self.criteria.theme {
            parts.push(format!("theme:{theme}"));
        }
        if self.criteria.status != StatusFilter::Any {
            parts.push(self.criteria.status.label().to_string());
        }
        parts.join(" · ")
    }

    pub fn sort_label(&self) -> &'static str {
        match self.sort {
            Some(key) => key.label(),
            None => "catalog",
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort = SortKey::cycle(self.sort);
        self.refresh();
        self.status_message = format!("Sort: {}", self.sort_label());
    }

    /// Back to a clean shelf: no criteria, title order, cursor at the top.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.sort = Some(SortKey::Title);
        self.shelf_selected = 0;
        self.sidebar_selected = 0;
        self.refresh();
        self.status_message = "Filters reset".to_string();
    }

    // ─── Search ──────────────────────────────────────────────────────────

    pub fn enter_search(&mut self) {
        self.mode = Mode::Search;
        self.active_panel = ActivePanel::Shelf;
    }

    pub fn search_push(&mut self, c: char) {
        self.criteria.search.push(c);
        self.shelf_selected = 0;
        self.refresh();
    }

    pub fn search_backspace(&mut self) {
        self.criteria.search.pop();
        self.shelf_selected = 0;
        self.refresh();
    }

    pub fn commit_search(&mut self) {
        self.mode = Mode::Normal;
        self.status_message = format!("{} of {} books", self.visible.len(), self.catalog.len());
    }

    pub fn cancel_search(&mut self) {
        self.criteria.search.clear();
        self.mode = Mode::Normal;
        self.shelf_selected = 0;
        self.refresh();
    }

    // ─── Annotations ─────────────────────────────────────────────────────

    pub fn toggle_read(&mut self) {
        let Some((id, title)) = self.detail_book().map(|b| (b.id, b.title.clone())) else {
            return;
        };
        let read = !self.store.get(id).read;
        match self.store.set(id, AnnotationPatch::read(read)) {
            Ok(()) => {
                self.status_message = if read {
                    format!("Marked read: {title}")
                } else {
                    format!("Marked unread: {title}")
                };
            }
            Err(e) => {
                warn!("annotation write failed for book {id}: {e}");
                self.status_message = format!("Save failed: {e}");
            }
        }
        self.refresh();
    }

    /// Rate the selected book; 0 clears the rating.
    pub fn set_rating(&mut self, rating: u8) {
        let Some((id, title)) = self.detail_book().map(|b| (b.id, b.title.clone())) else {
            return;
        };
        match self.store.set(id, AnnotationPatch::rating(rating)) {
            Ok(()) if rating == 0 => self.status_message = format!("Rating cleared: {title}"),
            Ok(()) => {
                self.status_message = format!("Rated {}: {title}", "★".repeat(rating as usize));
            }
            Err(e) => {
                warn!("annotation write failed for book {id}: {e}");
                self.status_message = format!("Save failed: {e}");
            }
        }
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: u32, title: &str, author: &str, year: i32, genres: &[&str], themes: &[&str]) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            year,
            haiku: String::new(),
            genres: genres.iter().map(|s| s.to_string()).collect(),
            themes: themes.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn mock_app() -> (tempfile::TempDir, App) {
        let catalog = Catalog::from_books(vec![
            book(1, "Odyssey", "Homer", -700, &["Epic"], &["Journeys"]),
            book(2, "Inferno", "Dante", 1320, &["Epic"], &["Faith"]),
            book(3, "Ariel", "Plath", 1965, &["Lyric"], &["Self"]),
            book(4, "Howl", "Ginsberg", 1956, &["Lyric"], &["Self", "Cities"]),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::load(dir.path().join("annotations.json"));
        let app = App::new(catalog, store, &AppConfig::default());
        (dir, app)
    }

    #[test]
    fn test_initial_state_shows_catalog_order() {
        let (_dir, app) = mock_app();
        let ids: Vec<u32> = app.visible.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(app.sort, None, "no configured sort means catalog order");
        assert_eq!(app.stats.total, 4);
        assert!(app.recommendations.is_empty());
        assert_eq!(app.sidebar_items[0], SidebarItem::AllBooks { count: 4 });
    }

    #[test]
    fn test_configured_default_sort() {
        let catalog = Catalog::from_books(vec![
            book(1, "Zeta", "A", 2000, &[], &[]),
            book(2, "Alpha", "B", 2001, &[], &[]),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::load(dir.path().join("annotations.json"));
        let mut config = AppConfig::default();
        config.ui.default_sort = "title".to_string();

        let app = App::new(catalog, store, &config);
        assert_eq!(app.visible[0].title, "Alpha");
    }

    #[test]
    fn test_toggle_read_feeds_stats_and_status_filter() {
        let (_dir, mut app) = mock_app();
        app.shelf_selected = 0;
        app.toggle_read();
        assert_eq!(app.stats.read_count, 1);
        assert!(app.status_message.starts_with("Marked read"));

        app.criteria.status = StatusFilter::Unread;
        app.refresh();
        let ids: Vec<u32> = app.visible.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);

        app.criteria.status = StatusFilter::Read;
        app.refresh();
        let ids: Vec<u32> = app.visible.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_rating_seeds_recommendations() {
        let (_dir, mut app) = mock_app();
        app.shelf_selected = 2; // Ariel, Lyric/Self
        app.set_rating(5);
        app.toggle_read();

        assert!(!app.recommendations.is_empty());
        assert_eq!(app.recommendations[0].book.id, 4, "Howl shares genre and theme");
        assert_eq!(app.recommendations[0].score, 15, "genre 5*2 + theme 5");
    }

    #[test]
    fn test_sidebar_genre_toggles() {
        let (_dir, mut app) = mock_app();
        app.active_panel = ActivePanel::Sidebar;
        let epic_row = app
            .sidebar_items
            .iter()
            .position(|i| matches!(i, SidebarItem::Genre { name, .. } if name == "Epic"))
            .unwrap();
        app.sidebar_selected = epic_row;

        app.select();
        assert_eq!(app.criteria.genre.as_deref(), Some("Epic"));
        assert_eq!(app.visible.len(), 2);
        assert!(app.sidebar_item_active(&app.sidebar_items[epic_row]));

        // Enter again clears the same filter.
        app.select();
        assert_eq!(app.criteria.genre, None);
        assert_eq!(app.visible.len(), 4);
    }

    #[test]
    fn test_all_books_row_clears_sidebar_filters() {
        let (_dir, mut app) = mock_app();
        app.criteria.genre = Some("Lyric".to_string());
        app.criteria.status = StatusFilter::Unread;
        app.criteria.search = "howl".to_string();
        app.refresh();

        app.active_panel = ActivePanel::Sidebar;
        app.sidebar_selected = 0;
        app.select();

        assert_eq!(app.criteria.genre, None);
        assert_eq!(app.criteria.status, StatusFilter::Any);
        assert_eq!(app.criteria.search, "howl", "the search needle is not sidebar-owned");
    }

    #[test]
    fn test_search_mode_filters_live() {
        let (_dir, mut app) = mock_app();
        app.enter_search();
        assert_eq!(app.mode, Mode::Search);

        for c in "arie".chars() {
            app.search_push(c);
        }
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.visible[0].title, "Ariel");

        app.search_backspace();
        app.commit_search();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.criteria.search, "ari");

        app.cancel_search();
        assert!(app.criteria.search.is_empty());
        assert_eq!(app.visible.len(), 4);
    }

    #[test]
    fn test_cycle_sort_comes_back_to_catalog() {
        let (_dir, mut app) = mock_app();
        assert_eq!(app.sort, None);
        app.cycle_sort();
        assert_eq!(app.sort, Some(SortKey::Title));
        for _ in 0..5 {
            app.cycle_sort();
        }
        assert_eq!(app.sort, None);
        assert_eq!(app.sort_label(), "catalog");
    }

    #[test]
    fn test_reset_restores_title_order() {
        let (_dir, mut app) = mock_app();
        app.criteria.search = "inf".to_string();
        app.criteria.genre = Some("Epic".to_string());
        app.sort = Some(SortKey::YearDesc);
        app.refresh();

        app.reset_filters();
        assert!(app.criteria.is_empty());
        assert_eq!(app.sort, Some(SortKey::Title));
        assert_eq!(app.visible[0].title, "Ariel");
    }

    #[test]
    fn test_selection_clamped_when_view_shrinks() {
        let (_dir, mut app) = mock_app();
        app.shelf_selected = 3;
        app.criteria.search = "ariel".to_string();
        app.refresh();
        assert_eq!(app.shelf_selected, 0);
        assert_eq!(app.detail_book().unwrap().title, "Ariel");
    }

    #[test]
    fn test_sidebar_cursor_skips_headers() {
        let (_dir, mut app) = mock_app();
        app.active_panel = ActivePanel::Sidebar;
        app.sidebar_selected = 2; // Unread row, directly above the genre header
        app.move_down();
        assert!(
            matches!(app.sidebar_items[app.sidebar_selected], SidebarItem::Genre { .. }),
            "cursor lands on the first genre, not the header"
        );
        app.move_up();
        assert!(matches!(
            app.sidebar_items[app.sidebar_selected],
            SidebarItem::Status { status: StatusFilter::Unread, .. }
        ));
    }

    #[test]
    fn test_focus_cycle_skips_empty_recommendations() {
        let (_dir, mut app) = mock_app();
        assert_eq!(app.active_panel, ActivePanel::Shelf);
        app.focus_next();
        assert_eq!(app.active_panel, ActivePanel::Sidebar, "no recommendations yet");

        app.shelf_selected = 0;
        app.active_panel = ActivePanel::Shelf;
        app.set_rating(4);
        app.focus_next();
        assert_eq!(app.active_panel, ActivePanel::Recommendations);
    }

    #[test]
    fn test_rating_from_recommendations_panel() {
        let (_dir, mut app) = mock_app();
        app.set_rating(5); // Odyssey
        app.toggle_read();
        assert!(!app.recommendations.is_empty());

        app.active_panel = ActivePanel::Recommendations;
        app.rec_selected = 0;
        let target = app.detail_book().unwrap().id;
        app.toggle_read();
        assert!(app.store.get(target).read);
    }

    #[test]
    fn test_filter_label_describes_criteria() {
        let (_dir, mut app) = mock_app();
        assert_eq!(app.filter_label(), "all books");

        app.criteria.search = " fire ".to_string();
        app.criteria.genre = Some("Epic".to_string());
        app.criteria.status = StatusFilter::Unread;
        assert_eq!(app.filter_label(), "\"fire\" · genre:Epic · unread");
    }
}
