pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod recommend;
pub mod stats;
pub mod store;

pub use catalog::{Catalog, Facet};
pub use config::AppConfig;
pub use error::{ExitCode, Result, StanzaError};
pub use filter::{FilterCriteria, SortKey, StatusFilter, filter_and_sort};
pub use models::{Annotation, AnnotationPatch, Book, BookId};
pub use recommend::{MAX_RECOMMENDATIONS, Recommendation, SEED_RATING_MIN, recommend};
pub use stats::{CatalogStats, compute_stats};
pub use store::AnnotationStore;
