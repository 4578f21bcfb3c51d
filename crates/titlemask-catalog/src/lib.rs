//! # Titlemask Catalog
//!
//! The I/O collaborators around the titlemask core: loading the series and
//! episode reference catalogs from pipe-delimited files, deriving episode
//! pseudo-ids, and persisting matched records to an append-only JSON-lines
//! store. No parsing logic lives here.
pub mod episodes;
pub mod error;
pub mod series;
pub mod store;

// Re-export primary API
pub use episodes::{pseudo_id, EpisodeCatalog};
pub use error::{CatalogError, Result};
pub use series::SeriesCatalog;
pub use store::{MatchedEpisode, RecordStore};
