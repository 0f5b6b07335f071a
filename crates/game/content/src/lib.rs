//! Stock content for the rules engine.
//!
//! This crate houses the reference factions, the stock board layout, and
//! loaders for reading layouts from RON data files. Content feeds the
//! engine through the catalog and setup seams and never appears in match
//! state itself.

pub mod factions;
pub mod layout;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use factions::{
    ASHWALKERS, Ashwalkers, MARSHFOLK, MEADOWKIN, Marshfolk, Meadowkin, PEAKBORN, Peakborn,
    SKYWEAVERS, Skyweavers, StockCatalog, TIDECALLERS, Tidecallers,
};
pub use layout::{BASE_ROWS, LayoutError, TERRAIN_CODES, base_layout, decode_rows};

#[cfg(feature = "loaders")]
pub use loaders::{LoadResult, MapLoader};
