#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reference data loading for the ARDA scraper.
//!
//! Resolves a state abbreviation to its FIPS code through a crosswalk
//! table ([`crosswalk`]) and loads the bounding box of every county in
//! that state from the Census TIGER county shapefile ([`counties`]). Both
//! inputs are read-only; nothing here touches the network.

pub mod counties;
pub mod crosswalk;

use thiserror::Error;

pub use counties::load_county_bounding_boxes;
pub use crosswalk::{Crosswalk, lookup_fips_code};

/// Errors that can occur while loading reference data.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The state abbreviation has no row in the crosswalk.
    #[error("Unknown state abbreviation: {abbrev:?}")]
    UnknownState {
        /// The abbreviation that was looked up.
        abbrev: String,
    },

    /// Reading a reference file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The crosswalk CSV could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The county dataset is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The county shapefile (`.shp`/`.shx`/`.dbf`) could not be read.
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// A reference file parsed but its content is unusable: a crosswalk
    /// row with an empty value, or a county dataset with an unexpected
    /// shape.
    #[error("Invalid reference data: {message}")]
    Dataset {
        /// Description of what went wrong.
        message: String,
    },
}
