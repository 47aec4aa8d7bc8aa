#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reference geography types.
//!
//! These types describe the read-only reference data the scraper works
//! from: state abbreviations, their FIPS codes, and the bounding box of
//! every county in a state. They carry no I/O.

pub mod fips;

use serde::{Deserialize, Serialize};

pub use fips::{FipsCode, StateCode};

/// The bounding rectangle of one county polygon in WGS84 coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyBoundingBox {
    /// County GEOID (state FIPS + county FIPS, e.g. "18097"), if the
    /// dataset has one.
    pub geoid: Option<String>,
    /// County name (e.g. "Marion"), if the dataset has one.
    pub name: Option<String>,
    /// Western longitude.
    pub min_x: f64,
    /// Southern latitude.
    pub min_y: f64,
    /// Eastern longitude.
    pub max_x: f64,
    /// Northern latitude.
    pub max_y: f64,
}

impl CountyBoundingBox {
    /// Creates an unlabeled bounding box from its four extents.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            geoid: None,
            name: None,
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the extents as `[min_x, min_y, max_x, max_y]`.
    #[must_use]
    pub const fn extents(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Human-readable label for log messages, falling back to the extents
    /// when the county has neither a name nor a GEOID.
    #[must_use]
    pub fn label(&self) -> String {
        match (&self.name, &self.geoid) {
            (Some(name), Some(geoid)) => format!("{name} ({geoid})"),
            (Some(name), None) => name.clone(),
            (None, Some(geoid)) => geoid.clone(),
            (None, None) => format!(
                "[{}, {}, {}, {}]",
                self.min_x, self.min_y, self.max_x, self.max_y
            ),
        }
    }
}
