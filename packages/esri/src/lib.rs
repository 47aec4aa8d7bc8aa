#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Esri JSON to `GeoJSON` conversion.
//!
//! Converts the records of an `ArcGIS` `f=json` query response into
//! standard [`geojson::Feature`]s. The conversion is pure: no I/O, no
//! logging, no global state.
//!
//! | Esri geometry | `GeoJSON` geometry |
//! |---|---|
//! | `x`/`y` | `Point` |
//! | `points` | `MultiPoint` |
//! | `paths` (one) | `LineString` |
//! | `paths` (several) | `MultiLineString` |
//! | `rings` (one exterior) | `Polygon` |
//! | `rings` (several exteriors) | `MultiPolygon` |
//! | `xmin`..`ymax` | `Polygon` |
//! | empty (`{"x": null}`, `{"rings": []}`, ...) | `null` |

pub mod rings;

use arda_esri_models::{EsriFeature, EsriGeometry, EsriQueryResponse, Position};
use geojson::feature::Id;
use geojson::{Feature, Geometry, Value};
use thiserror::Error;

pub use arda_esri_models as models;

/// Errors that can occur while converting an Esri feature.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The geometry object matches none of the Esri geometry shapes.
    #[error("Unrecognized Esri geometry with keys [{}]", keys.join(", "))]
    UnrecognizedGeometry {
        /// Top-level keys of the offending geometry object.
        keys: Vec<String>,
    },

    /// The geometry has no usable coordinates (e.g. every polygon ring
    /// had fewer than four positions).
    #[error("Empty {kind} geometry")]
    EmptyGeometry {
        /// Esri geometry kind (`"point"`, `"multipoint"`, `"polyline"`,
        /// `"polygon"`, `"envelope"`).
        kind: &'static str,
    },

    /// A coordinate tuple has fewer than two ordinates.
    #[error("Invalid position with {len} ordinate(s) in {kind} geometry")]
    InvalidPosition {
        /// Esri geometry kind.
        kind: &'static str,
        /// Number of ordinates found.
        len: usize,
    },
}

/// Converts one Esri feature into a `GeoJSON` feature.
///
/// The attribute bag is copied verbatim into `properties`. A missing or
/// `null` geometry, or one of Esri's empty-geometry encodings (see
/// [`EsriGeometry::is_empty`]), becomes a `null` `GeoJSON` geometry. The result has no
/// `id` or `bbox`, so it serializes with exactly the keys `type`,
/// `geometry` and `properties`.
///
/// # Errors
///
/// Returns [`ConversionError`] if the geometry is present but not a
/// recognizable Esri shape, or a non-empty polygon none of whose rings
/// survive closing.
pub fn convert_feature(feature: &EsriFeature) -> Result<Feature, ConversionError> {
    convert_feature_with_id(feature, None)
}

/// Like [`convert_feature`], additionally lifting `id_attribute` (e.g.
/// `"OBJECTID"`) into the feature `id` when it holds a string or number.
///
/// The attribute also stays in `properties`.
///
/// # Errors
///
/// Returns [`ConversionError`] under the same conditions as
/// [`convert_feature`].
pub fn convert_feature_with_id(
    feature: &EsriFeature,
    id_attribute: Option<&str>,
) -> Result<Feature, ConversionError> {
    let geometry = feature
        .geometry
        .as_ref()
        .filter(|geometry| !geometry.is_empty())
        .map(convert_geometry)
        .transpose()?;

    let id = id_attribute
        .and_then(|key| feature.attributes.as_ref()?.get(key))
        .and_then(|value| match value {
            serde_json::Value::String(s) => Some(Id::String(s.clone())),
            serde_json::Value::Number(n) => Some(Id::Number(n.clone())),
            _ => None,
        });

    Ok(Feature {
        bbox: None,
        geometry,
        id,
        properties: feature.attributes.clone(),
        foreign_members: None,
    })
}

/// Converts every feature of a query response, in response order.
///
/// # Errors
///
/// Returns the first [`ConversionError`] encountered.
pub fn convert_response(response: &EsriQueryResponse) -> Result<Vec<Feature>, ConversionError> {
    response.features.iter().map(convert_feature).collect()
}

/// Converts an Esri geometry into a `GeoJSON` geometry.
///
/// # Errors
///
/// Returns [`ConversionError`] if the geometry is unrecognized, empty, or
/// contains a position with fewer than two ordinates. Use
/// [`convert_feature`] to map empty geometries to `null` instead.
pub fn convert_geometry(geometry: &EsriGeometry) -> Result<Geometry, ConversionError> {
    let value = match geometry {
        EsriGeometry::Point { x, y, z } => {
            let (Some(x), Some(y)) = (x, y) else {
                return Err(ConversionError::EmptyGeometry { kind: "point" });
            };
            let mut position = vec![*x, *y];
            position.extend(z);
            Value::Point(position)
        }
        EsriGeometry::MultiPoint { points } => {
            check_positions("multipoint", points)?;
            if points.is_empty() {
                return Err(ConversionError::EmptyGeometry { kind: "multipoint" });
            }
            Value::MultiPoint(points.clone())
        }
        EsriGeometry::Polyline { paths } => {
            for path in paths {
                check_positions("polyline", path)?;
            }
            match paths.as_slice() {
                [] => return Err(ConversionError::EmptyGeometry { kind: "polyline" }),
                [path] => Value::LineString(path.clone()),
                _ => Value::MultiLineString(paths.clone()),
            }
        }
        EsriGeometry::Polygon { rings: esri_rings } => {
            for ring in esri_rings {
                check_positions("polygon", ring)?;
            }
            let mut polygons = rings::rings_to_polygons(esri_rings);
            match polygons.len() {
                0 => return Err(ConversionError::EmptyGeometry { kind: "polygon" }),
                1 => Value::Polygon(polygons.remove(0)),
                _ => Value::MultiPolygon(polygons),
            }
        }
        EsriGeometry::Envelope {
            xmin,
            ymin,
            xmax,
            ymax,
        } => {
            let (Some(xmin), Some(ymin), Some(xmax), Some(ymax)) = (xmin, ymin, xmax, ymax)
            else {
                return Err(ConversionError::EmptyGeometry { kind: "envelope" });
            };
            Value::Polygon(vec![vec![
                vec![*xmax, *ymax],
                vec![*xmin, *ymax],
                vec![*xmin, *ymin],
                vec![*xmax, *ymin],
                vec![*xmax, *ymax],
            ]])
        }
        EsriGeometry::Unrecognized(raw) => {
            let keys = raw
                .as_object()
                .map(|object| object.keys().cloned().collect())
                .unwrap_or_default();
            return Err(ConversionError::UnrecognizedGeometry { keys });
        }
    };

    Ok(Geometry::new(value))
}

fn check_positions(kind: &'static str, positions: &[Position]) -> Result<(), ConversionError> {
    match positions.iter().find(|p| p.len() < 2) {
        Some(bad) => Err(ConversionError::InvalidPosition {
            kind,
            len: bad.len(),
        }),
        None => Ok(()),
    }
}
