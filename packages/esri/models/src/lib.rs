#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Esri JSON records as returned by `ArcGIS` REST `query` endpoints with
//! `f=json`.
//!
//! `ArcGIS` wraps each record as `{ "attributes": {...}, "geometry": {...} }`
//! where the geometry shape is identified only by which keys are present
//! (`x`/`y`, `points`, `paths`, `rings` or `xmin`..`ymax`). These types
//! validate that structure at the parse boundary so the converter never
//! has to poke at raw JSON.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A coordinate tuple: `[x, y]`, `[x, y, z]` or `[x, y, z, m]`.
pub type Position = Vec<f64>;

/// A closed or open sequence of positions.
pub type Ring = Vec<Position>;

/// Flat attribute bag of a feature.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// A single record from a query response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsriFeature {
    /// Geometry, absent or `null` when the layer was queried without
    /// geometry or the record has none.
    #[serde(default)]
    pub geometry: Option<EsriGeometry>,
    /// Attribute bag, absent when no `outFields` were requested.
    #[serde(default)]
    pub attributes: Option<Attributes>,
}

/// Esri geometry, classified by the keys it carries.
///
/// Variants are tried in declaration order; anything that matches none
/// of the known shapes lands in [`EsriGeometry::Unrecognized`] so the
/// converter can report it instead of failing the whole response parse.
///
/// Esri spells an empty geometry as the shape with nothing in it:
/// `{"x": null}`, `{"x": "NaN", "y": "NaN"}`, `{"points": []}`,
/// `{"paths": []}`, `{"rings": []}` or `{"xmin": null}`. Those parse into
/// their usual variant and report [`EsriGeometry::is_empty`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EsriGeometry {
    /// `{ "x": .., "y": .., "z"?: .. }`
    Point {
        /// Longitude / easting. `None` for `null` or `"NaN"`.
        #[serde(deserialize_with = "nullable_ordinate")]
        x: Option<f64>,
        /// Latitude / northing. `None` for `null`, `"NaN"` or absent.
        #[serde(default, deserialize_with = "nullable_ordinate")]
        y: Option<f64>,
        /// Elevation, when the layer has Z values.
        #[serde(
            default,
            deserialize_with = "nullable_ordinate",
            skip_serializing_if = "Option::is_none"
        )]
        z: Option<f64>,
    },
    /// `{ "points": [[x, y], ...] }`
    MultiPoint {
        /// Member points.
        points: Vec<Position>,
    },
    /// `{ "paths": [[[x, y], ...], ...] }`
    Polyline {
        /// One coordinate sequence per path.
        paths: Vec<Vec<Position>>,
    },
    /// `{ "rings": [[[x, y], ...], ...] }`
    ///
    /// Clockwise rings are exteriors, counter-clockwise rings are holes.
    Polygon {
        /// Exterior and interior rings in any order.
        rings: Vec<Ring>,
    },
    /// `{ "xmin": .., "ymin": .., "xmax": .., "ymax": .. }`
    Envelope {
        /// Minimum x.
        #[serde(deserialize_with = "nullable_ordinate")]
        xmin: Option<f64>,
        /// Minimum y.
        #[serde(default, deserialize_with = "nullable_ordinate")]
        ymin: Option<f64>,
        /// Maximum x.
        #[serde(default, deserialize_with = "nullable_ordinate")]
        xmax: Option<f64>,
        /// Maximum y.
        #[serde(default, deserialize_with = "nullable_ordinate")]
        ymax: Option<f64>,
    },
    /// Anything else, kept verbatim for error reporting.
    Unrecognized(serde_json::Value),
}

impl EsriGeometry {
    /// Whether this is one of Esri's empty-geometry encodings.
    ///
    /// [`EsriGeometry::Unrecognized`] is never empty; it is malformed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point { x, y, .. } => x.is_none() || y.is_none(),
            Self::MultiPoint { points } => points.is_empty(),
            Self::Polyline { paths } => paths.iter().all(Vec::is_empty),
            Self::Polygon { rings } => rings.iter().all(Vec::is_empty),
            Self::Envelope {
                xmin,
                ymin,
                xmax,
                ymax,
            } => [xmin, ymin, xmax, ymax].iter().any(|v| v.is_none()),
            Self::Unrecognized(_) => false,
        }
    }
}

/// Reads an ordinate that Esri may write as a number, `null` or `"NaN"`.
fn nullable_ordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64().filter(|v| v.is_finite())),
        Some(serde_json::Value::String(s)) if s.eq_ignore_ascii_case("nan") => Ok(None),
        Some(other) => Err(D::Error::custom(format!(
            "expected a number, null or \"NaN\", found {other}"
        ))),
    }
}

/// Spatial reference attached to a response or geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    /// Well-known ID as originally registered (e.g. 4326, 102100).
    #[serde(default)]
    pub wkid: Option<u32>,
    /// Current well-known ID (e.g. 3857 for 102100).
    #[serde(default)]
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    /// WGS84 geographic coordinates.
    pub const WGS84_WKID: u32 = 4326;

    /// Whether this reference is plain WGS84 longitude/latitude.
    #[must_use]
    pub fn is_wgs84(&self) -> bool {
        self.latest_wkid.or(self.wkid) == Some(Self::WGS84_WKID)
    }
}

/// Body of a successful `query` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriQueryResponse {
    /// Records, in server order.
    pub features: Vec<EsriFeature>,
    /// Spatial reference of every geometry in `features`.
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
    /// Esri geometry type name (e.g. `"esriGeometryPoint"`).
    #[serde(default)]
    pub geometry_type: Option<String>,
    /// Set when the server capped the result at its `maxRecordCount`.
    #[serde(default)]
    pub exceeded_transfer_limit: bool,
}

/// Error payload `ArcGIS` returns (often with HTTP 200) when a query is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsriErrorResponse {
    /// The error details.
    pub error: EsriError,
}

/// Details of an [`EsriErrorResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsriError {
    /// HTTP-like status code (e.g. 400, 500).
    #[serde(default)]
    pub code: Option<i64>,
    /// Summary message.
    #[serde(default)]
    pub message: Option<String>,
    /// Extra detail lines.
    #[serde(default)]
    pub details: Vec<String>,
}
