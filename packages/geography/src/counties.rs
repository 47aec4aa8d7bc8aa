//! County bounding boxes from the Census TIGER county file.
//!
//! Two layouts are accepted, chosen by file extension:
//!
//! * `.shp`: the TIGER/Line shapefile as published (`tl_<year>_us_county.shp`
//!   with its `.shx` and `.dbf` siblings).
//! * anything else: a `GeoJSON` `FeatureCollection` export of the same file,
//!   one feature per county.
//!
//! Either way, counties are matched on the `STATEFP` attribute and only
//! the bounding rectangle of each county is kept.

use std::path::Path;

use arda_geography_models::{CountyBoundingBox, FipsCode};
use geo::BoundingRect;
use geojson::{Feature, GeoJson};
use shapefile::Shape;
use shapefile::dbase::{FieldValue, Record};

use crate::GeoError;

/// Attribute holding the two-digit state FIPS code.
const STATE_FIPS_PROPERTY: &str = "STATEFP";

/// Attribute holding the five-digit county GEOID.
const GEOID_PROPERTY: &str = "GEOID";

/// Attribute holding the county name.
const NAME_PROPERTY: &str = "NAME";

/// Loads the bounding box of every county in the given state.
///
/// A path ending in `.shp` (any case) is read as an ESRI shapefile;
/// anything else is parsed as `GeoJSON`. Counties are returned in dataset
/// order. A FIPS code that matches no county yields an empty vector, not
/// an error. Counties with a null or empty geometry are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read, is not a valid
/// shapefile or `GeoJSON` `FeatureCollection`, or holds a geometry that
/// cannot be converted.
pub fn load_county_bounding_boxes(
    path: &Path,
    fips: &FipsCode,
) -> Result<Vec<CountyBoundingBox>, GeoError> {
    let boxes = if is_shapefile(path) {
        county_bounding_boxes_from_shapefile(path, fips)?
    } else {
        let text = std::fs::read_to_string(path)?;
        county_bounding_boxes_from_str(&text, fips)?
    };
    log::debug!(
        "{} counties with STATEFP={fips} in {}",
        boxes.len(),
        path.display()
    );
    Ok(boxes)
}

fn is_shapefile(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("shp"))
}

/// Reads county boxes from a TIGER shapefile and its `.dbf` table.
///
/// # Errors
///
/// Returns [`GeoError::Shapefile`] if the shapefile or its attribute
/// table cannot be read, and [`GeoError::Dataset`] if a shape cannot be
/// converted to a geometry.
pub fn county_bounding_boxes_from_shapefile(
    path: &Path,
    fips: &FipsCode,
) -> Result<Vec<CountyBoundingBox>, GeoError> {
    let mut reader = shapefile::Reader::from_path(path)?;

    let mut boxes = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        if character_field(&record, STATE_FIPS_PROPERTY).as_deref() != Some(fips.as_str()) {
            continue;
        }

        let geoid = character_field(&record, GEOID_PROPERTY);
        let name = character_field(&record, NAME_PROPERTY);
        let geometry = match shape {
            Shape::NullShape => None,
            shape => Some(geo::Geometry::<f64>::try_from(shape).map_err(|e| {
                GeoError::Dataset {
                    message: format!(
                        "county {}: {e}",
                        geoid.as_deref().unwrap_or("<no GEOID>")
                    ),
                }
            })?),
        };

        if let Some(bbox) = county_bounding_box(geoid, name, geometry) {
            boxes.push(bbox);
        }
    }

    Ok(boxes)
}

fn character_field(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        FieldValue::Character(Some(value)) => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Same as [`load_county_bounding_boxes`] for an in-memory `GeoJSON`
/// dataset.
///
/// # Errors
///
/// Returns [`GeoError`] if the text is not a `GeoJSON`
/// `FeatureCollection`.
pub fn county_bounding_boxes_from_str(
    text: &str,
    fips: &FipsCode,
) -> Result<Vec<CountyBoundingBox>, GeoError> {
    let geojson: GeoJson = text.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeoError::Dataset {
            message: "expected a FeatureCollection of counties".to_string(),
        });
    };

    let mut boxes = Vec::new();
    for feature in collection.features {
        if string_property(&feature, STATE_FIPS_PROPERTY) != Some(fips.as_str()) {
            continue;
        }
        let geoid = string_property(&feature, GEOID_PROPERTY).map(str::to_string);
        let name = string_property(&feature, NAME_PROPERTY).map(str::to_string);
        let geometry = feature
            .geometry
            .map(geo::Geometry::<f64>::try_from)
            .transpose()?;

        if let Some(bbox) = county_bounding_box(geoid, name, geometry) {
            boxes.push(bbox);
        }
    }

    Ok(boxes)
}

/// Computes the bounding box of one county.
///
/// Returns `None` when the county has no usable geometry.
fn county_bounding_box(
    geoid: Option<String>,
    name: Option<String>,
    geometry: Option<geo::Geometry<f64>>,
) -> Option<CountyBoundingBox> {
    let Some(rect) = geometry.and_then(|g| g.bounding_rect()) else {
        log::warn!(
            "County {} has no geometry, skipping",
            geoid.as_deref().unwrap_or("<no GEOID>")
        );
        return None;
    };

    Some(CountyBoundingBox {
        geoid,
        name,
        min_x: rect.min().x,
        min_y: rect.min().y,
        max_x: rect.max().x,
        max_y: rect.max().y,
    })
}

fn string_property<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature.property(key).and_then(serde_json::Value::as_str)
}
