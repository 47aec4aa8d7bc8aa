//! Query URL construction for county envelopes.
//!
//! Each county becomes one `ArcGIS` `query` request with an
//! `esriGeometryEnvelope` spatial filter. The envelope is passed as a
//! URL-encoded JSON object:
//!
//! ```text
//! geometry={"xmin":..,"ymin":..,"xmax":..,"ymax":..,"spatialReference":{"wkid":4326,"latestWkid":4326}}
//! ```
//!
//! Extents use Rust's shortest round-trip float formatting, so the four
//! numbers can be recovered exactly from the URL.

use arda_geography_models::CountyBoundingBox;
use arda_source_models::{EndpointDefinition, QueryUrl};

use crate::registry;

/// Formats query URLs for one endpoint definition.
#[derive(Debug, Clone)]
pub struct QueryTemplate<'a> {
    base_url: &'a str,
    out_fields: String,
    wkid: u32,
}

impl<'a> QueryTemplate<'a> {
    /// Creates a template for the given endpoint.
    #[must_use]
    pub fn new(definition: &'a EndpointDefinition) -> Self {
        Self {
            base_url: &definition.url,
            out_fields: definition.out_fields.join(","),
            wkid: definition.wkid,
        }
    }

    /// Formats the query URL for one bounding box.
    #[must_use]
    pub fn url_for(&self, bbox: &CountyBoundingBox) -> QueryUrl {
        let Self {
            base_url,
            out_fields,
            wkid,
        } = self;
        let [xmin, ymin, xmax, ymax] = bbox.extents();

        QueryUrl::new(format!(
            "{base_url}?f=json&where=&returnGeometry=true\
             &spatialRel=esriSpatialRelIntersects\
             &geometry={{%22xmin%22:{xmin},%22ymin%22:{ymin},%22xmax%22:{xmax},%22ymax%22:{ymax},\
             %22spatialReference%22:{{%22wkid%22:{wkid},%22latestWkid%22:{wkid}}}}}\
             &geometryType=esriGeometryEnvelope\
             &inSR={wkid}\
             &outFields={out_fields}\
             &outSR={wkid}"
        ))
    }

    /// Formats one URL per bounding box, preserving order.
    #[must_use]
    pub fn urls_for(&self, boxes: &[CountyBoundingBox]) -> Vec<QueryUrl> {
        boxes.iter().map(|bbox| self.url_for(bbox)).collect()
    }
}

/// Formats the ARDA church query URL for one bounding box.
#[must_use]
pub fn build_query_url(bbox: &CountyBoundingBox) -> QueryUrl {
    let definition = registry::arda_churches();
    QueryTemplate::new(&definition).url_for(bbox)
}

/// Formats ARDA church query URLs for every bounding box, in order.
#[must_use]
pub fn build_query_urls(boxes: &[CountyBoundingBox]) -> Vec<QueryUrl> {
    let definition = registry::arda_churches();
    QueryTemplate::new(&definition).urls_for(boxes)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    /// Pulls the envelope back out of a query URL.
    fn envelope_of(url: &QueryUrl) -> [f64; 4] {
        let geometry = url
            .as_str()
            .split('&')
            .find_map(|param| param.strip_prefix("geometry="))
            .expect("no geometry parameter");
        let json: serde_json::Value =
            serde_json::from_str(&geometry.replace("%22", "\"")).unwrap();
        ["xmin", "ymin", "xmax", "ymax"].map(|key| json[key].as_f64().unwrap())
    }

    fn param<'a>(url: &'a QueryUrl, name: &str) -> Option<&'a str> {
        url.as_str()
            .split_once('?')?
            .1
            .split('&')
            .find_map(|p| p.strip_prefix(name)?.strip_prefix('='))
    }

    #[test]
    fn marion_county_url() {
        let bbox = CountyBoundingBox::new(-86.328_121, 39.632_177, -85.937_379, 39.927_392);
        let url = build_query_url(&bbox);

        assert_eq!(
            url.as_str(),
            "http://maps.nazarene.org/arcgis/rest/services/ARDA/InfoGroupChurches/MapServer/0/query\
             ?f=json&where=&returnGeometry=true&spatialRel=esriSpatialRelIntersects\
             &geometry={%22xmin%22:-86.328121,%22ymin%22:39.632177,%22xmax%22:-85.937379,%22ymax%22:39.927392,\
             %22spatialReference%22:{%22wkid%22:4326,%22latestWkid%22:4326}}\
             &geometryType=esriGeometryEnvelope&inSR=4326\
             &outFields=COMPANY_NA,ADDRESS,CITY,STATE,ZIP_CODE,DENOM_DESC&outSR=4326"
        );
    }

    #[test]
    fn fixed_parameters() {
        let url = build_query_url(&CountyBoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(param(&url, "f"), Some("json"));
        assert_eq!(param(&url, "where"), Some(""));
        assert_eq!(param(&url, "returnGeometry"), Some("true"));
        assert_eq!(param(&url, "spatialRel"), Some("esriSpatialRelIntersects"));
        assert_eq!(param(&url, "geometryType"), Some("esriGeometryEnvelope"));
        assert_eq!(param(&url, "inSR"), Some("4326"));
        assert_eq!(param(&url, "outSR"), Some("4326"));
        assert_eq!(
            param(&url, "outFields").map(|f| f.split(',').count()),
            Some(6)
        );
    }

    #[test]
    fn url_round_trips_extents() {
        let boxes = [
            CountyBoundingBox::new(-86.328_121, 39.632_177, -85.937_379, 39.927_392),
            CountyBoundingBox::new(-0.1, -0.2, 0.3, 1e-7),
            CountyBoundingBox::new(-179.999_999_999_9, -89.5, 179.25, 89.999_999),
            CountyBoundingBox::new(-84.0, 38.0, -83.0, 39.0),
        ];
        for bbox in &boxes {
            assert_eq!(envelope_of(&build_query_url(bbox)), bbox.extents());
        }
    }

    #[test]
    fn distinct_boxes_give_distinct_urls() {
        let base = [-86.3, 39.6, -85.9, 39.9];
        let mut boxes = vec![CountyBoundingBox::new(base[0], base[1], base[2], base[3])];
        for i in 0..4 {
            let mut extents = base;
            extents[i] += 1e-6;
            boxes.push(CountyBoundingBox::new(
                extents[0], extents[1], extents[2], extents[3],
            ));
        }
        // Same numbers in a different position must not collide either.
        boxes.push(CountyBoundingBox::new(base[1], base[0], base[3], base[2]));

        let urls = build_query_urls(&boxes);
        assert_eq!(urls.len(), boxes.len());
        let unique: BTreeSet<_> = urls.iter().map(QueryUrl::as_str).collect();
        assert_eq!(unique.len(), boxes.len());
    }

    #[test]
    fn order_is_preserved() {
        let boxes = [
            CountyBoundingBox::new(1.0, 1.0, 2.0, 2.0),
            CountyBoundingBox::new(3.0, 3.0, 4.0, 4.0),
        ];
        let urls = build_query_urls(&boxes);
        assert_eq!(envelope_of(&urls[0]), boxes[0].extents());
        assert_eq!(envelope_of(&urls[1]), boxes[1].extents());
    }

    #[test]
    fn custom_definition() {
        let mut definition = registry::arda_churches();
        definition.url = "http://localhost:8080/query".to_string();
        definition.out_fields = vec!["STATE".to_string()];
        definition.wkid = 4269;

        let url = QueryTemplate::new(&definition).url_for(&CountyBoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert!(url.as_str().starts_with("http://localhost:8080/query?"));
        assert_eq!(param(&url, "outFields"), Some("STATE"));
        assert_eq!(param(&url, "inSR"), Some("4269"));
    }
}
