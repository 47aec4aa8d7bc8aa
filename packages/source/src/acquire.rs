//! The county-by-county acquisition loop.
//!
//! A linear fold over the query URLs: fetch, parse, convert, filter,
//! append, pause. Any error aborts the whole run; a partially filled
//! collection is never returned.

use std::sync::Arc;

use arda_esri_models::{EsriErrorResponse, EsriQueryResponse};
use arda_source_models::{PacingConfig, QueryUrl};
use geojson::{Feature, FeatureCollection};

use crate::SourceError;
use crate::pacing;
use crate::progress::ProgressCallback;
use crate::transport::Transport;

/// One acquisition run.
#[derive(Debug, Clone)]
pub struct Acquisition<'a> {
    /// Query URLs, fetched in this order.
    pub urls: &'a [QueryUrl],
    /// Keep only features whose `state_field` property equals this value
    /// exactly. `None` keeps everything.
    pub state_filter: Option<&'a str>,
    /// Property holding the state abbreviation (e.g. `"STATE"`).
    pub state_field: &'a str,
    /// Pause between successive requests.
    pub pacing: PacingConfig,
    /// Label for log messages (e.g. `"IN"`).
    pub label: &'a str,
}

/// Fetches every URL, converts the responses to `GeoJSON`, filters by
/// state and merges everything into one collection.
///
/// Features keep URL order, then response order. Between requests (not
/// after the last one) the loop sleeps for a random duration drawn from
/// [`Acquisition::pacing`].
///
/// # Errors
///
/// Returns the first [`SourceError`] from the transport, response
/// parsing or feature conversion. No collection is produced in that case.
pub async fn fetch_and_convert_all(
    transport: &dyn Transport,
    acquisition: &Acquisition<'_>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<FeatureCollection, SourceError> {
    let label = acquisition.label;
    let total = acquisition.urls.len();
    progress.set_total(u64::try_from(total).unwrap_or(u64::MAX));

    let mut all_features: Vec<Feature> = Vec::new();

    for (idx, url) in acquisition.urls.iter().enumerate() {
        if idx > 0 {
            let delay = pacing::next_delay(&acquisition.pacing);
            log::debug!("{label}: sleeping {delay:?} before next request");
            tokio::time::sleep(delay).await;
        }

        log::debug!("{label}: GET {url}");
        let body = transport.get_text(url).await?;
        let response = parse_response(url, &body)?;
        warn_on_response_flags(label, url, &response);

        let features = arda_esri::convert_response(&response)?;
        let fetched = features.len();
        let before = all_features.len();

        all_features.extend(features.into_iter().filter(|feature| {
            acquisition
                .state_filter
                .is_none_or(|state| matches_state(feature, acquisition.state_field, state))
        }));

        log::info!(
            "{label}: request {}/{total}: {fetched} features, kept {} (total {})",
            idx + 1,
            all_features.len() - before,
            all_features.len(),
        );
        progress.inc(1);
        progress.set_message(format!("{label}: {} features", all_features.len()));
    }

    progress.finish(format!(
        "{label}: {} features from {total} requests",
        all_features.len()
    ));

    Ok(FeatureCollection {
        bbox: None,
        features: all_features,
        foreign_members: None,
    })
}

/// Parses a query response body.
///
/// An `ArcGIS` error payload becomes [`SourceError::Upstream`]; anything
/// else that is not a JSON object with a `features` array becomes
/// [`SourceError::Parse`].
///
/// # Errors
///
/// See above.
pub fn parse_response(url: &QueryUrl, body: &str) -> Result<EsriQueryResponse, SourceError> {
    let parse_error = |e: serde_json::Error| SourceError::Parse {
        url: url.to_string(),
        message: e.to_string(),
    };

    let value: serde_json::Value = serde_json::from_str(body).map_err(parse_error)?;

    if value.get("error").is_some() {
        let EsriErrorResponse { error } = serde_json::from_value(value).map_err(parse_error)?;
        return Err(SourceError::Upstream {
            url: url.to_string(),
            code: error.code,
            message: error
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    serde_json::from_value(value).map_err(parse_error)
}

fn warn_on_response_flags(label: &str, url: &QueryUrl, response: &EsriQueryResponse) {
    if response.exceeded_transfer_limit {
        log::warn!(
            "{label}: server capped the result at {} features, some churches in this \
             county are missing: {url}",
            response.features.len()
        );
    }
    if let Some(sr) = &response.spatial_reference {
        if !sr.is_wgs84() {
            log::warn!(
                "{label}: response spatial reference is {sr:?}, not WGS84; \
                 coordinates will not be longitude/latitude"
            );
        }
    }
}

fn matches_state(feature: &Feature, field: &str, state: &str) -> bool {
    feature
        .property(field)
        .and_then(serde_json::Value::as_str)
        .is_some_and(|value| value == state)
}
