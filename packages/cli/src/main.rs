#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `arda_scraper`: download every ARDA church location in one US state as
//! a single `GeoJSON` file.
//!
//! ```text
//! arda_scraper IN indiana_churches.geojson
//! ```
//!
//! The state abbreviation is resolved to a FIPS code, the state's counties
//! are turned into bounding-box queries, and each county is fetched in
//! turn. Set `RUST_LOG=debug` to see every request.

use std::path::PathBuf;
use std::time::Instant;

use arda_cli_utils::IndicatifProgress;
use arda_geography::{load_county_bounding_boxes, lookup_fips_code};
use arda_geography_models::StateCode;
use arda_source::output::write_feature_collection;
use arda_source::{Acquisition, HttpTransport, QueryTemplate, fetch_and_convert_all, registry};
use arda_source_models::EndpointDefinition;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "arda_scraper",
    about = "Scrape ARDA church locations for one US state into a GeoJSON file"
)]
struct Cli {
    /// Two-letter state abbreviation (e.g., "IN"); case-insensitive
    state_abbrev: String,

    /// Output `GeoJSON` file, overwritten if it exists
    output_file: PathBuf,

    /// County boundaries keyed by `STATEFP`: the TIGER/Line county
    /// shapefile (`.shp` with its `.dbf`), or a `GeoJSON` export of it
    #[arg(long, default_value = "data/tl_2017_us_county.shp")]
    counties: PathBuf,

    /// State abbreviation to FIPS crosswalk CSV with `state_abbrev` and
    /// `fips_code` columns. Defaults to the built-in table.
    #[arg(long)]
    crosswalk: Option<PathBuf>,

    /// Endpoint definition TOML. Defaults to the built-in ARDA churches
    /// layer.
    #[arg(long)]
    endpoint: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Retries per request for connection errors, timeouts, 429 and 5xx
    #[arg(long)]
    max_retries: Option<u32>,

    /// Shortest pause between county requests, in seconds
    #[arg(long)]
    min_delay_secs: Option<u64>,

    /// Longest pause between county requests, in seconds
    #[arg(long)]
    max_delay_secs: Option<u64>,
}

impl Cli {
    /// Applies command-line overrides on top of an endpoint definition.
    fn apply_overrides(&self, definition: &mut EndpointDefinition) {
        if let Some(timeout_secs) = self.timeout_secs {
            definition.retry.timeout_secs = timeout_secs;
        }
        if let Some(max_retries) = self.max_retries {
            definition.retry.max_retries = max_retries;
        }
        if let Some(min_delay_secs) = self.min_delay_secs {
            definition.pacing.min_delay_secs = min_delay_secs;
        }
        if let Some(max_delay_secs) = self.max_delay_secs {
            definition.pacing.max_delay_secs = max_delay_secs;
        }
    }

    fn endpoint_definition(&self) -> Result<EndpointDefinition, arda_source::SourceError> {
        let mut definition = match &self.endpoint {
            Some(path) => registry::load_definition(path)?,
            None => registry::arda_churches(),
        };
        self.apply_overrides(&mut definition);
        Ok(definition)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = arda_cli_utils::init_logger();
    let cli = Cli::parse();
    let start = Instant::now();

    let state = StateCode::from_user_input(&cli.state_abbrev);
    let fips = lookup_fips_code(cli.crosswalk.as_deref(), &state)?;
    log::info!("{state}: state FIPS code {fips}");

    let counties = load_county_bounding_boxes(&cli.counties, &fips)?;
    if counties.is_empty() {
        log::warn!(
            "{state}: no counties with STATEFP={fips} in {}; the output will be empty",
            cli.counties.display()
        );
    } else {
        log::info!("{state}: {} counties", counties.len());
    }

    let definition = cli.endpoint_definition()?;
    log::info!("{state}: querying {} ({})", definition.name, definition.url);

    let urls = QueryTemplate::new(&definition).urls_for(&counties);
    let transport = HttpTransport::for_endpoint(&definition)?;
    let progress = IndicatifProgress::counties_bar(&multi, state.as_str());

    let acquisition = Acquisition {
        urls: &urls,
        state_filter: Some(state.as_str()),
        state_field: &definition.state_field,
        pacing: definition.pacing,
        label: state.as_str(),
    };
    let collection = fetch_and_convert_all(&transport, &acquisition, &progress).await?;

    write_feature_collection(&cli.output_file, &collection)?;

    log::info!(
        "Run complete: {} churches in {state} written to {} in {:.1}s",
        collection.features.len(),
        cli.output_file.display(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_arguments_and_defaults() {
        let cli = Cli::try_parse_from(["arda_scraper", "in", "out.geojson"]).unwrap();

        assert_eq!(cli.state_abbrev, "in");
        assert_eq!(cli.output_file, PathBuf::from("out.geojson"));
        assert_eq!(cli.counties, PathBuf::from("data/tl_2017_us_county.shp"));
        assert!(cli.crosswalk.is_none());
        assert!(cli.endpoint.is_none());
    }

    #[test]
    fn missing_output_file_is_rejected() {
        assert!(Cli::try_parse_from(["arda_scraper", "IN"]).is_err());
    }

    #[test]
    fn defaults_leave_builtin_endpoint_untouched() {
        let cli = Cli::try_parse_from(["arda_scraper", "IN", "out.geojson"]).unwrap();
        assert_eq!(cli.endpoint_definition().unwrap(), registry::arda_churches());
    }

    #[test]
    fn flags_override_pacing_and_retry() {
        let cli = Cli::try_parse_from([
            "arda_scraper",
            "IN",
            "out.geojson",
            "--timeout-secs",
            "5",
            "--max-retries",
            "0",
            "--min-delay-secs",
            "0",
            "--max-delay-secs",
            "1",
        ])
        .unwrap();

        let definition = cli.endpoint_definition().unwrap();
        assert_eq!(definition.retry.timeout_secs, 5);
        assert_eq!(definition.retry.max_retries, 0);
        assert_eq!(definition.pacing.min_delay_secs, 0);
        assert_eq!(definition.pacing.max_delay_secs, 1);
        assert_eq!(
            definition.retry.base_delay_secs,
            registry::arda_churches().retry.base_delay_secs
        );
    }

    #[test]
    fn missing_endpoint_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "arda_scraper",
            "IN",
            "out.geojson",
            "--endpoint",
            "/nonexistent/endpoint.toml",
        ])
        .unwrap();
        assert!(cli.endpoint_definition().is_err());
    }
}
