//! State abbreviation to FIPS code crosswalk.
//!
//! The crosswalk is a two-column CSV (`state_abbrev`, `fips_code`). A copy
//! covering the 50 states, DC and the inhabited territories is embedded at
//! compile time; a different file can be loaded with
//! [`Crosswalk::from_path`].

use std::io::Read;
use std::path::Path;

use arda_geography_models::{FipsCode, StateCode};
use serde::Deserialize;

use crate::GeoError;

/// Embedded crosswalk used when no file is configured.
const BUILTIN_CROSSWALK: &str = include_str!("../data/fips_state_xwalk.csv");

/// One row of the crosswalk CSV.
#[derive(Debug, Deserialize)]
struct CrosswalkRow {
    state_abbrev: String,
    fips_code: String,
}

/// An in-memory state crosswalk, in file order.
#[derive(Debug, Clone)]
pub struct Crosswalk {
    rows: Vec<(StateCode, FipsCode)>,
}

impl Crosswalk {
    /// Parses the crosswalk embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Csv`] if the embedded table is malformed.
    pub fn builtin() -> Result<Self, GeoError> {
        Self::from_reader(BUILTIN_CROSSWALK.as_bytes())
    }

    /// Loads a crosswalk CSV from disk.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the file cannot be opened or a row is
    /// malformed.
    pub fn from_path(path: &Path) -> Result<Self, GeoError> {
        let file = std::fs::File::open(path)?;
        let crosswalk = Self::from_reader(file)?;
        log::debug!(
            "Loaded {} crosswalk rows from {}",
            crosswalk.len(),
            path.display()
        );
        Ok(crosswalk)
    }

    /// Parses a crosswalk CSV from any reader.
    ///
    /// FIPS codes are kept as strings so leading zeros survive. Rows with
    /// an empty abbreviation or code are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Csv`] if the header or any row is malformed, and
    /// [`GeoError::Dataset`] if a row has an empty value.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeoError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut rows = Vec::new();
        for result in csv_reader.deserialize::<CrosswalkRow>() {
            let row = result?;
            if row.state_abbrev.is_empty() || row.fips_code.is_empty() {
                return Err(GeoError::Dataset {
                    message: format!(
                        "crosswalk row has an empty value: {:?} -> {:?}",
                        row.state_abbrev, row.fips_code
                    ),
                });
            }
            rows.push((StateCode::new(row.state_abbrev), FipsCode::new(row.fips_code)));
        }

        Ok(Self { rows })
    }

    /// Looks up the FIPS code for an abbreviation.
    ///
    /// Matching is exact and case-sensitive. The first matching row wins.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::UnknownState`] if no row matches.
    pub fn fips_for(&self, state: &StateCode) -> Result<FipsCode, GeoError> {
        self.rows
            .iter()
            .find(|(abbrev, _)| abbrev == state)
            .map(|(_, fips)| fips.clone())
            .ok_or_else(|| GeoError::UnknownState {
                abbrev: state.to_string(),
            })
    }

    /// Iterates the rows in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&StateCode, &FipsCode)> {
        self.rows.iter().map(|(abbrev, fips)| (abbrev, fips))
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the crosswalk has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolves a state abbreviation to its FIPS code.
///
/// Reads `crosswalk_path` when given, otherwise uses the embedded table.
///
/// # Errors
///
/// Returns [`GeoError::UnknownState`] if the abbreviation is not in the
/// table, or an I/O or CSV error if the table cannot be read.
pub fn lookup_fips_code(
    crosswalk_path: Option<&Path>,
    state: &StateCode,
) -> Result<FipsCode, GeoError> {
    let crosswalk = match crosswalk_path {
        Some(path) => Crosswalk::from_path(path)?,
        None => Crosswalk::builtin()?,
    };
    crosswalk.fips_for(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_states_dc_and_territories() {
        let crosswalk = Crosswalk::builtin().unwrap();
        assert_eq!(crosswalk.len(), 56);
    }

    #[test]
    fn indiana_is_18() {
        let fips = lookup_fips_code(None, &StateCode::new("IN")).unwrap();
        assert_eq!(fips.as_str(), "18");
    }

    #[test]
    fn leading_zero_survives() {
        let crosswalk = Crosswalk::builtin().unwrap();
        assert_eq!(
            crosswalk.fips_for(&StateCode::new("CA")).unwrap().as_str(),
            "06"
        );
    }

    #[test]
    fn every_builtin_row_round_trips() {
        let crosswalk = Crosswalk::builtin().unwrap();
        for (abbrev, fips) in crosswalk.iter() {
            assert_eq!(abbrev.as_str().len(), 2, "bad abbreviation {abbrev}");
            assert_eq!(fips.as_str().len(), 2, "bad FIPS {fips} for {abbrev}");
            assert_eq!(&crosswalk.fips_for(abbrev).unwrap(), fips);
        }
    }

    #[test]
    fn unknown_state_is_an_error() {
        let crosswalk = Crosswalk::builtin().unwrap();
        let err = crosswalk.fips_for(&StateCode::new("XX")).unwrap_err();
        assert!(matches!(err, GeoError::UnknownState { ref abbrev } if abbrev == "XX"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let crosswalk = Crosswalk::builtin().unwrap();
        assert!(matches!(
            crosswalk.fips_for(&StateCode::new("in")),
            Err(GeoError::UnknownState { .. })
        ));
    }

    #[test]
    fn custom_file() {
        let dir = std::env::temp_dir().join("arda_geography_crosswalk_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("xwalk.csv");
        std::fs::write(&path, "state_abbrev,fips_code\nZZ,99\nIN,18\n").unwrap();

        let fips = lookup_fips_code(Some(&path), &StateCode::new("ZZ")).unwrap();
        assert_eq!(fips.as_str(), "99");
        assert!(lookup_fips_code(Some(&path), &StateCode::new("OH")).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_column_is_an_error() {
        let result = Crosswalk::from_reader("state_abbrev\nIN\n".as_bytes());
        assert!(matches!(result, Err(GeoError::Csv(_))));
    }

    #[test]
    fn empty_value_is_an_error() {
        let result = Crosswalk::from_reader("state_abbrev,fips_code\nIN,\n".as_bytes());
        assert!(matches!(result, Err(GeoError::Dataset { .. })));
    }
}
