//! US state abbreviation and FIPS code newtypes.
//!
//! A [`StateCode`] is a two-letter postal abbreviation and a [`FipsCode`]
//! is the zero-padded two-digit state FIPS code. Both are plain strings on
//! the wire; the newtypes only exist so the two are never mixed up.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A two-letter state abbreviation (e.g. `"IN"`).
///
/// The value is stored exactly as given. Crosswalk lookups are
/// case-sensitive, so callers that accept user input should go through
/// [`StateCode::from_user_input`], which uppercases.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateCode(String);

impl StateCode {
    /// Wraps an abbreviation without any normalization.
    #[must_use]
    pub fn new(abbrev: impl Into<String>) -> Self {
        Self(abbrev.into())
    }

    /// Trims and uppercases a user-supplied abbreviation.
    #[must_use]
    pub fn from_user_input(input: &str) -> Self {
        Self(input.trim().to_uppercase())
    }

    /// Returns the abbreviation as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A zero-padded state FIPS code (e.g. `"18"` for Indiana, `"06"` for
/// California).
///
/// Always handled as a string so leading zeros survive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FipsCode(String);

impl FipsCode {
    /// Wraps a FIPS code string.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FipsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FipsCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_input_is_uppercased_and_trimmed() {
        assert_eq!(StateCode::from_user_input(" in ").as_str(), "IN");
        assert_eq!(StateCode::from_user_input("Oh").as_str(), "OH");
    }

    #[test]
    fn new_keeps_case() {
        assert_eq!(StateCode::new("in").as_str(), "in");
    }

    #[test]
    fn fips_keeps_leading_zero() {
        let fips = FipsCode::new("06");
        assert_eq!(fips.to_string(), "06");
        assert_eq!(serde_json::to_string(&fips).unwrap(), "\"06\"");
    }
}
