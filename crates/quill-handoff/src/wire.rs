//! Handoff wire format
//!
//! The canonical serialized form carries a mandatory `version` field.
//! Anything whose version is missing, or whose major version differs from
//! the coordinator's supported version, is rejected at parse time, never
//! silently accepted.

use crate::package::HandoffPackage;
use serde_json::Value;

/// Errors raised at the handoff parse/serialize boundary
///
/// Unlike the executor lifecycle, handoff parsing happens at an
/// inbound-message boundary and callers handle failures explicitly.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    /// Payload carries no `version` field
    #[error("handoff payload has no version field")]
    MissingVersion,

    /// Payload version does not match the supported schema version
    #[error("handoff version {found} is incompatible with supported version {supported}")]
    IncompatibleVersion {
        /// Version found on the payload
        found: String,
        /// Version this coordinator supports
        supported: String,
    },

    /// Payload is not a valid package
    #[error("malformed handoff payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serialize a package into its canonical wire form
///
/// The output round-trips through
/// [`parse_handoff`](crate::HandoffCoordinator::parse_handoff).
pub fn to_json(package: &HandoffPackage) -> Result<String, HandoffError> {
    serde_json::to_string_pretty(package).map_err(HandoffError::from)
}

/// Whether `found` is compatible with `supported`: major versions match
#[must_use]
pub(crate) fn versions_compatible(found: &str, supported: &str) -> bool {
    match (major(found), major(supported)) {
        (Some(found_major), Some(supported_major)) => found_major == supported_major,
        _ => false,
    }
}

/// Extract the version string from a raw payload, if present
pub(crate) fn version_field(value: &Value) -> Option<&str> {
    value.get("version").and_then(Value::as_str)
}

fn major(version: &str) -> Option<&str> {
    let first = version.split('.').next()?;
    if first.is_empty() {
        None
    } else {
        Some(first)
    }
}
