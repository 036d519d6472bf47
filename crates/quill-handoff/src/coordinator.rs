//! Handoff coordination
//!
//! A [`HandoffCoordinator`] builds packages, parses them back off the
//! wire, and tracks outstanding ones in a private, per-instance registry.
//! The registry is explicit, constructible state (multiple independent
//! coordinators can coexist), with a process-wide convenience instance
//! offered on top via [`global`](crate::global).

use crate::package::{HandoffId, HandoffPackage, HandoffRequest, HandoffStatus, SCHEMA_VERSION};
use crate::wire::{self, HandoffError};
use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Reverse;

/// Builds, parses, and tracks handoff packages
///
/// Single-owner state: methods take `&self`/`&mut self` and the
/// coordinator does no internal locking. Hosts sharing one instance
/// across threads wrap it themselves.
#[derive(Debug, Default)]
pub struct HandoffCoordinator {
    registry: IndexMap<HandoffId, HandoffPackage>,
}

impl HandoffCoordinator {
    /// Create a coordinator with an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema version this coordinator stamps and accepts
    #[inline]
    #[must_use]
    pub fn supported_version(&self) -> &'static str {
        SCHEMA_VERSION
    }

    /// Build an immutable package from a request
    ///
    /// Stamps the schema version, generates an id, sets status `pending`
    /// and `created_at` to now; `expires_at` is set only when the request
    /// asked for an expiry. A supplied trace snapshot is embedded as-is;
    /// it is already an export, never a live reference.
    #[must_use]
    pub fn prepare_handoff(&self, request: HandoffRequest) -> HandoffPackage {
        let created_at = Utc::now();
        let package = HandoffPackage {
            id: HandoffId::new(),
            version: SCHEMA_VERSION.to_string(),
            source: request.source,
            target: request.target,
            status: HandoffStatus::Pending,
            priority: request.priority,
            created_at,
            expires_at: request
                .expiration_minutes
                .map(|minutes| created_at + chrono::Duration::minutes(minutes)),
            context: request.context,
            instructions: request.instructions,
            trace: request.trace,
        };
        tracing::info!(
            handoff_id = %package.id,
            source = %package.source,
            target = %package.target,
            priority = %package.priority,
            "handoff prepared"
        );
        package
    }

    /// Parse a package from its serialized textual form
    ///
    /// # Errors
    /// - [`HandoffError::Malformed`] if the text is not valid JSON
    /// - [`HandoffError::MissingVersion`] if no version field is present
    /// - [`HandoffError::IncompatibleVersion`] on a major-version mismatch
    pub fn parse_handoff(&self, raw: &str) -> Result<HandoffPackage, HandoffError> {
        let value: Value = serde_json::from_str(raw)?;
        self.parse_handoff_value(value)
    }

    /// Parse a package from an already-parsed structure
    ///
    /// The version gate runs before deserialization; on success every
    /// serialized timestamp re-hydrates into a live `DateTime<Utc>`.
    ///
    /// # Errors
    /// Same conditions as [`parse_handoff`](Self::parse_handoff).
    pub fn parse_handoff_value(&self, value: Value) -> Result<HandoffPackage, HandoffError> {
        let found = wire::version_field(&value).ok_or(HandoffError::MissingVersion)?;
        if !wire::versions_compatible(found, SCHEMA_VERSION) {
            return Err(HandoffError::IncompatibleVersion {
                found: found.to_string(),
                supported: SCHEMA_VERSION.to_string(),
            });
        }
        let package: HandoffPackage = serde_json::from_value(value)?;
        Ok(package)
    }

    /// Serialize a package into the canonical wire form
    ///
    /// # Errors
    /// Returns [`HandoffError::Malformed`] if serialization fails.
    pub fn to_json(&self, package: &HandoffPackage) -> Result<String, HandoffError> {
        wire::to_json(package)
    }

    /// Render a package as a human-readable markdown brief
    #[must_use]
    pub fn to_markdown(&self, package: &HandoffPackage) -> String {
        crate::markdown::render(package)
    }

    /// Store a package by id, returning the id
    pub fn register(&mut self, package: HandoffPackage) -> HandoffId {
        let id = package.id;
        tracing::debug!(handoff_id = %id, target = %package.target, "handoff registered");
        self.registry.insert(id, package);
        id
    }

    /// Look up a package by id
    #[must_use]
    pub fn get(&self, id: HandoffId) -> Option<&HandoffPackage> {
        self.registry.get(&id)
    }

    /// Update a package's status; returns whether the id existed
    pub fn update_status(&mut self, id: HandoffId, status: HandoffStatus) -> bool {
        match self.registry.get_mut(&id) {
            Some(package) => {
                tracing::debug!(handoff_id = %id, status = %status, "handoff status updated");
                package.status = status;
                true
            }
            None => false,
        }
    }

    /// All pending packages addressed to `target`
    ///
    /// Ordered by priority rank descending (`immediate` ahead of
    /// `normal`) with ties broken by registration order.
    #[must_use]
    pub fn pending_for_agent(&self, target: &str) -> Vec<&HandoffPackage> {
        let mut pending: Vec<&HandoffPackage> = self
            .registry
            .values()
            .filter(|package| {
                package.target == target && package.status == HandoffStatus::Pending
            })
            .collect();
        pending.sort_by_key(|package| Reverse(package.priority));
        pending
    }

    /// Whether a package's expiry is set and has passed
    #[inline]
    #[must_use]
    pub fn is_expired(&self, package: &HandoffPackage) -> bool {
        package.is_expired_at(Utc::now())
    }

    /// Drop every expired package, returning the count removed
    pub fn clear_expired(&mut self) -> usize {
        let now = Utc::now();
        let before = self.registry.len();
        self.registry.retain(|_, package| !package.is_expired_at(now));
        let removed = before - self.registry.len();
        if removed > 0 {
            tracing::info!(removed, "expired handoffs cleared");
        }
        removed
    }

    /// Number of registered packages
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
