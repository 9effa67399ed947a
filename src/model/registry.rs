//! Registry of external services whose adoption is reported in corp stats.
//!
//! The registry is configuration: each entry maps an internal service key (as recorded in the
//! identity store's enrollment table) to a display name. Enrollments for keys that are not
//! registered are reported by the aggregator as unknown and left out of the statistics.

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceRegistry {
    services: BTreeMap<String, String>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service key with its display name, replacing any previous entry.
    pub fn with_service(mut self, key: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.services.insert(key.into(), display_name.into());
        self
    }

    /// Parses a comma separated `key[:Display Name]` list.
    ///
    /// # Example
    /// ```ignore
    /// let registry = ServiceRegistry::parse("discord:Discord,mumble")?;
    /// assert_eq!(registry.display_name("mumble"), Some("mumble"));
    /// ```
    pub fn parse(value: &str) -> Result<Self, String> {
        let mut registry = Self::new();

        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, display_name) = match entry.split_once(':') {
                Some((key, name)) => (key.trim(), name.trim()),
                None => (entry, entry),
            };

            if key.is_empty() {
                return Err(format!("service entry '{}' has an empty key", entry));
            }

            let display_name = if display_name.is_empty() {
                key
            } else {
                display_name
            };

            registry = registry.with_service(key, display_name);
        }

        Ok(registry)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.services.contains_key(key)
    }

    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.services.get(key).map(String::as_str)
    }

    /// Registered service keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
