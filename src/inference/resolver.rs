//! # Provider Resolver
//!
//! Maps a [`ModelSpec`] to exactly one call strategy. Which model names are
//! raw-HTTP is a configuration concern: the [`ProviderTable`] is consulted
//! once, when a spec is built, and [`resolve`] only reads the provider the
//! spec already carries.

use std::collections::BTreeMap;

use log::debug;

use super::provider::ProviderError;
use super::types::ModelSpec;
use crate::Provider;

/// Models known out of the box. Every name not listed here is native.
pub const DEFAULT_MODELS: &[(&str, Provider)] = &[
    ("gpt-4o", Provider::Native),
    ("gpt-4o-mini", Provider::Native),
    ("gpt-4-1106-preview", Provider::Native),
];

/// The call path chosen for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPlan<'a> {
    Native,
    RawHttp { endpoint: &'a str },
}

/// Picks the call strategy for `spec`.
///
/// A raw-HTTP spec without a usable endpoint is rejected here, before any
/// network I/O.
pub fn resolve(spec: &ModelSpec) -> Result<CallPlan<'_>, ProviderError> {
    let plan = match spec.provider {
        Provider::Native => CallPlan::Native,
        Provider::RawHttp => match spec.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => CallPlan::RawHttp { endpoint },
            _ => {
                return Err(ProviderError::Config(format!(
                    "API endpoint for {} is not configured.",
                    spec.name
                )));
            }
        },
    };
    debug!("Resolved {} to {:?}", spec.name, plan);
    Ok(plan)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableEntry {
    provider: Provider,
    endpoint: Option<String>,
    description: Option<String>,
}

/// Model name → provider configuration, supplied by the integrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTable {
    entries: BTreeMap<String, TableEntry>,
}

impl Default for ProviderTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (name, provider) in DEFAULT_MODELS {
            table.insert(name, *provider, None, None);
        }
        table
    }
}

impl ProviderTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces a model entry.
    pub fn insert(
        &mut self,
        name: &str,
        provider: Provider,
        endpoint: Option<String>,
        description: Option<String>,
    ) {
        self.entries.insert(
            name.to_string(),
            TableEntry {
                provider,
                endpoint,
                description,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Builds the spec for `name`. Unlisted names are native.
    pub fn spec_for(&self, name: &str) -> ModelSpec {
        match self.entries.get(name) {
            Some(entry) => ModelSpec {
                name: name.to_string(),
                provider: entry.provider,
                endpoint: entry.endpoint.clone(),
            },
            None => ModelSpec::native(name),
        }
    }

    /// Listed models as `(name, provider, description)`, sorted by name.
    pub fn models(&self) -> impl Iterator<Item = (&str, Provider, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, e)| (name.as_str(), e.provider, e.description.as_deref()))
    }
}
