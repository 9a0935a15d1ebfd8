//! The target schema registry: the typed shape of the traversable model graph.
//!
//! A [`TargetDescriptor`] declares one kind of model element templates can be
//! written against (`repository`, `entity`, `jpa.unit`, ...), where it nests
//! in the graph, and how to fetch its instances from a parent element.
//!
//! Descriptors must be registered container-first — a container reference to
//! an unregistered key is rejected — so registration order doubles as a build
//! order for the schema. The registry preserves that order, and traversal
//! relies on it for deterministic output.

use std::collections::HashMap;
use std::fmt;

use crate::domain::element::{ChildAccessor, Children, Element};
use crate::domain::error::ConfigurationError;

/// A descriptor describing a kind of element that templates can generate from.
#[derive(Clone)]
pub struct TargetDescriptor {
    key: String,
    facet_key: Option<String>,
    qualified_key: String,
    container_key: Option<String>,
    access_method: String,
    accessor: Option<ChildAccessor>,
}

impl TargetDescriptor {
    /// Identifier of the element kind, without any facet prefix.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Owning facet, if this kind only exists when a facet is enabled.
    pub fn facet_key(&self) -> Option<&str> {
        self.facet_key.as_deref()
    }

    /// Globally unique key: `key` for standard kinds, `facet.key` otherwise.
    pub fn qualified_key(&self) -> &str {
        &self.qualified_key
    }

    /// Qualified key of the parent kind, or `None` for root kinds.
    pub fn container_key(&self) -> Option<&str> {
        self.container_key.as_deref()
    }

    /// Name of the model accessor that yields children of this kind.
    ///
    /// Informational: traversal calls the registered [`accessor`] function,
    /// but diagnostics and model contracts speak in terms of this name.
    ///
    /// [`accessor`]: TargetDescriptor::accessor
    pub fn access_method(&self) -> &str {
        &self.access_method
    }

    /// The typed child accessor, present for every non-root descriptor.
    pub fn accessor(&self) -> Option<&ChildAccessor> {
        self.accessor.as_ref()
    }

    /// A standard kind is always traversed; a facet-scoped kind only when its
    /// facet is enabled on the containing element.
    pub fn standard(&self) -> bool {
        self.facet_key.is_none()
    }
}

impl fmt::Debug for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetDescriptor")
            .field("qualified_key", &self.qualified_key)
            .field("container_key", &self.container_key)
            .field("access_method", &self.access_method)
            .finish_non_exhaustive()
    }
}

/// Options for registering a target descriptor.
#[derive(Default, Clone)]
pub struct TargetOptions {
    facet_key: Option<String>,
    access_method: Option<String>,
    accessor: Option<ChildAccessor>,
}

impl TargetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope this kind under a facet; it is only traversed where the facet is
    /// enabled on the containing standard element.
    pub fn facet(mut self, facet_key: impl Into<String>) -> Self {
        self.facet_key = Some(facet_key.into());
        self
    }

    /// Override the default (pluralized) accessor name.
    pub fn access_method(mut self, access_method: impl Into<String>) -> Self {
        self.access_method = Some(access_method.into());
        self
    }

    /// The typed function that fetches children of this kind from a parent.
    ///
    /// For facet-scoped kinds the function receives the enclosing standard
    /// element and is expected to reach through the facet object itself.
    pub fn accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&dyn Element) -> Children + Send + Sync + 'static,
    {
        self.accessor = Some(std::sync::Arc::new(accessor));
        self
    }
}

/// Registry of target descriptors, in registration order.
#[derive(Default)]
pub struct TargetRegistry {
    descriptors: Vec<TargetDescriptor>,
    index: HashMap<String, usize>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new target descriptor.
    ///
    /// Fails if the qualified key is already registered, if the container is
    /// unknown (no forward references), or if a contained kind is registered
    /// without a child accessor.
    pub fn register(
        &mut self,
        key: &str,
        container_key: Option<&str>,
        options: TargetOptions,
    ) -> Result<&TargetDescriptor, ConfigurationError> {
        let qualified_key = match &options.facet_key {
            Some(facet) => format!("{facet}.{key}"),
            None => key.to_string(),
        };

        if let Some(container) = container_key
            && !self.contains(container)
        {
            return Err(ConfigurationError::UnknownContainer {
                key: key.to_string(),
                container_key: container.to_string(),
            });
        }
        if self.contains(&qualified_key) {
            return Err(ConfigurationError::DuplicateTarget { qualified_key });
        }
        if container_key.is_some() && options.accessor.is_none() {
            return Err(ConfigurationError::MissingAccessor { qualified_key });
        }

        let descriptor = TargetDescriptor {
            key: key.to_string(),
            facet_key: options.facet_key,
            qualified_key: qualified_key.clone(),
            container_key: container_key.map(str::to_string),
            access_method: options.access_method.unwrap_or_else(|| pluralize(key)),
            accessor: options.accessor,
        };

        let slot = self.descriptors.len();
        self.index.insert(qualified_key, slot);
        self.descriptors.push(descriptor);
        Ok(&self.descriptors[slot])
    }

    pub fn contains(&self, qualified_key: &str) -> bool {
        self.index.contains_key(qualified_key)
    }

    /// Resolve a descriptor by qualified key.
    pub fn resolve(&self, qualified_key: &str) -> Result<&TargetDescriptor, ConfigurationError> {
        self.index
            .get(qualified_key)
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| ConfigurationError::UnknownTargetKey {
                key: qualified_key.to_string(),
            })
    }

    /// All descriptors nested under the given container, in registration order.
    pub fn contained_by(&self, container_key: &str) -> Vec<&TargetDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.container_key.as_deref() == Some(container_key))
            .collect()
    }

    /// All registered qualified keys, in registration order.
    pub fn keys(&self) -> Vec<&str> {
        self.descriptors
            .iter()
            .map(|d| d.qualified_key.as_str())
            .collect()
    }

    pub fn descriptors(&self) -> &[TargetDescriptor] {
        &self.descriptors
    }

    /// Clear all registrations, for reuse between independent sessions.
    pub fn reset(&mut self) {
        self.descriptors.clear();
        self.index.clear();
    }
}

impl fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Naive English pluralization for default accessor names.
///
/// Covers the identifier vocabulary schemas actually use (`entity` →
/// `entities`, `class` → `classes`); callers with irregular nouns override
/// via [`TargetOptions::access_method`].
fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y')
        && !stem.is_empty()
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}
