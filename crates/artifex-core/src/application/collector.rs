//! The generation target collector.
//!
//! Walks a root element depth-first, pre-order, using the target schema to
//! find every element each template could apply to. The result maps each
//! reachable qualified key to the ordered `(scope, element)` pairs discovered
//! for it — parent before children, siblings in the order the model returns
//! them, child kinds in descriptor registration order. Kinds that are never
//! reached (for example a facet enabled nowhere) are simply absent.
//!
//! For facet-scoped kinds the scope is the *current standard element*, not
//! the facet object the children hang off. That is what lets a facet-scoped
//! template still test facet applicability against the enclosing standard
//! element.

use std::collections::HashMap;

use crate::domain::{ConfigurationError, ElementRef, TargetRegistry};

/// One discovered match: the facet-bearing scope element and the element to
/// actually render from. For standard kinds the two coincide.
pub type TargetPair = (ElementRef, ElementRef);

/// Map from target qualified key to discovered element pairs, built fresh per
/// generation run.
#[derive(Default)]
pub struct GenerationTargets {
    map: HashMap<String, Vec<TargetPair>>,
}

impl std::fmt::Debug for GenerationTargets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (key, pairs) in &self.map {
            map.entry(key, &pairs.len());
        }
        map.finish()
    }
}

impl GenerationTargets {
    pub fn pairs(&self, qualified_key: &str) -> Option<&[TargetPair]> {
        self.map.get(qualified_key).map(Vec::as_slice)
    }

    pub fn contains(&self, qualified_key: &str) -> bool {
        self.map.contains_key(qualified_key)
    }

    /// Number of distinct target kinds reached.
    pub fn kind_count(&self) -> usize {
        self.map.len()
    }

    fn push(&mut self, qualified_key: &str, pair: TargetPair) {
        self.map
            .entry(qualified_key.to_string())
            .or_default()
            .push(pair);
    }
}

/// Collect all generation targets reachable from `root`.
///
/// Fails only if `root_key` is not a registered target kind; traversal itself
/// cannot fail (accessors are total functions over the model).
pub fn collect_targets(
    targets: &TargetRegistry,
    root_key: &str,
    root: ElementRef,
) -> Result<GenerationTargets, ConfigurationError> {
    let descriptor = targets.resolve(root_key)?;
    let mut collected = GenerationTargets::default();
    collect(
        targets,
        descriptor.qualified_key(),
        root.clone(),
        root,
        &mut collected,
    );
    Ok(collected)
}

fn collect(
    targets: &TargetRegistry,
    key: &str,
    scope: ElementRef,
    element: ElementRef,
    collected: &mut GenerationTargets,
) {
    collected.push(key, (scope, element.clone()));

    for descriptor in targets.contained_by(key) {
        let Some(accessor) = descriptor.accessor() else {
            continue; // registration guarantees contained kinds have one
        };

        // Facet-scoped kinds are only followed where the facet is enabled,
        // and their subtree keeps the current element as scope.
        let subscope = match descriptor.facet_key() {
            None => None,
            Some(facet) if element.facet_enabled(facet) => Some(element.clone()),
            Some(_) => continue,
        };

        for child in accessor(element.as_ref()).into_vec() {
            let child_scope = subscope.clone().unwrap_or_else(|| child.clone());
            collect(
                targets,
                descriptor.qualified_key(),
                child_scope,
                child,
                collected,
            );
        }
    }
}
