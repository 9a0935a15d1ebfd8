//! The model-graph contract consumed by the engine.
//!
//! The engine never defines the domain objects it generates from; callers
//! bring their own object graph (repositories, entities, attributes, ...).
//! Anything placed in that graph implements [`Element`], which is the minimal
//! surface the collector and templates need:
//!
//! - a stable display identity for diagnostics (`name` / `qualified_name`)
//! - a facet-enablement query for facet-scoped target kinds
//! - `Any`-based downcasting so typed child accessors can recover the
//!   concrete type at traversal time
//!
//! Child navigation is deliberately *not* part of this trait. Accessors are
//! registered per target kind in the [`TargetRegistry`](crate::domain::TargetRegistry)
//! as plain functions, resolved once at configuration time, so traversal
//! needs no reflective method dispatch.

use std::any::Any;
use std::sync::Arc;

/// A node in the caller-supplied model graph.
///
/// Implementations are expected to be cheap to query; the engine calls
/// `qualified_name` freely while logging and reporting errors.
pub trait Element: Any + Send + Sync {
    /// Plain display name of the element.
    fn name(&self) -> String;

    /// Hierarchical display identifier, used in diagnostics.
    ///
    /// Defaults to [`name`](Element::name) for elements without a useful
    /// hierarchy.
    fn qualified_name(&self) -> String {
        self.name()
    }

    /// Whether the given facet is enabled on this element.
    ///
    /// Only standard elements acting as facet scopes need to override this;
    /// the default answers `false` for every facet.
    fn facet_enabled(&self, _facet: &str) -> bool {
        false
    }

    /// Upcast for downcasting inside typed child accessors.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a model element.
///
/// The collector clones handles freely while building the generation-target
/// map, so elements sit behind `Arc` rather than being borrowed through the
/// whole run.
pub type ElementRef = Arc<dyn Element>;

/// Result of a child accessor for one parent element.
///
/// Mirrors the shapes a model accessor can legitimately return: nothing,
/// a single nested element, or a collection. A single value is treated as a
/// one-element collection by the traversal.
pub enum Children {
    /// No children; the traversal skips this descriptor for this parent.
    None,
    /// A single nested element.
    One(ElementRef),
    /// An ordered collection of elements, traversed in the given order.
    Many(Vec<ElementRef>),
}

impl Children {
    pub fn into_vec(self) -> Vec<ElementRef> {
        match self {
            Children::None => Vec::new(),
            Children::One(element) => vec![element],
            Children::Many(elements) => elements,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Children::None)
    }
}

impl From<Option<ElementRef>> for Children {
    fn from(value: Option<ElementRef>) -> Self {
        match value {
            Some(element) => Children::One(element),
            None => Children::None,
        }
    }
}

impl FromIterator<ElementRef> for Children {
    fn from_iter<T: IntoIterator<Item = ElementRef>>(iter: T) -> Self {
        Children::Many(iter.into_iter().collect())
    }
}

/// Typed child accessor registered alongside a target descriptor.
///
/// The accessor receives the *parent* element (for facet-scoped kinds this is
/// the enclosing standard element, not the facet object) and returns the
/// children of the descriptor's kind. An accessor handed an element of an
/// unexpected concrete type should return [`Children::None`].
pub type ChildAccessor = Arc<dyn Fn(&dyn Element) -> Children + Send + Sync>;
