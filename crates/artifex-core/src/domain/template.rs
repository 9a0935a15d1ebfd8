//! The template: one generated file per matched element.
//!
//! A template is created once at configuration time, is immutable thereafter,
//! and is reused across many generation runs and many matched elements. It
//! knows which target kind it applies to, under which facet and guard
//! conditions, and how to produce its output: an output-path pattern plus an
//! opaque [`TemplateBody`].
//!
//! The body abstraction replaces per-template-language subclassing with a
//! single uniform unit: anything that can turn a render context into a string
//! is a body. The engine is agnostic to the templating language behind it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::context::{Helpers, RenderContext};
use crate::domain::element::{Element, ElementRef};
use crate::domain::error::RenderError;

/// An opaque renderer producing the file content for one element.
///
/// Implementations live outside the core (see `artifex-adapters` for
/// interpolated, literal, and closure-backed bodies).
pub trait TemplateBody: Send + Sync {
    fn render(&self, ctx: &RenderContext) -> Result<String, RenderError>;
}

/// A guard expression evaluated against the render context; rendering is
/// skipped for elements where it answers `false`.
pub type Guard = Arc<dyn Fn(&RenderContext) -> Result<bool, RenderError> + Send + Sync>;

/// A unit of generation: target kind, applicability conditions, and output.
#[derive(Clone)]
pub struct Template {
    name: Option<String>,
    template_key: String,
    target_key: String,
    facets: Vec<String>,
    guard: Option<Guard>,
    helpers: Vec<Helpers>,
    extra_data: BTreeMap<String, Value>,
    output_path_pattern: String,
    body: Arc<dyn TemplateBody>,
}

impl Template {
    /// Create a template for `target_key` rendering `body` to the path
    /// produced by `output_path_pattern`.
    ///
    /// `template_key` identifies the template within its set; the display
    /// name defaults to `"{set}:{template_key}"` once registered. The target
    /// key is validated when the template is registered into a set, not here.
    pub fn new(
        target_key: impl Into<String>,
        template_key: impl Into<String>,
        output_path_pattern: impl Into<String>,
        body: impl TemplateBody + 'static,
    ) -> Self {
        Self {
            name: None,
            template_key: template_key.into(),
            target_key: target_key.into(),
            facets: Vec::new(),
            guard: None,
            helpers: Vec::new(),
            extra_data: BTreeMap::new(),
            output_path_pattern: output_path_pattern.into(),
            body: Arc::new(body),
        }
    }

    /// Require a facet to be enabled on the scope element.
    pub fn with_facet(mut self, facet: impl Into<String>) -> Self {
        self.facets.push(facet.into());
        self
    }

    /// Skip elements for which the guard answers `false`.
    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&RenderContext) -> Result<bool, RenderError> + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Merge a helper bundle into every context this template produces.
    pub fn with_helpers(mut self, helpers: Helpers) -> Self {
        self.helpers.push(helpers);
        self
    }

    /// Bind a static value in every context this template produces.
    pub fn with_extra_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra_data.insert(key.into(), value);
        self
    }

    /// Override the derived display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name: explicit name if set, else `"{set}:{key}"` after
    /// registration, else the bare template key.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.template_key)
    }

    pub fn template_key(&self) -> &str {
        &self.template_key
    }

    pub fn target_key(&self) -> &str {
        &self.target_key
    }

    pub fn facets(&self) -> &[String] {
        &self.facets
    }

    pub fn extra_data(&self) -> &BTreeMap<String, Value> {
        &self.extra_data
    }

    pub fn output_path_pattern(&self) -> &str {
        &self.output_path_pattern
    }

    /// Whether this template applies to an element found under `scope`.
    ///
    /// True if the template requires no facets, or if every required facet is
    /// enabled on the scope element. For facet-scoped target kinds the scope
    /// is the nearest enclosing standard element, which is the thing facet
    /// enablement is actually tested against.
    pub fn applicable(&self, scope: &dyn Element) -> bool {
        self.facets.iter().all(|facet| scope.facet_enabled(facet))
    }

    /// Build the fresh, isolated context used for one element's render.
    ///
    /// Binding order: the element under the target key's last segment
    /// (`jpa.unit` binds `unit`), then extra data, then helper bundles.
    pub fn create_context(&self, element: &ElementRef) -> RenderContext {
        let mut ctx = RenderContext::new();
        ctx.bind_element(self.element_binding(), element.clone());
        for (key, value) in &self.extra_data {
            ctx.set_value(key.clone(), value.clone());
        }
        for helpers in &self.helpers {
            ctx.merge_helpers(helpers);
        }
        ctx
    }

    /// Evaluate the guard against a context; `true` when no guard is set.
    pub fn guard_allows(&self, ctx: &RenderContext) -> Result<bool, RenderError> {
        match &self.guard {
            Some(guard) => guard(ctx),
            None => Ok(true),
        }
    }

    /// Render the body against a context.
    pub fn render_body(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        self.body.render(ctx)
    }

    /// Identifier the matched element is bound under in render contexts.
    pub fn element_binding(&self) -> &str {
        match self.target_key.rsplit_once('.') {
            Some((_, key)) => key,
            None => &self.target_key,
        }
    }

    /// Display identity of an element for diagnostics.
    pub fn name_for_element(element: &dyn Element) -> String {
        element.qualified_name()
    }

    pub(crate) fn has_explicit_name(&self) -> bool {
        self.name.is_some()
    }

    pub(crate) fn assign_name(&mut self, name: String) {
        self.name = Some(name);
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name())
            .field("target_key", &self.target_key)
            .field("facets", &self.facets)
            .field("output_path_pattern", &self.output_path_pattern)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
