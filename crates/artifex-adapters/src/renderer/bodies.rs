//! Interpolated, literal, and closure-backed template bodies.

use artifex_core::domain::{RenderContext, RenderError, TemplateBody};

/// A body that runs its source string through the render context's `{...}`
/// interpolation — the same syntax output-path patterns use.
pub struct InterpolatedBody {
    source: String,
}

impl InterpolatedBody {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl TemplateBody for InterpolatedBody {
    fn render(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        ctx.interpolate(&self.source)
    }
}

/// A body with fixed content, independent of the element being rendered.
pub struct LiteralBody {
    content: String,
}

impl LiteralBody {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl TemplateBody for LiteralBody {
    fn render(&self, _ctx: &RenderContext) -> Result<String, RenderError> {
        Ok(self.content.clone())
    }
}

/// A body backed by an arbitrary function over the render context.
///
/// The escape hatch for generation logic too involved for interpolation:
/// iterate child collections, branch on model state, call into anything.
pub struct FnBody<F>(F);

impl<F> FnBody<F>
where
    F: Fn(&RenderContext) -> Result<String, RenderError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> TemplateBody for FnBody<F>
where
    F: Fn(&RenderContext) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        (self.0)(ctx)
    }
}
