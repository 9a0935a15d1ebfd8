//! The render context: the bound-variable environment for one element.
//!
//! Every render gets a fresh, isolated context holding the matched element,
//! the template's static extra data, and its merged helper bundles. Guards,
//! output-path patterns, and interpolated bodies all evaluate against the
//! same context, so a value bound once is visible everywhere in the render.
//!
//! # Pattern syntax
//!
//! [`RenderContext::interpolate`] is the expression evaluator used for output
//! paths and simple bodies:
//!
//! | Pattern              | Meaning                                          |
//! |----------------------|--------------------------------------------------|
//! | `{entity}`           | bound variable (element name or data value)      |
//! | `{entity.name}`      | element's plain name                             |
//! | `{entity.qualified_name}` | element's hierarchical name                 |
//! | `{entity.path}`      | qualified name with `.` replaced by `/`          |
//! | `{copyright()}`      | zero-argument helper function                    |
//! | `{{` / `}}`          | literal `{` / `}`                                |
//!
//! Resolution is strict: an unknown identifier, field, or helper is a
//! [`RenderError`], not a silently preserved placeholder. Path evaluation
//! failures must surface per element rather than leak into file names.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::element::ElementRef;
use crate::domain::error::RenderError;

/// A value bound to an identifier in a render context.
#[derive(Clone)]
pub enum ContextValue {
    /// A model element; field access resolves through the [`Element`] trait.
    ///
    /// [`Element`]: crate::domain::Element
    Element(ElementRef),
    /// Static data carried from a template's `extra_data`.
    Data(Value),
}

/// A named helper function, callable from patterns as `{name()}` and from
/// guards or bodies through [`RenderContext::call_helper`].
pub type HelperFn = Arc<dyn Fn(&RenderContext) -> Result<String, RenderError> + Send + Sync>;

/// An ordered bundle of helper functions merged into render contexts.
///
/// Helper implementations are external to the engine; a bundle is just the
/// unit in which they are attached to templates. Later bundles override
/// earlier ones name-by-name when merged.
#[derive(Clone, Default)]
pub struct Helpers {
    functions: Vec<(String, HelperFn)>,
}

impl Helpers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&RenderContext) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        self.functions.push((name.into(), Arc::new(function)));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// The bound-variable environment passed into guard, path-pattern, and body
/// evaluation for one element.
#[derive(Clone, Default)]
pub struct RenderContext {
    variables: HashMap<String, ContextValue>,
    helpers: HashMap<String, HelperFn>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a model element under an identifier.
    pub fn bind_element(&mut self, name: impl Into<String>, element: ElementRef) {
        self.variables
            .insert(name.into(), ContextValue::Element(element));
    }

    /// Bind a static data value under an identifier.
    pub fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), ContextValue::Data(value));
    }

    /// Merge a helper bundle; names already present are overridden.
    pub fn merge_helpers(&mut self, helpers: &Helpers) {
        for (name, function) in &helpers.functions {
            self.helpers.insert(name.clone(), function.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.variables.get(name)
    }

    /// The element bound under `name`, if any.
    pub fn element(&self, name: &str) -> Option<&ElementRef> {
        match self.variables.get(name) {
            Some(ContextValue::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// The data value bound under `name`, if any.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.variables.get(name) {
            Some(ContextValue::Data(value)) => Some(value),
            _ => None,
        }
    }

    /// Invoke a helper function by name.
    pub fn call_helper(&self, name: &str) -> Result<String, RenderError> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| RenderError::UnknownHelper {
                name: name.to_string(),
            })?;
        helper(self)
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Evaluate a `{...}` pattern against this context. See the module docs
    /// for the syntax.
    pub fn interpolate(&self, pattern: &str) -> Result<String, RenderError> {
        let mut out = String::with_capacity(pattern.len());
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut expr = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        expr.push(c);
                    }
                    if !closed {
                        return Err(RenderError::UnclosedPlaceholder {
                            pattern: pattern.to_string(),
                        });
                    }
                    out.push_str(&self.evaluate(expr.trim())?);
                }
                _ => out.push(c),
            }
        }
        Ok(out)
    }

    fn evaluate(&self, expr: &str) -> Result<String, RenderError> {
        if let Some(name) = expr.strip_suffix("()") {
            return self.call_helper(name.trim_end());
        }

        let (name, field) = match expr.split_once('.') {
            Some((name, field)) => (name, Some(field)),
            None => (expr, None),
        };

        let value = self
            .variables
            .get(name)
            .ok_or_else(|| RenderError::UnknownIdentifier {
                name: name.to_string(),
            })?;

        match (value, field) {
            (ContextValue::Element(element), None) => Ok(element.name()),
            (ContextValue::Element(element), Some(field)) => match field {
                "name" => Ok(element.name()),
                "qualified_name" => Ok(element.qualified_name()),
                "path" => Ok(element.qualified_name().replace('.', "/")),
                _ => Err(RenderError::UnknownField {
                    name: name.to_string(),
                    field: field.to_string(),
                }),
            },
            (ContextValue::Data(value), None) => Ok(data_to_string(value)),
            (ContextValue::Data(value), Some(field)) => value
                .get(field)
                .map(data_to_string)
                .ok_or_else(|| RenderError::UnknownField {
                    name: name.to_string(),
                    field: field.to_string(),
                }),
        }
    }
}

/// Strings interpolate unquoted; everything else uses its JSON rendering.
fn data_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
