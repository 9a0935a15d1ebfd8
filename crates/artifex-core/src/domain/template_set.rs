//! Named, composable groups of templates.
//!
//! A template set is an ordered bag of templates plus the names of other sets
//! it requires. Requirements are resolved eagerly at definition time; a
//! dangling reference is a fatal configuration error. Templates are keyed by
//! display name, unique within a set.

use std::fmt;

use crate::domain::error::ConfigurationError;
use crate::domain::template::Template;

/// Options for defining a template set.
#[derive(Default, Clone)]
pub struct TemplateSetOptions {
    required_template_sets: Vec<String>,
    description: Option<String>,
}

impl TemplateSetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a requirement on another, already-defined set.
    pub fn requires(mut self, name: impl Into<String>) -> Self {
        self.required_template_sets.push(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn required_template_sets(&self) -> &[String] {
        &self.required_template_sets
    }
}

/// A named collection of templates with declared inter-set dependencies.
pub struct TemplateSet {
    name: String,
    description: Option<String>,
    required_template_sets: Vec<String>,
    templates: Vec<Template>,
}

impl TemplateSet {
    pub(crate) fn new(name: String, options: TemplateSetOptions) -> Self {
        Self {
            name,
            description: options.description,
            required_template_sets: options.required_template_sets,
            templates: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn required_template_sets(&self) -> &[String] {
        &self.required_template_sets
    }

    /// Templates in registration order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn template_by_name(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name() == name)
    }

    /// Add a template, deriving its display name if none was given.
    ///
    /// The caller ([`Registry`](crate::domain::Registry)) has already
    /// validated the template's target key.
    pub(crate) fn register_template(
        &mut self,
        mut template: Template,
    ) -> Result<(), ConfigurationError> {
        if !template.has_explicit_name() {
            template.assign_name(format!("{}:{}", self.name, template.template_key()));
        }
        if self.template_by_name(template.name()).is_some() {
            return Err(ConfigurationError::DuplicateTemplate {
                set: self.name.clone(),
                name: template.name().to_string(),
            });
        }
        self.templates.push(template);
        Ok(())
    }
}

impl fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSet")
            .field("name", &self.name)
            .field("required_template_sets", &self.required_template_sets)
            .field(
                "templates",
                &self.templates.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
