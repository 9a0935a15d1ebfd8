//! The configuration root: one registry per generation session.
//!
//! A [`Registry`] owns the target schema and the named template sets. It is
//! an explicit, constructible object — nothing here is process-global — so
//! independent sessions (parallel tests, multi-project builds) each carry
//! their own registry instead of sharing resettable class-level state.
//!
//! Expected lifecycle: populate fully at configuration time (targets first,
//! then sets, then templates), then treat as read-only for the duration of
//! every [`Generator`](crate::application::Generator) run.

use crate::domain::error::ConfigurationError;
use crate::domain::target::{TargetOptions, TargetRegistry};
use crate::domain::template::Template;
use crate::domain::template_set::{TemplateSet, TemplateSetOptions};

/// Target schema plus template sets for one generation session.
#[derive(Default, Debug)]
pub struct Registry {
    targets: TargetRegistry,
    template_sets: Vec<TemplateSet>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    /// Register a target descriptor. See [`TargetRegistry::register`].
    pub fn register_target(
        &mut self,
        key: &str,
        container_key: Option<&str>,
        options: TargetOptions,
    ) -> Result<(), ConfigurationError> {
        self.targets.register(key, container_key, options)?;
        Ok(())
    }

    /// Define a new, empty template set.
    ///
    /// Fails on a duplicate name or a requirement on a set that has not been
    /// defined yet; requirement order therefore implies definition order.
    pub fn define_template_set(
        &mut self,
        name: &str,
        options: TemplateSetOptions,
    ) -> Result<(), ConfigurationError> {
        if self.template_set_by_name(name).is_some() {
            return Err(ConfigurationError::DuplicateTemplateSet {
                name: name.to_string(),
            });
        }
        for requirement in options.required_template_sets() {
            if self.template_set_by_name(requirement).is_none() {
                return Err(ConfigurationError::UnknownRequiredTemplateSet {
                    name: name.to_string(),
                    requirement: requirement.clone(),
                });
            }
        }
        self.template_sets
            .push(TemplateSet::new(name.to_string(), options));
        Ok(())
    }

    /// Register a template into a previously defined set.
    ///
    /// Validates the template's target against the schema; the error lists
    /// the valid targets to make configuration mistakes cheap to diagnose.
    pub fn add_template(
        &mut self,
        set_name: &str,
        template: Template,
    ) -> Result<(), ConfigurationError> {
        if !self.targets.contains(template.target_key()) {
            return Err(ConfigurationError::UnknownTemplateTarget {
                template: template.name().to_string(),
                target: template.target_key().to_string(),
                valid_targets: self.targets.keys().join(", "),
            });
        }
        let set = self
            .template_sets
            .iter_mut()
            .find(|s| s.name() == set_name)
            .ok_or_else(|| ConfigurationError::UnknownTemplateSet {
                name: set_name.to_string(),
            })?;
        set.register_template(template)
    }

    pub fn template_sets(&self) -> &[TemplateSet] {
        &self.template_sets
    }

    pub fn template_set_by_name(&self, name: &str) -> Option<&TemplateSet> {
        self.template_sets.iter().find(|s| s.name() == name)
    }

    /// Resolve a set by name, failing on unknown names.
    pub fn template_set(&self, name: &str) -> Result<&TemplateSet, ConfigurationError> {
        self.template_set_by_name(name)
            .ok_or_else(|| ConfigurationError::UnknownTemplateSet {
                name: name.to_string(),
            })
    }

    /// Load the templates of the named sets plus their requirement closure.
    ///
    /// Requirements are resolved depth-first before the requiring set, each
    /// set is processed at most once, and templates are deduplicated by
    /// display name with later sets overriding earlier duplicates in place.
    /// The resulting order is first-insertion order and is the order the
    /// orchestrator runs templates in.
    pub fn load_templates_from_sets(
        &self,
        set_names: &[&str],
    ) -> Result<Vec<Template>, ConfigurationError> {
        let mut templates: Vec<Template> = Vec::new();
        let mut processed: Vec<String> = Vec::new();
        self.load_templates(set_names, &mut templates, &mut processed)?;
        Ok(templates)
    }

    fn load_templates(
        &self,
        set_names: &[&str],
        templates: &mut Vec<Template>,
        processed: &mut Vec<String>,
    ) -> Result<(), ConfigurationError> {
        for name in set_names {
            if processed.iter().any(|p| p == name) {
                continue;
            }
            let set = self.template_set(name)?;
            processed.push(set.name().to_string());

            let requirements: Vec<&str> = set
                .required_template_sets()
                .iter()
                .map(String::as_str)
                .collect();
            self.load_templates(&requirements, templates, processed)?;

            for template in set.templates() {
                match templates.iter_mut().find(|t| t.name() == template.name()) {
                    Some(slot) => *slot = template.clone(),
                    None => templates.push(template.clone()),
                }
            }
        }
        Ok(())
    }
}
