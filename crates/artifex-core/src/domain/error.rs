//! Domain-layer errors.
//!
//! Two families live here:
//!
//! - [`ConfigurationError`] — raised while wiring the registry (duplicate
//!   keys, dangling references). These are programmer errors, fatal at
//!   configuration time, and intended to fail a build immediately.
//! - [`RenderError`] — raised while evaluating a guard, output-path pattern,
//!   or template body for one element. The orchestrator wraps these into a
//!   [`GenerationError`](crate::application::GenerationError) carrying the
//!   originating template and element.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::FilesystemError;

/// Fatal configuration-time errors.
///
/// Not recoverable: registries are expected to be fully and correctly
/// populated before the first generation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("attempting to redefine target '{qualified_key}'")]
    DuplicateTarget { qualified_key: String },

    #[error("target '{key}' defines container as '{container_key}' but no such target exists")]
    UnknownContainer { key: String, container_key: String },

    #[error("target '{qualified_key}' declares a container but no child accessor")]
    MissingAccessor { qualified_key: String },

    #[error("can not find target with key '{key}'")]
    UnknownTargetKey { key: String },

    #[error("attempting to redefine template set '{name}'")]
    DuplicateTemplateSet { name: String },

    #[error(
        "template set '{name}' defined requirement on template set '{requirement}' that does not exist"
    )]
    UnknownRequiredTemplateSet { name: String, requirement: String },

    #[error("unable to locate template set '{name}'")]
    UnknownTemplateSet { name: String },

    #[error(
        "unknown target '{target}' for template '{template}'. Valid targets include: {valid_targets}"
    )]
    UnknownTemplateTarget {
        template: String,
        target: String,
        valid_targets: String,
    },

    #[error("template already exists with specified name '{name}' in template set '{set}'")]
    DuplicateTemplate { set: String, name: String },
}

/// Failures while evaluating anything against a render context.
///
/// Covers guard expressions, output-path patterns, and template bodies.
/// Filesystem failures during a render fold in here too; the engine
/// deliberately does not distinguish them from other per-element failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown identifier '{name}' in pattern")]
    UnknownIdentifier { name: String },

    #[error("unknown field '{field}' on '{name}'")]
    UnknownField { name: String, field: String },

    #[error("unknown helper function '{name}'")]
    UnknownHelper { name: String },

    #[error("unclosed placeholder in pattern '{pattern}'")]
    UnclosedPlaceholder { pattern: String },

    #[error("output path '{}' already produced by template '{earlier_template}'", path.display())]
    OutputPathCollision {
        path: PathBuf,
        earlier_template: String,
    },

    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Free-form failure reported by an external template body renderer.
    #[error("{0}")]
    Body(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_render_like_the_registry_raised_them() {
        let err = ConfigurationError::UnknownContainer {
            key: "foo".into(),
            container_key: "bar".into(),
        };
        assert_eq!(
            err.to_string(),
            "target 'foo' defines container as 'bar' but no such target exists"
        );

        let err = ConfigurationError::UnknownTargetKey { key: "foo".into() };
        assert_eq!(err.to_string(), "can not find target with key 'foo'");
    }

    #[test]
    fn filesystem_errors_surface_transparently_as_render_errors() {
        let err = RenderError::from(FilesystemError {
            path: PathBuf::from("/out/a.txt"),
            reason: "permission denied".into(),
        });
        assert!(err.to_string().contains("/out/a.txt"));
        assert!(err.to_string().contains("permission denied"));
    }
}
