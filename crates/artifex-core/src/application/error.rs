//! Application layer errors.
//!
//! [`GenerationError`] is the single reportable failure for one element's
//! render: it carries the originating template, target kind, and element
//! identity so a build log points straight at the offending model/template
//! pair, with the underlying [`RenderError`] as the source.

use thiserror::Error;

use crate::domain::RenderError;

pub use crate::application::ports::FilesystemError;

/// A failure while generating one file for one element.
///
/// Propagated to the orchestrator's caller and aborts the remaining template
/// loop for the run; there is no skip-and-continue across templates. Because
/// the deletion pass only happens after the full loop, a mid-run failure
/// leaves the target directory partially reconciled.
#[derive(Debug, Error)]
#[error("error generating {template} for {target} {element}")]
pub struct GenerationError {
    /// Display name of the failing template.
    pub template: String,
    /// Qualified key of the template's target kind.
    pub target: String,
    /// Display identity of the element being rendered.
    pub element: String,
    #[source]
    pub cause: RenderError,
}
