//! Artifex Core - model-driven artifact generation engine
//!
//! Given an in-memory object graph describing a software architecture, this
//! crate walks the graph according to a declared schema, matches each
//! discovered element against registered templates, renders the applicable
//! ones into a target directory, and deletes any previously generated file
//! that is no longer produced. The target directory is a derived, fully-owned
//! artifact set: after every successful run it equals the deterministic image
//! of `(model, templates)`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Caller / build tool          │
//! └──────────────────┬──────────────────────┘
//!                    │ configures, then runs
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     Registry (targets + template sets)  │
//! └──────────────────┬──────────────────────┘
//!                    │ drives
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Generator (collect → render → clean)  │
//! └──────────────────┬──────────────────────┘
//!                    │ through the Filesystem port
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │  artifex-adapters (local / in-memory)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use artifex_core::prelude::*;
//! # use std::sync::Arc;
//! # fn body() -> impl TemplateBody { struct B; impl TemplateBody for B {
//! #     fn render(&self, _: &RenderContext) -> Result<String, RenderError> { Ok(String::new()) }
//! # } B }
//! # fn model() -> ElementRef { unimplemented!() }
//! # fn filesystem() -> Box<dyn Filesystem> { unimplemented!() }
//!
//! // 1. Declare the schema and templates.
//! let mut registry = Registry::new();
//! registry.register_target("repository", None, TargetOptions::new())?;
//! registry.define_template_set("main", TemplateSetOptions::new())?;
//! registry.add_template(
//!     "main",
//!     Template::new("repository", "repo.txt", "main/{repository.name}.txt", body()),
//! )?;
//!
//! // 2. Run generation against a model root.
//! let templates = registry.load_templates_from_sets(&["main"])?;
//! let filesystem = filesystem();
//! let stats = Generator::new(&registry, filesystem.as_ref()).generate(
//!     "repository",
//!     model(),
//!     "out".as_ref(),
//!     &templates,
//!     None,
//! )?;
//! # Ok::<(), artifex_core::ArtifexError>(())
//! ```

// Domain layer (schema, templates, contexts)
pub mod domain;

// Application layer (collector, orchestrator, ports)
pub mod application;

// Unified error types
pub mod error;

pub use error::{ArtifexError, ArtifexResult};

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ElementFilter, Filesystem, FilesystemError, GenerationError, GenerationStats, Generator,
    };
    pub use crate::domain::{
        Children, Element, ElementRef, Helpers, Registry, RenderContext, RenderError, Template,
        TemplateBody, TargetOptions, TemplateSetOptions,
    };
    pub use crate::error::{ArtifexError, ArtifexResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
