//! Stock template body implementations.
//!
//! The core is agnostic to the templating language behind a body; these are
//! the bodies most configurations need. Anything fancier (a full template
//! engine, an external process) just implements
//! [`TemplateBody`](artifex_core::domain::TemplateBody) itself.

mod bodies;

pub use bodies::{FnBody, InterpolatedBody, LiteralBody};
