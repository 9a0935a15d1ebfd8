//! Infrastructure adapters for artifex.
//!
//! This crate implements the ports defined in `artifex-core` and supplies the
//! stock [`TemplateBody`](artifex_core::domain::TemplateBody) implementations.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::{FnBody, InterpolatedBody, LiteralBody};
