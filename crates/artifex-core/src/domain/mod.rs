//! Domain layer: the pure model of generation.
//!
//! Target schema, template sets, templates, and render contexts. Nothing in
//! this layer performs I/O or logs; observability and the filesystem are the
//! application layer's business.

pub mod context;
pub mod element;
pub mod error;
pub mod registry;
pub mod target;
pub mod template;
pub mod template_set;

pub use context::{ContextValue, HelperFn, Helpers, RenderContext};
pub use element::{ChildAccessor, Children, Element, ElementRef};
pub use error::{ConfigurationError, RenderError};
pub use registry::Registry;
pub use target::{TargetDescriptor, TargetOptions, TargetRegistry};
pub use template::{Guard, Template, TemplateBody};
pub use template_set::{TemplateSet, TemplateSetOptions};
