//! Application layer: traversal and orchestration over the domain model.

pub mod collector;
pub mod error;
pub mod generator;
pub mod ports;

pub use collector::{GenerationTargets, TargetPair, collect_targets};
pub use error::{FilesystemError, GenerationError};
pub use generator::{ElementFilter, GenerationStats, Generator};
pub use ports::Filesystem;
